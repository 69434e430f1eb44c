use anyhow::Context as _;

use crate::database::{Database, to_i64, to_i64_vec, to_u64, to_u64_vec};
use crate::impls::now_unix_secs;
use crate::model::records::{Incident, IncidentStatus, IncidentType, NewIncident};

#[derive(sqlx::FromRow)]
struct IncidentRow {
    id: i64,
    guild_id: i64,
    incident_number: i64,
    incident_type: String,
    status: String,
    location: String,
    description: String,
    suspects: Vec<String>,
    victims: Vec<String>,
    witnesses: Vec<String>,
    officer_ids: Vec<i64>,
    reporter_id: i64,
    created_at: i64,
    updated_at: i64,
}

const INCIDENT_COLUMNS: &str = "id, guild_id, incident_number, incident_type, status, location, \
     description, suspects, victims, witnesses, officer_ids, reporter_id, created_at, updated_at";

pub async fn create_incident(
    db: &Database,
    new_incident: NewIncident<'_>,
) -> anyhow::Result<Incident> {
    let guild_id_i64 = to_i64(new_incident.guild_id, "guild_id")?;
    let now = to_i64(now_unix_secs(), "now")?;
    let mut tx = db.begin_guild_locked(new_incident.guild_id).await?;

    let next_incident_number: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(incident_number), 0) + 1 FROM incidents WHERE guild_id = $1",
    )
    .bind(guild_id_i64)
    .fetch_one(&mut *tx)
    .await?;

    let row: IncidentRow = sqlx::query_as(&format!(
        "INSERT INTO incidents (
            guild_id,
            incident_number,
            incident_type,
            status,
            location,
            description,
            suspects,
            victims,
            witnesses,
            officer_ids,
            reporter_id,
            created_at,
            updated_at
         ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
         RETURNING {INCIDENT_COLUMNS}"
    ))
    .bind(guild_id_i64)
    .bind(next_incident_number)
    .bind(new_incident.incident_type.as_str())
    .bind(new_incident.status.as_str())
    .bind(new_incident.location)
    .bind(new_incident.description)
    .bind(new_incident.suspects)
    .bind(new_incident.victims)
    .bind(new_incident.witnesses)
    .bind(to_i64_vec(new_incident.officer_ids, "officer_ids")?)
    .bind(to_i64(new_incident.reporter_id, "reporter_id")?)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    to_incident(row)
}

pub async fn get_incident(
    db: &Database,
    guild_id: u64,
    incident_number: u64,
) -> anyhow::Result<Option<Incident>> {
    let row: Option<IncidentRow> = sqlx::query_as(&format!(
        "SELECT {INCIDENT_COLUMNS} FROM incidents WHERE guild_id = $1 AND incident_number = $2"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(incident_number, "incident_number")?)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_incident).transpose()
}

/// Change an incident's status. Returns the updated incident, or `None` if it does not exist.
pub async fn update_incident_status(
    db: &Database,
    guild_id: u64,
    incident_number: u64,
    status: IncidentStatus,
) -> anyhow::Result<Option<Incident>> {
    let row: Option<IncidentRow> = sqlx::query_as(&format!(
        "UPDATE incidents SET status = $3, updated_at = $4
         WHERE guild_id = $1 AND incident_number = $2
         RETURNING {INCIDENT_COLUMNS}"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(incident_number, "incident_number")?)
    .bind(status.as_str())
    .bind(to_i64(now_unix_secs(), "now")?)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_incident).transpose()
}

fn to_incident(row: IncidentRow) -> anyhow::Result<Incident> {
    let incident_type = IncidentType::parse(&row.incident_type)
        .with_context(|| format!("unknown incident_type `{}`", row.incident_type))?;
    let status = IncidentStatus::parse(&row.status)
        .with_context(|| format!("unknown incident status `{}`", row.status))?;

    Ok(Incident {
        id: to_u64(row.id, "id")?,
        guild_id: to_u64(row.guild_id, "guild_id")?,
        incident_number: to_u64(row.incident_number, "incident_number")?,
        incident_type,
        status,
        location: row.location,
        description: row.description,
        suspects: row.suspects,
        victims: row.victims,
        witnesses: row.witnesses,
        officer_ids: to_u64_vec(row.officer_ids, "officer_ids")?,
        reporter_id: to_u64(row.reporter_id, "reporter_id")?,
        created_at: to_u64(row.created_at, "created_at")?,
        updated_at: to_u64(row.updated_at, "updated_at")?,
    })
}
