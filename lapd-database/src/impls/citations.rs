use anyhow::Context as _;

use crate::database::{Database, to_i64, to_u64};
use crate::impls::now_unix_secs;
use crate::model::records::{Citation, CitationType, NewCitation};

#[derive(sqlx::FromRow)]
struct CitationRow {
    id: i64,
    guild_id: i64,
    citation_number: i64,
    citation_type: String,
    violator_roblox_id: Option<i64>,
    violator_username: String,
    violations: Vec<String>,
    fine_amount: Option<i32>,
    vehicle_model: String,
    vehicle_color: Option<String>,
    license_plate: String,
    location: String,
    issuing_officer_id: i64,
    created_at: i64,
}

const CITATION_COLUMNS: &str = "id, guild_id, citation_number, citation_type, violator_roblox_id, \
     violator_username, violations, fine_amount, vehicle_model, vehicle_color, license_plate, \
     location, issuing_officer_id, created_at";

pub async fn create_citation(
    db: &Database,
    new_citation: NewCitation<'_>,
) -> anyhow::Result<Citation> {
    let guild_id_i64 = to_i64(new_citation.guild_id, "guild_id")?;
    let fine_amount = new_citation
        .fine_amount
        .map(i32::try_from)
        .transpose()
        .context("fine_amount out of i32 range")?;
    let mut tx = db.begin_guild_locked(new_citation.guild_id).await?;

    let next_citation_number: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(citation_number), 0) + 1 FROM citations WHERE guild_id = $1",
    )
    .bind(guild_id_i64)
    .fetch_one(&mut *tx)
    .await?;

    let row: CitationRow = sqlx::query_as(&format!(
        "INSERT INTO citations (
            guild_id,
            citation_number,
            citation_type,
            violator_roblox_id,
            violator_username,
            violations,
            fine_amount,
            vehicle_model,
            vehicle_color,
            license_plate,
            location,
            issuing_officer_id,
            created_at
         ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
         RETURNING {CITATION_COLUMNS}"
    ))
    .bind(guild_id_i64)
    .bind(next_citation_number)
    .bind(new_citation.citation_type.as_str())
    .bind(
        new_citation
            .violator_roblox_id
            .map(|id| to_i64(id, "violator_roblox_id"))
            .transpose()?,
    )
    .bind(new_citation.violator_username)
    .bind(new_citation.violations)
    .bind(fine_amount)
    .bind(new_citation.vehicle_model)
    .bind(new_citation.vehicle_color)
    .bind(new_citation.license_plate)
    .bind(new_citation.location)
    .bind(to_i64(new_citation.issuing_officer_id, "issuing_officer_id")?)
    .bind(to_i64(now_unix_secs(), "now")?)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    to_citation(row)
}

pub async fn get_citation(
    db: &Database,
    guild_id: u64,
    citation_number: u64,
) -> anyhow::Result<Option<Citation>> {
    let row: Option<CitationRow> = sqlx::query_as(&format!(
        "SELECT {CITATION_COLUMNS} FROM citations WHERE guild_id = $1 AND citation_number = $2"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(citation_number, "citation_number")?)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_citation).transpose()
}

pub async fn search_citations(
    db: &Database,
    guild_id: u64,
    username: &str,
    limit: u32,
) -> anyhow::Result<Vec<Citation>> {
    let rows: Vec<CitationRow> = sqlx::query_as(&format!(
        "SELECT {CITATION_COLUMNS} FROM citations
         WHERE guild_id = $1 AND LOWER(violator_username) = LOWER($2)
         ORDER BY citation_number DESC
         LIMIT $3"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(username.trim())
    .bind(i64::from(limit.clamp(1, 200)))
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(to_citation).collect()
}

fn to_citation(row: CitationRow) -> anyhow::Result<Citation> {
    let citation_type = CitationType::parse(&row.citation_type)
        .with_context(|| format!("unknown citation_type `{}`", row.citation_type))?;

    Ok(Citation {
        id: to_u64(row.id, "id")?,
        guild_id: to_u64(row.guild_id, "guild_id")?,
        citation_number: to_u64(row.citation_number, "citation_number")?,
        citation_type,
        violator_roblox_id: row
            .violator_roblox_id
            .map(|id| to_u64(id, "violator_roblox_id"))
            .transpose()?,
        violator_username: row.violator_username,
        violations: row.violations,
        fine_amount: row.fine_amount.and_then(|amount| u32::try_from(amount).ok()),
        vehicle_model: row.vehicle_model,
        vehicle_color: row.vehicle_color,
        license_plate: row.license_plate,
        location: row.location,
        issuing_officer_id: to_u64(row.issuing_officer_id, "issuing_officer_id")?,
        created_at: to_u64(row.created_at, "created_at")?,
    })
}
