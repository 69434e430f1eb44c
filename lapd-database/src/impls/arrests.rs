use crate::database::{Database, to_i64, to_i64_vec, to_u64, to_u64_vec};
use crate::impls::now_unix_secs;
use crate::model::records::{Arrest, NewArrest};

#[derive(sqlx::FromRow)]
struct ArrestRow {
    id: i64,
    guild_id: i64,
    booking_number: i64,
    arrestee_roblox_id: Option<i64>,
    arrestee_username: String,
    charges: Vec<String>,
    age_group: Option<String>,
    gender: Option<String>,
    height: Option<String>,
    weight: Option<i32>,
    notes: Option<String>,
    arresting_officer_id: i64,
    assisting_officer_ids: Vec<i64>,
    created_at: i64,
}

const ARREST_COLUMNS: &str = "id, guild_id, booking_number, arrestee_roblox_id, arrestee_username, \
     charges, age_group, gender, height, weight, notes, arresting_officer_id, \
     assisting_officer_ids, created_at";

/// Book an arrest and allocate the guild's next booking number.
pub async fn create_arrest(db: &Database, new_arrest: NewArrest<'_>) -> anyhow::Result<Arrest> {
    let guild_id_i64 = to_i64(new_arrest.guild_id, "guild_id")?;
    let mut tx = db.begin_guild_locked(new_arrest.guild_id).await?;

    let next_booking_number: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(booking_number), 0) + 1 FROM arrests WHERE guild_id = $1",
    )
    .bind(guild_id_i64)
    .fetch_one(&mut *tx)
    .await?;

    let row: ArrestRow = sqlx::query_as(&format!(
        "INSERT INTO arrests (
            guild_id,
            booking_number,
            arrestee_roblox_id,
            arrestee_username,
            charges,
            age_group,
            gender,
            height,
            weight,
            notes,
            arresting_officer_id,
            assisting_officer_ids,
            created_at
         ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
         RETURNING {ARREST_COLUMNS}"
    ))
    .bind(guild_id_i64)
    .bind(next_booking_number)
    .bind(
        new_arrest
            .arrestee_roblox_id
            .map(|id| to_i64(id, "arrestee_roblox_id"))
            .transpose()?,
    )
    .bind(new_arrest.arrestee_username)
    .bind(new_arrest.charges)
    .bind(new_arrest.age_group)
    .bind(new_arrest.gender)
    .bind(new_arrest.height)
    .bind(new_arrest.weight.map(|weight| i32::try_from(weight).unwrap_or(i32::MAX)))
    .bind(new_arrest.notes)
    .bind(to_i64(new_arrest.arresting_officer_id, "arresting_officer_id")?)
    .bind(to_i64_vec(new_arrest.assisting_officer_ids, "assisting_officer_ids")?)
    .bind(to_i64(now_unix_secs(), "now")?)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    to_arrest(row)
}

pub async fn get_arrest(
    db: &Database,
    guild_id: u64,
    booking_number: u64,
) -> anyhow::Result<Option<Arrest>> {
    let row: Option<ArrestRow> = sqlx::query_as(&format!(
        "SELECT {ARREST_COLUMNS} FROM arrests WHERE guild_id = $1 AND booking_number = $2"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(booking_number, "booking_number")?)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_arrest).transpose()
}

/// Arrest history for a Roblox username, newest first.
pub async fn search_arrests(
    db: &Database,
    guild_id: u64,
    username: &str,
    limit: u32,
) -> anyhow::Result<Vec<Arrest>> {
    let rows: Vec<ArrestRow> = sqlx::query_as(&format!(
        "SELECT {ARREST_COLUMNS} FROM arrests
         WHERE guild_id = $1 AND LOWER(arrestee_username) = LOWER($2)
         ORDER BY booking_number DESC
         LIMIT $3"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(username.trim())
    .bind(i64::from(limit.clamp(1, 200)))
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(to_arrest).collect()
}

fn to_arrest(row: ArrestRow) -> anyhow::Result<Arrest> {
    Ok(Arrest {
        id: to_u64(row.id, "id")?,
        guild_id: to_u64(row.guild_id, "guild_id")?,
        booking_number: to_u64(row.booking_number, "booking_number")?,
        arrestee_roblox_id: row
            .arrestee_roblox_id
            .map(|id| to_u64(id, "arrestee_roblox_id"))
            .transpose()?,
        arrestee_username: row.arrestee_username,
        charges: row.charges,
        age_group: row.age_group,
        gender: row.gender,
        height: row.height,
        weight: row.weight.and_then(|weight| u32::try_from(weight).ok()),
        notes: row.notes,
        arresting_officer_id: to_u64(row.arresting_officer_id, "arresting_officer_id")?,
        assisting_officer_ids: to_u64_vec(row.assisting_officer_ids, "assisting_officer_ids")?,
        created_at: to_u64(row.created_at, "created_at")?,
    })
}
