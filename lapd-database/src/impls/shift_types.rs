use crate::cache::{SETTINGS_CACHE_TTL, invalidate_shift_types, shift_types_key};
use crate::database::{Database, to_i64, to_i64_vec, to_u64, to_u64_vec};
use crate::impls::now_unix_secs;
use crate::model::guild_settings::{DEFAULT_SHIFT_TYPE_NAME, ShiftType};

#[derive(sqlx::FromRow)]
struct ShiftTypeRow {
    id: i64,
    guild_id: i64,
    name: String,
    is_default: bool,
    permitted_role_ids: Vec<i64>,
    created_at: i64,
}

pub async fn list_shift_types(db: &Database, guild_id: u64) -> anyhow::Result<Vec<ShiftType>> {
    let cache_key = shift_types_key(db.cache(), guild_id);
    db.cache()
        .get_or_load_json(&cache_key, SETTINGS_CACHE_TTL, || async {
            let rows: Vec<ShiftTypeRow> = sqlx::query_as(
                "SELECT id, guild_id, name, is_default, permitted_role_ids, created_at
                 FROM shift_types
                 WHERE guild_id = $1
                 ORDER BY is_default DESC, LOWER(name) ASC",
            )
            .bind(to_i64(guild_id, "guild_id")?)
            .fetch_all(db.pool())
            .await?;

            rows.into_iter().map(to_shift_type).collect()
        })
        .await
}

/// Create a shift type. Returns `None` when the name is already taken.
pub async fn add_shift_type(
    db: &Database,
    guild_id: u64,
    name: &str,
    permitted_role_ids: &[u64],
) -> anyhow::Result<Option<ShiftType>> {
    let row: Option<ShiftTypeRow> = sqlx::query_as(
        "INSERT INTO shift_types (guild_id, name, is_default, permitted_role_ids, created_at)
         VALUES ($1, $2, NOT EXISTS (SELECT 1 FROM shift_types WHERE guild_id = $1), $3, $4)
         ON CONFLICT (guild_id, (LOWER(name))) DO NOTHING
         RETURNING id, guild_id, name, is_default, permitted_role_ids, created_at",
    )
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(name.trim())
    .bind(to_i64_vec(permitted_role_ids, "permitted_role_ids")?)
    .bind(to_i64(now_unix_secs(), "now")?)
    .fetch_optional(db.pool())
    .await?;

    invalidate_shift_types(db.cache(), guild_id).await;

    row.map(to_shift_type).transpose()
}

/// Seed the "Default" shift type for guilds that have none.
pub async fn seed_default_shift_type(db: &Database, guild_id: u64) -> anyhow::Result<bool> {
    let existing = list_shift_types(db, guild_id).await?;
    if !existing.is_empty() {
        return Ok(false);
    }

    Ok(add_shift_type(db, guild_id, DEFAULT_SHIFT_TYPE_NAME, &[])
        .await?
        .is_some())
}

pub async fn remove_shift_type(db: &Database, guild_id: u64, name: &str) -> anyhow::Result<bool> {
    let guild_id_i64 = to_i64(guild_id, "guild_id")?;
    let mut tx = db.pool().begin().await?;

    let removed_default: Option<bool> = sqlx::query_scalar(
        "DELETE FROM shift_types WHERE guild_id = $1 AND LOWER(name) = LOWER($2)
         RETURNING is_default",
    )
    .bind(guild_id_i64)
    .bind(name.trim())
    .fetch_optional(&mut *tx)
    .await?;

    // Keep exactly one default while any type remains.
    if removed_default == Some(true) {
        sqlx::query(
            "UPDATE shift_types SET is_default = TRUE
             WHERE id = (
                 SELECT id FROM shift_types
                 WHERE guild_id = $1
                 ORDER BY created_at ASC, id ASC
                 LIMIT 1
             )",
        )
        .bind(guild_id_i64)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    invalidate_shift_types(db.cache(), guild_id).await;

    Ok(removed_default.is_some())
}

pub async fn set_default_shift_type(
    db: &Database,
    guild_id: u64,
    name: &str,
) -> anyhow::Result<bool> {
    let updated = sqlx::query(
        "UPDATE shift_types SET is_default = (LOWER(name) = LOWER($2))
         WHERE guild_id = $1
           AND EXISTS (SELECT 1 FROM shift_types WHERE guild_id = $1 AND LOWER(name) = LOWER($2))",
    )
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(name.trim())
    .execute(db.pool())
    .await?
    .rows_affected();

    invalidate_shift_types(db.cache(), guild_id).await;

    Ok(updated > 0)
}

fn to_shift_type(row: ShiftTypeRow) -> anyhow::Result<ShiftType> {
    Ok(ShiftType {
        id: to_u64(row.id, "id")?,
        guild_id: to_u64(row.guild_id, "guild_id")?,
        name: row.name,
        is_default: row.is_default,
        permitted_role_ids: to_u64_vec(row.permitted_role_ids, "permitted_role_ids")?,
        created_at: to_u64(row.created_at, "created_at")?,
    })
}
