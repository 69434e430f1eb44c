use crate::cache::{invalidate_guild_settings, invalidate_shift_types};
use crate::database::{Database, to_i64, to_u64};

/// Guild-scoped tables purged when a guild's deletion comes due. Child tables
/// first; `shift_breaks` cascades from `shifts`.
const GUILD_TABLES: [&str; 9] = [
    "shifts",
    "shift_types",
    "arrests",
    "citations",
    "incidents",
    "notices",
    "member_role_backups",
    "guild_profiles",
    "guild_settings",
];

/// Guilds whose scheduled deletion time has passed.
pub async fn due_guild_deletions(db: &Database, now: u64) -> anyhow::Result<Vec<u64>> {
    let guild_ids: Vec<i64> = sqlx::query_scalar(
        "SELECT guild_id FROM guild_settings
         WHERE deletion_scheduled_at IS NOT NULL AND deletion_scheduled_at <= $1
         ORDER BY deletion_scheduled_at ASC",
    )
    .bind(to_i64(now, "now")?)
    .fetch_all(db.pool())
    .await?;

    guild_ids
        .into_iter()
        .map(|guild_id| to_u64(guild_id, "guild_id"))
        .collect()
}

/// Delete every row a guild owns in one transaction.
///
/// The deletion is skipped when the schedule was cleared (the bot rejoined)
/// after the guild was selected. Returns the number of rows removed.
pub async fn purge_guild_data(
    db: &Database,
    guild_id: u64,
    now: u64,
) -> anyhow::Result<Option<u64>> {
    let guild_id_i64 = to_i64(guild_id, "guild_id")?;
    let mut tx = db.begin_guild_locked(guild_id).await?;

    let still_due: Option<bool> = sqlx::query_scalar(
        "SELECT deletion_scheduled_at IS NOT NULL AND deletion_scheduled_at <= $2
         FROM guild_settings WHERE guild_id = $1 FOR UPDATE",
    )
    .bind(guild_id_i64)
    .bind(to_i64(now, "now")?)
    .fetch_optional(&mut *tx)
    .await?;

    if still_due != Some(true) {
        return Ok(None);
    }

    let mut removed = 0;
    for table in GUILD_TABLES {
        removed += sqlx::query(&format!("DELETE FROM {table} WHERE guild_id = $1"))
            .bind(guild_id_i64)
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }

    tx.commit().await?;

    invalidate_guild_settings(db.cache(), guild_id).await;
    invalidate_shift_types(db.cache(), guild_id).await;

    Ok(Some(removed))
}
