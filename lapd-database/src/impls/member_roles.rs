use crate::database::{Database, to_i64, to_i64_vec, to_u64, to_u64_vec};
use crate::impls::now_unix_secs;
use crate::model::member_roles::RoleBackup;

/// Backups kept per member; older ones are pruned on save.
pub const MAX_BACKUPS_PER_MEMBER: i64 = 10;

#[derive(sqlx::FromRow)]
struct RoleBackupRow {
    id: i64,
    guild_id: i64,
    user_id: i64,
    nickname: Option<String>,
    role_ids: Vec<i64>,
    saved_by: i64,
    reason: Option<String>,
    saved_at: i64,
}

const BACKUP_COLUMNS: &str =
    "id, guild_id, user_id, nickname, role_ids, saved_by, reason, saved_at";

pub async fn create_backup(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    nickname: Option<&str>,
    role_ids: &[u64],
    saved_by: u64,
    reason: Option<&str>,
) -> anyhow::Result<RoleBackup> {
    let guild_id_i64 = to_i64(guild_id, "guild_id")?;
    let user_id_i64 = to_i64(user_id, "user_id")?;
    let mut tx = db.pool().begin().await?;

    let row: RoleBackupRow = sqlx::query_as(&format!(
        "INSERT INTO member_role_backups
             (guild_id, user_id, nickname, role_ids, saved_by, reason, saved_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {BACKUP_COLUMNS}"
    ))
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(nickname)
    .bind(to_i64_vec(role_ids, "role_ids")?)
    .bind(to_i64(saved_by, "saved_by")?)
    .bind(reason)
    .bind(to_i64(now_unix_secs(), "now")?)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "DELETE FROM member_role_backups
         WHERE guild_id = $1 AND user_id = $2 AND id NOT IN (
            SELECT id FROM member_role_backups
            WHERE guild_id = $1 AND user_id = $2
            ORDER BY saved_at DESC, id DESC
            LIMIT $3
         )",
    )
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(MAX_BACKUPS_PER_MEMBER)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    to_backup(row)
}

/// A member's backups, newest first.
pub async fn list_backups(
    db: &Database,
    guild_id: u64,
    user_id: u64,
) -> anyhow::Result<Vec<RoleBackup>> {
    let rows: Vec<RoleBackupRow> = sqlx::query_as(&format!(
        "SELECT {BACKUP_COLUMNS} FROM member_role_backups
         WHERE guild_id = $1 AND user_id = $2
         ORDER BY saved_at DESC, id DESC"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(user_id, "user_id")?)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(to_backup).collect()
}

pub async fn get_backup(
    db: &Database,
    guild_id: u64,
    backup_id: u64,
) -> anyhow::Result<Option<RoleBackup>> {
    let row: Option<RoleBackupRow> = sqlx::query_as(&format!(
        "SELECT {BACKUP_COLUMNS} FROM member_role_backups WHERE guild_id = $1 AND id = $2"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(backup_id, "backup_id")?)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_backup).transpose()
}

pub async fn delete_backup(db: &Database, guild_id: u64, backup_id: u64) -> anyhow::Result<bool> {
    let deleted = sqlx::query("DELETE FROM member_role_backups WHERE guild_id = $1 AND id = $2")
        .bind(to_i64(guild_id, "guild_id")?)
        .bind(to_i64(backup_id, "backup_id")?)
        .execute(db.pool())
        .await?
        .rows_affected();

    Ok(deleted > 0)
}

fn to_backup(row: RoleBackupRow) -> anyhow::Result<RoleBackup> {
    Ok(RoleBackup {
        id: to_u64(row.id, "id")?,
        guild_id: to_u64(row.guild_id, "guild_id")?,
        user_id: to_u64(row.user_id, "user_id")?,
        nickname: row.nickname,
        role_ids: to_u64_vec(row.role_ids, "role_ids")?,
        saved_by: to_u64(row.saved_by, "saved_by")?,
        reason: row.reason,
        saved_at: to_u64(row.saved_at, "saved_at")?,
    })
}
