use crate::cache::{SETTINGS_CACHE_TTL, guild_settings_key, invalidate_guild_settings};
use crate::database::{Database, to_i64, to_u64, to_u64_vec};
use crate::impls::now_unix_secs;
use crate::model::guild_settings::{GuildSettings, LogChannel, RoleList};
use crate::model::notices::NoticeKind;

#[derive(sqlx::FromRow)]
struct GuildSettingsRow {
    guild_id: i64,
    management_role_ids: Vec<i64>,
    staff_role_ids: Vec<i64>,
    on_duty_role_ids: Vec<i64>,
    on_break_role_ids: Vec<i64>,
    notice_alert_role_ids: Vec<i64>,
    shift_log_channel_id: Option<i64>,
    arrest_log_channel_id: Option<i64>,
    citation_log_channel_id: Option<i64>,
    incident_log_channel_id: Option<i64>,
    notice_log_channel_id: Option<i64>,
    loa_role_id: Option<i64>,
    ra_role_id: Option<i64>,
    joined_at: i64,
    deletion_scheduled_at: Option<i64>,
}

const SETTINGS_COLUMNS: &str = "guild_id, management_role_ids, staff_role_ids, on_duty_role_ids, \
     on_break_role_ids, notice_alert_role_ids, shift_log_channel_id, arrest_log_channel_id, \
     citation_log_channel_id, incident_log_channel_id, notice_log_channel_id, loa_role_id, \
     ra_role_id, joined_at, deletion_scheduled_at";

/// Load a guild's settings, falling back to an empty configuration when the
/// guild has no row yet.
pub async fn get_guild_settings(db: &Database, guild_id: u64) -> anyhow::Result<GuildSettings> {
    let cache_key = guild_settings_key(db.cache(), guild_id);
    db.cache()
        .get_or_load_json(&cache_key, SETTINGS_CACHE_TTL, || async {
            let row: Option<GuildSettingsRow> = sqlx::query_as(&format!(
                "SELECT {SETTINGS_COLUMNS} FROM guild_settings WHERE guild_id = $1"
            ))
            .bind(to_i64(guild_id, "guild_id")?)
            .fetch_optional(db.pool())
            .await?;

            match row {
                Some(row) => to_guild_settings(row),
                None => Ok(GuildSettings {
                    guild_id,
                    ..Default::default()
                }),
            }
        })
        .await
}

/// Register a guild (or re-register after a rejoin), cancelling any pending deletion.
///
/// Returns `true` when the guild was previously scheduled for deletion.
pub async fn register_guild(db: &Database, guild_id: u64) -> anyhow::Result<bool> {
    let guild_id_i64 = to_i64(guild_id, "guild_id")?;
    let now = to_i64(now_unix_secs(), "now")?;

    let previously_scheduled: Option<i64> = sqlx::query_scalar(
        "SELECT deletion_scheduled_at FROM guild_settings WHERE guild_id = $1",
    )
    .bind(guild_id_i64)
    .fetch_optional(db.pool())
    .await?
    .flatten();

    sqlx::query(
        "INSERT INTO guild_settings (guild_id, joined_at)
         VALUES ($1, $2)
         ON CONFLICT (guild_id) DO UPDATE SET deletion_scheduled_at = NULL",
    )
    .bind(guild_id_i64)
    .bind(now)
    .execute(db.pool())
    .await?;

    invalidate_guild_settings(db.cache(), guild_id).await;

    Ok(previously_scheduled.is_some())
}

pub async fn schedule_guild_deletion(
    db: &Database,
    guild_id: u64,
    delete_at: u64,
) -> anyhow::Result<bool> {
    let updated = sqlx::query(
        "UPDATE guild_settings SET deletion_scheduled_at = $2
         WHERE guild_id = $1 AND deletion_scheduled_at IS NULL",
    )
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(delete_at, "delete_at")?)
    .execute(db.pool())
    .await?
    .rows_affected();

    invalidate_guild_settings(db.cache(), guild_id).await;

    Ok(updated > 0)
}

pub async fn add_settings_role(
    db: &Database,
    guild_id: u64,
    list: RoleList,
    role_id: u64,
) -> anyhow::Result<bool> {
    ensure_guild_row(db, guild_id).await?;
    let column = list.column();
    let updated = sqlx::query(&format!(
        "UPDATE guild_settings SET {column} = array_append({column}, $2)
         WHERE guild_id = $1 AND NOT ($2 = ANY({column}))"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(role_id, "role_id")?)
    .execute(db.pool())
    .await?
    .rows_affected();

    invalidate_guild_settings(db.cache(), guild_id).await;

    Ok(updated > 0)
}

pub async fn remove_settings_role(
    db: &Database,
    guild_id: u64,
    list: RoleList,
    role_id: u64,
) -> anyhow::Result<bool> {
    ensure_guild_row(db, guild_id).await?;
    let column = list.column();
    let updated = sqlx::query(&format!(
        "UPDATE guild_settings SET {column} = array_remove({column}, $2)
         WHERE guild_id = $1 AND $2 = ANY({column})"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(role_id, "role_id")?)
    .execute(db.pool())
    .await?
    .rows_affected();

    invalidate_guild_settings(db.cache(), guild_id).await;

    Ok(updated > 0)
}

pub async fn clear_settings_roles(
    db: &Database,
    guild_id: u64,
    list: RoleList,
) -> anyhow::Result<()> {
    ensure_guild_row(db, guild_id).await?;
    let column = list.column();
    sqlx::query(&format!(
        "UPDATE guild_settings SET {column} = '{{}}' WHERE guild_id = $1"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .execute(db.pool())
    .await?;

    invalidate_guild_settings(db.cache(), guild_id).await;

    Ok(())
}

pub async fn set_log_channel(
    db: &Database,
    guild_id: u64,
    channel: LogChannel,
    channel_id: Option<u64>,
) -> anyhow::Result<()> {
    ensure_guild_row(db, guild_id).await?;
    let column = channel.column();
    let channel_id_i64 = channel_id.map(|id| to_i64(id, "channel_id")).transpose()?;

    sqlx::query(&format!(
        "UPDATE guild_settings SET {column} = $2 WHERE guild_id = $1"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(channel_id_i64)
    .execute(db.pool())
    .await?;

    invalidate_guild_settings(db.cache(), guild_id).await;

    Ok(())
}

pub async fn set_notice_role(
    db: &Database,
    guild_id: u64,
    kind: NoticeKind,
    role_id: Option<u64>,
) -> anyhow::Result<()> {
    ensure_guild_row(db, guild_id).await?;
    let column = match kind {
        NoticeKind::Loa => "loa_role_id",
        NoticeKind::Ra => "ra_role_id",
    };
    let role_id_i64 = role_id.map(|id| to_i64(id, "role_id")).transpose()?;

    sqlx::query(&format!(
        "UPDATE guild_settings SET {column} = $2 WHERE guild_id = $1"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(role_id_i64)
    .execute(db.pool())
    .await?;

    invalidate_guild_settings(db.cache(), guild_id).await;

    Ok(())
}

async fn ensure_guild_row(db: &Database, guild_id: u64) -> anyhow::Result<()> {
    sqlx::query(
        "INSERT INTO guild_settings (guild_id, joined_at) VALUES ($1, $2)
         ON CONFLICT (guild_id) DO NOTHING",
    )
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(now_unix_secs(), "now")?)
    .execute(db.pool())
    .await?;

    Ok(())
}

/// Role granted while a notice of `kind` is active, if configured.
pub fn notice_role(settings: &GuildSettings, kind: NoticeKind) -> Option<u64> {
    match kind {
        NoticeKind::Loa => settings.loa_role_id,
        NoticeKind::Ra => settings.ra_role_id,
    }
}

fn to_guild_settings(row: GuildSettingsRow) -> anyhow::Result<GuildSettings> {
    let optional =
        |value: Option<i64>, field: &'static str| value.map(|id| to_u64(id, field)).transpose();

    Ok(GuildSettings {
        guild_id: to_u64(row.guild_id, "guild_id")?,
        management_role_ids: to_u64_vec(row.management_role_ids, "management_role_ids")?,
        staff_role_ids: to_u64_vec(row.staff_role_ids, "staff_role_ids")?,
        on_duty_role_ids: to_u64_vec(row.on_duty_role_ids, "on_duty_role_ids")?,
        on_break_role_ids: to_u64_vec(row.on_break_role_ids, "on_break_role_ids")?,
        notice_alert_role_ids: to_u64_vec(row.notice_alert_role_ids, "notice_alert_role_ids")?,
        shift_log_channel_id: optional(row.shift_log_channel_id, "shift_log_channel_id")?,
        arrest_log_channel_id: optional(row.arrest_log_channel_id, "arrest_log_channel_id")?,
        citation_log_channel_id: optional(row.citation_log_channel_id, "citation_log_channel_id")?,
        incident_log_channel_id: optional(row.incident_log_channel_id, "incident_log_channel_id")?,
        notice_log_channel_id: optional(row.notice_log_channel_id, "notice_log_channel_id")?,
        loa_role_id: optional(row.loa_role_id, "loa_role_id")?,
        ra_role_id: optional(row.ra_role_id, "ra_role_id")?,
        joined_at: to_u64(row.joined_at, "joined_at")?,
        deletion_scheduled_at: optional(row.deletion_scheduled_at, "deletion_scheduled_at")?,
    })
}
