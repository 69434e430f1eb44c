use crate::database::{Database, to_i64, to_u64};
use crate::impls::now_unix_secs;
use crate::model::profiles::GuildProfile;

#[derive(sqlx::FromRow)]
struct ProfileRow {
    guild_id: i64,
    user_id: i64,
    bio: Option<String>,
    badge_number: Option<String>,
    updated_at: i64,
}

pub async fn get_profile(
    db: &Database,
    guild_id: u64,
    user_id: u64,
) -> anyhow::Result<Option<GuildProfile>> {
    let row: Option<ProfileRow> = sqlx::query_as(
        "SELECT guild_id, user_id, bio, badge_number, updated_at
         FROM guild_profiles
         WHERE guild_id = $1 AND user_id = $2",
    )
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(user_id, "user_id")?)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_profile).transpose()
}

/// Write the editable profile fields. `None` keeps the stored value, an empty
/// string clears it.
pub async fn upsert_profile(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    bio: Option<&str>,
    badge_number: Option<&str>,
) -> anyhow::Result<GuildProfile> {
    let row: ProfileRow = sqlx::query_as(
        "INSERT INTO guild_profiles (guild_id, user_id, bio, badge_number, updated_at)
         VALUES ($1, $2, NULLIF($3, ''), NULLIF($4, ''), $5)
         ON CONFLICT (guild_id, user_id) DO UPDATE SET
            bio = CASE WHEN $3::TEXT IS NULL THEN guild_profiles.bio ELSE NULLIF($3, '') END,
            badge_number = CASE
                WHEN $4::TEXT IS NULL THEN guild_profiles.badge_number
                ELSE NULLIF($4, '')
            END,
            updated_at = EXCLUDED.updated_at
         RETURNING guild_id, user_id, bio, badge_number, updated_at",
    )
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(user_id, "user_id")?)
    .bind(bio.map(str::trim))
    .bind(badge_number.map(str::trim))
    .bind(to_i64(now_unix_secs(), "now")?)
    .fetch_one(db.pool())
    .await?;

    to_profile(row)
}

fn to_profile(row: ProfileRow) -> anyhow::Result<GuildProfile> {
    Ok(GuildProfile {
        guild_id: to_u64(row.guild_id, "guild_id")?,
        user_id: to_u64(row.user_id, "user_id")?,
        bio: row.bio,
        badge_number: row.badge_number,
        updated_at: to_u64(row.updated_at, "updated_at")?,
    })
}
