use poise::serenity_prelude as serenity;
use tracing::info;

use crate::notices::embeds::member_update_embed;
use lapd_database::Database;
use lapd_database::impls::guild_settings::{get_guild_settings, notice_role};
use lapd_database::impls::notices::has_other_active_notice;
use lapd_database::model::notices::Notice;
use lapd_utils::delivery::{add_roles, dm_user, remove_roles};

/// Grant the notice role once a notice starts.
pub async fn start_notice(
    http: &serenity::Http,
    db: &Database,
    notice: &Notice,
    now: u64,
) -> anyhow::Result<()> {
    let settings = get_guild_settings(db, notice.guild_id).await?;
    if let Some(role_id) = notice_role(&settings, notice.kind) {
        let reason = format!("{} #{} started", notice.kind.short(), notice.id);
        add_roles(http, notice.guild_id, notice.user_id, &[role_id], &reason).await;
    }

    info!(
        guild_id = notice.guild_id,
        user_id = notice.user_id,
        notice_id = notice.id,
        "notice started"
    );
    dm_user(http, notice.user_id, member_update_embed(notice, "Started", now)).await;
    Ok(())
}

/// Remove the notice role after a notice ends, unless another notice of the
/// same kind still covers the member.
pub async fn finish_notice(
    http: &serenity::Http,
    db: &Database,
    notice: &Notice,
    now: u64,
) -> anyhow::Result<()> {
    let settings = get_guild_settings(db, notice.guild_id).await?;
    let configured = notice_role(&settings, notice.kind);
    let covered = match configured {
        Some(_) => has_other_active_notice(db, notice, now).await?,
        None => false,
    };
    if let Some(role_id) = role_to_remove(configured, covered) {
        let reason = format!("{} #{} ended", notice.kind.short(), notice.id);
        remove_roles(http, notice.guild_id, notice.user_id, &[role_id], &reason).await;
    }

    info!(
        guild_id = notice.guild_id,
        user_id = notice.user_id,
        notice_id = notice.id,
        "notice ended"
    );
    dm_user(http, notice.user_id, member_update_embed(notice, "Ended", now)).await;
    Ok(())
}

/// The notice role to take away when a notice finishes: none when no role is
/// configured or another running notice of the same kind still covers the member.
fn role_to_remove(configured: Option<u64>, covered_by_other: bool) -> Option<u64> {
    configured.filter(|_| !covered_by_other)
}

#[cfg(test)]
mod tests {
    use super::role_to_remove;

    #[test]
    fn role_stays_while_another_notice_runs() {
        assert_eq!(role_to_remove(Some(5), false), Some(5));
        assert_eq!(role_to_remove(Some(5), true), None);
        assert_eq!(role_to_remove(None, false), None);
        assert_eq!(role_to_remove(None, true), None);
    }
}
