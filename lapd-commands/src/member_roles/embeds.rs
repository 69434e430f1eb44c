use poise::serenity_prelude as serenity;

use crate::common::sanitize;
use lapd_database::model::member_roles::{RestorePlan, RoleBackup};
use lapd_utils::embed::DEFAULT_EMBED_COLOR;
use lapd_utils::formatting::{discord_timestamp, role_mentions, truncate_chars, user_mention};

pub(crate) fn backup_embed(backup: &RoleBackup) -> serenity::CreateEmbed {
    let mut description = format!(
        "**Member :** {}\n**Saved By :** {}\n**Saved :** {}",
        user_mention(backup.user_id),
        user_mention(backup.saved_by),
        discord_timestamp(backup.saved_at, 'f'),
    );
    if let Some(nickname) = backup.nickname.as_deref() {
        description.push_str(&format!("\n**Nickname :** {}", sanitize(nickname)));
    }
    if let Some(reason) = backup.reason.as_deref() {
        description.push_str(&format!("\n**Reason :** {}", sanitize(reason)));
    }

    serenity::CreateEmbed::new()
        .title(format!("Role Backup #{}", backup.id))
        .color(DEFAULT_EMBED_COLOR)
        .description(description)
        .field(
            format!("Roles ({})", backup.role_ids.len()),
            truncate_chars(&role_mentions(&backup.role_ids, "No roles"), 1_000),
            false,
        )
}

pub(crate) fn backup_line(backup: &RoleBackup) -> String {
    let reason = backup
        .reason
        .as_deref()
        .map(|reason| format!(": {}", truncate_chars(&sanitize(reason), 60)))
        .unwrap_or_default();
    format!(
        "`#{}` {} by {} ({} roles){}",
        backup.id,
        discord_timestamp(backup.saved_at, 'd'),
        user_mention(backup.saved_by),
        backup.role_ids.len(),
        reason
    )
}

pub(crate) fn restore_report(plan: &RestorePlan, failed: usize) -> String {
    let restored = plan.to_add.len().saturating_sub(failed);
    let mut lines = vec![format!("**Restored :** {}", restored)];

    let skipped = [
        ("Already held", plan.already_held.len()),
        ("Role deleted", plan.deleted.len()),
        ("Above my top role or managed", plan.unassignable.len()),
        ("Failed to add", failed),
    ];
    for (label, count) in skipped {
        if count > 0 {
            lines.push(format!("**{} :** {}", label, count));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use lapd_database::model::member_roles::RestorePlan;

    use super::restore_report;

    #[test]
    fn report_lists_only_nonzero_buckets() {
        let plan = RestorePlan {
            to_add: vec![1, 2, 3],
            already_held: vec![4],
            deleted: vec![],
            unassignable: vec![5, 6],
        };
        assert_eq!(
            restore_report(&plan, 1),
            "**Restored :** 2\n**Already held :** 1\n**Above my top role or managed :** 2\n**Failed to add :** 1"
        );
        assert_eq!(restore_report(&RestorePlan::default(), 0), "**Restored :** 0");
    }
}
