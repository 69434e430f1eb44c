use poise::serenity_prelude as serenity;

use lapd_database::model::guild_settings::GuildSettings;
use lapd_database::model::shifts::DutyStatus;
use lapd_utils::delivery::{add_roles, remove_roles};

const ROLE_SYNC_REASON: &str = "Duty status changed";

/// Roles to add and remove so a member's roles match their duty status.
pub(crate) fn role_changes(settings: &GuildSettings, status: DutyStatus) -> (Vec<u64>, Vec<u64>) {
    let on_duty = &settings.on_duty_role_ids;
    let on_break = &settings.on_break_role_ids;

    match status {
        DutyStatus::OnDuty => (on_duty.clone(), without(on_break, on_duty)),
        DutyStatus::OnBreak => (on_break.clone(), without(on_duty, on_break)),
        DutyStatus::OffDuty => {
            let mut remove = on_duty.clone();
            remove.extend(without(on_break, on_duty));
            (Vec::new(), remove)
        }
    }
}

/// A role configured in both lists stays while the member holds either status.
fn without(roles: &[u64], keep: &[u64]) -> Vec<u64> {
    roles
        .iter()
        .copied()
        .filter(|role_id| !keep.contains(role_id))
        .collect()
}

/// Apply the duty roles for `status`. Returns how many role calls failed.
pub(crate) async fn sync_duty_roles(
    http: &serenity::Http,
    settings: &GuildSettings,
    user_id: u64,
    status: DutyStatus,
) -> usize {
    let (add, remove) = role_changes(settings, status);
    let failed_removals =
        remove_roles(http, settings.guild_id, user_id, &remove, ROLE_SYNC_REASON).await;
    let failed_additions =
        add_roles(http, settings.guild_id, user_id, &add, ROLE_SYNC_REASON).await;
    failed_removals + failed_additions
}

#[cfg(test)]
mod tests {
    use lapd_database::model::guild_settings::GuildSettings;
    use lapd_database::model::shifts::DutyStatus;

    use super::role_changes;

    fn settings() -> GuildSettings {
        GuildSettings {
            guild_id: 1,
            on_duty_role_ids: vec![10, 30],
            on_break_role_ids: vec![20, 30],
            ..GuildSettings::default()
        }
    }

    #[test]
    fn break_swaps_duty_roles() {
        assert_eq!(role_changes(&settings(), DutyStatus::OnDuty), (vec![10, 30], vec![20]));
        assert_eq!(role_changes(&settings(), DutyStatus::OnBreak), (vec![20, 30], vec![10]));
    }

    #[test]
    fn off_duty_removes_everything_once() {
        assert_eq!(role_changes(&settings(), DutyStatus::OffDuty), (vec![], vec![10, 30, 20]));
    }
}
