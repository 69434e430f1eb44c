#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleBackup {
    pub id: u64,
    pub guild_id: u64,
    pub user_id: u64,
    pub nickname: Option<String>,
    pub role_ids: Vec<u64>,
    pub saved_by: u64,
    pub reason: Option<String>,
    pub saved_at: u64,
}

/// The parts of a guild role that decide whether the bot may (re)assign it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoleFacts {
    pub id: u64,
    pub position: u16,
    pub managed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestorePlan {
    pub to_add: Vec<u64>,
    pub already_held: Vec<u64>,
    pub deleted: Vec<u64>,
    pub unassignable: Vec<u64>,
}

/// Roles worth backing up: everything except `@everyone` (id == guild id) and
/// integration-managed roles.
pub fn backup_role_ids(
    guild_id: u64,
    member_role_ids: &[u64],
    guild_roles: &[RoleFacts],
) -> Vec<u64> {
    let mut kept: Vec<u64> = member_role_ids
        .iter()
        .copied()
        .filter(|role_id| *role_id != guild_id)
        .filter(|role_id| {
            guild_roles
                .iter()
                .find(|role| role.id == *role_id)
                .is_none_or(|role| !role.managed)
        })
        .collect();

    kept.sort_unstable();
    kept.dedup();
    kept
}

/// Decide which backed-up roles can be given back to a member.
///
/// A role is restorable when it still exists, is not managed and sits strictly
/// below the bot's highest role.
pub fn plan_restore(
    backup_role_ids: &[u64],
    member_role_ids: &[u64],
    guild_roles: &[RoleFacts],
    bot_top_position: u16,
) -> RestorePlan {
    let mut plan = RestorePlan::default();

    for role_id in backup_role_ids {
        if member_role_ids.contains(role_id) {
            plan.already_held.push(*role_id);
            continue;
        }

        match guild_roles.iter().find(|role| role.id == *role_id) {
            None => plan.deleted.push(*role_id),
            Some(role) if role.managed || role.position >= bot_top_position => {
                plan.unassignable.push(*role_id)
            }
            Some(_) => plan.to_add.push(*role_id),
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::{RestorePlan, RoleFacts, backup_role_ids, plan_restore};

    fn role(id: u64, position: u16, managed: bool) -> RoleFacts {
        RoleFacts { id, position, managed }
    }

    #[test]
    fn backup_skips_everyone_and_managed_roles() {
        let roles = [role(1, 0, false), role(2, 3, false), role(3, 4, true)];
        assert_eq!(backup_role_ids(1, &[3, 2, 1, 2], &roles), vec![2]);
    }

    #[test]
    fn restore_sorts_roles_into_buckets() {
        let roles = [
            role(10, 1, false),
            role(11, 2, false),
            role(12, 9, false),
            role(13, 1, true),
        ];

        let plan = plan_restore(&[10, 11, 12, 13, 14], &[11], &roles, 5);
        assert_eq!(
            plan,
            RestorePlan {
                to_add: vec![10],
                already_held: vec![11],
                deleted: vec![14],
                unassignable: vec![12, 13],
            }
        );
    }
}
