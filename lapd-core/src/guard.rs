use std::future::Future;
use std::time::{Duration, Instant};

use crate::cooldown::CooldownTracker;
use crate::error::AppError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessLevel {
    Everyone,
    Staff,
    Management,
}

impl AccessLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Everyone => "Everyone",
            Self::Staff => "Staff",
            Self::Management => "Management",
        }
    }
}

/// Preconditions checked before a command body runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandGuards {
    pub access: AccessLevel,
    pub dev_only: bool,
    pub guild_only: bool,
    pub cooldown: Option<Duration>,
}

impl CommandGuards {
    pub const fn everyone() -> Self {
        Self {
            access: AccessLevel::Everyone,
            dev_only: false,
            guild_only: true,
            cooldown: None,
        }
    }

    pub const fn staff() -> Self {
        Self {
            access: AccessLevel::Staff,
            ..Self::everyone()
        }
    }

    pub const fn management() -> Self {
        Self {
            access: AccessLevel::Management,
            ..Self::everyone()
        }
    }

    pub const fn developer() -> Self {
        Self {
            dev_only: true,
            guild_only: false,
            ..Self::everyone()
        }
    }

    pub const fn anywhere(self) -> Self {
        Self {
            guild_only: false,
            ..self
        }
    }

    pub const fn cooldown_secs(self, secs: u64) -> Self {
        Self {
            cooldown: Some(Duration::from_secs(secs)),
            ..self
        }
    }
}

impl Default for CommandGuards {
    fn default() -> Self {
        Self::everyone()
    }
}

/// What the invoking member is allowed to do in the current guild.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemberAccess {
    pub is_administrator: bool,
    pub has_manage_guild: bool,
    pub has_management_role: bool,
    pub has_staff_role: bool,
}

impl MemberAccess {
    pub fn satisfies(&self, level: AccessLevel) -> bool {
        if self.is_administrator {
            return true;
        }

        match level {
            AccessLevel::Everyone => true,
            AccessLevel::Staff => {
                self.has_staff_role || self.has_management_role || self.has_manage_guild
            }
            AccessLevel::Management => self.has_management_role || self.has_manage_guild,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardRejection {
    DeveloperOnly,
    GuildOnly,
    MissingAccess(AccessLevel),
    Cooldown { remaining: Duration },
}

impl From<GuardRejection> for AppError {
    fn from(rejection: GuardRejection) -> Self {
        match rejection {
            GuardRejection::DeveloperOnly => {
                AppError::forbidden("This command is restricted to bot developers.")
            }
            GuardRejection::GuildOnly => {
                AppError::validation("This command can only be used in a server.")
            }
            GuardRejection::MissingAccess(level) => AppError::forbidden(format!(
                "You need the {} permission level to use this command.",
                level.label()
            )),
            GuardRejection::Cooldown { remaining } => AppError::Cooldown {
                remaining_secs: u64::try_from(remaining.as_millis().div_ceil(1000))
                    .unwrap_or(u64::MAX)
                    .max(1),
            },
        }
    }
}

/// The caller-side facts the chain needs that do not require a lookup.
#[derive(Clone, Copy, Debug)]
pub struct Invocation<'a> {
    pub command: &'a str,
    pub user_id: u64,
    pub in_guild: bool,
    pub is_developer: bool,
}

/// Run dev-only, guild-only, permission and cooldown checks in order,
/// stopping at the first rejection.
///
/// `resolve_access` is only awaited when the permission step needs it.
pub async fn run_chain<F, Fut>(
    guards: &CommandGuards,
    invocation: Invocation<'_>,
    resolve_access: F,
    cooldowns: &CooldownTracker,
    now: Instant,
) -> anyhow::Result<Result<(), GuardRejection>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<MemberAccess>>,
{
    if guards.dev_only && !invocation.is_developer {
        return Ok(Err(GuardRejection::DeveloperOnly));
    }

    if guards.guild_only && !invocation.in_guild {
        return Ok(Err(GuardRejection::GuildOnly));
    }

    if guards.access != AccessLevel::Everyone {
        if !invocation.in_guild {
            return Ok(Err(GuardRejection::GuildOnly));
        }

        let access = resolve_access().await?;
        if !access.satisfies(guards.access) {
            return Ok(Err(GuardRejection::MissingAccess(guards.access)));
        }
    }

    if let Some(cooldown) = guards.cooldown
        && let Some(remaining) =
            cooldowns.remaining(invocation.command, invocation.user_id, cooldown, now)
    {
        return Ok(Err(GuardRejection::Cooldown { remaining }));
    }

    Ok(Ok(()))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};

    use super::{
        AccessLevel, CommandGuards, GuardRejection, Invocation, MemberAccess, run_chain,
    };
    use crate::cooldown::CooldownTracker;
    use crate::error::AppError;

    fn invocation(in_guild: bool, is_developer: bool) -> Invocation<'static> {
        Invocation {
            command: "duty admin",
            user_id: 7,
            in_guild,
            is_developer,
        }
    }

    #[test]
    fn access_levels() {
        let staff = MemberAccess {
            has_staff_role: true,
            ..Default::default()
        };
        assert!(staff.satisfies(AccessLevel::Staff));
        assert!(!staff.satisfies(AccessLevel::Management));

        let manager = MemberAccess {
            has_management_role: true,
            ..Default::default()
        };
        assert!(manager.satisfies(AccessLevel::Staff));
        assert!(manager.satisfies(AccessLevel::Management));

        let admin = MemberAccess {
            is_administrator: true,
            ..Default::default()
        };
        assert!(admin.satisfies(AccessLevel::Management));

        assert!(MemberAccess::default().satisfies(AccessLevel::Everyone));
        assert!(!MemberAccess::default().satisfies(AccessLevel::Staff));
    }

    #[tokio::test]
    async fn chain_stops_at_first_failure() {
        let cooldowns = CooldownTracker::new();
        let resolved = AtomicBool::new(false);

        let result = run_chain(
            &CommandGuards::management(),
            invocation(false, false),
            || async {
                resolved.store(true, Ordering::SeqCst);
                Ok(MemberAccess::default())
            },
            &cooldowns,
            Instant::now(),
        )
        .await
        .expect("chain ran");

        assert_eq!(result, Err(GuardRejection::GuildOnly));
        assert!(!resolved.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn developer_gate_precedes_everything() {
        let cooldowns = CooldownTracker::new();
        let result = run_chain(
            &CommandGuards::developer(),
            invocation(false, false),
            || async { Ok(MemberAccess::default()) },
            &cooldowns,
            Instant::now(),
        )
        .await
        .expect("chain ran");
        assert_eq!(result, Err(GuardRejection::DeveloperOnly));

        let allowed = run_chain(
            &CommandGuards::developer(),
            invocation(false, true),
            || async { Ok(MemberAccess::default()) },
            &cooldowns,
            Instant::now(),
        )
        .await
        .expect("chain ran");
        assert_eq!(allowed, Ok(()));
    }

    #[tokio::test]
    async fn missing_access_is_rejected() {
        let cooldowns = CooldownTracker::new();
        let result = run_chain(
            &CommandGuards::management(),
            invocation(true, false),
            || async {
                Ok(MemberAccess {
                    has_staff_role: true,
                    ..Default::default()
                })
            },
            &cooldowns,
            Instant::now(),
        )
        .await
        .expect("chain ran");

        assert_eq!(
            result,
            Err(GuardRejection::MissingAccess(AccessLevel::Management))
        );
    }

    #[tokio::test]
    async fn cooldown_is_checked_last() {
        let cooldowns = CooldownTracker::new();
        let now = Instant::now();
        cooldowns.stamp("duty admin", 7, now);
        let guards = CommandGuards::staff().cooldown_secs(10);

        let result = run_chain(
            &guards,
            invocation(true, false),
            || async {
                Ok(MemberAccess {
                    has_staff_role: true,
                    ..Default::default()
                })
            },
            &cooldowns,
            now + Duration::from_secs(4),
        )
        .await
        .expect("chain ran");

        assert_eq!(
            result,
            Err(GuardRejection::Cooldown {
                remaining: Duration::from_secs(6)
            })
        );
    }

    #[tokio::test]
    async fn access_lookup_errors_propagate() {
        let cooldowns = CooldownTracker::new();
        let result = run_chain(
            &CommandGuards::staff(),
            invocation(true, false),
            || async { Err(anyhow::anyhow!("member lookup failed")) },
            &cooldowns,
            Instant::now(),
        )
        .await;

        assert!(result.is_err());
    }

    #[test]
    fn cooldown_seconds_round_up() {
        let remaining_secs = |millis| match AppError::from(GuardRejection::Cooldown {
            remaining: Duration::from_millis(millis),
        }) {
            AppError::Cooldown { remaining_secs } => remaining_secs,
            other => panic!("unexpected error: {other:?}"),
        };

        assert_eq!(remaining_secs(2_900), 3);
        assert_eq!(remaining_secs(3_000), 3);
        assert_eq!(remaining_secs(3_001), 4);
        assert_eq!(remaining_secs(200), 1);
        assert_eq!(remaining_secs(0), 1);
    }
}
