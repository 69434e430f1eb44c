mod guild_deletion;
mod notice_sweep;

use std::sync::Arc;
use std::time::Duration;

use poise::serenity_prelude as serenity;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::info;

use lapd_core::AppError;
use lapd_core::cooldown::CooldownTracker;
use lapd_database::Database;

pub const DEFAULT_NOTICE_SWEEP_CRON: &str = "0 */2 * * * *";
pub const DEFAULT_GUILD_DELETION_CRON: &str = "0 0 * * * *";

/// Resources shared by the scheduled jobs.
#[derive(Clone)]
pub struct JobContext {
    pub http: Arc<serenity::Http>,
    pub db: Database,
    pub cooldowns: Arc<CooldownTracker>,
    /// Longest cooldown any command uses; older stamps are pruned.
    pub max_cooldown: Duration,
}

pub struct JobSchedules {
    pub notice_sweep: String,
    pub guild_deletion: String,
}

/// Start the housekeeping jobs. The returned scheduler must be kept alive.
pub async fn start(context: JobContext, schedules: &JobSchedules) -> anyhow::Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let sweep_context = context.clone();
    let sweep = Job::new_async(schedules.notice_sweep.as_str(), move |_uuid, _lock| {
        let context = sweep_context.clone();
        Box::pin(async move {
            notice_sweep::run(&context).await;
        })
    })
    .map_err(|err| {
        AppError::Config(format!("NOTICE_SWEEP_CRON `{}`: {}", schedules.notice_sweep, err))
    })?;

    let deletion_context = context;
    let deletion = Job::new_async(schedules.guild_deletion.as_str(), move |_uuid, _lock| {
        let context = deletion_context.clone();
        Box::pin(async move {
            guild_deletion::run(&context).await;
        })
    })
    .map_err(|err| {
        AppError::Config(format!("GUILD_DELETION_CRON `{}`: {}", schedules.guild_deletion, err))
    })?;

    scheduler.add(sweep).await?;
    scheduler.add(deletion).await?;
    scheduler.start().await?;

    info!(
        notice_sweep = %schedules.notice_sweep,
        guild_deletion = %schedules.guild_deletion,
        "housekeeping jobs scheduled"
    );
    Ok(scheduler)
}

/// A configured cron expression, or `default` when unset or blank.
pub fn schedule_or_default(raw: Option<String>, default: &str) -> String {
    raw.map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_NOTICE_SWEEP_CRON, schedule_or_default};

    #[test]
    fn blank_schedules_fall_back() {
        assert_eq!(schedule_or_default(None, DEFAULT_NOTICE_SWEEP_CRON), "0 */2 * * * *");
        assert_eq!(
            schedule_or_default(Some("  ".to_owned()), DEFAULT_NOTICE_SWEEP_CRON),
            "0 */2 * * * *"
        );
        assert_eq!(
            schedule_or_default(Some(" 0 */5 * * * * ".to_owned()), DEFAULT_NOTICE_SWEEP_CRON),
            "0 */5 * * * *"
        );
    }
}
