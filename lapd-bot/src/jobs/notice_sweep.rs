use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::jobs::JobContext;
use lapd_commands::notices::lifecycle::{finish_notice, start_notice};
use lapd_database::impls::notices::{claim_due_expirations, claim_due_starts};
use lapd_database::impls::now_unix_secs;

#[derive(Debug, Default, PartialEq, Eq)]
struct SweepReport {
    started: usize,
    ended: usize,
    failed: usize,
}

/// Activate notices whose start time passed and close out expired ones.
///
/// Claims flip the processed flags atomically, so each notice is handled once
/// even when a sweep overlaps a manual start.
pub async fn run(context: &JobContext) {
    let now = now_unix_secs();
    let mut report = SweepReport::default();

    match claim_due_starts(&context.db, now).await {
        Ok(notices) => {
            for notice in &notices {
                match start_notice(&context.http, &context.db, notice, now).await {
                    Ok(()) => report.started += 1,
                    Err(err) => {
                        report.failed += 1;
                        warn!(
                            ?err,
                            notice_id = notice.id,
                            guild_id = notice.guild_id,
                            "failed to start notice"
                        );
                    }
                }
            }
        }
        Err(err) => error!(?err, "failed to claim notices due to start"),
    }

    match claim_due_expirations(&context.db, now).await {
        Ok(notices) => {
            for notice in &notices {
                match finish_notice(&context.http, &context.db, notice, now).await {
                    Ok(()) => report.ended += 1,
                    Err(err) => {
                        report.failed += 1;
                        warn!(
                            ?err,
                            notice_id = notice.id,
                            guild_id = notice.guild_id,
                            "failed to end notice"
                        );
                    }
                }
            }
        }
        Err(err) => error!(?err, "failed to claim expired notices"),
    }

    let pruned = context.cooldowns.prune(context.max_cooldown, Instant::now());

    if report == SweepReport::default() {
        debug!(pruned, "notice sweep found nothing to do");
    } else {
        info!(
            started = report.started,
            ended = report.ended,
            failed = report.failed,
            pruned,
            "notice sweep finished"
        );
    }
}
