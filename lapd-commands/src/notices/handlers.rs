use tracing::info;

use crate::common::require_guild;
use crate::notices::embeds::{
    member_update_embed, notice_embed, notice_list_line, review_request_embed,
};
use crate::notices::lifecycle::start_notice;
use lapd_core::{AppError, Context, Error};
use lapd_database::impls::guild_settings::get_guild_settings;
use lapd_database::impls::notices::{
    cancel_notice, close_lapsed_notice, create_notice, end_notice_early, extend_notice, get_notice,
    list_guild_notices, list_member_notices, mark_start_processed, review_notice,
};
use lapd_database::impls::now_unix_secs;
use lapd_database::model::guild_settings::LogChannel;
use lapd_database::model::notices::{
    ApprovalFollowUp, MAX_NOTICE_SECS, NewNotice, Notice, NoticeKind, NoticePhase, NoticeStatus,
    plan_notice_window,
};
use lapd_utils::delivery::{dm_user, post_log_embed};
use lapd_utils::embed::{info_embed, reply_embed, reply_ephemeral, success_embed};
use lapd_utils::formatting::{chunk_lines, role_mentions};
use lapd_utils::pagination::{LINES_PER_PAGE, paginate_embed_pages};
use lapd_utils::parse::parse_duration_seconds;

const LIST_LIMIT: u32 = 100;
const MAX_NOTE_LEN: usize = 500;

fn parse_length(raw: &str, what: &str) -> Result<u64, Error> {
    parse_duration_seconds(raw).ok_or_else(|| {
        AppError::validation(format!(
            "Invalid {}. Use a duration like `3d`, `2w` or `36h`.",
            what
        ))
        .into()
    })
}

fn check_note(note: Option<&str>) -> Result<Option<&str>, Error> {
    let note = note.map(str::trim).filter(|note| !note.is_empty());
    if note.is_some_and(|note| note.chars().count() > MAX_NOTE_LEN) {
        return Err(AppError::validation(format!(
            "Review notes are limited to {} characters.",
            MAX_NOTE_LEN
        ))
        .into());
    }
    Ok(note)
}

/// The notice `/status` shows: an open one if any, otherwise the latest.
fn current_or_latest(notices: &[Notice], now: u64) -> Option<&Notice> {
    notices
        .iter()
        .find(|notice| notice.blocks_new_request(now))
        .or_else(|| notices.first())
}

pub(crate) async fn request(
    ctx: Context<'_>,
    kind: NoticeKind,
    duration: &str,
    reason: &str,
    start_in: Option<&str>,
    quota: Option<u8>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let user_id = ctx.author().id.get();
    let now = now_unix_secs();

    let duration_secs = parse_length(duration, "duration")?;
    let delay_secs = match start_in.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => parse_length(raw, "start delay")?,
        None => 0,
    };
    let (start_at, end_at) = plan_notice_window(kind, now, duration_secs, delay_secs, reason, quota)
        .map_err(|e| AppError::validation(e.message()))?;

    let db = &ctx.data().db;
    let Some(notice) = create_notice(
        db,
        NewNotice {
            guild_id: guild_id.get(),
            user_id,
            kind,
            reason: reason.trim(),
            quota_reduction: quota,
            start_at,
            end_at,
        },
    )
    .await?
    else {
        return Err(AppError::conflict(format!(
            "You already have a pending or active {}. Check it with `/{} status`.",
            kind.short(),
            kind.as_str()
        ))
        .into());
    };
    info!(
        guild_id = guild_id.get(),
        user_id,
        notice_id = notice.id,
        kind = kind.as_str(),
        "notice requested"
    );

    let settings = get_guild_settings(db, guild_id.get()).await?;
    let alert = (!settings.notice_alert_role_ids.is_empty())
        .then(|| role_mentions(&settings.notice_alert_role_ids, ""));
    post_log_embed(
        ctx.http(),
        settings.log_channel(LogChannel::Notice),
        alert,
        review_request_embed(&notice, now),
    )
    .await;

    reply_ephemeral(
        ctx,
        notice_embed(&notice, now).title(format!("{} #{} Submitted", kind.title(), notice.id)),
    )
    .await?;
    Ok(())
}

pub(crate) async fn status(ctx: Context<'_>, kind: NoticeKind) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let now = now_unix_secs();
    let notices =
        list_member_notices(&ctx.data().db, guild_id.get(), ctx.author().id.get(), kind).await?;

    let Some(notice) = current_or_latest(&notices, now) else {
        reply_ephemeral(
            ctx,
            info_embed(kind.title(), format!("You have never requested a {}.", kind.short())),
        )
        .await?;
        return Ok(());
    };

    reply_ephemeral(ctx, notice_embed(notice, now)).await?;
    Ok(())
}

pub(crate) async fn cancel(ctx: Context<'_>, kind: NoticeKind) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let user_id = ctx.author().id.get();
    let db = &ctx.data().db;

    let notices = list_member_notices(db, guild_id.get(), user_id, kind).await?;
    let Some(pending) = notices.iter().find(|notice| notice.status == NoticeStatus::Pending) else {
        return Err(AppError::not_found(format!(
            "You have no pending {} to cancel.",
            kind.short()
        ))
        .into());
    };

    let Some(cancelled) = cancel_notice(db, guild_id.get(), pending.id, user_id).await? else {
        return Err(
            AppError::conflict("That request was reviewed before it could be cancelled.").into(),
        );
    };
    info!(guild_id = guild_id.get(), user_id, notice_id = cancelled.id, "notice cancelled");

    reply_ephemeral(
        ctx,
        success_embed(
            "Request Cancelled",
            format!("{} #{} was cancelled.", kind.short(), cancelled.id),
        ),
    )
    .await?;
    Ok(())
}

pub(crate) async fn end(ctx: Context<'_>, kind: NoticeKind) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let user_id = ctx.author().id.get();
    let db = &ctx.data().db;
    let now = now_unix_secs();

    let notices = list_member_notices(db, guild_id.get(), user_id, kind).await?;
    let Some(running) = notices
        .iter()
        .find(|notice| matches!(notice.phase(now), NoticePhase::Active | NoticePhase::Upcoming))
    else {
        return Err(AppError::not_found(format!(
            "You have no approved {} to end.",
            kind.short()
        ))
        .into());
    };

    let Some(ended) = end_notice_early(db, guild_id.get(), running.id, now).await? else {
        return Err(AppError::conflict(format!("That {} has already ended.", kind.short())).into());
    };
    info!(guild_id = guild_id.get(), user_id, notice_id = ended.id, "notice ended early");

    reply_ephemeral(
        ctx,
        success_embed(
            "Notice Ended",
            format!(
                "{} #{} has ended. Your {} role will be removed shortly.",
                kind.short(),
                ended.id,
                kind.short()
            ),
        ),
    )
    .await?;
    Ok(())
}

/// Load a notice of `kind` in this guild or fail with a not-found error.
async fn load_notice(
    ctx: Context<'_>,
    guild_id: u64,
    kind: NoticeKind,
    notice_id: u64,
) -> Result<Notice, Error> {
    get_notice(&ctx.data().db, guild_id, notice_id)
        .await?
        .filter(|notice| notice.kind == kind)
        .ok_or_else(|| {
            AppError::not_found(format!(
                "No {} #{} exists in this server.",
                kind.short(),
                notice_id
            ))
            .into()
        })
}

pub(crate) async fn review(
    ctx: Context<'_>,
    kind: NoticeKind,
    notice_id: u64,
    approve: bool,
    note: Option<&str>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let reviewer_id = ctx.author().id.get();
    let note = check_note(note)?;
    let db = &ctx.data().db;

    let existing = load_notice(ctx, guild_id.get(), kind, notice_id).await?;
    if existing.status != NoticeStatus::Pending {
        return Err(AppError::conflict(format!(
            "{} #{} is already {}.",
            kind.short(),
            notice_id,
            existing.phase(now_unix_secs()).label().to_ascii_lowercase()
        ))
        .into());
    }

    let Some(reviewed) =
        review_notice(db, guild_id.get(), notice_id, reviewer_id, approve, note).await?
    else {
        return Err(AppError::conflict("Someone else reviewed this request first.").into());
    };
    let now = now_unix_secs();
    info!(guild_id = guild_id.get(), reviewer_id, notice_id, approve, "notice reviewed");

    if approve {
        match reviewed.approval_follow_up(now) {
            ApprovalFollowUp::StartNow => {
                if mark_start_processed(db, reviewed.id).await? {
                    start_notice(ctx.http(), db, &reviewed, now).await?;
                }
            }
            ApprovalFollowUp::Lapsed => {
                if close_lapsed_notice(db, reviewed.id).await? {
                    info!(
                        guild_id = guild_id.get(),
                        notice_id,
                        "approved notice had already ended"
                    );
                }
            }
            ApprovalFollowUp::Wait => {}
        }
    }

    let headline = if approve { "Approved" } else { "Denied" };
    dm_user(ctx.http(), reviewed.user_id, member_update_embed(&reviewed, headline, now)).await;

    let settings = get_guild_settings(db, guild_id.get()).await?;
    let embed = member_update_embed(&reviewed, headline, now);
    post_log_embed(ctx.http(), settings.log_channel(LogChannel::Notice), None, embed.clone()).await;

    reply_embed(ctx, embed).await?;
    Ok(())
}

pub(crate) async fn extend(
    ctx: Context<'_>,
    kind: NoticeKind,
    notice_id: u64,
    duration: &str,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let extra_secs = parse_length(duration, "duration")?;
    let db = &ctx.data().db;
    let now = now_unix_secs();

    let existing = load_notice(ctx, guild_id.get(), kind, notice_id).await?;
    let running = matches!(existing.phase(now), NoticePhase::Active | NoticePhase::Upcoming);
    if !running || existing.early_end_at.is_some() {
        return Err(AppError::conflict(format!(
            "Only approved {}s that have not ended can be extended.",
            kind.short()
        ))
        .into());
    }

    let new_end_at = existing.end_at.saturating_add(extra_secs);
    if new_end_at - existing.start_at > MAX_NOTICE_SECS {
        return Err(
            AppError::validation("Notices cannot last longer than 90 days in total.").into(),
        );
    }

    let Some(extended) = extend_notice(db, guild_id.get(), notice_id, new_end_at, now).await?
    else {
        return Err(AppError::conflict(format!(
            "{} #{} ended before it could be extended.",
            kind.short(),
            notice_id
        ))
        .into());
    };
    info!(
        guild_id = guild_id.get(),
        notice_id,
        new_end_at,
        extended_by = ctx.author().id.get(),
        "notice extended"
    );

    let embed = member_update_embed(&extended, "Extended", now);
    dm_user(ctx.http(), extended.user_id, embed.clone()).await;
    reply_embed(ctx, embed).await?;
    Ok(())
}

pub(crate) async fn list(
    ctx: Context<'_>,
    kind: NoticeKind,
    status: Option<NoticeStatus>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let now = now_unix_secs();
    let notices =
        list_guild_notices(&ctx.data().db, guild_id.get(), kind, status, LIST_LIMIT).await?;

    if notices.is_empty() {
        reply_ephemeral(
            ctx,
            info_embed(kind.title(), format!("No {} notices found.", kind.short())),
        )
        .await?;
        return Ok(());
    }

    let lines = notices
        .iter()
        .map(|notice| notice_list_line(notice, now))
        .collect::<Vec<_>>();
    let title = format!("{} Notices ({})", kind.short(), notices.len());
    paginate_embed_pages(ctx, &title, &chunk_lines(&lines, LINES_PER_PAGE), 1).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use lapd_database::model::notices::{Notice, NoticeKind, NoticeStatus};

    use super::current_or_latest;

    fn notice(id: u64, status: NoticeStatus, end_at: u64) -> Notice {
        Notice {
            id,
            guild_id: 1,
            user_id: 1,
            kind: NoticeKind::Loa,
            status,
            reason: "Travel".to_owned(),
            quota_reduction: None,
            requested_at: 0,
            start_at: 0,
            end_at,
            early_end_at: None,
            reviewer_id: None,
            review_note: None,
            reviewed_at: None,
            start_processed: false,
            end_processed: false,
        }
    }

    #[test]
    fn status_prefers_open_notice() {
        let notices = [
            notice(3, NoticeStatus::Denied, 100),
            notice(2, NoticeStatus::Approved, 500),
            notice(1, NoticeStatus::Approved, 50),
        ];
        assert_eq!(current_or_latest(&notices, 200).map(|n| n.id), Some(2));
        assert_eq!(current_or_latest(&notices, 600).map(|n| n.id), Some(3));
        assert!(current_or_latest(&[], 0).is_none());
    }
}
