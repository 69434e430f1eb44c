use poise::serenity_prelude as serenity;

use crate::common::sanitize;
use lapd_database::model::notices::{Notice, NoticePhase};
use lapd_utils::embed::{
    DEFAULT_EMBED_COLOR, ERROR_EMBED_COLOR, SUCCESS_EMBED_COLOR, WARNING_EMBED_COLOR,
};
use lapd_utils::formatting::{
    discord_timestamp, format_compact_duration, truncate_chars, user_mention,
};

fn phase_color(phase: NoticePhase) -> u32 {
    match phase {
        NoticePhase::Pending | NoticePhase::Upcoming => WARNING_EMBED_COLOR,
        NoticePhase::Active => SUCCESS_EMBED_COLOR,
        NoticePhase::Denied => ERROR_EMBED_COLOR,
        NoticePhase::Cancelled | NoticePhase::Ended => DEFAULT_EMBED_COLOR,
    }
}

pub(crate) fn notice_description(notice: &Notice, now: u64) -> String {
    let mut out = format!(
        "**Member :** {}\n**Status :** {}\n**Starts :** {}\n**Ends :** {}\n**Length :** {}",
        user_mention(notice.user_id),
        notice.phase(now).label(),
        discord_timestamp(notice.start_at, 'f'),
        discord_timestamp(notice.effective_end(), 'f'),
        format_compact_duration(notice.duration_secs()),
    );
    if let Some(quota) = notice.quota_reduction {
        out.push_str(&format!("\n**Quota Reduction :** {}%", quota));
    }
    if let Some(early) = notice.early_end_at {
        out.push_str(&format!("\n**Ended Early :** {}", discord_timestamp(early, 'R')));
    }
    if let Some(reviewer_id) = notice.reviewer_id {
        out.push_str(&format!("\n**Reviewed By :** {}", user_mention(reviewer_id)));
    }
    out
}

pub(crate) fn notice_embed(notice: &Notice, now: u64) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title(format!("{} #{}", notice.kind.title(), notice.id))
        .color(phase_color(notice.phase(now)))
        .description(notice_description(notice, now))
        .field("Reason", truncate_chars(&sanitize(&notice.reason), 1_000), false);

    if let Some(note) = notice.review_note.as_deref() {
        embed = embed.field("Review Note", truncate_chars(&sanitize(note), 1_000), false);
    }
    embed
}

/// Posted to the notice log channel when a member submits a request.
pub(crate) fn review_request_embed(notice: &Notice, now: u64) -> serenity::CreateEmbed {
    notice_embed(notice, now)
        .title(format!("{} Request #{}", notice.kind.title(), notice.id))
        .footer(serenity::CreateEmbedFooter::new(format!(
            "/{} admin approve {}  |  /{} admin deny {}",
            notice.kind.as_str(),
            notice.id,
            notice.kind.as_str(),
            notice.id
        )))
}

/// DM sent to the member when their notice changes.
pub(crate) fn member_update_embed(
    notice: &Notice,
    headline: &str,
    now: u64,
) -> serenity::CreateEmbed {
    notice_embed(notice, now).title(format!("{} #{}: {}", notice.kind.short(), notice.id, headline))
}

pub(crate) fn notice_list_line(notice: &Notice, now: u64) -> String {
    format!(
        "`#{}` {} **{}** {} to {}",
        notice.id,
        user_mention(notice.user_id),
        notice.phase(now).label(),
        discord_timestamp(notice.start_at, 'd'),
        discord_timestamp(notice.effective_end(), 'd'),
    )
}

#[cfg(test)]
mod tests {
    use lapd_database::model::notices::{Notice, NoticeKind, NoticeStatus};

    use super::{notice_description, notice_list_line};

    const DAY: u64 = 86_400;

    fn notice() -> Notice {
        Notice {
            id: 12,
            guild_id: 1,
            user_id: 77,
            kind: NoticeKind::Ra,
            status: NoticeStatus::Approved,
            reason: "Exams".to_owned(),
            quota_reduction: Some(50),
            requested_at: 0,
            start_at: DAY,
            end_at: 8 * DAY,
            early_end_at: None,
            reviewer_id: Some(5),
            review_note: None,
            reviewed_at: Some(10),
            start_processed: false,
            end_processed: false,
        }
    }

    #[test]
    fn description_reflects_phase_and_quota() {
        let description = notice_description(&notice(), 2 * DAY);
        assert!(description.contains("**Status :** Active"));
        assert!(description.contains("**Length :** 7d"));
        assert!(description.contains("**Quota Reduction :** 50%"));
        assert!(description.contains("**Reviewed By :** <@5>"));
    }

    #[test]
    fn list_line_uses_effective_end() {
        let mut ended = notice();
        ended.early_end_at = Some(3 * DAY);
        assert_eq!(
            notice_list_line(&ended, 4 * DAY),
            "`#12` <@77> **Ended** <t:86400:d> to <t:259200:d>"
        );
    }
}
