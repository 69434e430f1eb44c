use poise::serenity_prelude as serenity;

use lapd_database::model::shifts::{DutyStatus, LeaderboardEntry, Shift, ShiftTotals};
use lapd_utils::embed::{DEFAULT_EMBED_COLOR, SUCCESS_EMBED_COLOR, WARNING_EMBED_COLOR};
use lapd_utils::formatting::{discord_timestamp, format_shift_duration, user_mention};

fn status_color(status: DutyStatus) -> u32 {
    match status {
        DutyStatus::OnDuty => SUCCESS_EMBED_COLOR,
        DutyStatus::OnBreak => WARNING_EMBED_COLOR,
        DutyStatus::OffDuty => DEFAULT_EMBED_COLOR,
    }
}

pub(crate) fn totals_description(totals: &ShiftTotals) -> String {
    format!(
        "**Shifts :** {}\n\
         **Total On Duty :** {}\n\
         **Total Break :** {}\n\
         **Average Shift :** {}\n\
         **Longest Shift :** {}",
        totals.shift_count,
        format_shift_duration(totals.on_duty_millis),
        format_shift_duration(totals.break_millis),
        format_shift_duration(totals.average_on_duty_millis()),
        format_shift_duration(totals.longest_on_duty_millis),
    )
}

fn current_shift_description(shift: &Shift, now_ms: u64) -> String {
    let mut out = format!(
        "**Started :** {}\n**On Duty :** {}\n**Break :** {}",
        discord_timestamp(shift.started_at / 1_000, 'R'),
        format_shift_duration(shift.on_duty_millis(now_ms)),
        format_shift_duration(shift.break_millis(now_ms)),
    );
    if let Some(open_break) = shift.open_break() {
        out.push_str(&format!(
            "\n**Break Started :** {}",
            discord_timestamp(open_break.started_at / 1_000, 'R')
        ));
    }
    out
}

/// Panel shown by `/duty manage`.
pub(crate) fn panel_embed(
    display_name: &str,
    shift_type: &str,
    active: Option<&Shift>,
    totals: &ShiftTotals,
    now_ms: u64,
) -> serenity::CreateEmbed {
    let status = active.map_or(DutyStatus::OffDuty, Shift::status);
    let mut embed = serenity::CreateEmbed::new()
        .title(format!("Duty Management: {}", shift_type))
        .color(status_color(status))
        .field("Status", status.label(), true)
        .field("Officer", display_name.to_owned(), true);

    if let Some(shift) = active {
        embed = embed.field("Current Shift", current_shift_description(shift, now_ms), false);
    }

    embed.field("All Time", totals_description(totals), false)
}

pub(crate) fn panel_buttons(
    status: DutyStatus,
    start_id: &str,
    break_id: &str,
    end_id: &str,
    disabled: bool,
) -> Vec<serenity::CreateActionRow> {
    let off_duty = status == DutyStatus::OffDuty;
    let break_label = if status == DutyStatus::OnBreak { "End Break" } else { "Break" };

    vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(start_id)
            .label("Start")
            .style(serenity::ButtonStyle::Success)
            .disabled(disabled || !off_duty),
        serenity::CreateButton::new(break_id)
            .label(break_label)
            .style(serenity::ButtonStyle::Secondary)
            .disabled(disabled || off_duty),
        serenity::CreateButton::new(end_id)
            .label("End")
            .style(serenity::ButtonStyle::Danger)
            .disabled(disabled || off_duty),
    ])]
}

/// Shift log posted when a shift ends.
pub(crate) fn shift_log_embed(shift: &Shift, ended_by: Option<u64>) -> serenity::CreateEmbed {
    let end = shift.ended_at.unwrap_or(shift.started_at);
    let mut description = format!(
        "**Officer :** {}\n\
         **Type :** {}\n\
         **Started :** {}\n\
         **Ended :** {}\n\
         **On Duty :** {}\n\
         **Break :** {} ({} breaks)\n\
         **Records :** {} arrests, {} citations, {} incidents",
        user_mention(shift.user_id),
        shift.shift_type,
        discord_timestamp(shift.started_at / 1_000, 'f'),
        discord_timestamp(end / 1_000, 'f'),
        format_shift_duration(shift.on_duty_millis(end)),
        format_shift_duration(shift.break_millis(end)),
        shift.breaks.len(),
        shift.arrests,
        shift.citations,
        shift.incidents,
    );
    if let Some(ended_by) = ended_by.filter(|ended_by| *ended_by != shift.user_id) {
        description.push_str(&format!("\n**Ended By :** {}", user_mention(ended_by)));
    }

    serenity::CreateEmbed::new()
        .title("Shift Ended")
        .color(DEFAULT_EMBED_COLOR)
        .description(description)
}

pub(crate) fn active_line(shift: &Shift, now_ms: u64) -> String {
    let marker = match shift.status() {
        DutyStatus::OnBreak => " (on break)",
        _ => "",
    };
    format!(
        "{} [{}]: {}{}",
        user_mention(shift.user_id),
        shift.shift_type,
        format_shift_duration(shift.on_duty_millis(now_ms)),
        marker
    )
}

pub(crate) fn leaderboard_line(rank: usize, entry: &LeaderboardEntry) -> String {
    format!(
        "**{}.** {}: {} ({} shifts)",
        rank,
        user_mention(entry.user_id),
        format_shift_duration(entry.on_duty_millis),
        entry.shift_count
    )
}

pub(crate) fn history_line(shift: &Shift, now_ms: u64) -> String {
    let state = if shift.is_active() { " (active)" } else { "" };
    format!(
        "`#{}` {} [{}]: {}{}",
        shift.id,
        discord_timestamp(shift.started_at / 1_000, 'd'),
        shift.shift_type,
        format_shift_duration(shift.on_duty_millis(now_ms)),
        state
    )
}

#[cfg(test)]
mod tests {
    use lapd_database::model::shifts::{LeaderboardEntry, Shift, ShiftBreak, ShiftTotals};

    use super::{active_line, leaderboard_line, totals_description};

    fn shift(breaks: Vec<ShiftBreak>) -> Shift {
        Shift {
            id: 4,
            guild_id: 1,
            user_id: 42,
            shift_type: "Patrol".to_owned(),
            started_at: 0,
            ended_at: None,
            arrests: 0,
            citations: 0,
            incidents: 0,
            breaks,
        }
    }

    #[test]
    fn active_line_marks_breaks() {
        let on_duty = shift(vec![]);
        assert_eq!(active_line(&on_duty, 90_000), "<@42> [Patrol]: 1m 30s");

        let on_break = shift(vec![ShiftBreak { started_at: 60_000, ended_at: None }]);
        assert_eq!(active_line(&on_break, 90_000), "<@42> [Patrol]: 1m 0s (on break)");
    }

    #[test]
    fn leaderboard_line_format() {
        let entry = LeaderboardEntry {
            user_id: 7,
            shift_count: 3,
            on_duty_millis: 3_725_000,
        };
        assert_eq!(leaderboard_line(1, &entry), "**1.** <@7>: 1h 2m 5s (3 shifts)");
    }

    #[test]
    fn totals_show_average() {
        let totals = ShiftTotals {
            shift_count: 2,
            on_duty_millis: 120_000,
            ..ShiftTotals::default()
        };
        assert!(totals_description(&totals).contains("**Average Shift :** 1m 0s"));
    }
}
