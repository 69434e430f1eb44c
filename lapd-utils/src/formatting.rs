/// Format a record label from its code and per-guild number (e.g. "BK", 5 -> "BK-0005").
pub fn format_record_label(code: &str, number: u64) -> String {
    format!("{}-{:04}", code.to_ascii_uppercase(), number)
}

/// Format seconds into a compact human-readable duration (e.g. 59s, 1m, 1h, 1d, 1h 30m).
pub fn format_compact_duration(total_seconds: u64) -> String {
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        return if hours > 0 {
            format!("{}d {}h", days, hours)
        } else {
            format!("{}d", days)
        };
    }

    if hours > 0 {
        let mut parts = vec![format!("{}h", hours)];
        if minutes > 0 {
            parts.push(format!("{}m", minutes));
        }
        if seconds > 0 {
            parts.push(format!("{}s", seconds));
        }
        return parts.join(" ");
    }

    if minutes > 0 {
        return if seconds > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}m", minutes)
        };
    }

    format!("{}s", seconds)
}

/// Shift durations: always hours/minutes/seconds, never days (e.g. `27h 3m 5s`).
pub fn format_shift_duration(millis: u64) -> String {
    let total_seconds = millis / 1_000;
    let hours = total_seconds / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    match (hours, minutes) {
        (0, 0) => format!("{}s", seconds),
        (0, _) => format!("{}m {}s", minutes, seconds),
        _ => format!("{}h {}m {}s", hours, minutes, seconds),
    }
}

/// Discord timestamp markup. `style` is one of `t T d D f F R`.
pub fn discord_timestamp(unix_secs: u64, style: char) -> String {
    format!("<t:{}:{}>", unix_secs, style)
}

pub fn user_mention(user_id: u64) -> String {
    format!("<@{}>", user_id)
}

pub fn channel_mention(channel_id: u64) -> String {
    format!("<#{}>", channel_id)
}

/// Join role mentions, or `fallback` when the list is empty.
pub fn role_mentions(role_ids: &[u64], fallback: &str) -> String {
    if role_ids.is_empty() {
        return fallback.to_owned();
    }

    role_ids
        .iter()
        .map(|role_id| format!("<@&{}>", role_id))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn user_mentions(user_ids: &[u64], fallback: &str) -> String {
    if user_ids.is_empty() {
        return fallback.to_owned();
    }

    user_ids
        .iter()
        .map(|user_id| user_mention(*user_id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Bulleted list for embed fields, or `fallback` when empty.
pub fn bullet_list(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        return fallback.to_owned();
    }

    items
        .iter()
        .map(|item| format!("• {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cut `text` to at most `max_chars` characters, marking the cut with `…`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }

    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Group lines into page bodies of at most `per_page` lines each.
pub fn chunk_lines(lines: &[String], per_page: usize) -> Vec<String> {
    lines
        .chunks(per_page.max(1))
        .map(|chunk| chunk.join("\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        bullet_list, chunk_lines, discord_timestamp, format_compact_duration,
        format_record_label, format_shift_duration, role_mentions, truncate_chars,
        user_mentions,
    };

    #[test]
    fn record_labels_are_zero_padded() {
        assert_eq!(format_record_label("bk", 5), "BK-0005");
        assert_eq!(format_record_label("IR", 12345), "IR-12345");
    }

    #[test]
    fn compact_duration_formatting() {
        assert_eq!(format_compact_duration(59), "59s");
        assert_eq!(format_compact_duration(60), "1m");
        assert_eq!(format_compact_duration(61), "1m 1s");
        assert_eq!(format_compact_duration(3600), "1h");
        assert_eq!(format_compact_duration(3670), "1h 1m 10s");
        assert_eq!(format_compact_duration(86400), "1d");
        assert_eq!(format_compact_duration(90000), "1d 1h");
    }

    #[test]
    fn shift_durations_never_roll_into_days() {
        assert_eq!(format_shift_duration(999), "0s");
        assert_eq!(format_shift_duration(61_000), "1m 1s");
        assert_eq!(format_shift_duration(27 * 3_600_000 + 185_000), "27h 3m 5s");
    }

    #[test]
    fn mentions_and_fallbacks() {
        assert_eq!(role_mentions(&[], "None"), "None");
        assert_eq!(role_mentions(&[1, 2], "None"), "<@&1>, <@&2>");
        assert_eq!(user_mentions(&[3], "-"), "<@3>");
        assert_eq!(discord_timestamp(10, 'R'), "<t:10:R>");
        assert_eq!(bullet_list(&[], "None"), "None");
        assert_eq!(bullet_list(&["a".to_owned(), "b".to_owned()], "None"), "• a\n• b");
    }

    #[test]
    fn truncation_and_chunking() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello world", 6), "hello…");

        let lines: Vec<String> = (1..=5).map(|n| n.to_string()).collect();
        assert_eq!(chunk_lines(&lines, 2), vec!["1\n2", "3\n4", "5"]);
        assert!(chunk_lines(&[], 2).is_empty());
    }
}
