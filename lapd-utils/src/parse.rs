/// Parse a compact duration token like `30s`, `10m`, `2h`, `1d`, `2w`,
/// combinations such as `1d12h`, or plain seconds.
pub fn parse_duration_seconds(raw: &str) -> Option<u64> {
    let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let bytes = compact.as_bytes();
    let mut cursor = 0;
    let mut total_seconds = 0_u64;
    let mut saw_unit_segment = false;

    while cursor < bytes.len() {
        let number_start = cursor;
        while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
            cursor += 1;
        }

        if number_start == cursor {
            return None;
        }

        let number = compact[number_start..cursor].parse::<u64>().ok()?;
        if number == 0 {
            return None;
        }

        let saw_unit = cursor < bytes.len();
        let multiplier = if saw_unit {
            let unit = bytes[cursor] as char;
            cursor += 1;
            unit_seconds(unit)?
        } else {
            1_u64
        };

        if !saw_unit && saw_unit_segment {
            return None;
        }

        saw_unit_segment = saw_unit_segment || saw_unit;

        let part_seconds = number.checked_mul(multiplier)?;
        total_seconds = total_seconds.checked_add(part_seconds)?;
    }

    (total_seconds > 0).then_some(total_seconds)
}

fn unit_seconds(unit: char) -> Option<u64> {
    match unit.to_ascii_lowercase() {
        's' => Some(1),
        'm' => Some(60),
        'h' => Some(60 * 60),
        'd' => Some(60 * 60 * 24),
        'w' => Some(60 * 60 * 24 * 7),
        _ => None,
    }
}

/// Roblox usernames: 3-20 characters of `A-Za-z0-9_`, at most one
/// underscore, never leading or trailing.
pub fn validate_roblox_username(raw: &str) -> Result<&str, &'static str> {
    let username = raw.trim();
    let len = username.chars().count();

    if !(3..=20).contains(&len) {
        return Err("Roblox usernames are 3 to 20 characters long.");
    }
    if !username
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    {
        return Err("Roblox usernames may only contain letters, numbers and one underscore.");
    }
    if username.matches('_').count() > 1 {
        return Err("Roblox usernames may contain at most one underscore.");
    }
    if username.starts_with('_') || username.ends_with('_') {
        return Err("Roblox usernames cannot start or end with an underscore.");
    }

    Ok(username)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListLimits {
    pub max_entries: usize,
    pub min_len: usize,
    pub max_len: usize,
}

/// Charges, violations and the like.
pub const OFFENCE_LIST_LIMITS: ListLimits = ListLimits {
    max_entries: 10,
    min_len: 3,
    max_len: 200,
};

/// Suspect, victim and witness names on incident reports.
pub const NAME_LIST_LIMITS: ListLimits = ListLimits {
    max_entries: 15,
    min_len: 1,
    max_len: 100,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListError {
    Empty,
    TooMany { max: usize },
    EntryLength { entry: String, min: usize, max: usize },
}

impl ListError {
    pub fn message(&self, what: &str) -> String {
        match self {
            Self::Empty => format!("Provide at least one {what}."),
            Self::TooMany { max } => format!("At most {max} {what} entries are allowed."),
            Self::EntryLength { entry, min, max } => format!(
                "Each {what} must be {min} to {max} characters long (`{entry}`)."
            ),
        }
    }
}

/// Split a newline- or comma-separated list, dropping blank entries.
pub fn parse_list(raw: &str, limits: ListLimits) -> Result<Vec<String>, ListError> {
    let entries: Vec<String> = raw
        .split(['\n', ','])
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect();

    if entries.is_empty() {
        return Err(ListError::Empty);
    }
    if entries.len() > limits.max_entries {
        return Err(ListError::TooMany {
            max: limits.max_entries,
        });
    }
    if let Some(entry) = entries.iter().find(|entry| {
        let len = entry.chars().count();
        len < limits.min_len || len > limits.max_len
    }) {
        return Err(ListError::EntryLength {
            entry: entry.clone(),
            min: limits.min_len,
            max: limits.max_len,
        });
    }

    Ok(entries)
}

/// Like [`parse_list`] but an empty input is an empty list.
pub fn parse_optional_list(
    raw: Option<&str>,
    limits: ListLimits,
) -> Result<Vec<String>, ListError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => parse_list(value, limits),
        None => Ok(Vec::new()),
    }
}

/// Accepts `5'10`, `5'10"`, `5ft10`, `5ft 10in` or `5 10` and normalizes to `5'10"`.
pub fn parse_height(raw: &str) -> Option<String> {
    let normalized = raw
        .trim()
        .to_ascii_lowercase()
        .replace("ft", "'")
        .replace("in", "")
        .replace('"', "")
        .replace(' ', "'");

    let (feet, inches) = match normalized.split_once('\'') {
        Some((feet, inches)) => (feet.trim_matches('\''), inches.trim_matches('\'')),
        None => (normalized.as_str(), "0"),
    };

    let feet = feet.parse::<u8>().ok().filter(|feet| (3..=8).contains(feet))?;
    let inches = if inches.is_empty() {
        0
    } else {
        inches.parse::<u8>().ok().filter(|inches| *inches < 12)?
    };

    Some(format!("{feet}'{inches}\""))
}

/// License plates: 1-8 characters of `A-Z0-9-`, stored uppercase.
pub fn parse_license_plate(raw: &str) -> Option<String> {
    let plate = raw.trim().to_ascii_uppercase();
    let valid = (1..=8).contains(&plate.len())
        && plate
            .chars()
            .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '-');

    valid.then_some(plate)
}

/// Badge numbers are 1-8 digits.
pub fn parse_badge_number(raw: &str) -> Option<String> {
    let badge = raw.trim();
    let valid = (1..=8).contains(&badge.len()) && badge.chars().all(|ch| ch.is_ascii_digit());

    valid.then(|| badge.to_owned())
}

/// Pull user ids out of a free-form list of mentions (`<@1>`, `<@!1>`) or raw ids.
pub fn parse_user_ids(raw: &str) -> Vec<u64> {
    mention_ids(raw, '!')
}

/// Pull role ids out of a free-form list of role mentions (`<@&1>`) or raw ids.
pub fn parse_role_ids(raw: &str) -> Vec<u64> {
    mention_ids(raw, '&')
}

fn mention_ids(raw: &str, sigil: char) -> Vec<u64> {
    let mut ids: Vec<u64> = Vec::new();
    for token in raw.split(|ch: char| ch.is_whitespace() || ch == ',') {
        let token = token
            .trim()
            .trim_start_matches("<@")
            .trim_start_matches(sigil)
            .trim_end_matches('>');
        if let Some(id) = token.parse::<u64>().ok().filter(|id| *id > 0)
            && !ids.contains(&id)
        {
            ids.push(id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::{
        ListError, OFFENCE_LIST_LIMITS, parse_badge_number, parse_duration_seconds,
        parse_height, parse_license_plate, parse_list, parse_optional_list, parse_role_ids,
        parse_user_ids,
        validate_roblox_username,
    };

    #[test]
    fn durations() {
        assert_eq!(parse_duration_seconds("30"), Some(30));
        assert_eq!(parse_duration_seconds("36h"), Some(36 * 3600));
        assert_eq!(parse_duration_seconds("2w"), Some(14 * 86_400));
        assert_eq!(parse_duration_seconds("1d 12h"), Some(36 * 3600));
        assert_eq!(parse_duration_seconds("1D"), Some(86_400));
        assert_eq!(parse_duration_seconds("0d"), None);
        assert_eq!(parse_duration_seconds("5x"), None);
        assert_eq!(parse_duration_seconds("1d5"), None);
        assert_eq!(parse_duration_seconds(""), None);
    }

    #[test]
    fn roblox_usernames() {
        assert_eq!(validate_roblox_username(" Builder_Man "), Ok("Builder_Man"));
        assert!(validate_roblox_username("ab").is_err());
        assert!(validate_roblox_username("a".repeat(21).as_str()).is_err());
        assert!(validate_roblox_username("bad-name").is_err());
        assert!(validate_roblox_username("two_under_scores").is_err());
        assert!(validate_roblox_username("_leading").is_err());
        assert!(validate_roblox_username("trailing_").is_err());
    }

    #[test]
    fn lists_split_on_commas_and_newlines() {
        assert_eq!(
            parse_list("Evading arrest, Speeding\nAssault on officer", OFFENCE_LIST_LIMITS),
            Ok(vec![
                "Evading arrest".to_owned(),
                "Speeding".to_owned(),
                "Assault on officer".to_owned(),
            ])
        );
        assert_eq!(parse_list(" , ", OFFENCE_LIST_LIMITS), Err(ListError::Empty));
        assert!(matches!(
            parse_list("ok entry, no", OFFENCE_LIST_LIMITS),
            Err(ListError::EntryLength { .. })
        ));
        assert_eq!(
            parse_list(&vec!["Theft"; 11].join(","), OFFENCE_LIST_LIMITS),
            Err(ListError::TooMany { max: 10 })
        );
        assert_eq!(parse_optional_list(None, OFFENCE_LIST_LIMITS), Ok(Vec::new()));
    }

    #[test]
    fn heights() {
        assert_eq!(parse_height("5'10"), Some("5'10\"".to_owned()));
        assert_eq!(parse_height("5'10\""), Some("5'10\"".to_owned()));
        assert_eq!(parse_height("6ft 2in"), Some("6'2\"".to_owned()));
        assert_eq!(parse_height("6 0"), Some("6'0\"".to_owned()));
        assert_eq!(parse_height("6"), Some("6'0\"".to_owned()));
        assert_eq!(parse_height("5'13"), None);
        assert_eq!(parse_height("tall"), None);
    }

    #[test]
    fn plates_and_badges() {
        assert_eq!(parse_license_plate(" abc-123 "), Some("ABC-123".to_owned()));
        assert_eq!(parse_license_plate("TOOLONG123"), None);
        assert_eq!(parse_license_plate("AB 12"), None);
        assert_eq!(parse_badge_number("01234"), Some("01234".to_owned()));
        assert_eq!(parse_badge_number("12a"), None);
        assert_eq!(parse_badge_number("123456789"), None);
    }

    #[test]
    fn user_ids_from_mentions() {
        assert_eq!(
            parse_user_ids("<@123> <@!456>, 789 nope"),
            vec![123, 456, 789]
        );
        assert!(parse_user_ids("").is_empty());
    }

    #[test]
    fn role_ids_from_mentions() {
        assert_eq!(parse_role_ids("<@&10>,<@&20> 10 30"), vec![10, 20, 30]);
    }
}
