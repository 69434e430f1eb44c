pub mod arrests;
pub mod citations;
pub mod guild_data;
pub mod guild_settings;
pub mod incidents;
pub mod member_roles;
pub mod notices;
pub mod profiles;
pub mod records;
pub mod shift_types;
pub mod shifts;

use std::time::{SystemTime, UNIX_EPOCH};

pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_secs())
}

pub fn now_unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}
