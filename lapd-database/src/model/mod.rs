pub mod guild_settings;
pub mod member_roles;
pub mod notices;
pub mod profiles;
pub mod records;
pub mod shifts;
