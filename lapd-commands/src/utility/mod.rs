pub mod dev;
pub mod embeds;
pub mod help;
pub mod ping;
pub mod usage;
