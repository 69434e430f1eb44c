/// Shared confirmation prompt helpers.
pub mod confirmation;
/// Role sync, log channel posts and DMs.
pub mod delivery;
/// Embed builders and reply helpers shared across commands.
pub mod embed;
/// Shared formatting helpers (durations, mentions, record labels).
pub mod formatting;
/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
/// Shared pagination helper utilities.
pub mod pagination;
/// Pure parser and validation helpers for command input.
pub mod parse;
/// Permission helper utilities.
pub mod permissions;
