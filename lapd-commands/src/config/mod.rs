mod channel;
mod choices;
mod embeds;
mod notice_role;
mod roles;
mod shift_types;
mod view;

pub use channel::META as CHANNEL_META;
pub use notice_role::META as NOTICE_ROLE_META;
pub use roles::META as ROLES_META;
pub use shift_types::{
    ADD_META as SHIFT_TYPE_ADD_META, DEFAULT_META as SHIFT_TYPE_DEFAULT_META,
    LIST_META as SHIFT_TYPE_LIST_META, REMOVE_META as SHIFT_TYPE_REMOVE_META,
};
pub use view::META as VIEW_META;

use self::channel::channel;
use self::notice_role::notice_role;
use self::roles::roles;
use self::shift_types::shift_type;
use self::view::view;

use lapd_core::{Context, Error};

/// Server configuration.
#[poise::command(
    slash_command,
    category = "Config",
    subcommands("view", "roles", "channel", "notice_role", "shift_type"),
    subcommand_required
)]
pub async fn config(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}
