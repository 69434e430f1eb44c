mod edit;
mod embeds;
mod view;

pub use edit::META as EDIT_META;
pub use view::{CONTEXT_META as VIEW_CONTEXT_META, META as VIEW_META, view_context};

use self::edit::edit;
use self::view::view;

use lapd_core::{Context, Error};

/// Guild profiles.
#[poise::command(
    slash_command,
    category = "Profile",
    subcommands("view", "edit"),
    subcommand_required
)]
pub async fn profile(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}
