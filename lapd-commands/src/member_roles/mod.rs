mod backup;
mod delete;
mod embeds;
mod list;
mod restore;

pub use backup::{CONTEXT_META as BACKUP_CONTEXT_META, META as BACKUP_META, backup_context};
pub use delete::META as DELETE_META;
pub use list::META as LIST_META;
pub use restore::META as RESTORE_META;

use self::backup::backup;
use self::delete::delete;
use self::list::list;
use self::restore::restore;

use lapd_core::{Context, Error};

/// Save and restore member roles.
#[poise::command(
    slash_command,
    rename = "member-roles",
    category = "Member Roles",
    subcommands("backup", "list", "restore", "delete"),
    subcommand_required
)]
pub async fn member_roles(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}
