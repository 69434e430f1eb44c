use tracing::info;

use crate::CommandMeta;
use crate::common::require_guild;
use lapd_core::guard::CommandGuards;
use lapd_core::{AppError, Context, Error};
use lapd_database::impls::member_roles::delete_backup;
use lapd_utils::embed::{reply_ephemeral, success_embed};

pub const META: CommandMeta = CommandMeta {
    name: "member-roles delete",
    desc: "Delete a role backup.",
    category: "member roles",
    usage: "/member-roles delete <backup_id>",
    guards: CommandGuards::management().cooldown_secs(3),
};

#[poise::command(slash_command)]
pub async fn delete(
    ctx: Context<'_>,
    #[description = "Backup id"]
    #[min = 1]
    backup_id: u64,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    if !delete_backup(&ctx.data().db, guild_id.get(), backup_id).await? {
        return Err(AppError::not_found(format!(
            "No role backup #{} exists in this server.",
            backup_id
        ))
        .into());
    }
    info!(
        guild_id = guild_id.get(),
        backup_id,
        deleted_by = ctx.author().id.get(),
        "role backup deleted"
    );

    reply_ephemeral(
        ctx,
        success_embed("Backup Deleted", format!("Role backup #{} was deleted.", backup_id)),
    )
    .await?;
    Ok(())
}
