use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::common::{display_name, require_guild};
use crate::member_roles::embeds::backup_line;
use lapd_core::guard::CommandGuards;
use lapd_core::{Context, Error};
use lapd_database::impls::member_roles::list_backups;
use lapd_utils::embed::{info_embed, reply_ephemeral};
use lapd_utils::formatting::chunk_lines;
use lapd_utils::pagination::{LINES_PER_PAGE, paginate_embed_pages_with_thumbnail};

pub const META: CommandMeta = CommandMeta {
    name: "member-roles list",
    desc: "List a member's role backups, newest first.",
    category: "member roles",
    usage: "/member-roles list <member>",
    guards: CommandGuards::staff().cooldown_secs(3),
};

#[poise::command(slash_command)]
pub async fn list(
    ctx: Context<'_>,
    #[description = "Member whose backups to list"] member: serenity::User,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let backups = list_backups(&ctx.data().db, guild_id.get(), member.id.get()).await?;

    if backups.is_empty() {
        reply_ephemeral(
            ctx,
            info_embed("Role Backups", format!("<@{}> has no role backups.", member.id.get())),
        )
        .await?;
        return Ok(());
    }

    let lines = backups.iter().map(backup_line).collect::<Vec<_>>();
    let title = format!("Role Backups: {}", display_name(&member));
    paginate_embed_pages_with_thumbnail(
        ctx,
        &title,
        &chunk_lines(&lines, LINES_PER_PAGE),
        1,
        Some(&member.face()),
    )
    .await?;
    Ok(())
}
