use poise::serenity_prelude as serenity;
use tracing::info;

use crate::CommandMeta;
use crate::common::require_guild;
use crate::config::choices::NoticeKindChoice;
use lapd_core::guard::CommandGuards;
use lapd_core::{AppError, Context, Error};
use lapd_database::impls::guild_settings::set_notice_role;
use lapd_database::model::notices::NoticeKind;
use lapd_utils::embed::{reply_ephemeral, success_embed};

pub const META: CommandMeta = CommandMeta {
    name: "config notice-role",
    desc: "Set or clear the role granted during a notice.",
    category: "config",
    usage: "/config notice-role <loa|ra> [role]",
    guards: CommandGuards::management().cooldown_secs(3),
};

#[poise::command(slash_command, rename = "notice-role")]
pub async fn notice_role(
    ctx: Context<'_>,
    #[description = "Notice kind"] kind: NoticeKindChoice,
    #[description = "Role to grant (omit to clear)"] role: Option<serenity::Role>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?.get();
    let kind = NoticeKind::from(kind);
    if role.as_ref().is_some_and(|role| role.managed || role.id.get() == guild_id) {
        return Err(AppError::validation("That role cannot be assigned by the bot.").into());
    }
    let role_id = role.as_ref().map(|role| role.id.get());

    set_notice_role(&ctx.data().db, guild_id, kind, role_id).await?;
    info!(
        guild_id,
        kind = kind.as_str(),
        role_id,
        changed_by = ctx.author().id.get(),
        "notice role updated"
    );

    let message = match role_id {
        Some(id) => format!("Members on an active {} now receive <@&{}>.", kind.short(), id),
        None => format!("No role is granted during an {} anymore.", kind.short()),
    };
    reply_ephemeral(ctx, success_embed("Configuration Updated", message)).await?;
    Ok(())
}
