use crate::CommandMeta;
use crate::common::require_guild;
use crate::config::embeds::{channels_section, notice_roles_section, roles_section, shift_type_line};
use lapd_core::guard::CommandGuards;
use lapd_core::{Context, Error};
use lapd_database::impls::guild_settings::get_guild_settings;
use lapd_database::impls::shift_types::list_shift_types;
use lapd_utils::embed::{info_embed, reply_ephemeral};
use lapd_utils::formatting::bullet_list;

pub const META: CommandMeta = CommandMeta {
    name: "config view",
    desc: "Show this server's configuration.",
    category: "config",
    usage: "/config view",
    guards: CommandGuards::management().cooldown_secs(3),
};

#[poise::command(slash_command)]
pub async fn view(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?.get();
    let db = &ctx.data().db;
    let settings = get_guild_settings(db, guild_id).await?;
    let shift_types = list_shift_types(db, guild_id)
        .await?
        .iter()
        .map(shift_type_line)
        .collect::<Vec<_>>();

    let embed = info_embed("Server Configuration", roles_section(&settings))
        .field("Log Channels", channels_section(&settings), false)
        .field("Notice Roles", notice_roles_section(&settings), false)
        .field("Shift Types", bullet_list(&shift_types, "None"), false);
    reply_ephemeral(ctx, embed).await?;
    Ok(())
}
