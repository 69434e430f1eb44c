use poise::serenity_prelude as serenity;
use tracing::info;

use crate::CommandMeta;
use crate::common::require_guild;
use crate::config::choices::LogChannelChoice;
use lapd_core::guard::CommandGuards;
use lapd_core::{Context, Error};
use lapd_database::impls::guild_settings::set_log_channel;
use lapd_database::model::guild_settings::LogChannel;
use lapd_utils::embed::{reply_ephemeral, success_embed};

pub const META: CommandMeta = CommandMeta {
    name: "config channel",
    desc: "Set or clear a log channel.",
    category: "config",
    usage: "/config channel <shift|arrest|citation|incident|notice> [channel]",
    guards: CommandGuards::management().cooldown_secs(3),
};

#[poise::command(slash_command)]
pub async fn channel(
    ctx: Context<'_>,
    #[description = "Which log"] log: LogChannelChoice,
    #[description = "Channel to post in (omit to clear)"]
    #[channel_types("Text", "News")]
    #[rename = "channel"]
    target: Option<serenity::GuildChannel>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?.get();
    let log = LogChannel::from(log);
    let channel_id = target.as_ref().map(|channel| channel.id.get());

    set_log_channel(&ctx.data().db, guild_id, log, channel_id).await?;
    info!(
        guild_id,
        log = log.label(),
        channel_id,
        changed_by = ctx.author().id.get(),
        "log channel updated"
    );

    let message = match channel_id {
        Some(id) => format!("**{}** will be posted in <#{}>.", log.label(), id),
        None => format!("**{}** are turned off.", log.label()),
    };
    reply_ephemeral(ctx, success_embed("Configuration Updated", message)).await?;
    Ok(())
}
