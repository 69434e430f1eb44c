use lapd_core::guard::CommandGuards;
use lapd_core::{Context, Error};
use lapd_utils::embed::{info_embed, reply_ephemeral};

use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "dev stats",
    desc: "Runtime statistics for bot developers.",
    category: "developer",
    usage: "/dev stats",
    guards: CommandGuards::developer(),
};

#[poise::command(slash_command, subcommands("stats"), subcommand_required, category = "Developer")]
pub async fn dev(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

#[poise::command(slash_command)]
pub async fn stats(ctx: Context<'_>) -> Result<(), Error> {
    let guild_count = ctx.cache().guilds().len();
    let latency = ctx.ping().await;
    let data = ctx.data();

    let latency_text = if latency.is_zero() {
        "Not measured yet".to_owned()
    } else {
        format!("{}ms", latency.as_millis())
    };

    let description = format!(
        "**Guilds :** {}\n\
         **Shard Latency :** {}\n\
         **Cache Backend :** {}\n\
         **Roblox API :** {}\n\
         **Tracked Cooldowns :** {}",
        guild_count,
        latency_text,
        data.db.cache().backend_name(),
        if data.roblox.is_some() { "Enabled" } else { "Disabled" },
        data.cooldowns.len(),
    );

    reply_ephemeral(ctx, info_embed("Developer Stats", description)).await?;
    Ok(())
}
