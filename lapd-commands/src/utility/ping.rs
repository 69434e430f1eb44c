use std::time::Instant;

use lapd_core::guard::CommandGuards;
use lapd_core::{Context, Error};

use crate::CommandMeta;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Check that the bot is responsive.",
    category: "utility",
    usage: "/ping",
    guards: CommandGuards::everyone().anywhere(),
};

#[poise::command(prefix_command, slash_command, category = "Utility")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let started = Instant::now();
    let reply = ctx.say("Pong!").await?;
    let round_trip = started.elapsed().as_millis();

    reply
        .edit(
            ctx,
            poise::CreateReply::default().content(format!("Pong! `{}ms`", round_trip)),
        )
        .await?;
    Ok(())
}
