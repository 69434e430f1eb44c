use crate::CommandMeta;
use crate::common::require_guild;
use crate::duty::embeds::leaderboard_line;
use crate::duty::shift_type_filter;
use lapd_core::guard::CommandGuards;
use lapd_core::{Context, Error};
use lapd_database::impls::now_unix_millis;
use lapd_database::impls::shifts::shift_leaderboard;
use lapd_utils::embed::{info_embed, reply_ephemeral};
use lapd_utils::formatting::chunk_lines;
use lapd_utils::pagination::{LINES_PER_PAGE, paginate_embed_pages};

pub const META: CommandMeta = CommandMeta {
    name: "duty leaderboard",
    desc: "Rank members by total time on duty.",
    category: "duty",
    usage: "/duty leaderboard [type]",
    guards: CommandGuards::staff().cooldown_secs(10),
};

#[poise::command(slash_command)]
pub async fn leaderboard(
    ctx: Context<'_>,
    #[description = "Only count this shift type"]
    #[autocomplete = "crate::duty::autocomplete_shift_type"]
    r#type: Option<String>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let filter = shift_type_filter(ctx, guild_id.get(), r#type.as_deref()).await?;
    ctx.defer().await?;

    let entries = shift_leaderboard(
        &ctx.data().db,
        guild_id.get(),
        filter.as_deref(),
        now_unix_millis(),
    )
    .await?;
    if entries.is_empty() {
        reply_ephemeral(
            ctx,
            info_embed("Shift Leaderboard", "No shifts have been logged yet."),
        )
        .await?;
        return Ok(());
    }

    let lines = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| leaderboard_line(index + 1, entry))
        .collect::<Vec<_>>();
    let title = match filter {
        Some(name) => format!("Shift Leaderboard: {}", name),
        None => "Shift Leaderboard".to_owned(),
    };
    paginate_embed_pages(ctx, &title, &chunk_lines(&lines, LINES_PER_PAGE), 1).await?;
    Ok(())
}
