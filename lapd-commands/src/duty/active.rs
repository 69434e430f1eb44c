use crate::CommandMeta;
use crate::common::require_guild;
use crate::duty::embeds::active_line;
use crate::duty::shift_type_filter;
use lapd_core::guard::CommandGuards;
use lapd_core::{Context, Error};
use lapd_database::impls::now_unix_millis;
use lapd_database::impls::shifts::list_active_shifts;
use lapd_utils::embed::{info_embed, reply_ephemeral};
use lapd_utils::formatting::chunk_lines;
use lapd_utils::pagination::{LINES_PER_PAGE, paginate_embed_pages};

pub const META: CommandMeta = CommandMeta {
    name: "duty active",
    desc: "List members currently on duty or on break.",
    category: "duty",
    usage: "/duty active [type]",
    guards: CommandGuards::staff().cooldown_secs(5),
};

#[poise::command(slash_command)]
pub async fn active(
    ctx: Context<'_>,
    #[description = "Only show this shift type"]
    #[autocomplete = "crate::duty::autocomplete_shift_type"]
    r#type: Option<String>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let filter = shift_type_filter(ctx, guild_id.get(), r#type.as_deref()).await?;
    let shifts = list_active_shifts(&ctx.data().db, guild_id.get(), filter.as_deref()).await?;

    if shifts.is_empty() {
        reply_ephemeral(ctx, info_embed("Active Shifts", "Nobody is on duty right now.")).await?;
        return Ok(());
    }

    let now_ms = now_unix_millis();
    let lines = shifts
        .iter()
        .map(|shift| active_line(shift, now_ms))
        .collect::<Vec<_>>();
    let title = format!("Active Shifts ({})", shifts.len());
    paginate_embed_pages(ctx, &title, &chunk_lines(&lines, LINES_PER_PAGE), 1).await?;
    Ok(())
}
