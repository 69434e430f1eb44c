use poise::serenity_prelude as serenity;

use crate::CommandMeta;
use crate::common::{display_name, require_guild};
use crate::duty::embeds::totals_description;
use crate::duty::shift_type_filter;
use lapd_core::guard::CommandGuards;
use lapd_core::{Context, Error};
use lapd_database::impls::now_unix_millis;
use lapd_database::impls::shifts::list_member_shifts;
use lapd_database::model::shifts::ShiftTotals;
use lapd_utils::embed::{info_embed, reply_embed};

pub const META: CommandMeta = CommandMeta {
    name: "duty stats",
    desc: "Show shift totals and averages for a member.",
    category: "duty",
    usage: "/duty stats [member] [type]",
    guards: CommandGuards::staff().cooldown_secs(5),
};

#[poise::command(slash_command)]
pub async fn stats(
    ctx: Context<'_>,
    #[description = "Member to look up (defaults to you)"] member: Option<serenity::User>,
    #[description = "Only count this shift type"]
    #[autocomplete = "crate::duty::autocomplete_shift_type"]
    r#type: Option<String>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let user = member.as_ref().unwrap_or_else(|| ctx.author());
    let filter = shift_type_filter(ctx, guild_id.get(), r#type.as_deref()).await?;

    let shifts = list_member_shifts(
        &ctx.data().db,
        guild_id.get(),
        user.id.get(),
        filter.as_deref(),
    )
    .await?;
    let totals = ShiftTotals::from_shifts(&shifts, now_unix_millis());

    let title = match filter {
        Some(name) => format!("Shift Stats: {} ({})", display_name(user), name),
        None => format!("Shift Stats: {}", display_name(user)),
    };
    let embed = info_embed(&title, totals_description(&totals)).thumbnail(user.face());
    reply_embed(ctx, embed).await?;
    Ok(())
}
