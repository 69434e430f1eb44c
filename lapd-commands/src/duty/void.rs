use tracing::info;

use crate::CommandMeta;
use crate::common::require_guild;
use crate::duty::roles::sync_duty_roles;
use lapd_core::guard::CommandGuards;
use lapd_core::{AppError, Context, Error};
use lapd_database::impls::guild_settings::get_guild_settings;
use lapd_database::impls::shifts::void_active_shift;
use lapd_database::model::shifts::DutyStatus;
use lapd_utils::embed::{reply_ephemeral, success_embed};

pub const META: CommandMeta = CommandMeta {
    name: "duty void",
    desc: "Discard your active shift without logging it.",
    category: "duty",
    usage: "/duty void",
    guards: CommandGuards::staff().cooldown_secs(5),
};

#[poise::command(slash_command)]
pub async fn void(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let user_id = ctx.author().id.get();
    let db = &ctx.data().db;

    if !void_active_shift(db, guild_id.get(), user_id).await? {
        return Err(AppError::not_found("You do not have an active shift to void.").into());
    }

    info!(guild_id = guild_id.get(), user_id, "shift voided");
    let settings = get_guild_settings(db, guild_id.get()).await?;
    sync_duty_roles(ctx.http(), &settings, user_id, DutyStatus::OffDuty).await;

    reply_ephemeral(ctx, success_embed("Shift Voided", "Your active shift was discarded.")).await?;
    Ok(())
}
