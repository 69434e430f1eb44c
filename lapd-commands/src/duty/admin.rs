use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::info;

use crate::CommandMeta;
use crate::common::{display_name, require_guild};
use crate::duty::embeds::{history_line, shift_log_embed, totals_description};
use crate::duty::roles::sync_duty_roles;
use crate::duty::shift_type_filter;
use lapd_core::guard::CommandGuards;
use lapd_core::{Context, Error};
use lapd_database::impls::guild_settings::get_guild_settings;
use lapd_database::impls::now_unix_millis;
use lapd_database::impls::shifts::{
    end_shift, get_active_shift, list_member_shifts, wipe_member_shifts,
};
use lapd_database::model::guild_settings::LogChannel;
use lapd_database::model::shifts::{DutyStatus, ShiftTotals};
use lapd_utils::confirmation::confirm_destructive;
use lapd_utils::delivery::post_log_embed;
use lapd_utils::embed::{info_embed, reply_ephemeral, success_embed, warning_embed};
use lapd_utils::formatting::bullet_list;

pub const META: CommandMeta = CommandMeta {
    name: "duty admin",
    desc: "Review a member's shifts, force-end their shift, or wipe their history.",
    category: "duty",
    usage: "/duty admin <member> [type]",
    guards: CommandGuards::management().cooldown_secs(3),
};

const RECENT_SHIFTS: usize = 5;
const ADMIN_PANEL_TIMEOUT_SECS: u64 = 2 * 60;

#[poise::command(slash_command)]
pub async fn admin(
    ctx: Context<'_>,
    #[description = "Member to manage"] member: serenity::User,
    #[description = "Only this shift type"]
    #[autocomplete = "crate::duty::autocomplete_shift_type"]
    r#type: Option<String>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let db = &ctx.data().db;
    let filter = shift_type_filter(ctx, guild_id.get(), r#type.as_deref()).await?;
    let now_ms = now_unix_millis();

    let shifts =
        list_member_shifts(db, guild_id.get(), member.id.get(), filter.as_deref()).await?;
    let totals = ShiftTotals::from_shifts(&shifts, now_ms);
    let active = get_active_shift(db, guild_id.get(), member.id.get()).await?;
    let recent = shifts
        .iter()
        .take(RECENT_SHIFTS)
        .map(|shift| history_line(shift, now_ms))
        .collect::<Vec<_>>();

    let scope = filter.as_deref().unwrap_or("All Types");
    let embed = info_embed(
        &format!("Duty Admin: {} ({})", display_name(&member), scope),
        totals_description(&totals),
    )
    .field(
        "Status",
        active.as_ref().map_or(DutyStatus::OffDuty, |shift| shift.status()).label(),
        true,
    )
    .field("Recent Shifts", bullet_list(&recent, "No shifts logged."), false)
    .thumbnail(member.face());

    let end_id = format!("{}_admin_end", ctx.id());
    let wipe_id = format!("{}_admin_wipe", ctx.id());
    let buttons = |disabled: bool| {
        vec![serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new(&end_id)
                .label("End Shift")
                .style(serenity::ButtonStyle::Primary)
                .disabled(disabled || active.is_none()),
            serenity::CreateButton::new(&wipe_id)
                .label("Wipe Shifts")
                .style(serenity::ButtonStyle::Danger)
                .disabled(disabled || shifts.is_empty()),
        ])]
    };

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(embed)
                .components(buttons(false))
                .ephemeral(true),
        )
        .await?;
    let message = reply.message().await?.into_owned();

    let interaction = message
        .await_component_interaction(ctx)
        .author_id(ctx.author().id)
        .timeout(Duration::from_secs(ADMIN_PANEL_TIMEOUT_SECS))
        .await;
    reply
        .edit(ctx, poise::CreateReply::default().components(buttons(true)))
        .await?;

    let Some(interaction) = interaction else {
        return Ok(());
    };
    interaction
        .create_response(ctx.http(), serenity::CreateInteractionResponse::Acknowledge)
        .await?;

    let settings = get_guild_settings(db, guild_id.get()).await?;
    if interaction.data.custom_id == end_id {
        let Some(shift) = active else {
            return Ok(());
        };
        let Some(ended) = end_shift(db, shift.id, now_unix_millis()).await? else {
            reply_ephemeral(
                ctx,
                warning_embed(
                    "Shift Already Ended",
                    "That shift ended before you pressed the button.",
                ),
            )
            .await?;
            return Ok(());
        };

        info!(
            guild_id = guild_id.get(),
            user_id = member.id.get(),
            shift_id = ended.id,
            ended_by = ctx.author().id.get(),
            "shift force-ended"
        );
        sync_duty_roles(ctx.http(), &settings, member.id.get(), DutyStatus::OffDuty).await;
        post_log_embed(
            ctx.http(),
            settings.log_channel(LogChannel::Shift),
            None,
            shift_log_embed(&ended, Some(ctx.author().id.get())),
        )
        .await;

        reply_ephemeral(
            ctx,
            success_embed(
                "Shift Ended",
                format!("Ended the active shift of <@{}>.", member.id.get()),
            ),
        )
        .await?;
    } else if interaction.data.custom_id == wipe_id {
        let prompt = warning_embed(
            "Wipe Shifts",
            format!("Delete every {} shift of <@{}>?", scope, member.id.get()),
        );
        if !confirm_destructive(ctx, prompt, "Wiping shifts...").await? {
            return Ok(());
        }

        let deleted =
            wipe_member_shifts(db, guild_id.get(), member.id.get(), filter.as_deref()).await?;
        info!(
            guild_id = guild_id.get(),
            user_id = member.id.get(),
            deleted,
            wiped_by = ctx.author().id.get(),
            "shifts wiped"
        );
        if get_active_shift(db, guild_id.get(), member.id.get()).await?.is_none() {
            sync_duty_roles(ctx.http(), &settings, member.id.get(), DutyStatus::OffDuty).await;
        }

        reply_ephemeral(
            ctx,
            success_embed(
                "Shifts Wiped",
                format!("Deleted {} shifts of <@{}>.", deleted, member.id.get()),
            ),
        )
        .await?;
    }

    Ok(())
}
