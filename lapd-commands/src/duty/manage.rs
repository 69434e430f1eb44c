use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::{debug, info, warn};

use crate::CommandMeta;
use crate::common::{display_name, member_role_ids, require_guild};
use crate::duty::embeds::{panel_buttons, panel_embed, shift_log_embed};
use crate::duty::pick_shift_type;
use crate::duty::roles::sync_duty_roles;
use lapd_core::error::classify;
use lapd_core::guard::CommandGuards;
use lapd_core::{Context, Error};
use lapd_database::impls::guild_settings::get_guild_settings;
use lapd_database::impls::now_unix_millis;
use lapd_database::impls::shifts::{
    end_break, end_shift, get_active_shift, list_member_shifts, start_break, start_shift,
};
use lapd_database::model::guild_settings::{LogChannel, ShiftType};
use lapd_database::model::shifts::{DutyStatus, Shift, ShiftTotals};
use lapd_utils::delivery::post_log_embed;
use lapd_utils::embed::error_embed;

pub const META: CommandMeta = CommandMeta {
    name: "duty manage",
    desc: "Open your duty panel to start, break, or end a shift.",
    category: "duty",
    usage: "/duty manage [type]",
    guards: CommandGuards::staff().cooldown_secs(3),
};

const PANEL_TIMEOUT_SECS: u64 = 5 * 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PanelAction {
    Start,
    ToggleBreak,
    End,
}

struct PanelIds {
    start: String,
    toggle_break: String,
    end: String,
}

impl PanelIds {
    fn new(ctx_id: u64) -> Self {
        Self {
            start: format!("{}_duty_start", ctx_id),
            toggle_break: format!("{}_duty_break", ctx_id),
            end: format!("{}_duty_end", ctx_id),
        }
    }

    fn action(&self, custom_id: &str) -> Option<PanelAction> {
        if custom_id == self.start {
            Some(PanelAction::Start)
        } else if custom_id == self.toggle_break {
            Some(PanelAction::ToggleBreak)
        } else if custom_id == self.end {
            Some(PanelAction::End)
        } else {
            None
        }
    }

    fn buttons(&self, status: DutyStatus, disabled: bool) -> Vec<serenity::CreateActionRow> {
        panel_buttons(status, &self.start, &self.toggle_break, &self.end, disabled)
    }
}

struct PanelState {
    active: Option<Shift>,
    totals: ShiftTotals,
    now_ms: u64,
}

impl PanelState {
    fn status(&self) -> DutyStatus {
        self.active.as_ref().map_or(DutyStatus::OffDuty, Shift::status)
    }
}

#[poise::command(slash_command)]
pub async fn manage(
    ctx: Context<'_>,
    #[description = "Shift type"]
    #[autocomplete = "crate::duty::autocomplete_shift_type"]
    r#type: Option<String>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let user_id = ctx.author().id.get();
    let shift_type = pick_shift_type(ctx, guild_id.get(), r#type.as_deref()).await?;
    let name = display_name(ctx.author());
    let ids = PanelIds::new(ctx.id());

    let state = load_state(ctx, guild_id.get(), user_id, &shift_type.name).await?;
    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(panel_embed(
                    &name,
                    &shift_type.name,
                    state.active.as_ref(),
                    &state.totals,
                    state.now_ms,
                ))
                .components(ids.buttons(state.status(), false)),
        )
        .await?;
    let message = reply.message().await?.into_owned();

    let mut last_status = state.status();
    while let Some(interaction) = message
        .await_component_interaction(ctx)
        .author_id(ctx.author().id)
        .timeout(Duration::from_secs(PANEL_TIMEOUT_SECS))
        .await
    {
        let Some(action) = ids.action(&interaction.data.custom_id) else {
            debug!(custom_id = %interaction.data.custom_id, "unknown duty panel button");
            let (title, text) = unknown_button();
            respond_with_error(ctx, &interaction, title, text).await;
            continue;
        };

        let outcome = async {
            let notice = apply_action(ctx, guild_id, &shift_type, action).await?;
            let state = load_state(ctx, guild_id.get(), user_id, &shift_type.name).await?;
            Ok::<_, Error>((notice, state))
        }
        .await;
        let (notice, state) = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    ?err,
                    guild_id = guild_id.get(),
                    user_id,
                    ?action,
                    "duty panel action failed"
                );
                let (title, text) = action_failure(&err);
                respond_with_error(ctx, &interaction, title, text).await;
                continue;
            }
        };
        last_status = state.status();

        let update = serenity::CreateInteractionResponseMessage::new()
            .content(notice.unwrap_or_default())
            .embed(panel_embed(
                &name,
                &shift_type.name,
                state.active.as_ref(),
                &state.totals,
                state.now_ms,
            ))
            .components(ids.buttons(last_status, false));

        interaction
            .create_response(ctx.http(), serenity::CreateInteractionResponse::UpdateMessage(update))
            .await?;
    }

    reply
        .edit(
            ctx,
            poise::CreateReply::default().components(ids.buttons(last_status, true)),
        )
        .await?;
    Ok(())
}

fn unknown_button() -> (&'static str, String) {
    ("Unknown Button", "That button does not belong to this duty panel.".to_owned())
}

/// Recoverable errors keep their own wording; anything else gets a generic note.
fn action_failure(error: &Error) -> (&'static str, String) {
    match classify(error) {
        Some(app_error) if !app_error.is_fatal() => (app_error.title(), app_error.to_string()),
        _ => (
            "Panel Error",
            "Something went wrong while updating your shift. Try again.".to_owned(),
        ),
    }
}

async fn respond_with_error(
    ctx: Context<'_>,
    interaction: &serenity::ComponentInteraction,
    title: &str,
    message: String,
) {
    let response = serenity::CreateInteractionResponse::Message(
        serenity::CreateInteractionResponseMessage::new()
            .ephemeral(true)
            .embed(error_embed(title, message)),
    );
    if let Err(err) = interaction.create_response(ctx.http(), response).await {
        debug!(?err, "failed to answer duty panel interaction");
    }
}

async fn load_state(
    ctx: Context<'_>,
    guild_id: u64,
    user_id: u64,
    shift_type: &str,
) -> Result<PanelState, Error> {
    let db = &ctx.data().db;
    let now_ms = now_unix_millis();
    let active = get_active_shift(db, guild_id, user_id).await?;
    let shifts = list_member_shifts(db, guild_id, user_id, Some(shift_type)).await?;

    Ok(PanelState {
        active,
        totals: ShiftTotals::from_shifts(&shifts, now_ms),
        now_ms,
    })
}

/// Run one panel button. Returns a short note when the action was refused.
async fn apply_action(
    ctx: Context<'_>,
    guild_id: serenity::GuildId,
    shift_type: &ShiftType,
    action: PanelAction,
) -> Result<Option<String>, Error> {
    let db = &ctx.data().db;
    let user_id = ctx.author().id.get();
    let settings = get_guild_settings(db, guild_id.get()).await?;
    let now_ms = now_unix_millis();
    let active = get_active_shift(db, guild_id.get(), user_id).await?;

    match (action, active) {
        (PanelAction::Start, Some(_)) => Ok(Some("You already have an active shift.".to_owned())),
        (PanelAction::Start, None) => {
            let role_ids = member_role_ids(ctx, guild_id, ctx.author().id).await?;
            if !shift_type.permits(&role_ids) {
                return Ok(Some(format!(
                    "You do not have a role permitted to work `{}` shifts.",
                    shift_type.name
                )));
            }

            if start_shift(db, guild_id.get(), user_id, &shift_type.name, now_ms)
                .await?
                .is_none()
            {
                return Ok(Some("You already have an active shift.".to_owned()));
            }

            info!(
                guild_id = guild_id.get(),
                user_id,
                shift_type = %shift_type.name,
                "shift started"
            );
            sync_duty_roles(ctx.http(), &settings, user_id, DutyStatus::OnDuty).await;
            Ok(None)
        }
        (_, None) => Ok(Some("You are not on duty.".to_owned())),
        (PanelAction::ToggleBreak, Some(shift)) => {
            let (changed, status) = if shift.open_break().is_some() {
                (end_break(db, shift.id, now_ms).await?, DutyStatus::OnDuty)
            } else {
                (start_break(db, shift.id, now_ms).await?, DutyStatus::OnBreak)
            };

            if !changed {
                return Ok(Some("Your shift changed while you were looking. Try again.".to_owned()));
            }
            sync_duty_roles(ctx.http(), &settings, user_id, status).await;
            Ok(None)
        }
        (PanelAction::End, Some(shift)) => {
            let Some(ended) = end_shift(db, shift.id, now_ms).await? else {
                return Ok(Some("That shift has already ended.".to_owned()));
            };

            info!(guild_id = guild_id.get(), user_id, shift_id = ended.id, "shift ended");
            sync_duty_roles(ctx.http(), &settings, user_id, DutyStatus::OffDuty).await;
            post_log_embed(
                ctx.http(),
                settings.log_channel(LogChannel::Shift),
                None,
                shift_log_embed(&ended, None),
            )
            .await;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PanelAction, PanelIds, action_failure, unknown_button};
    use lapd_core::error::AppError;

    #[test]
    fn panel_ids_map_to_actions() {
        let ids = PanelIds::new(99);
        assert_eq!(ids.action("99_duty_start"), Some(PanelAction::Start));
        assert_eq!(ids.action("99_duty_break"), Some(PanelAction::ToggleBreak));
        assert_eq!(ids.action("99_duty_end"), Some(PanelAction::End));
        assert_eq!(ids.action("98_duty_end"), None);
    }

    #[test]
    fn failed_actions_explain_themselves() {
        let (title, message) = action_failure(&AppError::conflict("Shift already ended.").into());
        assert_eq!(title, "Conflict");
        assert_eq!(message, "Shift already ended.");

        let (title, message) = action_failure(&anyhow::anyhow!("pool timed out"));
        assert_eq!(title, "Panel Error");
        assert!(!message.contains("pool"));

        let (title, _) = action_failure(&AppError::Database("refused".to_owned()).into());
        assert_eq!(title, "Panel Error");

        assert_eq!(unknown_button().0, "Unknown Button");
    }
}
