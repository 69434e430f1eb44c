mod choices;
mod delete;
mod embeds;
mod incident_status;
mod log_arrest;
mod log_citation;
mod log_incident;
mod search;
mod view;

pub use delete::META as DELETE_META;
pub use incident_status::META as INCIDENT_STATUS_META;
pub use log_arrest::META as LOG_ARREST_META;
pub use log_citation::META as LOG_CITATION_META;
pub use log_incident::META as LOG_INCIDENT_META;
pub use search::META as SEARCH_META;
pub use view::{
    ARREST_META as VIEW_ARREST_META, CITATION_META as VIEW_CITATION_META,
    INCIDENT_META as VIEW_INCIDENT_META,
};

use self::delete::delete;
use self::incident_status::incident_status;
use self::log_arrest::arrest;
use self::log_citation::citation;
use self::log_incident::incident;
use self::search::search;
use self::view::{view_arrest, view_citation, view_incident};

use tracing::warn;

use lapd_core::{AppError, Context, Error};
use lapd_database::impls::guild_settings::get_guild_settings;
use lapd_database::impls::shifts::credit_active_shift;
use lapd_database::model::guild_settings::LogChannel;
use lapd_database::model::records::RecordKind;
use lapd_utils::delivery::post_log_embed;
use lapd_utils::embed::reply_embed;
use lapd_utils::parse::{ListError, validate_roblox_username};

/// File arrest, citation and incident reports.
#[poise::command(
    slash_command,
    category = "Records",
    subcommands("arrest", "citation", "incident"),
    subcommand_required
)]
pub async fn log(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Look up and maintain filed reports.
#[poise::command(
    slash_command,
    category = "Records",
    subcommands(
        "search",
        "view_arrest",
        "view_citation",
        "view_incident",
        "incident_status",
        "delete"
    ),
    subcommand_required
)]
pub async fn records(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// A Roblox user named on a report.
pub(crate) struct Subject {
    pub username: String,
    pub roblox_id: Option<u64>,
    pub headshot_url: Option<String>,
}

/// Validate a Roblox username and, when the Roblox API is enabled, resolve it
/// to the canonical account.
pub(crate) async fn resolve_subject(ctx: Context<'_>, raw: &str) -> Result<Subject, Error> {
    let username = validate_roblox_username(raw).map_err(AppError::validation)?;
    let Some(roblox) = ctx.data().roblox.as_ref() else {
        return Ok(Subject {
            username: username.to_owned(),
            roblox_id: None,
            headshot_url: None,
        });
    };

    let user = match roblox.user_by_username(username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Err(AppError::validation(format!(
                "No Roblox account is named `{}`.",
                username
            ))
            .into());
        }
        Err(e) => {
            warn!(?e, username, "roblox username lookup failed");
            return Err(AppError::External { service: "Roblox" }.into());
        }
    };

    let headshot_url = match roblox.avatar_headshot(user.id).await {
        Ok(url) => url,
        Err(e) => {
            warn!(?e, roblox_id = user.id, "roblox headshot lookup failed");
            None
        }
    };

    Ok(Subject {
        username: user.name,
        roblox_id: Some(user.id),
        headshot_url,
    })
}

pub(crate) fn list_error(error: ListError, what: &str) -> Error {
    AppError::validation(error.message(what)).into()
}

pub(crate) fn record_not_found(kind: RecordKind, number: u64) -> Error {
    AppError::not_found(format!(
        "No {} numbered {} exists in this server.",
        kind.label().to_ascii_lowercase(),
        number
    ))
    .into()
}

/// Credit the officer's running shift, post the report to the kind's log
/// channel and reply with it.
pub(crate) async fn publish_report(
    ctx: Context<'_>,
    guild_id: u64,
    kind: RecordKind,
    embed: poise::serenity_prelude::CreateEmbed,
) -> Result<(), Error> {
    let db = &ctx.data().db;
    let officer_id = ctx.author().id.get();

    if credit_active_shift(db, guild_id, officer_id, kind).await? {
        tracing::debug!(
            guild_id,
            officer_id,
            kind = kind.label(),
            "record credited to active shift"
        );
    }

    let settings = get_guild_settings(db, guild_id).await?;
    let channel = settings.log_channel(LogChannel::for_record(kind));
    post_log_embed(ctx.http(), channel, None, embed.clone()).await;

    reply_embed(ctx, embed).await?;
    Ok(())
}
