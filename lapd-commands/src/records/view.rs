use crate::CommandMeta;
use crate::common::require_guild;
use crate::records::embeds::{arrest_embed, citation_embed, incident_embed};
use crate::records::record_not_found;
use lapd_core::guard::CommandGuards;
use lapd_core::{Context, Error};
use lapd_database::impls::arrests::get_arrest;
use lapd_database::impls::citations::get_citation;
use lapd_database::impls::incidents::get_incident;
use lapd_database::model::records::RecordKind;
use lapd_utils::embed::reply_embed;

pub const ARREST_META: CommandMeta = CommandMeta {
    name: "records arrest",
    desc: "View a booking report by number.",
    category: "records",
    usage: "/records arrest <number>",
    guards: CommandGuards::staff().cooldown_secs(3),
};

pub const CITATION_META: CommandMeta = CommandMeta {
    name: "records citation",
    desc: "View a citation by number.",
    category: "records",
    usage: "/records citation <number>",
    guards: CommandGuards::staff().cooldown_secs(3),
};

pub const INCIDENT_META: CommandMeta = CommandMeta {
    name: "records incident",
    desc: "View an incident report by number.",
    category: "records",
    usage: "/records incident <number>",
    guards: CommandGuards::staff().cooldown_secs(3),
};

#[poise::command(slash_command, rename = "arrest")]
pub async fn view_arrest(
    ctx: Context<'_>,
    #[description = "Booking number"]
    #[min = 1]
    number: u64,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let arrest = get_arrest(&ctx.data().db, guild_id.get(), number)
        .await?
        .ok_or_else(|| record_not_found(RecordKind::Arrest, number))?;

    reply_embed(ctx, arrest_embed(&arrest)).await?;
    Ok(())
}

#[poise::command(slash_command, rename = "citation")]
pub async fn view_citation(
    ctx: Context<'_>,
    #[description = "Citation number"]
    #[min = 1]
    number: u64,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let citation = get_citation(&ctx.data().db, guild_id.get(), number)
        .await?
        .ok_or_else(|| record_not_found(RecordKind::Citation, number))?;

    reply_embed(ctx, citation_embed(&citation)).await?;
    Ok(())
}

#[poise::command(slash_command, rename = "incident")]
pub async fn view_incident(
    ctx: Context<'_>,
    #[description = "Incident number"]
    #[min = 1]
    number: u64,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let incident = get_incident(&ctx.data().db, guild_id.get(), number)
        .await?
        .ok_or_else(|| record_not_found(RecordKind::Incident, number))?;

    reply_embed(ctx, incident_embed(&incident)).await?;
    Ok(())
}
