use tracing::info;

use crate::CommandMeta;
use crate::common::require_guild;
use crate::records::choices::IncidentStatusChoice;
use crate::records::embeds::incident_embed;
use crate::records::record_not_found;
use lapd_core::guard::CommandGuards;
use lapd_core::{Context, Error};
use lapd_database::impls::incidents::update_incident_status;
use lapd_database::model::records::{IncidentStatus, RecordKind};
use lapd_utils::embed::reply_embed;

pub const META: CommandMeta = CommandMeta {
    name: "records incident-status",
    desc: "Update the status of an incident report.",
    category: "records",
    usage: "/records incident-status <number> <status>",
    guards: CommandGuards::staff().cooldown_secs(3),
};

#[poise::command(slash_command, rename = "incident-status")]
pub async fn incident_status(
    ctx: Context<'_>,
    #[description = "Incident number"]
    #[min = 1]
    number: u64,
    #[description = "New status"] status: IncidentStatusChoice,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let status = IncidentStatus::from(status);

    let incident = update_incident_status(&ctx.data().db, guild_id.get(), number, status)
        .await?
        .ok_or_else(|| record_not_found(RecordKind::Incident, number))?;
    info!(
        guild_id = guild_id.get(),
        incident_number = number,
        status = status.as_str(),
        updated_by = ctx.author().id.get(),
        "incident status updated"
    );

    reply_embed(ctx, incident_embed(&incident)).await?;
    Ok(())
}
