use tracing::info;

use crate::CommandMeta;
use crate::common::require_guild;
use crate::records::choices::{IncidentStatusChoice, IncidentTypeChoice};
use crate::records::embeds::incident_embed;
use crate::records::{list_error, publish_report};
use lapd_core::guard::CommandGuards;
use lapd_core::{AppError, Context, Error};
use lapd_database::impls::incidents::create_incident;
use lapd_database::model::records::{IncidentStatus, NewIncident, RecordKind};
use lapd_utils::parse::{NAME_LIST_LIMITS, parse_optional_list, parse_user_ids};

pub const META: CommandMeta = CommandMeta {
    name: "log incident",
    desc: "File an incident report.",
    category: "records",
    usage: "/log incident <type> <location> <description> [status] [suspects] [victims] [witnesses] [officers]",
    guards: CommandGuards::staff().cooldown_secs(10),
};

const MAX_LOCATION_LEN: usize = 100;
const MIN_DESCRIPTION_LEN: usize = 10;
const MAX_DESCRIPTION_LEN: usize = 2_000;

#[poise::command(slash_command)]
pub async fn incident(
    ctx: Context<'_>,
    #[description = "Incident type"] r#type: IncidentTypeChoice,
    #[description = "Where it happened"] location: String,
    #[description = "What happened"] description: String,
    #[description = "Initial status (defaults to Active)"] status: Option<IncidentStatusChoice>,
    #[description = "Suspects, separated by commas"] suspects: Option<String>,
    #[description = "Victims, separated by commas"] victims: Option<String>,
    #[description = "Witnesses, separated by commas"] witnesses: Option<String>,
    #[description = "Other officers involved (mentions)"] officers: Option<String>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let reporter_id = ctx.author().id.get();

    let location = location.trim();
    if location.is_empty() || location.chars().count() > MAX_LOCATION_LEN {
        return Err(AppError::validation(format!(
            "The location must be 1 to {} characters long.",
            MAX_LOCATION_LEN
        ))
        .into());
    }
    let description = description.trim();
    let description_len = description.chars().count();
    if !(MIN_DESCRIPTION_LEN..=MAX_DESCRIPTION_LEN).contains(&description_len) {
        return Err(AppError::validation(format!(
            "The description must be {} to {} characters long.",
            MIN_DESCRIPTION_LEN, MAX_DESCRIPTION_LEN
        ))
        .into());
    }

    let suspects = parse_optional_list(suspects.as_deref(), NAME_LIST_LIMITS)
        .map_err(|e| list_error(e, "suspect"))?;
    let victims = parse_optional_list(victims.as_deref(), NAME_LIST_LIMITS)
        .map_err(|e| list_error(e, "victim"))?;
    let witnesses = parse_optional_list(witnesses.as_deref(), NAME_LIST_LIMITS)
        .map_err(|e| list_error(e, "witness"))?;

    let mut officer_ids = vec![reporter_id];
    for officer_id in officers.as_deref().map(parse_user_ids).unwrap_or_default() {
        if !officer_ids.contains(&officer_id) {
            officer_ids.push(officer_id);
        }
    }

    let incident = create_incident(
        &ctx.data().db,
        NewIncident {
            guild_id: guild_id.get(),
            incident_type: r#type.into(),
            status: status.map_or(IncidentStatus::Active, IncidentStatus::from),
            location,
            description,
            suspects: &suspects,
            victims: &victims,
            witnesses: &witnesses,
            officer_ids: &officer_ids,
            reporter_id,
        },
    )
    .await?;
    info!(
        guild_id = guild_id.get(),
        reporter_id,
        incident_number = incident.incident_number,
        "incident logged"
    );

    publish_report(ctx, guild_id.get(), RecordKind::Incident, incident_embed(&incident)).await
}
