use poise::ChoiceParameter;
use tracing::info;

use crate::CommandMeta;
use crate::common::require_guild;
use crate::records::choices::{AgeGroup, Gender};
use crate::records::embeds::arrest_embed;
use crate::records::{list_error, publish_report, resolve_subject};
use lapd_core::guard::CommandGuards;
use lapd_core::{AppError, Context, Error};
use lapd_database::impls::arrests::create_arrest;
use lapd_database::model::records::{NewArrest, RecordKind};
use lapd_utils::parse::{OFFENCE_LIST_LIMITS, parse_height, parse_list, parse_user_ids};

pub const META: CommandMeta = CommandMeta {
    name: "log arrest",
    desc: "File a booking report for an arrest.",
    category: "records",
    usage: "/log arrest <username> <charges> [age_group] [gender] [height] [weight] [assisting] [notes]",
    guards: CommandGuards::staff().cooldown_secs(10),
};

const MAX_NOTES_LEN: usize = 1_000;
const MAX_ASSISTING: usize = 10;

#[poise::command(slash_command)]
pub async fn arrest(
    ctx: Context<'_>,
    #[description = "Roblox username of the suspect"] username: String,
    #[description = "Charges, separated by commas"] charges: String,
    #[description = "Suspect age group"] age_group: Option<AgeGroup>,
    #[description = "Suspect gender"] gender: Option<Gender>,
    #[description = "Suspect height, e.g. 5'10"] height: Option<String>,
    #[description = "Suspect weight in pounds"]
    #[min = 50]
    #[max = 600]
    weight: Option<u32>,
    #[description = "Assisting officers (mentions)"] assisting: Option<String>,
    #[description = "Additional notes"] notes: Option<String>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let officer_id = ctx.author().id.get();

    let charges = parse_list(&charges, OFFENCE_LIST_LIMITS).map_err(|e| list_error(e, "charge"))?;
    let height = match height.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => Some(parse_height(raw).ok_or_else(|| {
            AppError::validation("Height must look like `5'10` (3 to 8 feet).")
        })?),
        None => None,
    };
    let assisting = assisting
        .as_deref()
        .map(parse_user_ids)
        .unwrap_or_default()
        .into_iter()
        .filter(|id| *id != officer_id)
        .collect::<Vec<_>>();
    if assisting.len() > MAX_ASSISTING {
        return Err(AppError::validation(format!(
            "At most {} assisting officers can be listed.",
            MAX_ASSISTING
        ))
        .into());
    }
    let notes = notes.as_deref().map(str::trim).filter(|notes| !notes.is_empty());
    if notes.is_some_and(|notes| notes.chars().count() > MAX_NOTES_LEN) {
        return Err(AppError::validation(format!(
            "Notes are limited to {} characters.",
            MAX_NOTES_LEN
        ))
        .into());
    }

    ctx.defer().await?;
    let subject = resolve_subject(ctx, &username).await?;

    let arrest = create_arrest(
        &ctx.data().db,
        NewArrest {
            guild_id: guild_id.get(),
            arrestee_roblox_id: subject.roblox_id,
            arrestee_username: &subject.username,
            charges: &charges,
            age_group: age_group.map(|choice| choice.name()),
            gender: gender.map(|choice| choice.name()),
            height: height.as_deref(),
            weight,
            notes,
            arresting_officer_id: officer_id,
            assisting_officer_ids: &assisting,
        },
    )
    .await?;
    info!(
        guild_id = guild_id.get(),
        officer_id,
        booking_number = arrest.booking_number,
        "arrest logged"
    );

    let mut embed = arrest_embed(&arrest);
    if let Some(url) = subject.headshot_url {
        embed = embed.thumbnail(url);
    }
    publish_report(ctx, guild_id.get(), RecordKind::Arrest, embed).await
}
