use tracing::info;

use crate::CommandMeta;
use crate::common::require_guild;
use crate::records::choices::CitationChoice;
use crate::records::embeds::citation_embed;
use crate::records::{list_error, publish_report, resolve_subject};
use lapd_core::guard::CommandGuards;
use lapd_core::{AppError, Context, Error};
use lapd_database::impls::citations::create_citation;
use lapd_database::model::records::{CitationType, MAX_FINE_AMOUNT, NewCitation, RecordKind};
use lapd_utils::parse::{OFFENCE_LIST_LIMITS, parse_license_plate, parse_list};

pub const META: CommandMeta = CommandMeta {
    name: "log citation",
    desc: "Issue a fine or a written warning.",
    category: "records",
    usage: "/log citation <type> <username> <violations> <plate> <vehicle> <location> [color] [amount]",
    guards: CommandGuards::staff().cooldown_secs(10),
};

const MAX_TEXT_LEN: usize = 100;

/// Fines carry an amount; warnings never do.
fn check_fine(
    citation_type: CitationType,
    amount: Option<u32>,
) -> Result<Option<u32>, &'static str> {
    match (citation_type, amount) {
        (CitationType::Fine, None) => Err("Fines need an `amount`."),
        (CitationType::Fine, Some(0)) => Err("Fine amounts must be greater than zero."),
        (CitationType::Fine, Some(amount)) if amount > MAX_FINE_AMOUNT => {
            Err("That fine exceeds the maximum allowed amount.")
        }
        (CitationType::Fine, Some(amount)) => Ok(Some(amount)),
        (CitationType::Warning, Some(_)) => Err("Warnings cannot carry a fine amount."),
        (CitationType::Warning, None) => Ok(None),
    }
}

fn required_text<'a>(raw: &'a str, what: &str) -> Result<&'a str, Error> {
    let value = raw.trim();
    if value.is_empty() || value.chars().count() > MAX_TEXT_LEN {
        return Err(AppError::validation(format!(
            "The {} must be 1 to {} characters long.",
            what,
            MAX_TEXT_LEN
        ))
        .into());
    }
    Ok(value)
}

#[poise::command(slash_command)]
pub async fn citation(
    ctx: Context<'_>,
    #[description = "Fine or warning"] r#type: CitationChoice,
    #[description = "Roblox username of the violator"] username: String,
    #[description = "Violations, separated by commas"] violations: String,
    #[description = "License plate"] plate: String,
    #[description = "Vehicle model"] vehicle: String,
    #[description = "Where the stop happened"] location: String,
    #[description = "Vehicle color"] color: Option<String>,
    #[description = "Fine amount in dollars"] amount: Option<u32>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx)?;
    let officer_id = ctx.author().id.get();
    let citation_type = CitationType::from(r#type);

    let fine_amount = check_fine(citation_type, amount).map_err(AppError::validation)?;
    let violations =
        parse_list(&violations, OFFENCE_LIST_LIMITS).map_err(|e| list_error(e, "violation"))?;
    let plate = parse_license_plate(&plate)
        .ok_or_else(|| {
            AppError::validation("License plates are 1 to 8 letters, digits or dashes.")
        })?;
    let vehicle = required_text(&vehicle, "vehicle model")?;
    let location = required_text(&location, "location")?;
    let color = match color.as_deref().map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => Some(required_text(raw, "vehicle color")?),
        None => None,
    };

    ctx.defer().await?;
    let subject = resolve_subject(ctx, &username).await?;

    let citation = create_citation(
        &ctx.data().db,
        NewCitation {
            guild_id: guild_id.get(),
            citation_type,
            violator_roblox_id: subject.roblox_id,
            violator_username: &subject.username,
            violations: &violations,
            fine_amount,
            vehicle_model: vehicle,
            vehicle_color: color,
            license_plate: &plate,
            location,
            issuing_officer_id: officer_id,
        },
    )
    .await?;
    info!(
        guild_id = guild_id.get(),
        officer_id,
        citation_number = citation.citation_number,
        "citation logged"
    );

    let mut embed = citation_embed(&citation);
    if let Some(url) = subject.headshot_url {
        embed = embed.thumbnail(url);
    }
    publish_report(ctx, guild_id.get(), RecordKind::Citation, embed).await
}

#[cfg(test)]
mod tests {
    use lapd_database::model::records::{CitationType, MAX_FINE_AMOUNT};

    use super::check_fine;

    #[test]
    fn fine_amount_rules() {
        assert_eq!(check_fine(CitationType::Fine, Some(250)), Ok(Some(250)));
        assert!(check_fine(CitationType::Fine, None).is_err());
        assert!(check_fine(CitationType::Fine, Some(0)).is_err());
        assert!(check_fine(CitationType::Fine, Some(MAX_FINE_AMOUNT + 1)).is_err());
        assert_eq!(check_fine(CitationType::Warning, None), Ok(None));
        assert!(check_fine(CitationType::Warning, Some(10)).is_err());
    }
}
