use poise::serenity_prelude as serenity;

use crate::common::sanitize;
use lapd_database::model::records::{
    Arrest, Citation, CitationType, Incident, IncidentStatus, RecordKind,
};
use lapd_utils::embed::{
    DEFAULT_EMBED_COLOR, ERROR_EMBED_COLOR, SUCCESS_EMBED_COLOR, WARNING_EMBED_COLOR,
};
use lapd_utils::formatting::{
    bullet_list, discord_timestamp, format_record_label, truncate_chars, user_mention,
    user_mentions,
};

const FIELD_LIMIT: usize = 1_000;

fn roblox_line(username: &str, roblox_id: Option<u64>) -> String {
    match roblox_id {
        Some(id) => format!("[{}](https://www.roblox.com/users/{}/profile)", username, id),
        None => username.to_owned(),
    }
}

fn listed(entries: &[String], fallback: &str) -> String {
    let sanitized = entries.iter().map(|entry| sanitize(entry)).collect::<Vec<_>>();
    truncate_chars(&bullet_list(&sanitized, fallback), FIELD_LIMIT)
}

pub(crate) fn arrest_description(arrest: &Arrest) -> String {
    let mut out = format!(
        "**Suspect :** {}\n**Arresting Officer :** {}",
        roblox_line(&arrest.arrestee_username, arrest.arrestee_roblox_id),
        user_mention(arrest.arresting_officer_id),
    );
    if !arrest.assisting_officer_ids.is_empty() {
        out.push_str(&format!(
            "\n**Assisting :** {}",
            user_mentions(&arrest.assisting_officer_ids, "None")
        ));
    }

    let details = [
        ("Age Group", arrest.age_group.clone()),
        ("Gender", arrest.gender.clone()),
        ("Height", arrest.height.clone()),
        ("Weight", arrest.weight.map(|weight| format!("{} lbs", weight))),
    ];
    for (label, value) in details {
        if let Some(value) = value {
            out.push_str(&format!("\n**{} :** {}", label, value));
        }
    }

    out.push_str(&format!("\n**Booked :** {}", discord_timestamp(arrest.created_at, 'f')));
    out
}

pub(crate) fn arrest_embed(arrest: &Arrest) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title(format!(
            "Booking Report {}",
            format_record_label(RecordKind::Arrest.code(), arrest.booking_number)
        ))
        .color(DEFAULT_EMBED_COLOR)
        .description(arrest_description(arrest))
        .field("Charges", listed(&arrest.charges, "None"), false);

    if let Some(notes) = arrest.notes.as_deref() {
        embed = embed.field("Notes", truncate_chars(&sanitize(notes), FIELD_LIMIT), false);
    }
    embed
}

pub(crate) fn citation_description(citation: &Citation) -> String {
    let mut out = format!(
        "**Type :** {}\n**Violator :** {}\n**Issuing Officer :** {}",
        citation.citation_type.label(),
        roblox_line(&citation.violator_username, citation.violator_roblox_id),
        user_mention(citation.issuing_officer_id),
    );
    if let Some(amount) = citation.fine_amount {
        out.push_str(&format!("\n**Fine :** ${}", amount));
    }

    let vehicle = match citation.vehicle_color.as_deref() {
        Some(color) => format!("{} {}", sanitize(color), sanitize(&citation.vehicle_model)),
        None => sanitize(&citation.vehicle_model),
    };
    out.push_str(&format!(
        "\n**Vehicle :** {} (`{}`)\n**Location :** {}\n**Issued :** {}",
        vehicle,
        citation.license_plate,
        sanitize(&citation.location),
        discord_timestamp(citation.created_at, 'f'),
    ));
    out
}

pub(crate) fn citation_embed(citation: &Citation) -> serenity::CreateEmbed {
    let color = match citation.citation_type {
        CitationType::Fine => ERROR_EMBED_COLOR,
        CitationType::Warning => WARNING_EMBED_COLOR,
    };

    serenity::CreateEmbed::new()
        .title(format!(
            "Citation {}",
            format_record_label(RecordKind::Citation.code(), citation.citation_number)
        ))
        .color(color)
        .description(citation_description(citation))
        .field("Violations", listed(&citation.violations, "None"), false)
}

fn incident_color(status: IncidentStatus) -> u32 {
    match status {
        IncidentStatus::Active => ERROR_EMBED_COLOR,
        IncidentStatus::UnderInvestigation => WARNING_EMBED_COLOR,
        IncidentStatus::Closed => SUCCESS_EMBED_COLOR,
        IncidentStatus::Cold => DEFAULT_EMBED_COLOR,
    }
}

pub(crate) fn incident_embed(incident: &Incident) -> serenity::CreateEmbed {
    let header = format!(
        "**Type :** {}\n**Status :** {}\n**Location :** {}\n**Reported By :** {}\n**Officers :** {}\n**Filed :** {}\n**Updated :** {}",
        incident.incident_type.as_str(),
        incident.status.as_str(),
        sanitize(&incident.location),
        user_mention(incident.reporter_id),
        user_mentions(&incident.officer_ids, "None"),
        discord_timestamp(incident.created_at, 'f'),
        discord_timestamp(incident.updated_at, 'R'),
    );

    serenity::CreateEmbed::new()
        .title(format!(
            "Incident Report {}",
            format_record_label(RecordKind::Incident.code(), incident.incident_number)
        ))
        .color(incident_color(incident.status))
        .description(header)
        .field("Description", truncate_chars(&sanitize(&incident.description), FIELD_LIMIT), false)
        .field("Suspects", listed(&incident.suspects, "None listed"), true)
        .field("Victims", listed(&incident.victims, "None listed"), true)
        .field("Witnesses", listed(&incident.witnesses, "None listed"), true)
}

pub(crate) fn arrest_search_line(arrest: &Arrest) -> String {
    format!(
        "`{}` {} by {}: {}",
        format_record_label(RecordKind::Arrest.code(), arrest.booking_number),
        discord_timestamp(arrest.created_at, 'd'),
        user_mention(arrest.arresting_officer_id),
        truncate_chars(&sanitize(&arrest.charges.join(", ")), 120),
    )
}

pub(crate) fn citation_search_line(citation: &Citation) -> String {
    format!(
        "`{}` {} {} by {}: {}",
        format_record_label(RecordKind::Citation.code(), citation.citation_number),
        citation.citation_type.label(),
        discord_timestamp(citation.created_at, 'd'),
        user_mention(citation.issuing_officer_id),
        truncate_chars(&sanitize(&citation.violations.join(", ")), 120),
    )
}

#[cfg(test)]
mod tests {
    use lapd_database::model::records::Arrest;

    use super::{arrest_description, arrest_search_line};

    fn arrest() -> Arrest {
        Arrest {
            id: 1,
            guild_id: 1,
            booking_number: 5,
            arrestee_roblox_id: Some(261),
            arrestee_username: "Shedletsky".to_owned(),
            charges: vec!["Evading".to_owned(), "Speeding".to_owned()],
            age_group: Some("25-34".to_owned()),
            gender: None,
            height: Some("5'10\"".to_owned()),
            weight: None,
            notes: None,
            arresting_officer_id: 42,
            assisting_officer_ids: vec![],
            created_at: 1_700_000_000,
        }
    }

    #[test]
    fn arrest_description_skips_missing_details() {
        let description = arrest_description(&arrest());
        assert!(description.starts_with(
            "**Suspect :** [Shedletsky](https://www.roblox.com/users/261/profile)\n**Arresting Officer :** <@42>"
        ));
        assert!(description.contains("**Age Group :** 25-34"));
        assert!(description.contains("**Height :** 5'10\""));
        assert!(!description.contains("Gender"));
        assert!(!description.contains("Assisting"));
    }

    #[test]
    fn search_line_uses_booking_label() {
        assert_eq!(
            arrest_search_line(&arrest()),
            "`BK-0005` <t:1700000000:d> by <@42>: Evading, Speeding"
        );
    }
}
