use poise::serenity_prelude as serenity;

use crate::common::sanitize;
use lapd_database::model::notices::Notice;
use lapd_database::model::profiles::GuildProfile;
use lapd_database::model::records::RecordCounts;
use lapd_database::model::shifts::ShiftTotals;
use lapd_utils::embed::DEFAULT_EMBED_COLOR;
use lapd_utils::formatting::{discord_timestamp, format_shift_duration};

pub(crate) struct ProfileView<'a> {
    pub display_name: &'a str,
    pub avatar_url: String,
    pub profile: Option<&'a GuildProfile>,
    pub totals: &'a ShiftTotals,
    pub records: &'a RecordCounts,
    pub notices: &'a [Notice],
}

pub(crate) fn notice_summary(notices: &[Notice]) -> String {
    if notices.is_empty() {
        return "None".to_owned();
    }

    notices
        .iter()
        .map(|notice| {
            format!(
                "{} until {}",
                notice.kind.title(),
                discord_timestamp(notice.effective_end(), 'D')
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn shift_summary(totals: &ShiftTotals) -> String {
    format!(
        "**Shifts :** {}\n**On Duty :** {}\n**Average :** {}",
        totals.shift_count,
        format_shift_duration(totals.on_duty_millis),
        format_shift_duration(totals.average_on_duty_millis()),
    )
}

pub(crate) fn profile_embed(view: &ProfileView<'_>) -> serenity::CreateEmbed {
    let bio = view
        .profile
        .and_then(|profile| profile.bio.as_deref())
        .map_or_else(|| "No bio set.".to_owned(), sanitize);
    let badge = view
        .profile
        .and_then(|profile| profile.badge_number.as_deref())
        .unwrap_or("None");

    serenity::CreateEmbed::new()
        .title(format!("Profile: {}", view.display_name))
        .color(DEFAULT_EMBED_COLOR)
        .thumbnail(view.avatar_url.clone())
        .description(bio)
        .field("Badge", format!("`{}`", badge), true)
        .field("Notice", notice_summary(view.notices), true)
        .field("Shifts", shift_summary(view.totals), false)
        .field(
            "Records Filed",
            format!(
                "**Arrests :** {}\n**Citations :** {}\n**Incidents :** {}",
                view.records.arrests, view.records.citations, view.records.incidents
            ),
            false,
        )
}

#[cfg(test)]
mod tests {
    use lapd_database::model::shifts::ShiftTotals;

    use super::{notice_summary, shift_summary};

    #[test]
    fn empty_profile_sections() {
        assert_eq!(notice_summary(&[]), "None");
        assert_eq!(
            shift_summary(&ShiftTotals::default()),
            "**Shifts :** 0\n**On Duty :** 0s\n**Average :** 0s"
        );
    }
}
