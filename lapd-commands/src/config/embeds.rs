use lapd_database::model::guild_settings::{GuildSettings, LogChannel, RoleList, ShiftType};
use lapd_utils::formatting::{channel_mention, role_mentions};

const ROLE_LISTS: [RoleList; 5] = [
    RoleList::Management,
    RoleList::Staff,
    RoleList::OnDuty,
    RoleList::OnBreak,
    RoleList::NoticeAlert,
];

const LOG_CHANNELS: [LogChannel; 5] = [
    LogChannel::Shift,
    LogChannel::Arrest,
    LogChannel::Citation,
    LogChannel::Incident,
    LogChannel::Notice,
];

fn optional_role(role_id: Option<u64>) -> String {
    role_id.map_or_else(|| "Not set".to_owned(), |id| format!("<@&{}>", id))
}

pub(crate) fn roles_section(settings: &GuildSettings) -> String {
    ROLE_LISTS
        .iter()
        .map(|list| {
            format!(
                "**{} :** {}",
                list.label(),
                role_mentions(settings.role_list(*list), "None")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn channels_section(settings: &GuildSettings) -> String {
    LOG_CHANNELS
        .iter()
        .map(|channel| {
            let value = settings
                .log_channel(*channel)
                .map_or_else(|| "Not set".to_owned(), channel_mention);
            format!("**{} :** {}", channel.label(), value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn notice_roles_section(settings: &GuildSettings) -> String {
    format!(
        "**LOA Role :** {}\n**RA Role :** {}",
        optional_role(settings.loa_role_id),
        optional_role(settings.ra_role_id)
    )
}

pub(crate) fn shift_type_line(shift_type: &ShiftType) -> String {
    let marker = if shift_type.is_default { " (default)" } else { "" };
    format!(
        "**{}**{}: {}",
        shift_type.name,
        marker,
        role_mentions(&shift_type.permitted_role_ids, "Everyone")
    )
}

#[cfg(test)]
mod tests {
    use lapd_database::model::guild_settings::{GuildSettings, ShiftType};

    use super::{channels_section, notice_roles_section, shift_type_line};

    #[test]
    fn unset_values_read_not_set() {
        let settings = GuildSettings {
            arrest_log_channel_id: Some(9),
            ra_role_id: Some(4),
            ..GuildSettings::default()
        };
        let channels = channels_section(&settings);
        assert!(channels.contains("**Shift Logs :** Not set"));
        assert!(channels.contains("**Arrest Logs :** <#9>"));
        assert_eq!(
            notice_roles_section(&settings),
            "**LOA Role :** Not set\n**RA Role :** <@&4>"
        );
    }

    #[test]
    fn shift_type_line_marks_default() {
        let shift_type = ShiftType {
            id: 1,
            guild_id: 1,
            name: "Patrol".to_owned(),
            is_default: true,
            permitted_role_ids: vec![],
            created_at: 0,
        };
        assert_eq!(shift_type_line(&shift_type), "**Patrol** (default): Everyone");
    }
}
