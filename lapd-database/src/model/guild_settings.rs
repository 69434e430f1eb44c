use serde::{Deserialize, Serialize};

use crate::model::records::RecordKind;

/// Per-guild configuration row. Created on guild join, removed by the deletion job.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildSettings {
    pub guild_id: u64,
    pub management_role_ids: Vec<u64>,
    pub staff_role_ids: Vec<u64>,
    pub on_duty_role_ids: Vec<u64>,
    pub on_break_role_ids: Vec<u64>,
    pub notice_alert_role_ids: Vec<u64>,
    pub shift_log_channel_id: Option<u64>,
    pub arrest_log_channel_id: Option<u64>,
    pub citation_log_channel_id: Option<u64>,
    pub incident_log_channel_id: Option<u64>,
    pub notice_log_channel_id: Option<u64>,
    pub loa_role_id: Option<u64>,
    pub ra_role_id: Option<u64>,
    pub joined_at: u64,
    pub deletion_scheduled_at: Option<u64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleList {
    Management,
    Staff,
    OnDuty,
    OnBreak,
    NoticeAlert,
}

impl RoleList {
    pub fn column(self) -> &'static str {
        match self {
            Self::Management => "management_role_ids",
            Self::Staff => "staff_role_ids",
            Self::OnDuty => "on_duty_role_ids",
            Self::OnBreak => "on_break_role_ids",
            Self::NoticeAlert => "notice_alert_role_ids",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Management => "Management Roles",
            Self::Staff => "Staff Roles",
            Self::OnDuty => "On-Duty Roles",
            Self::OnBreak => "On-Break Roles",
            Self::NoticeAlert => "Notice Alert Roles",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogChannel {
    Shift,
    Arrest,
    Citation,
    Incident,
    Notice,
}

impl LogChannel {
    pub fn column(self) -> &'static str {
        match self {
            Self::Shift => "shift_log_channel_id",
            Self::Arrest => "arrest_log_channel_id",
            Self::Citation => "citation_log_channel_id",
            Self::Incident => "incident_log_channel_id",
            Self::Notice => "notice_log_channel_id",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Shift => "Shift Logs",
            Self::Arrest => "Arrest Logs",
            Self::Citation => "Citation Logs",
            Self::Incident => "Incident Logs",
            Self::Notice => "Notice Logs",
        }
    }

    pub fn for_record(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Arrest => Self::Arrest,
            RecordKind::Citation => Self::Citation,
            RecordKind::Incident => Self::Incident,
        }
    }
}

impl GuildSettings {
    pub fn role_list(&self, list: RoleList) -> &[u64] {
        match list {
            RoleList::Management => &self.management_role_ids,
            RoleList::Staff => &self.staff_role_ids,
            RoleList::OnDuty => &self.on_duty_role_ids,
            RoleList::OnBreak => &self.on_break_role_ids,
            RoleList::NoticeAlert => &self.notice_alert_role_ids,
        }
    }

    pub fn log_channel(&self, channel: LogChannel) -> Option<u64> {
        match channel {
            LogChannel::Shift => self.shift_log_channel_id,
            LogChannel::Arrest => self.arrest_log_channel_id,
            LogChannel::Citation => self.citation_log_channel_id,
            LogChannel::Incident => self.incident_log_channel_id,
            LogChannel::Notice => self.notice_log_channel_id,
        }
    }

    pub fn is_management(&self, member_role_ids: &[u64]) -> bool {
        holds_any(member_role_ids, &self.management_role_ids)
    }

    /// Management implies staff.
    pub fn is_staff(&self, member_role_ids: &[u64]) -> bool {
        holds_any(member_role_ids, &self.staff_role_ids) || self.is_management(member_role_ids)
    }
}

/// A named category of shift, e.g. "Patrol" or "SWAT".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftType {
    pub id: u64,
    pub guild_id: u64,
    pub name: String,
    pub is_default: bool,
    pub permitted_role_ids: Vec<u64>,
    pub created_at: u64,
}

pub const DEFAULT_SHIFT_TYPE_NAME: &str = "Default";
pub const MAX_SHIFT_TYPES_PER_GUILD: usize = 25;

impl ShiftType {
    /// An empty permitted list opens the shift type to everyone.
    pub fn permits(&self, member_role_ids: &[u64]) -> bool {
        self.permitted_role_ids.is_empty() || holds_any(member_role_ids, &self.permitted_role_ids)
    }
}

/// Pick the shift type a command refers to: an explicit name (case-insensitive),
/// otherwise the guild default, otherwise the first configured type.
pub fn resolve_shift_type<'a>(
    types: &'a [ShiftType],
    wanted: Option<&str>,
) -> Option<&'a ShiftType> {
    match wanted.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => types
            .iter()
            .find(|shift_type| shift_type.name.eq_ignore_ascii_case(name)),
        None => types
            .iter()
            .find(|shift_type| shift_type.is_default)
            .or_else(|| types.first()),
    }
}

fn holds_any(member_role_ids: &[u64], configured: &[u64]) -> bool {
    configured.iter().any(|role_id| member_role_ids.contains(role_id))
}

#[cfg(test)]
mod tests {
    use super::{GuildSettings, ShiftType, resolve_shift_type};

    fn shift_type(name: &str, is_default: bool, roles: Vec<u64>) -> ShiftType {
        ShiftType {
            id: 1,
            guild_id: 1,
            name: name.to_owned(),
            is_default,
            permitted_role_ids: roles,
            created_at: 0,
        }
    }

    #[test]
    fn management_counts_as_staff() {
        let settings = GuildSettings {
            management_role_ids: vec![10],
            staff_role_ids: vec![20],
            ..Default::default()
        };

        assert!(settings.is_staff(&[10]));
        assert!(settings.is_staff(&[20]));
        assert!(!settings.is_management(&[20]));
        assert!(!settings.is_staff(&[30]));
    }

    #[test]
    fn shift_type_permissions() {
        assert!(shift_type("Patrol", true, vec![]).permits(&[]));
        assert!(shift_type("SWAT", false, vec![5]).permits(&[1, 5]));
        assert!(!shift_type("SWAT", false, vec![5]).permits(&[1]));
    }

    #[test]
    fn resolves_named_then_default_then_first() {
        let types = vec![
            shift_type("Patrol", false, vec![]),
            shift_type("Traffic", true, vec![]),
        ];

        fn resolved<'a>(types: &'a [ShiftType], wanted: Option<&str>) -> Option<&'a str> {
            resolve_shift_type(types, wanted).map(|t| t.name.as_str())
        }

        assert_eq!(resolved(&types, Some("patrol")), Some("Patrol"));
        assert_eq!(resolved(&types, None), Some("Traffic"));
        assert_eq!(resolved(&types, Some("  ")), Some("Traffic"));
        assert!(resolved(&types, Some("SWAT")).is_none());
        assert_eq!(resolved(&types[..1], None), Some("Patrol"));
    }
}
