#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Arrest,
    Citation,
    Incident,
}

impl RecordKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Arrest => "Arrest",
            Self::Citation => "Citation",
            Self::Incident => "Incident",
        }
    }

    /// Prefix used in record labels such as `BK-0012`.
    pub fn code(self) -> &'static str {
        match self {
            Self::Arrest => "BK",
            Self::Citation => "CT",
            Self::Incident => "IR",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            Self::Arrest => "arrests",
            Self::Citation => "citations",
            Self::Incident => "incidents",
        }
    }

    pub fn number_column(self) -> &'static str {
        match self {
            Self::Arrest => "booking_number",
            Self::Citation => "citation_number",
            Self::Incident => "incident_number",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arrest {
    pub id: u64,
    pub guild_id: u64,
    pub booking_number: u64,
    pub arrestee_roblox_id: Option<u64>,
    pub arrestee_username: String,
    pub charges: Vec<String>,
    pub age_group: Option<String>,
    pub gender: Option<String>,
    pub height: Option<String>,
    pub weight: Option<u32>,
    pub notes: Option<String>,
    pub arresting_officer_id: u64,
    pub assisting_officer_ids: Vec<u64>,
    pub created_at: u64,
}

pub struct NewArrest<'a> {
    pub guild_id: u64,
    pub arrestee_roblox_id: Option<u64>,
    pub arrestee_username: &'a str,
    pub charges: &'a [String],
    pub age_group: Option<&'a str>,
    pub gender: Option<&'a str>,
    pub height: Option<&'a str>,
    pub weight: Option<u32>,
    pub notes: Option<&'a str>,
    pub arresting_officer_id: u64,
    pub assisting_officer_ids: &'a [u64],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CitationType {
    Fine,
    Warning,
}

impl CitationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fine => "fine",
            Self::Warning => "warning",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fine" => Some(Self::Fine),
            "warning" => Some(Self::Warning),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Fine => "Fine",
            Self::Warning => "Warning",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Citation {
    pub id: u64,
    pub guild_id: u64,
    pub citation_number: u64,
    pub citation_type: CitationType,
    pub violator_roblox_id: Option<u64>,
    pub violator_username: String,
    pub violations: Vec<String>,
    pub fine_amount: Option<u32>,
    pub vehicle_model: String,
    pub vehicle_color: Option<String>,
    pub license_plate: String,
    pub location: String,
    pub issuing_officer_id: u64,
    pub created_at: u64,
}

pub struct NewCitation<'a> {
    pub guild_id: u64,
    pub citation_type: CitationType,
    pub violator_roblox_id: Option<u64>,
    pub violator_username: &'a str,
    pub violations: &'a [String],
    pub fine_amount: Option<u32>,
    pub vehicle_model: &'a str,
    pub vehicle_color: Option<&'a str>,
    pub license_plate: &'a str,
    pub location: &'a str,
    pub issuing_officer_id: u64,
}

pub const MAX_FINE_AMOUNT: u32 = 100_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncidentType {
    TrafficCollision,
    Robbery,
    Assault,
    Homicide,
    Pursuit,
    Shooting,
    Burglary,
    Vandalism,
    Other,
}

impl IncidentType {
    pub const ALL: [Self; 9] = [
        Self::TrafficCollision,
        Self::Robbery,
        Self::Assault,
        Self::Homicide,
        Self::Pursuit,
        Self::Shooting,
        Self::Burglary,
        Self::Vandalism,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TrafficCollision => "Traffic Collision",
            Self::Robbery => "Robbery",
            Self::Assault => "Assault",
            Self::Homicide => "Homicide",
            Self::Pursuit => "Pursuit",
            Self::Shooting => "Shooting",
            Self::Burglary => "Burglary",
            Self::Vandalism => "Vandalism",
            Self::Other => "Other",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(raw))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncidentStatus {
    Active,
    UnderInvestigation,
    Closed,
    Cold,
}

impl IncidentStatus {
    pub const ALL: [Self; 4] = [
        Self::Active,
        Self::UnderInvestigation,
        Self::Closed,
        Self::Cold,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::UnderInvestigation => "Under Investigation",
            Self::Closed => "Closed",
            Self::Cold => "Cold",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(raw))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Incident {
    pub id: u64,
    pub guild_id: u64,
    pub incident_number: u64,
    pub incident_type: IncidentType,
    pub status: IncidentStatus,
    pub location: String,
    pub description: String,
    pub suspects: Vec<String>,
    pub victims: Vec<String>,
    pub witnesses: Vec<String>,
    pub officer_ids: Vec<u64>,
    pub reporter_id: u64,
    pub created_at: u64,
    pub updated_at: u64,
}

pub struct NewIncident<'a> {
    pub guild_id: u64,
    pub incident_type: IncidentType,
    pub status: IncidentStatus,
    pub location: &'a str,
    pub description: &'a str,
    pub suspects: &'a [String],
    pub victims: &'a [String],
    pub witnesses: &'a [String],
    pub officer_ids: &'a [u64],
    pub reporter_id: u64,
}

/// Per-member record counts shown on profiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordCounts {
    pub arrests: u64,
    pub citations: u64,
    pub incidents: u64,
}

#[cfg(test)]
mod tests {
    use super::{CitationType, IncidentStatus, IncidentType};

    #[test]
    fn enum_names_parse_case_insensitively() {
        assert_eq!(CitationType::parse(" FINE "), Some(CitationType::Fine));
        assert_eq!(CitationType::parse("ticket"), None);
        assert_eq!(
            IncidentType::parse("traffic collision"),
            Some(IncidentType::TrafficCollision)
        );
        assert_eq!(
            IncidentStatus::parse("under investigation"),
            Some(IncidentStatus::UnderInvestigation)
        );
        assert_eq!(IncidentStatus::parse("open"), None);
    }

    #[test]
    fn stored_names_round_trip() {
        for kind in IncidentType::ALL {
            assert_eq!(IncidentType::parse(kind.as_str()), Some(kind));
        }
        for status in IncidentStatus::ALL {
            assert_eq!(IncidentStatus::parse(status.as_str()), Some(status));
        }
    }
}
