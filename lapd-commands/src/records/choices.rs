use lapd_database::model::records::{CitationType, IncidentStatus, IncidentType, RecordKind};

#[derive(Clone, Copy, Debug, poise::ChoiceParameter)]
pub enum AgeGroup {
    #[name = "Under 18"]
    Under18,
    #[name = "18-24"]
    YoungAdult,
    #[name = "25-34"]
    Adult,
    #[name = "35-44"]
    MiddleAged,
    #[name = "45+"]
    Senior,
}

#[derive(Clone, Copy, Debug, poise::ChoiceParameter)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Clone, Copy, Debug, poise::ChoiceParameter)]
pub enum CitationChoice {
    Fine,
    Warning,
}

impl From<CitationChoice> for CitationType {
    fn from(choice: CitationChoice) -> Self {
        match choice {
            CitationChoice::Fine => Self::Fine,
            CitationChoice::Warning => Self::Warning,
        }
    }
}

#[derive(Clone, Copy, Debug, poise::ChoiceParameter)]
pub enum IncidentTypeChoice {
    #[name = "Traffic Collision"]
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

impl From<IncidentTypeChoice> for IncidentType {
    fn from(choice: IncidentTypeChoice) -> Self {
        match choice {
            IncidentTypeChoice::TrafficCollision => Self::TrafficCollision,
            IncidentTypeChoice::Robbery => Self::Robbery,
            IncidentTypeChoice::Assault => Self::Assault,
            IncidentTypeChoice::Homicide => Self::Homicide,
            IncidentTypeChoice::Pursuit => Self::Pursuit,
            IncidentTypeChoice::Shooting => Self::Shooting,
            IncidentTypeChoice::Burglary => Self::Burglary,
            IncidentTypeChoice::Vandalism => Self::Vandalism,
            IncidentTypeChoice::Other => Self::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, poise::ChoiceParameter)]
pub enum IncidentStatusChoice {
    Active,
    #[name = "Under Investigation"]
    UnderInvestigation,
    Closed,
    Cold,
}

impl From<IncidentStatusChoice> for IncidentStatus {
    fn from(choice: IncidentStatusChoice) -> Self {
        match choice {
            IncidentStatusChoice::Active => Self::Active,
            IncidentStatusChoice::UnderInvestigation => Self::UnderInvestigation,
            IncidentStatusChoice::Closed => Self::Closed,
            IncidentStatusChoice::Cold => Self::Cold,
        }
    }
}

#[derive(Clone, Copy, Debug, poise::ChoiceParameter)]
pub enum RecordKindChoice {
    Arrest,
    Citation,
    Incident,
}

impl From<RecordKindChoice> for RecordKind {
    fn from(choice: RecordKindChoice) -> Self {
        match choice {
            RecordKindChoice::Arrest => Self::Arrest,
            RecordKindChoice::Citation => Self::Citation,
            RecordKindChoice::Incident => Self::Incident,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, poise::ChoiceParameter)]
pub enum SearchKind {
    Arrests,
    Citations,
}

#[cfg(test)]
mod tests {
    use poise::ChoiceParameter;

    use super::{AgeGroup, IncidentStatusChoice, IncidentTypeChoice};
    use lapd_database::model::records::{IncidentStatus, IncidentType};

    #[test]
    fn choice_names_match_stored_values() {
        for choice in [IncidentTypeChoice::TrafficCollision, IncidentTypeChoice::Other] {
            assert_eq!(IncidentType::from(choice).as_str(), choice.name());
        }
        assert_eq!(
            IncidentStatus::from(IncidentStatusChoice::UnderInvestigation).as_str(),
            IncidentStatusChoice::UnderInvestigation.name()
        );
        assert_eq!(AgeGroup::Senior.name(), "45+");
    }
}
