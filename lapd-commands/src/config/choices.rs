use lapd_database::model::guild_settings::{LogChannel, RoleList};
use lapd_database::model::notices::NoticeKind;

#[derive(Clone, Copy, Debug, poise::ChoiceParameter)]
pub enum RoleListChoice {
    Management,
    Staff,
    #[name = "On Duty"]
    OnDuty,
    #[name = "On Break"]
    OnBreak,
    #[name = "Notice Alert"]
    NoticeAlert,
}

impl From<RoleListChoice> for RoleList {
    fn from(choice: RoleListChoice) -> Self {
        match choice {
            RoleListChoice::Management => Self::Management,
            RoleListChoice::Staff => Self::Staff,
            RoleListChoice::OnDuty => Self::OnDuty,
            RoleListChoice::OnBreak => Self::OnBreak,
            RoleListChoice::NoticeAlert => Self::NoticeAlert,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, poise::ChoiceParameter)]
pub enum RoleAction {
    Add,
    Remove,
    Clear,
}

#[derive(Clone, Copy, Debug, poise::ChoiceParameter)]
pub enum LogChannelChoice {
    Shift,
    Arrest,
    Citation,
    Incident,
    Notice,
}

impl From<LogChannelChoice> for LogChannel {
    fn from(choice: LogChannelChoice) -> Self {
        match choice {
            LogChannelChoice::Shift => Self::Shift,
            LogChannelChoice::Arrest => Self::Arrest,
            LogChannelChoice::Citation => Self::Citation,
            LogChannelChoice::Incident => Self::Incident,
            LogChannelChoice::Notice => Self::Notice,
        }
    }
}

#[derive(Clone, Copy, Debug, poise::ChoiceParameter)]
pub enum NoticeKindChoice {
    #[name = "LOA"]
    Loa,
    #[name = "RA"]
    Ra,
}

impl From<NoticeKindChoice> for NoticeKind {
    fn from(choice: NoticeKindChoice) -> Self {
        match choice {
            NoticeKindChoice::Loa => Self::Loa,
            NoticeKindChoice::Ra => Self::Ra,
        }
    }
}
