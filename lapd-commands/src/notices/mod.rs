mod embeds;
mod handlers;
pub mod lifecycle;
pub mod loa;
pub mod ra;

pub use loa::loa;
pub use ra::ra;

use lapd_database::model::notices::NoticeStatus;

#[derive(Clone, Copy, Debug, poise::ChoiceParameter)]
pub enum NoticeStatusChoice {
    Pending,
    Approved,
    Denied,
    Cancelled,
}

impl From<NoticeStatusChoice> for NoticeStatus {
    fn from(choice: NoticeStatusChoice) -> Self {
        match choice {
            NoticeStatusChoice::Pending => Self::Pending,
            NoticeStatusChoice::Approved => Self::Approved,
            NoticeStatusChoice::Denied => Self::Denied,
            NoticeStatusChoice::Cancelled => Self::Cancelled,
        }
    }
}
