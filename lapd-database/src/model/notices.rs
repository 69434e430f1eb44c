// Notice timestamps are unix seconds.

pub const MIN_NOTICE_SECS: u64 = 24 * 60 * 60;
pub const MAX_NOTICE_SECS: u64 = 90 * 24 * 60 * 60;
pub const MAX_START_DELAY_SECS: u64 = 14 * 24 * 60 * 60;
pub const MIN_REASON_LEN: usize = 3;
pub const MAX_REASON_LEN: usize = 500;

/// Leave of absence or reduced-activity notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Loa,
    Ra,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loa => "loa",
            Self::Ra => "ra",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "loa" => Some(Self::Loa),
            "ra" => Some(Self::Ra),
            _ => None,
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            Self::Loa => "LOA",
            Self::Ra => "RA",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Loa => "Leave of Absence",
            Self::Ra => "Reduced Activity",
        }
    }
}

/// Review state as stored. Time-dependent phases are derived by [`Notice::phase`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeStatus {
    Pending,
    Approved,
    Denied,
    Cancelled,
}

impl NoticeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "denied" => Some(Self::Denied),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticePhase {
    Pending,
    Denied,
    Cancelled,
    Upcoming,
    Active,
    Ended,
}

impl NoticePhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Denied => "Denied",
            Self::Cancelled => "Cancelled",
            Self::Upcoming => "Upcoming",
            Self::Active => "Active",
            Self::Ended => "Ended",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub guild_id: u64,
    pub user_id: u64,
    pub kind: NoticeKind,
    pub status: NoticeStatus,
    pub reason: String,
    pub quota_reduction: Option<u8>,
    pub requested_at: u64,
    pub start_at: u64,
    pub end_at: u64,
    pub early_end_at: Option<u64>,
    pub reviewer_id: Option<u64>,
    pub review_note: Option<String>,
    pub reviewed_at: Option<u64>,
    pub start_processed: bool,
    pub end_processed: bool,
}

impl Notice {
    /// Scheduled end, pulled forward when the member ended it early.
    pub fn effective_end(&self) -> u64 {
        match self.early_end_at {
            Some(early) => early.min(self.end_at),
            None => self.end_at,
        }
    }

    pub fn phase(&self, now: u64) -> NoticePhase {
        match self.status {
            NoticeStatus::Pending => NoticePhase::Pending,
            NoticeStatus::Denied => NoticePhase::Denied,
            NoticeStatus::Cancelled => NoticePhase::Cancelled,
            NoticeStatus::Approved if now >= self.effective_end() => NoticePhase::Ended,
            NoticeStatus::Approved if now < self.start_at => NoticePhase::Upcoming,
            NoticeStatus::Approved => NoticePhase::Active,
        }
    }

    /// Pending or approved-and-not-yet-ended notices block a new request of the
    /// same kind. A pending request whose window has passed unreviewed has lapsed.
    pub fn blocks_new_request(&self, now: u64) -> bool {
        match self.phase(now) {
            NoticePhase::Pending => now < self.end_at,
            NoticePhase::Upcoming | NoticePhase::Active => true,
            NoticePhase::Denied | NoticePhase::Cancelled | NoticePhase::Ended => false,
        }
    }

    /// Approved, started, and not yet activated. Mirrors the sweep's start claim.
    pub fn start_due(&self, now: u64) -> bool {
        self.status == NoticeStatus::Approved
            && !self.start_processed
            && !self.end_processed
            && self.start_at <= now
            && now < self.effective_end()
    }

    /// Approved and past its effective end, not yet closed out. Mirrors the
    /// sweep's expiry claim.
    pub fn expiry_due(&self, now: u64) -> bool {
        self.status == NoticeStatus::Approved && !self.end_processed && self.effective_end() <= now
    }

    /// What an approval has to do right away.
    pub fn approval_follow_up(&self, now: u64) -> ApprovalFollowUp {
        if self.start_due(now) {
            ApprovalFollowUp::StartNow
        } else if self.expiry_due(now) {
            ApprovalFollowUp::Lapsed
        } else {
            ApprovalFollowUp::Wait
        }
    }

    pub fn duration_secs(&self) -> u64 {
        self.end_at.saturating_sub(self.start_at)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApprovalFollowUp {
    /// The start is still ahead; the sweep activates it.
    Wait,
    /// The window is open; grant the role now.
    StartNow,
    /// The window passed before review; close it without granting anything.
    Lapsed,
}

pub struct NewNotice<'a> {
    pub guild_id: u64,
    pub user_id: u64,
    pub kind: NoticeKind,
    pub reason: &'a str,
    pub quota_reduction: Option<u8>,
    pub start_at: u64,
    pub end_at: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeRequestError {
    DurationTooShort,
    DurationTooLong,
    StartTooFar,
    ReasonLength,
    QuotaOutOfRange,
    QuotaNotAllowed,
}

impl NoticeRequestError {
    pub fn message(self) -> &'static str {
        match self {
            Self::DurationTooShort => "Notices must last at least 1 day.",
            Self::DurationTooLong => "Notices cannot last longer than 90 days.",
            Self::StartTooFar => "Notices cannot start more than 14 days from now.",
            Self::ReasonLength => "The reason must be between 3 and 500 characters.",
            Self::QuotaOutOfRange => "The quota reduction must be between 1% and 99%.",
            Self::QuotaNotAllowed => "Quota reductions only apply to reduced activity notices.",
        }
    }
}

/// Validate request parameters and compute `(start_at, end_at)`.
pub fn plan_notice_window(
    kind: NoticeKind,
    now: u64,
    duration_secs: u64,
    start_delay_secs: u64,
    reason: &str,
    quota_reduction: Option<u8>,
) -> Result<(u64, u64), NoticeRequestError> {
    if duration_secs < MIN_NOTICE_SECS {
        return Err(NoticeRequestError::DurationTooShort);
    }
    if duration_secs > MAX_NOTICE_SECS {
        return Err(NoticeRequestError::DurationTooLong);
    }
    if start_delay_secs > MAX_START_DELAY_SECS {
        return Err(NoticeRequestError::StartTooFar);
    }

    let reason_len = reason.trim().chars().count();
    if !(MIN_REASON_LEN..=MAX_REASON_LEN).contains(&reason_len) {
        return Err(NoticeRequestError::ReasonLength);
    }

    match (kind, quota_reduction) {
        (NoticeKind::Loa, Some(_)) => return Err(NoticeRequestError::QuotaNotAllowed),
        (NoticeKind::Ra, Some(quota)) if !(1..=99).contains(&quota) => {
            return Err(NoticeRequestError::QuotaOutOfRange);
        }
        _ => {}
    }

    let start_at = now.saturating_add(start_delay_secs);
    Ok((start_at, start_at.saturating_add(duration_secs)))
}

#[cfg(test)]
mod tests {
    use super::{
        ApprovalFollowUp, MIN_NOTICE_SECS, Notice, NoticeKind, NoticePhase, NoticeRequestError,
        NoticeStatus, plan_notice_window,
    };

    const DAY: u64 = 86_400;

    fn notice(status: NoticeStatus, start_at: u64, end_at: u64) -> Notice {
        Notice {
            id: 1,
            guild_id: 1,
            user_id: 1,
            kind: NoticeKind::Loa,
            status,
            reason: "Vacation".to_owned(),
            quota_reduction: None,
            requested_at: 0,
            start_at,
            end_at,
            early_end_at: None,
            reviewer_id: None,
            review_note: None,
            reviewed_at: None,
            start_processed: false,
            end_processed: false,
        }
    }

    #[test]
    fn approved_phases_follow_the_clock() {
        let approved = notice(NoticeStatus::Approved, 10 * DAY, 20 * DAY);
        assert_eq!(approved.phase(5 * DAY), NoticePhase::Upcoming);
        assert_eq!(approved.phase(10 * DAY), NoticePhase::Active);
        assert_eq!(approved.phase(20 * DAY), NoticePhase::Ended);
    }

    #[test]
    fn early_end_pulls_the_end_forward() {
        let mut approved = notice(NoticeStatus::Approved, 0, 20 * DAY);
        approved.early_end_at = Some(5 * DAY);
        assert_eq!(approved.effective_end(), 5 * DAY);
        assert_eq!(approved.phase(6 * DAY), NoticePhase::Ended);
        assert!(!approved.blocks_new_request(6 * DAY));
    }

    #[test]
    fn review_states_ignore_the_clock() {
        assert_eq!(notice(NoticeStatus::Pending, 0, DAY).phase(99 * DAY), NoticePhase::Pending);
        assert_eq!(notice(NoticeStatus::Denied, 0, DAY).phase(0), NoticePhase::Denied);
        assert!(notice(NoticeStatus::Pending, 0, DAY).blocks_new_request(DAY - 1));
        assert!(!notice(NoticeStatus::Cancelled, 0, DAY).blocks_new_request(0));
    }

    #[test]
    fn unreviewed_requests_lapse_after_their_window() {
        let pending = notice(NoticeStatus::Pending, DAY, 3 * DAY);
        assert!(pending.blocks_new_request(0));
        assert!(pending.blocks_new_request(2 * DAY));
        assert!(!pending.blocks_new_request(3 * DAY));
        assert!(!pending.blocks_new_request(99 * DAY));
    }

    #[test]
    fn approval_follow_up_depends_on_the_window() {
        let approved = notice(NoticeStatus::Approved, 10 * DAY, 20 * DAY);
        assert_eq!(approved.approval_follow_up(5 * DAY), ApprovalFollowUp::Wait);
        assert_eq!(approved.approval_follow_up(10 * DAY), ApprovalFollowUp::StartNow);
        assert_eq!(approved.approval_follow_up(20 * DAY), ApprovalFollowUp::Lapsed);
        assert_eq!(approved.approval_follow_up(30 * DAY), ApprovalFollowUp::Lapsed);

        let mut ended_early = approved.clone();
        ended_early.early_end_at = Some(12 * DAY);
        assert_eq!(ended_early.approval_follow_up(15 * DAY), ApprovalFollowUp::Lapsed);
    }

    #[test]
    fn claimed_notices_are_not_due_again() {
        let mut running = notice(NoticeStatus::Approved, 0, 10 * DAY);
        assert!(running.start_due(DAY));
        running.start_processed = true;
        assert!(!running.start_due(DAY));
        assert!(!running.expiry_due(DAY));

        assert!(running.expiry_due(10 * DAY));
        running.end_processed = true;
        assert!(!running.expiry_due(10 * DAY));
        assert!(!running.start_due(10 * DAY));

        let mut never_started = notice(NoticeStatus::Approved, 0, DAY);
        assert!(!never_started.start_due(DAY));
        assert!(never_started.expiry_due(DAY));
        never_started.end_processed = true;
        never_started.start_processed = true;
        assert_eq!(never_started.approval_follow_up(2 * DAY), ApprovalFollowUp::Wait);
    }

    #[test]
    fn only_approved_notices_are_due() {
        for status in [NoticeStatus::Pending, NoticeStatus::Denied, NoticeStatus::Cancelled] {
            let other = notice(status, 0, DAY);
            assert!(!other.start_due(0));
            assert!(!other.expiry_due(2 * DAY));
        }
    }

    #[test]
    fn window_validation() {
        assert_eq!(
            plan_notice_window(NoticeKind::Loa, 100, 7 * DAY, DAY, "Exams", None),
            Ok((100 + DAY, 100 + 8 * DAY))
        );
        assert_eq!(
            plan_notice_window(NoticeKind::Loa, 0, MIN_NOTICE_SECS - 1, 0, "Exams", None),
            Err(NoticeRequestError::DurationTooShort)
        );
        assert_eq!(
            plan_notice_window(NoticeKind::Loa, 0, 91 * DAY, 0, "Exams", None),
            Err(NoticeRequestError::DurationTooLong)
        );
        assert_eq!(
            plan_notice_window(NoticeKind::Loa, 0, 2 * DAY, 15 * DAY, "Exams", None),
            Err(NoticeRequestError::StartTooFar)
        );
        assert_eq!(
            plan_notice_window(NoticeKind::Loa, 0, 2 * DAY, 0, " a ", None),
            Err(NoticeRequestError::ReasonLength)
        );
        assert_eq!(
            plan_notice_window(NoticeKind::Loa, 0, 2 * DAY, 0, "Exams", Some(50)),
            Err(NoticeRequestError::QuotaNotAllowed)
        );
        assert_eq!(
            plan_notice_window(NoticeKind::Ra, 0, 2 * DAY, 0, "Exams", Some(100)),
            Err(NoticeRequestError::QuotaOutOfRange)
        );
        assert!(plan_notice_window(NoticeKind::Ra, 0, 2 * DAY, 0, "Exams", Some(50)).is_ok());
    }
}
