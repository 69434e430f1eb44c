// Shift timestamps are unix milliseconds.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShiftBreak {
    pub started_at: u64,
    pub ended_at: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shift {
    pub id: u64,
    pub guild_id: u64,
    pub user_id: u64,
    pub shift_type: String,
    pub started_at: u64,
    pub ended_at: Option<u64>,
    pub arrests: u32,
    pub citations: u32,
    pub incidents: u32,
    pub breaks: Vec<ShiftBreak>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DutyStatus {
    OffDuty,
    OnDuty,
    OnBreak,
}

impl DutyStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::OffDuty => "Off Duty",
            Self::OnDuty => "On Duty",
            Self::OnBreak => "On Break",
        }
    }
}

impl Shift {
    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }

    pub fn open_break(&self) -> Option<&ShiftBreak> {
        self.breaks.iter().find(|entry| entry.ended_at.is_none())
    }

    pub fn status(&self) -> DutyStatus {
        if !self.is_active() {
            DutyStatus::OffDuty
        } else if self.open_break().is_some() {
            DutyStatus::OnBreak
        } else {
            DutyStatus::OnDuty
        }
    }

    /// Effective end of the shift: its end time, or `now` while it is running.
    fn end_or(&self, now: u64) -> u64 {
        self.ended_at.unwrap_or(now).max(self.started_at)
    }

    /// Wall-clock length of the shift including breaks.
    pub fn total_millis(&self, now: u64) -> u64 {
        self.end_or(now) - self.started_at
    }

    /// Time spent on break. Open breaks count up to the shift end (or `now`),
    /// and every break is clipped to the shift window.
    pub fn break_millis(&self, now: u64) -> u64 {
        let shift_end = self.end_or(now);
        let total: u64 = self
            .breaks
            .iter()
            .map(|entry| {
                let start = entry.started_at.clamp(self.started_at, shift_end);
                let end = entry.ended_at.unwrap_or(shift_end).clamp(start, shift_end);
                end - start
            })
            .sum();

        total.min(self.total_millis(now))
    }

    pub fn on_duty_millis(&self, now: u64) -> u64 {
        self.total_millis(now) - self.break_millis(now)
    }
}

/// Aggregated shift statistics for one member (or one leaderboard row).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShiftTotals {
    pub shift_count: u64,
    pub on_duty_millis: u64,
    pub break_millis: u64,
    pub longest_on_duty_millis: u64,
    pub arrests: u64,
    pub citations: u64,
    pub incidents: u64,
}

impl ShiftTotals {
    pub fn from_shifts<'a>(shifts: impl IntoIterator<Item = &'a Shift>, now: u64) -> Self {
        shifts.into_iter().fold(Self::default(), |mut totals, shift| {
            let on_duty = shift.on_duty_millis(now);
            totals.shift_count += 1;
            totals.on_duty_millis += on_duty;
            totals.break_millis += shift.break_millis(now);
            totals.longest_on_duty_millis = totals.longest_on_duty_millis.max(on_duty);
            totals.arrests += u64::from(shift.arrests);
            totals.citations += u64::from(shift.citations);
            totals.incidents += u64::from(shift.incidents);
            totals
        })
    }

    /// Mean on-duty time per shift; zero when there are no shifts.
    pub fn average_on_duty_millis(&self) -> u64 {
        self.on_duty_millis
            .checked_div(self.shift_count)
            .unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: u64,
    pub shift_count: u64,
    pub on_duty_millis: u64,
}

/// Sort leaderboard rows by on-duty time, then shift count, then user id for stability.
pub fn rank_leaderboard(entries: &mut [LeaderboardEntry]) {
    entries.sort_unstable_by(|left, right| {
        right
            .on_duty_millis
            .cmp(&left.on_duty_millis)
            .then_with(|| right.shift_count.cmp(&left.shift_count))
            .then_with(|| left.user_id.cmp(&right.user_id))
    });
}

#[cfg(test)]
mod tests {
    use super::{DutyStatus, LeaderboardEntry, Shift, ShiftBreak, ShiftTotals, rank_leaderboard};

    const MIN: u64 = 60_000;

    fn shift(started_at: u64, ended_at: Option<u64>, breaks: Vec<ShiftBreak>) -> Shift {
        Shift {
            id: 1,
            guild_id: 1,
            user_id: 1,
            shift_type: "Default".to_owned(),
            started_at,
            ended_at,
            arrests: 0,
            citations: 0,
            incidents: 0,
            breaks,
        }
    }

    fn on_break(started_at: u64, ended_at: Option<u64>) -> ShiftBreak {
        ShiftBreak {
            started_at,
            ended_at,
        }
    }

    fn entry(user_id: u64, shift_count: u64, on_duty_millis: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            user_id,
            shift_count,
            on_duty_millis,
        }
    }

    #[test]
    fn ended_shift_subtracts_breaks() {
        let shift = shift(
            0,
            Some(60 * MIN),
            vec![
                on_break(10 * MIN, Some(20 * MIN)),
                on_break(30 * MIN, Some(35 * MIN)),
            ],
        );

        assert_eq!(shift.total_millis(999 * MIN), 60 * MIN);
        assert_eq!(shift.break_millis(999 * MIN), 15 * MIN);
        assert_eq!(shift.on_duty_millis(999 * MIN), 45 * MIN);
        assert_eq!(shift.status(), DutyStatus::OffDuty);
    }

    #[test]
    fn active_shift_with_open_break_counts_up_to_now() {
        let shift = shift(0, None, vec![on_break(40 * MIN, None)]);

        assert_eq!(shift.status(), DutyStatus::OnBreak);
        assert_eq!(shift.break_millis(50 * MIN), 10 * MIN);
        assert_eq!(shift.on_duty_millis(50 * MIN), 40 * MIN);
    }

    #[test]
    fn breaks_are_clipped_to_the_shift_window() {
        let shift = shift(
            10 * MIN,
            Some(20 * MIN),
            vec![on_break(5 * MIN, Some(30 * MIN))],
        );

        assert_eq!(shift.break_millis(0), 10 * MIN);
        assert_eq!(shift.on_duty_millis(0), 0);
    }

    #[test]
    fn clock_skew_never_underflows() {
        let shift = shift(100 * MIN, None, vec![]);
        assert_eq!(shift.on_duty_millis(50 * MIN), 0);
        assert_eq!(shift.status(), DutyStatus::OnDuty);
    }

    #[test]
    fn totals_and_average() {
        let mut first = shift(0, Some(30 * MIN), vec![]);
        first.arrests = 2;
        let second = shift(0, Some(90 * MIN), vec![on_break(0, Some(30 * MIN))]);

        let totals = ShiftTotals::from_shifts([&first, &second], 0);
        assert_eq!(totals.shift_count, 2);
        assert_eq!(totals.on_duty_millis, 90 * MIN);
        assert_eq!(totals.break_millis, 30 * MIN);
        assert_eq!(totals.longest_on_duty_millis, 60 * MIN);
        assert_eq!(totals.average_on_duty_millis(), 45 * MIN);
        assert_eq!(totals.arrests, 2);
    }

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(ShiftTotals::default().average_on_duty_millis(), 0);
    }

    #[test]
    fn leaderboard_ordering_is_stable() {
        let mut entries = vec![
            entry(3, 1, 10),
            entry(2, 2, 10),
            entry(1, 2, 10),
            entry(4, 1, 50),
        ];

        rank_leaderboard(&mut entries);
        let order: Vec<u64> = entries.iter().map(|entry| entry.user_id).collect();
        assert_eq!(order, vec![4, 1, 2, 3]);
    }
}
