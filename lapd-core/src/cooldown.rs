use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Per (command, user) cooldown stamps.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    stamps: DashMap<(String, u64), Instant>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time left before `user_id` may run `command` again, if any.
    pub fn remaining(
        &self,
        command: &str,
        user_id: u64,
        cooldown: Duration,
        now: Instant,
    ) -> Option<Duration> {
        let last_used = *self.stamps.get(&(command.to_owned(), user_id))?;
        let elapsed = now.saturating_duration_since(last_used);

        (elapsed < cooldown).then(|| cooldown - elapsed)
    }

    /// Record a successful invocation.
    pub fn stamp(&self, command: &str, user_id: u64, now: Instant) {
        self.stamps.insert((command.to_owned(), user_id), now);
    }

    /// Drop stamps older than `max_cooldown`; they can no longer block anyone.
    pub fn prune(&self, max_cooldown: Duration, now: Instant) -> usize {
        let before = self.stamps.len();
        self.stamps
            .retain(|_, last_used| now.saturating_duration_since(*last_used) < max_cooldown);
        before - self.stamps.len()
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::CooldownTracker;

    #[test]
    fn cooldown_runs_out() {
        let tracker = CooldownTracker::new();
        let start = Instant::now();
        let cooldown = Duration::from_secs(5);

        assert_eq!(tracker.remaining("duty manage", 1, cooldown, start), None);

        tracker.stamp("duty manage", 1, start);
        assert_eq!(
            tracker.remaining("duty manage", 1, cooldown, start + Duration::from_secs(2)),
            Some(Duration::from_secs(3))
        );
        assert_eq!(
            tracker.remaining("duty manage", 1, cooldown, start + cooldown),
            None
        );
    }

    #[test]
    fn stamps_are_per_command_and_user() {
        let tracker = CooldownTracker::new();
        let now = Instant::now();
        tracker.stamp("log arrest", 1, now);

        let cooldown = Duration::from_secs(10);
        assert!(tracker.remaining("log arrest", 2, cooldown, now).is_none());
        assert!(tracker.remaining("log citation", 1, cooldown, now).is_none());
        assert!(tracker.remaining("log arrest", 1, cooldown, now).is_some());
    }

    #[test]
    fn prune_drops_stale_entries() {
        let tracker = CooldownTracker::new();
        let start = Instant::now();
        tracker.stamp("ping", 1, start);
        tracker.stamp("ping", 2, start + Duration::from_secs(50));

        let removed = tracker.prune(Duration::from_secs(30), start + Duration::from_secs(60));
        assert_eq!(removed, 1);
        assert_eq!(tracker.len(), 1);
    }
}
