use std::time::Duration;

use dashmap::DashMap;

/// Consecutive failure counts per fleet, used to space out retries of a failing fleet.
///
/// Delays double from `base` on every failure and stop growing at `max`.
pub struct RetryTracker {
    failures: DashMap<String, u32>,
    base: Duration,
    max: Duration,
}

impl RetryTracker {
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            failures: DashMap::new(),
            base,
            max: max.max(base),
        }
    }

    /// Counts one more failure for `key` and returns the delay before the next attempt.
    pub fn record_failure(&self, key: &str) -> Duration {
        let mut entry = self.failures.entry(String::from(key)).or_insert(0);
        *entry = entry.saturating_add(1);
        self.delay_for(*entry)
    }

    pub fn record_success(&self, key: &str) {
        self.failures.remove(key);
    }

    pub fn failures(&self, key: &str) -> u32 {
        self.failures.get(key).map(|count| *count).unwrap_or(0)
    }

    fn delay_for(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(31);
        self.base
            .checked_mul(1u32 << exponent)
            .map(|delay| delay.min(self.max))
            .unwrap_or(self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_doubles_until_cap() {
        let tracker = RetryTracker::new(Duration::from_secs(5), Duration::from_secs(60));

        let delays = (0..6)
            .map(|_| tracker.record_failure("swatch/tally").as_secs())
            .collect::<Vec<_>>();

        assert_eq!(delays, vec![5, 10, 20, 40, 60, 60]);
        assert_eq!(tracker.failures("swatch/tally"), 6);
    }

    #[test]
    fn success_resets_the_count() {
        let tracker = RetryTracker::new(Duration::from_secs(5), Duration::from_secs(60));
        tracker.record_failure("swatch/tally");
        tracker.record_failure("swatch/tally");

        tracker.record_success("swatch/tally");

        assert_eq!(tracker.failures("swatch/tally"), 0);
        assert_eq!(tracker.record_failure("swatch/tally"), Duration::from_secs(5));
    }

    #[test]
    fn fleets_are_tracked_independently() {
        let tracker = RetryTracker::new(Duration::from_secs(1), Duration::from_secs(30));
        tracker.record_failure("swatch/a");
        tracker.record_failure("swatch/a");

        assert_eq!(tracker.record_failure("swatch/b"), Duration::from_secs(1));
        assert_eq!(tracker.failures("swatch/a"), 2);
    }

    #[test]
    fn huge_failure_counts_stay_capped() {
        let tracker = RetryTracker::new(Duration::from_secs(5), Duration::from_secs(300));
        assert_eq!(tracker.delay_for(u32::MAX), Duration::from_secs(300));
    }
}
