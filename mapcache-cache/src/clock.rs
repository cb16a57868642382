//! Manually driven clock for deterministic expiry.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use parking_lot::Mutex;

use mapcache_core::traits::Clock;

/// Clock that only moves when told to.
///
/// Lets hosts and tests step through TTL boundaries without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Creates a clock frozen at `millis` after the Unix epoch.
    pub fn at_millis(millis: i64) -> Self {
        let start = Utc
            .timestamp_millis_opt(millis)
            .single()
            .unwrap_or_default();
        Self::new(start)
    }

    /// Moves the clock forward by `millis`.
    pub fn advance_millis(&self, millis: i64) {
        let mut now = self.now.lock();
        *now += TimeDelta::milliseconds(millis);
    }

    /// Jumps the clock to `at`.
    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock() = at;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at_millis(0)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_frozen() {
        let clock = ManualClock::at_millis(1_000);
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().timestamp_millis(), 1_000);
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::default();
        clock.advance_millis(10_001);
        assert_eq!(clock.now().timestamp_millis(), 10_001);
    }

    #[test]
    fn test_manual_clock_set() {
        let clock = ManualClock::default();
        let target = Utc.timestamp_millis_opt(42).unwrap();
        clock.set(target);
        assert_eq!(clock.now(), target);
    }
}
