//! Wall clock abstraction
//!
//! Console timers and the "attempt completed" log line read the time through
//! [`Clock`] so tests can pin it.

use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use std::sync::Mutex;

/// Source of the current time
pub trait Clock: std::fmt::Debug + Send + Sync {
    /// Returns the current UTC time
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually controlled clock for deterministic tests
#[derive(Debug)]
pub struct FixedClock {
    current: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Creates a clock frozen at the given time
    #[must_use]
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            current: Mutex::new(time),
        }
    }

    /// Creates a clock frozen at a Unix timestamp in milliseconds
    #[must_use]
    pub fn at_millis(millis: i64) -> Self {
        let time = Utc
            .timestamp_millis_opt(millis)
            .single()
            .unwrap_or(DateTime::UNIX_EPOCH);
        Self::at(time)
    }

    /// Moves the clock forward
    pub fn advance(&self, by: Duration) {
        if let Ok(mut current) = self.current.lock() {
            *current += by;
        }
    }

    /// Sets the clock to a new time
    pub fn set(&self, time: DateTime<Utc>) {
        if let Ok(mut current) = self.current.lock() {
            *current = time;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.current
            .lock()
            .map(|t| *t)
            .unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// Formats a timestamp as ISO-8601 with milliseconds, e.g. `2024-01-01T00:00:00.000Z`
#[must_use]
pub fn iso_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_at_millis() {
        let clock = FixedClock::at_millis(0);
        assert_eq!(clock.now(), DateTime::UNIX_EPOCH);
    }

    #[test]
    fn test_fixed_clock_advance() {
        let clock = FixedClock::at_millis(1_000);
        clock.advance(Duration::milliseconds(250));
        assert_eq!(clock.now().timestamp_millis(), 1_250);
    }

    #[test]
    fn test_fixed_clock_set() {
        let clock = FixedClock::at_millis(0);
        clock.set(Utc.timestamp_millis_opt(42).unwrap());
        assert_eq!(clock.now().timestamp_millis(), 42);
    }

    #[test]
    fn test_iso_timestamp_format() {
        let time = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(iso_timestamp(time), "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
