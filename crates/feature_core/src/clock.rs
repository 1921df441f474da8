//! Timestamp generation for repository-managed audit columns.
//!
//! # Invariants
//! - `epoch_ms` and `date` of one `Timestamp` describe the same instant.
//! - `date` uses local time formatted as `%Y-%m-%d %H:%M:%S`.

use chrono::{DateTime, Local, TimeZone};

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One clock reading in both stored representations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    /// Unix epoch milliseconds.
    pub epoch_ms: i64,
    /// Human-readable mirror of `epoch_ms`.
    pub date: String,
}

impl Timestamp {
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            epoch_ms: at.timestamp_millis(),
            date: at.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Source of the current time for create/update stamping.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_datetime(&Local::now())
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, SystemClock, Timestamp};
    use chrono::{TimeZone, Utc};

    #[test]
    fn timestamp_formats_both_representations() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap();
        let stamp = Timestamp::from_datetime(&at);
        assert_eq!(stamp.epoch_ms, 1_709_967_902_000);
        assert_eq!(stamp.date, "2024-03-09 07:05:02");
    }

    #[test]
    fn system_clock_is_monotonic_enough_for_stamping() {
        let first = SystemClock.now();
        let second = SystemClock.now();
        assert!(second.epoch_ms >= first.epoch_ms);
        assert_eq!(first.date.len(), "2024-01-01 00:00:00".len());
    }
}
