use chrono::{DateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{OrderingError, Result};

/// Planned point in time, in seconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnixTime(pub i64);

impl UnixTime {
    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    #[must_use]
    pub const fn as_secs(self) -> i64 {
        self.0
    }

    /// Parse either a plain integer second count or a `HH:MM:SS` time of day
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::InvalidTime`] if the value is neither.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if let Ok(secs) = trimmed.parse::<i64>() {
            return Ok(Self(secs));
        }
        parse_time_hms(trimmed)
            .map(|time| Self(i64::from(time.num_seconds_from_midnight())))
            .map_err(|_| OrderingError::InvalidTime { value: value.to_string() })
    }
}

impl fmt::Display for UnixTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::from_timestamp(self.0, 0) {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            None => write!(f, "{}s", self.0),
        }
    }
}

/// Parse a time string in HH:MM:SS format
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a valid time in HH:MM:SS format.
pub fn parse_time_hms(s: &str) -> std::result::Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
}

/// Closed planned occupation interval `[entry, exit]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub entry: UnixTime,
    pub exit: UnixTime,
}

/// Temporal relation of one interval to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalOrder {
    Before,
    After,
    Overlap,
}

impl Interval {
    #[must_use]
    pub const fn new(entry: UnixTime, exit: UnixTime) -> Self {
        Self { entry, exit }
    }

    #[must_use]
    pub const fn from_secs(entry: i64, exit: i64) -> Self {
        Self { entry: UnixTime(entry), exit: UnixTime(exit) }
    }

    /// Whether `exit` lies strictly before `entry`
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.exit < self.entry
    }

    /// Whether this interval is released before `other` is entered
    #[must_use]
    pub fn precedes(&self, other: &Self) -> bool {
        self.exit <= other.entry
    }

    /// Relation of `self` to `other`. Touching intervals do not overlap.
    /// When both `Before` and `After` hold (two zero-length intervals at the
    /// same instant) the caller decides via `self_first`.
    #[must_use]
    pub fn order(&self, other: &Self, self_first: bool) -> TemporalOrder {
        match (self.precedes(other), other.precedes(self)) {
            (true, true) if self_first => TemporalOrder::Before,
            (true, true) => TemporalOrder::After,
            (true, false) => TemporalOrder::Before,
            (false, true) => TemporalOrder::After,
            (false, false) => TemporalOrder::Overlap,
        }
    }

    /// Common part of two intervals, if neither precedes the other.
    /// A zero-length interval inside another one yields a zero-length overlap.
    #[must_use]
    pub fn overlap(&self, other: &Self) -> Option<Self> {
        if self.precedes(other) || other.precedes(self) {
            return None;
        }
        Some(Self {
            entry: self.entry.max(other.entry),
            exit: self.exit.min(other.exit),
        })
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.entry, self.exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_seconds() {
        assert_eq!(UnixTime::parse("3600").expect("valid time"), UnixTime(3600));
        assert_eq!(UnixTime::parse(" -5 ").expect("valid time"), UnixTime(-5));
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(UnixTime::parse("01:02:03").expect("valid time"), UnixTime(3723));
    }

    #[test]
    fn test_parse_invalid() {
        let err = UnixTime::parse("half past nine").expect_err("should not parse");
        assert!(matches!(err, OrderingError::InvalidTime { .. }));
    }

    #[test]
    fn test_display_uses_calendar_time() {
        assert_eq!(UnixTime(0).to_string(), "1970-01-01 00:00:00");
        assert_eq!(UnixTime(3723).to_string(), "1970-01-01 01:02:03");
    }

    #[test]
    fn test_order_touching_intervals() {
        let a = Interval::from_secs(0, 10);
        let b = Interval::from_secs(10, 20);
        assert_eq!(a.order(&b, true), TemporalOrder::Before);
        assert_eq!(a.order(&b, false), TemporalOrder::Before);
        assert_eq!(b.order(&a, true), TemporalOrder::After);
        assert!(a.overlap(&b).is_none());
    }

    #[test]
    fn test_order_overlapping_intervals() {
        let a = Interval::from_secs(0, 10);
        let b = Interval::from_secs(5, 15);
        assert_eq!(a.order(&b, true), TemporalOrder::Overlap);
        assert_eq!(a.overlap(&b), Some(Interval::from_secs(5, 10)));

        let instant = Interval::from_secs(7, 7);
        assert_eq!(a.order(&instant, true), TemporalOrder::Overlap);
        assert_eq!(a.overlap(&instant), Some(instant));
    }

    #[test]
    fn test_order_zero_length_tie() {
        let a = Interval::from_secs(7, 7);
        assert_eq!(a.order(&a, true), TemporalOrder::Before);
        assert_eq!(a.order(&a, false), TemporalOrder::After);
    }

    #[test]
    fn test_inverted() {
        assert!(Interval::from_secs(5, 4).is_inverted());
        assert!(!Interval::from_secs(5, 5).is_inverted());
    }
}
