//! Injectable wall clock for prompt rendering.

use chrono::{DateTime, FixedOffset, Local};

/// One reading of the clock, already formatted for the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockReading {
    /// `YYYY-MM-DD HH:MM:SS`.
    pub time: String,
    /// English weekday name, e.g. `Monday`.
    pub weekday: String,
    /// UTC offset, e.g. `+08:00`.
    pub timezone: String,
}

impl ClockReading {
    fn from_datetime<Tz: chrono::TimeZone>(at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            time: at.format("%Y-%m-%d %H:%M:%S").to_string(),
            weekday: at.format("%A").to_string(),
            timezone: at.format("%:z").to_string(),
        }
    }
}

/// Source of the current time.
pub trait ClockProvider: Send + Sync {
    fn now(&self) -> ClockReading;
}

/// Local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockProvider for SystemClock {
    fn now(&self) -> ClockReading {
        ClockReading::from_datetime(&Local::now())
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    at: DateTime<FixedOffset>,
}

impl FixedClock {
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self { at }
    }

    /// Parse an RFC 3339 timestamp such as `2025-03-03T09:30:00+08:00`.
    pub fn parse(rfc3339: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(rfc3339).map(Self::new)
    }
}

impl ClockProvider for FixedClock {
    fn now(&self) -> ClockReading {
        ClockReading::from_datetime(&self.at)
    }
}
