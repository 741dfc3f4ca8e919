//! Core type definitions with validation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the layout engine.
///
/// Structurally valid input never fails: empty event lists, zero-length and
/// inverted events all lay out (degenerately). Only values that cannot be
/// turned into a time or date at all are rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A date/time string could not be parsed.
    #[error("invalid time value: {value}")]
    InvalidTime { value: String },

    /// A bucket map key was not in `YYYY-MM-DD` form.
    #[error("invalid date key: {value} (expected YYYY-MM-DD)")]
    InvalidDateKey { value: String },

    /// The slot step cannot advance through the day.
    #[error("slot step must be at least one minute, got {step}")]
    InvalidStep { step: u32 },

    /// The now indicator cannot refresh on a zero period.
    #[error("now indicator refresh period must be non-zero")]
    ZeroTickPeriod,
}

/// Canonical format of bucket map keys.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar date used as a bucket map key.
///
/// All key formatting goes through this type so that producers and
/// consumers of a bucket map cannot disagree on the textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Key for the calendar date of `date`.
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Key for the calendar date an instant falls on.
    pub fn of(instant: NaiveDateTime) -> Self {
        Self(instant.date())
    }

    /// Returns the underlying date.
    pub const fn date(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LayoutError::InvalidDateKey {
            value: s.to_string(),
        };
        let date = NaiveDate::parse_from_str(s, DATE_KEY_FORMAT).map_err(|_| invalid())?;
        let key = Self(date);
        // chrono accepts unpadded fields; only the canonical spelling is a key
        if key.to_string() != s {
            return Err(invalid());
        }
        Ok(key)
    }
}

impl TryFrom<String> for DateKey {
    type Error = LayoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}

/// Parses an instant as wall-clock time.
///
/// Supports:
/// - ISO 8601 local: "2025-01-15T09:30", "2025-01-15T09:30:00", "2025-01-15T09:30:00.250"
/// - The same with a space separator: "2025-01-15 09:30"
/// - RFC 3339: "2025-01-15T09:30:00+02:00" (the wall-clock part is kept)
/// - A bare date: "2025-01-15" (midnight)
pub fn parse_instant(s: &str) -> Result<NaiveDateTime, LayoutError> {
    let trimmed = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_local());
    }

    let normalized = trimmed.replacen(' ', "T", 1);
    if let Ok(dt) = normalized.parse::<NaiveDateTime>() {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_KEY_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    Err(LayoutError::InvalidTime {
        value: s.to_string(),
    })
}
