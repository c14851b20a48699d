//! Calendar-day and clock-time primitives shared by every tracker.
//!
//! # Responsibility
//! - Parse and format the `YYYY-MM-DD` day keys used as record dates.
//! - Parse and format the `HH:MM` 24h clock times attached to entries.
//!
//! # Invariants
//! - Day keys are zero-padded ISO dates; anything else is rejected.
//! - Clock times are zero-padded `HH:MM` in `00:00..=23:59`.

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Wire format for calendar days.
pub const DAY_FORMAT: &str = "%Y-%m-%d";
/// Wire format for clock times.
pub const CLOCK_FORMAT: &str = "%H:%M";

static DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid day regex"));
static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid clock regex"));

/// Parses one `YYYY-MM-DD` day key.
///
/// Returns `None` for non-padded input or impossible dates (`2024-02-30`).
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    if !DAY_RE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, DAY_FORMAT).ok()
}

/// Formats a day as its `YYYY-MM-DD` key.
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Parses one `HH:MM` clock value.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    if !CLOCK_RE.is_match(value) {
        return None;
    }
    NaiveTime::parse_from_str(value, CLOCK_FORMAT).ok()
}

/// `HH:MM` wall-clock time attached to a dated entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Builds a clock time from hour/minute, rejecting out-of-range values.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(CLOCK_FORMAT))
    }
}

impl FromStr for ClockTime {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_clock(value)
            .map(Self)
            .ok_or_else(|| format!("invalid clock time `{value}`; expected HH:MM"))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
