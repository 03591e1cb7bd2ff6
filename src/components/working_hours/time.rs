use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of seconds in a nominal day
pub const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Wall-clock time of day, stored as seconds since midnight.
///
/// Exchanged as `HH:MM:SS` and edited as `HH:MM`. Ordering is plain integer
/// ordering, so comparisons never depend on string formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self(0);

    /// Build a time from its components, `None` when out of range
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        Some(Self(hour * 3600 + minute * 60 + second))
    }

    /// Build a time from seconds since midnight, `None` past the end of the day
    pub fn from_seconds(seconds: u32) -> Option<Self> {
        (seconds < SECONDS_PER_DAY).then_some(Self(seconds))
    }

    pub const fn seconds_since_midnight(self) -> u32 {
        self.0
    }

    pub const fn hour(self) -> u32 {
        self.0 / 3600
    }

    pub const fn minute(self) -> u32 {
        (self.0 % 3600) / 60
    }

    pub const fn second(self) -> u32 {
        self.0 % 60
    }

    /// Drop the seconds, as the draft form only carries minutes
    pub const fn truncate_to_minute(self) -> Self {
        Self(self.0 - self.0 % 60)
    }

    /// Parse time string in HH:MM format (draft granularity)
    pub fn parse_hh_mm(time_str: &str) -> Option<Self> {
        NaiveTime::parse_from_str(time_str.trim(), "%H:%M")
            .ok()
            .map(Self::from)
    }

    /// Parse an exchanged value, HH:MM:SS or HH:MM
    pub fn parse_exchange(time_str: &str) -> Option<Self> {
        let time_str = time_str.trim();
        NaiveTime::parse_from_str(time_str, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(time_str, "%H:%M"))
            .ok()
            .map(Self::from)
    }

    /// Parse the shorthand people type at a prompt: "8", "8.30", "8,30" or "08:30"
    pub fn parse_lenient(time_str: &str) -> Option<Self> {
        // Replace commas with periods
        let time_str = time_str.trim().replace(',', ".");

        if time_str.contains(':') {
            return Self::parse_exchange(&time_str);
        }

        if let Some((hours, minutes)) = time_str.split_once('.') {
            let hours = hours.parse::<u32>().ok()?;
            let minutes = minutes.parse::<u32>().ok()?;
            return Self::from_hms(hours, minutes, 0);
        }

        // Just a number (e.g., "8"), assume it's hours
        let hours = time_str.parse::<u32>().ok()?;
        Self::from_hms(hours, 0, 0)
    }

    /// Format as HH:MM for the draft form
    pub fn to_hh_mm(self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }

    /// Format as HH:MM:SS for exchange with the host
    pub fn to_hh_mm_ss(self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour(), self.minute(), self.second())
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        Self(time.num_seconds_from_midnight())
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_exchange(&value).ok_or_else(|| format!("invalid time of day: {value:?}"))
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_hh_mm_ss()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.second() == 0 {
            f.write_str(&self.to_hh_mm())
        } else {
            f.write_str(&self.to_hh_mm_ss())
        }
    }
}
