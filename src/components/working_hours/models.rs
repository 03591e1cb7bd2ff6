use super::time::TimeOfDay;
use chrono::{DateTime, Utc};
use rust_i18n::t;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Day of the week, numbered from Sunday (0) to Saturday (6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DayOfWeek {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

/// Short day codes used at the prompt, indexed by day number
const DAY_CODES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

impl DayOfWeek {
    /// All days in week order, Sunday first
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    pub const fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get(usize::from(number)).copied()
    }

    /// Short code used at the prompt ("mon", "tue", ...)
    pub fn code(self) -> &'static str {
        DAY_CODES[usize::from(self.number())]
    }

    /// Localized day name in the current locale
    pub fn name(self) -> String {
        self.name_in(&rust_i18n::locale())
    }

    /// Localized day name in the given locale
    pub fn name_in(self, locale: &str) -> String {
        match self {
            DayOfWeek::Sunday => t!("day_sunday", locale = locale),
            DayOfWeek::Monday => t!("day_monday", locale = locale),
            DayOfWeek::Tuesday => t!("day_tuesday", locale = locale),
            DayOfWeek::Wednesday => t!("day_wednesday", locale = locale),
            DayOfWeek::Thursday => t!("day_thursday", locale = locale),
            DayOfWeek::Friday => t!("day_friday", locale = locale),
            DayOfWeek::Saturday => t!("day_saturday", locale = locale),
        }
        .to_string()
    }

    /// Parse a day from a number (0-6), a short code or an English day name
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim().to_lowercase();
        if let Ok(number) = input.parse::<u8>() {
            return Self::from_number(number);
        }
        Self::ALL.into_iter().find(|day| {
            let code = day.code();
            input == code || format!("{day:?}").to_lowercase() == input
        })
    }
}

impl TryFrom<u8> for DayOfWeek {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_number(value).ok_or_else(|| format!("day of week out of range: {value}"))
    }
}

impl From<DayOfWeek> for u8 {
    fn from(day: DayOfWeek) -> Self {
        day.number()
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Opaque identifier of a working interval
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalId(String);

impl IntervalId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IntervalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for IntervalId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for IntervalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which end of an interval a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    Start,
    End,
}

impl TimeField {
    /// Localized field label
    pub fn label(self) -> String {
        match self {
            TimeField::Start => t!("field_start").to_string(),
            TimeField::End => t!("field_end").to_string(),
        }
    }
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeField::Start => f.write_str("start"),
            TimeField::End => f.write_str("end"),
        }
    }
}

/// One recurring weekly availability window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingInterval {
    pub id: IntervalId,
    pub day_of_week: DayOfWeek,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl WorkingInterval {
    /// Create an interval with a fresh id
    pub fn new(day_of_week: DayOfWeek, start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self {
            id: IntervalId::generate(),
            day_of_week,
            start_time,
            end_time,
        }
    }

    /// Half-open overlap test against another window on the same day
    pub fn overlaps(&self, day: DayOfWeek, start: TimeOfDay, end: TimeOfDay) -> bool {
        self.day_of_week == day && start < self.end_time && self.start_time < end
    }

    /// Format the interval's hours as a human-readable string
    pub fn format(&self) -> String {
        format!("{} - {}", self.start_time.to_hh_mm(), self.end_time.to_hh_mm())
    }
}

impl fmt::Display for WorkingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day_of_week, self.format())
    }
}

/// The in-progress, not yet committed interval of the add/edit form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub day: DayOfWeek,
    /// Start time as typed, HH:MM
    pub start: String,
    /// End time as typed, HH:MM
    pub end: String,
}

impl Draft {
    pub fn new(day: DayOfWeek, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            day,
            start: start.into(),
            end: end.into(),
        }
    }

    /// Load an existing interval into the form. Seconds are not shown; a commit
    /// keeps them for fields left untouched.
    pub fn from_interval(interval: &WorkingInterval) -> Self {
        Self {
            day: interval.day_of_week,
            start: interval.start_time.to_hh_mm(),
            end: interval.end_time.to_hh_mm(),
        }
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::new(DayOfWeek::Monday, "09:00", "17:00")
    }
}

impl fmt::Display for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} - {}", self.day, self.start, self.end)
    }
}

/// A draft that passed validation, with its times parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub day: DayOfWeek,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Slot {
    /// Restore the stored seconds of any field still at the minute it was loaded with
    pub fn keep_precision_of(self, interval: &WorkingInterval) -> Self {
        let keep = |typed: TimeOfDay, stored: TimeOfDay| {
            if typed == stored.truncate_to_minute() {
                stored
            } else {
                typed
            }
        };

        Self {
            day: self.day,
            start: keep(self.start, interval.start_time),
            end: keep(self.end, interval.end_time),
        }
    }
}

/// Edit session state of the manager
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing(IntervalId),
}

impl EditState {
    pub fn editing_id(&self) -> Option<&IntervalId> {
        match self {
            EditState::Idle => None,
            EditState::Editing(id) => Some(id),
        }
    }
}

/// A doctor's record as far as working hours are concerned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSchedule {
    /// The doctor's name
    pub doctor: String,
    /// Weekly working hours
    #[serde(default)]
    pub working_hours: Vec<WorkingInterval>,
    /// When the schedule was last updated
    pub last_updated: DateTime<Utc>,
}

impl DoctorSchedule {
    /// Create an empty schedule for a doctor
    pub fn new(doctor: impl Into<String>) -> Self {
        Self {
            doctor: doctor.into(),
            working_hours: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    /// Merge the manager's collection back into the record
    pub fn with_working_hours(mut self, working_hours: Vec<WorkingInterval>) -> Self {
        self.working_hours = working_hours;
        self.last_updated = Utc::now();
        self
    }
}
