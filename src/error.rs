use crate::components::working_hours::models::{IntervalId, TimeField, WorkingInterval};
use crate::components::working_hours::time::TimeOfDay;
use miette::{Diagnostic, Result};
use rust_i18n::t;
use thiserror::Error;

/// Reasons a draft interval is rejected before it reaches the collection
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ValidationError {
    #[error("Invalid {field} time: {value:?}")]
    #[diagnostic(
        code(practice_hours::invalid_time),
        help("Times are entered as HH:MM, for example 09:30")
    )]
    InvalidTime { field: TimeField, value: String },

    #[error("End time {end} is not after start time {start}")]
    #[diagnostic(code(practice_hours::non_positive_duration))]
    NonPositiveDuration { start: TimeOfDay, end: TimeOfDay },

    #[error("Overlaps with existing interval {conflicting}")]
    #[diagnostic(code(practice_hours::overlapping_interval))]
    OverlappingInterval { conflicting: WorkingInterval },
}

impl ValidationError {
    /// Localized, human-readable reason for display next to the form
    pub fn reason(&self) -> String {
        match self {
            Self::InvalidTime { field, value } => t!(
                "validation_invalid_time",
                field = field.label(),
                value = value
            )
            .to_string(),
            Self::NonPositiveDuration { start, end } => t!(
                "validation_non_positive_duration",
                start = start.to_hh_mm(),
                end = end.to_hh_mm()
            )
            .to_string(),
            Self::OverlappingInterval { conflicting } => t!(
                "validation_overlapping_interval",
                day = conflicting.day_of_week.name(),
                start = conflicting.start_time.to_hh_mm(),
                end = conflicting.end_time.to_hh_mm()
            )
            .to_string(),
        }
    }
}

/// Errors from the working hours manager operations
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ScheduleError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error("No interval is being edited")]
    #[diagnostic(code(practice_hours::not_editing))]
    NotEditing,

    #[error("Working hours are read-only")]
    #[diagnostic(code(practice_hours::disabled))]
    Disabled,

    #[error("Duplicate interval id: {0}")]
    #[diagnostic(code(practice_hours::duplicate_id))]
    DuplicateId(IntervalId),

    #[error("Interval {} ends before it starts", .0.id)]
    #[diagnostic(code(practice_hours::non_positive_interval))]
    NonPositiveInterval(WorkingInterval),

    #[error("No interval matches {0:?}")]
    #[diagnostic(code(practice_hours::not_found))]
    NotFound(String),
}

impl ScheduleError {
    /// Localized, human-readable reason
    pub fn reason(&self) -> String {
        match self {
            Self::Validation(e) => e.reason(),
            Self::NotEditing => t!("schedule_not_editing").to_string(),
            Self::Disabled => t!("schedule_disabled").to_string(),
            Self::DuplicateId(id) => t!("schedule_duplicate_id", id = id).to_string(),
            Self::NonPositiveInterval(interval) => {
                t!("schedule_non_positive_interval", interval = interval).to_string()
            }
            Self::NotFound(reference) => {
                t!("schedule_not_found", reference = reference).to_string()
            }
        }
    }
}

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(practice_hours::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(practice_hours::config))]
    Config(String),

    #[error("Command error: {0}")]
    #[diagnostic(code(practice_hours::command), help("Type `help` for the list of commands"))]
    Command(String),

    #[error("Store error: {0}")]
    #[diagnostic(code(practice_hours::store))]
    Store(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    #[diagnostic(code(practice_hours::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(practice_hours::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(practice_hours::other))]
    Other(String),
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Schedule(ScheduleError::Validation(err))
    }
}

// Implement From for JSON errors
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type AppResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Invalid environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create command errors
pub fn command_error(message: &str) -> Error {
    Error::Command(message.to_string())
}

/// Helper to create store errors
pub fn store_error(message: &str) -> Error {
    Error::Store(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
