//! Error types for recurrence-engine operations.

use thiserror::Error;

use crate::frequency::Frequency;
use crate::local_date::LocalDate;

/// A schedule description or date range that cannot describe a valid schedule.
///
/// Every variant is a caller error detected at construction time; nothing here
/// is transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidSchedule {
    #[error("{frequency} recurrences can only be calculated if a start date is provided")]
    MissingStartDate { frequency: Frequency },

    #[error("{frequency} recurrences require `{field}` unless a start date is provided")]
    MissingAnniversary {
        frequency: Frequency,
        field: &'static str,
    },

    #[error("{frequency} anniversary day {value} is outside [{min}, {max}]")]
    AnniversaryOutOfRange {
        frequency: Frequency,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("anniversary month {value} is outside [1, 12]")]
    AnniversaryMonthOutOfRange { value: u32 },

    #[error("end date {end} is before start date {start}")]
    IntervalInverted { start: LocalDate, end: LocalDate },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(#[from] InvalidSchedule),

    #[error(
        "Unbounded enumeration: called with no limit while it would return more than {cap} occurrences"
    )]
    UnboundedEnumeration { cap: usize },

    #[error("Unknown frequency: {0}")]
    UnknownFrequency(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Date arithmetic overflow: {0}")]
    DateOverflow(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
