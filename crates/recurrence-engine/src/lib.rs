//! # recurrence-engine
//!
//! Deterministic calendar arithmetic for recurring schedules.
//!
//! A schedule is a frequency (daily, weekly, fortnightly, monthly, annually)
//! plus an anchor date. The engine answers "when is the next/previous
//! occurrence?", "does it fire on this date?" and "which dates fall inside
//! this range?" while handling month-length and leap-year asymmetry: a
//! schedule anchored on the 31st fires on the last day of shorter months, and
//! one anchored on 29 February fires on the 28th in common years.
//!
//! Every query is a pure function of its inputs. Nothing reads the system
//! clock except the explicit [`LocalDate::today_in`] helpers.
//!
//! ## Modules
//!
//! - [`local_date`]: timezone-free civil dates with clamped month arithmetic
//! - [`date_range`]: inclusive date ranges, open on either side
//! - [`frequency`]: the frequency table and its periods
//! - [`anchor`]: schedule descriptions and anchor resolution
//! - [`schedule`]: [`RecurringSchedule`] and occurrence queries
//! - [`enumerate`]: walking occurrences across a range
//! - [`format`]: human-readable schedule descriptions
//! - [`error`]: error types
//!
//! ## Example
//!
//! ```
//! use recurrence_engine::{LocalDate, RecurringSchedule, ScheduleDescription};
//!
//! let schedule = RecurringSchedule::new(&ScheduleDescription::annually(29, 2)).unwrap();
//! let as_of: LocalDate = "2021-01-01".parse().unwrap();
//!
//! assert_eq!(schedule.next_occurrence(as_of, false).unwrap().to_string(), "2021-02-28");
//! assert_eq!(schedule.previous_occurrence(as_of, false).unwrap().to_string(), "2020-02-29");
//! assert_eq!(schedule.to_string(), "29th February each year");
//! ```

pub mod anchor;
pub mod date_range;
pub mod enumerate;
pub mod error;
pub mod format;
pub mod frequency;
pub mod local_date;
pub mod schedule;

pub use anchor::{
    resolve_anchor, resolve_anchor_with_options, AnchorOptions, AnniversaryPolicy,
    ScheduleDescription,
};
pub use date_range::{Currentness, DateRange};
pub use enumerate::{Direction, EnumerateOptions, Occurrences, DEFAULT_UNBOUNDED_CAP};
pub use error::{InvalidSchedule, Result, ScheduleError};
pub use format::ScheduleFormat;
pub use frequency::{Frequency, Period};
pub use local_date::{DateUnit, LocalDate};
pub use schedule::RecurringSchedule;
