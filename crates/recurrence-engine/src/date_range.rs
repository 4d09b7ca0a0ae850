//! Inclusive date intervals, open on either side.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{InvalidSchedule, Result};
use crate::local_date::LocalDate;

/// Where a [`DateRange`] sits relative to a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Currentness {
    /// The range ended before the reference date.
    Past,
    /// The reference date falls inside the range.
    Current,
    /// The range starts after the reference date.
    Future,
}

/// `[start, end]`, both ends inclusive. A missing end is unbounded on that side.
///
/// Invariant: when both ends are present, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<LocalDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<LocalDate>,
}

#[derive(Deserialize)]
struct RawDateRange {
    #[serde(default)]
    start: Option<LocalDate>,
    #[serde(default)]
    end: Option<LocalDate>,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = InvalidSchedule;

    fn try_from(raw: RawDateRange) -> std::result::Result<Self, Self::Error> {
        validate(raw.start, raw.end)
    }
}

fn validate(
    start: Option<LocalDate>,
    end: Option<LocalDate>,
) -> std::result::Result<DateRange, InvalidSchedule> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            Err(InvalidSchedule::IntervalInverted { start, end })
        }
        _ => Ok(DateRange { start, end }),
    }
}

impl DateRange {
    /// # Errors
    ///
    /// Returns [`InvalidSchedule::IntervalInverted`] if `end` is before `start`.
    pub fn new(start: Option<LocalDate>, end: Option<LocalDate>) -> Result<Self> {
        Ok(validate(start, end)?)
    }

    /// Like [`DateRange::new`], but an inverted range yields `None`.
    pub fn checked(start: Option<LocalDate>, end: Option<LocalDate>) -> Option<Self> {
        validate(start, end).ok()
    }

    pub fn between(start: LocalDate, end: LocalDate) -> Result<Self> {
        Self::new(Some(start), Some(end))
    }

    /// `[start, ∞)`
    pub const fn starting(start: LocalDate) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// `(-∞, end]`
    pub const fn ending(end: LocalDate) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    pub const fn start(&self) -> Option<LocalDate> {
        self.start
    }

    pub const fn end(&self) -> Option<LocalDate> {
        self.end
    }

    pub fn currentness(&self, as_of: LocalDate) -> Currentness {
        if self.start.is_some_and(|start| start > as_of) {
            return Currentness::Future;
        }
        if self.end.is_some_and(|end| end < as_of) {
            return Currentness::Past;
        }
        Currentness::Current
    }

    /// True if the whole range lies before `as_of`.
    pub fn is_past(&self, as_of: LocalDate) -> bool {
        self.currentness(as_of) == Currentness::Past
    }

    pub fn contains(&self, date: LocalDate) -> bool {
        self.currentness(date) == Currentness::Current
    }

    /// True if the whole range lies after `as_of`.
    pub fn is_future(&self, as_of: LocalDate) -> bool {
        self.currentness(as_of) == Currentness::Future
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start {
            Some(start) => write!(f, "[{start}, ")?,
            None => f.write_str("(-∞, ")?,
        }
        match self.end {
            Some(end) => write!(f, "{end}]"),
            None => f.write_str("∞)"),
        }
    }
}
