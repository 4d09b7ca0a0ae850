//! Recurring schedules and occurrence queries.
//!
//! A [`RecurringSchedule`] is a frequency plus an anchor date. Occurrences are
//! `anchor + k × period` for every integer `k`, with month and year steps
//! clamped to month ends. All queries are pure functions of the schedule and
//! an explicit `as_of` date.
//!
//! # Algorithm
//!
//! The building block is *periods-to-anchor*: the exact (fractional) calendar
//! difference between a date and the anchor, divided by the period count. Its
//! floor or ceiling names the neighbouring occurrence index `k`. Because
//! months have different lengths, the candidate is then confirmed with
//! calendar arithmetic (stepping `k` while the neighbour is still on the
//! wrong side of `as_of`) rather than trusted from the real-valued count.

use serde::Serialize;

use crate::anchor::{resolve_anchor_with_options, AnchorOptions, ScheduleDescription};
use crate::error::{Result, ScheduleError};
use crate::frequency::{Frequency, Period};
use crate::local_date::LocalDate;

/// An immutable recurring schedule: every `frequency` period from `anchor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RecurringSchedule {
    frequency: Frequency,
    anchor: LocalDate,
}

impl RecurringSchedule {
    /// Validate a description and build the schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidSchedule`] if the description is
    /// incomplete or out of range (see [`crate::anchor::resolve_anchor`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use recurrence_engine::{LocalDate, RecurringSchedule, ScheduleDescription};
    ///
    /// let schedule = RecurringSchedule::new(&ScheduleDescription::monthly(27)).unwrap();
    /// let as_of: LocalDate = "2020-04-28".parse().unwrap();
    /// assert_eq!(schedule.next_occurrence(as_of, false).unwrap().to_string(), "2020-05-27");
    /// ```
    pub fn new(description: &ScheduleDescription) -> Result<Self> {
        Self::with_options(description, &AnchorOptions::default())
    }

    pub fn with_options(description: &ScheduleDescription, options: &AnchorOptions) -> Result<Self> {
        let anchor = resolve_anchor_with_options(description, options)?;
        Ok(Self::from_anchor(description.frequency(), anchor))
    }

    /// Build a schedule directly from an anchor. Any date is a valid anchor.
    pub const fn from_anchor(frequency: Frequency, anchor: LocalDate) -> Self {
        Self { frequency, anchor }
    }

    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub const fn anchor(&self) -> LocalDate {
        self.anchor
    }

    pub const fn period(&self) -> Period {
        self.frequency.period()
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Whether the schedule fires on `date`.
    pub fn has_occurrence_on(&self, date: LocalDate) -> bool {
        let Ok(periods) = self.periods_to_anchor(date) else {
            return false;
        };
        self.occurrence(periods.round() as i64)
            .is_ok_and(|occurrence| occurrence == date)
    }

    /// The first occurrence after `as_of`, or on it when `inclusive`.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::DateOverflow`] if the occurrence falls outside
    /// the representable date range.
    pub fn next_occurrence(&self, as_of: LocalDate, inclusive: bool) -> Result<LocalDate> {
        if inclusive && self.has_occurrence_on(as_of) {
            return Ok(as_of);
        }
        let follows = |date: LocalDate| date > as_of;

        let mut k = (self.periods_to_anchor(as_of)? + 1.0).floor() as i64;
        while !follows(self.occurrence(k)?) {
            k += 1;
        }
        while follows(self.occurrence(k - 1)?) {
            k -= 1;
        }
        self.occurrence(k)
    }

    /// The last occurrence before `as_of`, or on it when `inclusive`.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::DateOverflow`] if the occurrence falls outside
    /// the representable date range.
    pub fn previous_occurrence(&self, as_of: LocalDate, inclusive: bool) -> Result<LocalDate> {
        if inclusive && self.has_occurrence_on(as_of) {
            return Ok(as_of);
        }
        let precedes = |date: LocalDate| date < as_of;

        let mut k = (self.periods_to_anchor(as_of)? - 1.0).ceil() as i64;
        while !precedes(self.occurrence(k)?) {
            k -= 1;
        }
        while precedes(self.occurrence(k + 1)?) {
            k += 1;
        }
        self.occurrence(k)
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// Signed number of periods from the anchor to `date`, possibly fractional.
    fn periods_to_anchor(&self, date: LocalDate) -> Result<f64> {
        let period = self.period();
        let diff = date.diff(self.anchor, period.unit, true)?;
        Ok(diff / period.count as f64)
    }

    /// The `k`-th occurrence counted from the anchor (`k = 0` is the anchor).
    fn occurrence(&self, k: i64) -> Result<LocalDate> {
        let period = self.period();
        let amount = k.checked_mul(period.count).ok_or_else(|| {
            ScheduleError::DateOverflow(format!("{k} periods from {}", self.anchor))
        })?;
        self.anchor.add(amount, period.unit)
    }
}

impl TryFrom<&ScheduleDescription> for RecurringSchedule {
    type Error = ScheduleError;

    fn try_from(description: &ScheduleDescription) -> Result<Self> {
        Self::new(description)
    }
}

impl TryFrom<ScheduleDescription> for RecurringSchedule {
    type Error = ScheduleError;

    fn try_from(description: ScheduleDescription) -> Result<Self> {
        Self::new(&description)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
