//! Walking a schedule across a date range.
//!
//! The walk direction follows from which ends of the [`DateRange`] are known:
//!
//! - a start: ascending from the start, stopping at the end if there is one
//! - only an end: descending from the end, with no lower bound
//! - neither: ascending from the caller-supplied `today`
//!
//! Occurrences landing exactly on a bound are included. The walk stops at the
//! first candidate past the bound, so nothing outside the range is emitted.

use std::iter::FusedIterator;

use crate::date_range::DateRange;
use crate::error::{Result, ScheduleError};
use crate::local_date::LocalDate;
use crate::schedule::RecurringSchedule;

/// Default number of occurrences an unbounded walk may produce when the
/// caller gives no limit.
pub const DEFAULT_UNBOUNDED_CAP: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Options for [`RecurringSchedule::occurrences_in_with_options`].
#[derive(Debug, Clone)]
pub struct EnumerateOptions {
    /// Stop after this many occurrences.
    pub limit: Option<usize>,
    /// Without a `limit`, an unbounded walk fails instead of producing more
    /// than this many occurrences.
    pub unbounded_cap: usize,
}

impl Default for EnumerateOptions {
    fn default() -> Self {
        Self {
            limit: None,
            unbounded_cap: DEFAULT_UNBOUNDED_CAP,
        }
    }
}

impl EnumerateOptions {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }
}

/// Lazy walk over a schedule's occurrences. See [`RecurringSchedule::occurrences`].
///
/// Yields an error at most once, then ends.
#[derive(Debug, Clone)]
pub struct Occurrences {
    schedule: RecurringSchedule,
    direction: Direction,
    cursor: LocalDate,
    /// Whether `cursor` itself may be emitted (true only before the first step).
    inclusive: bool,
    bound: Option<LocalDate>,
    done: bool,
}

impl Occurrences {
    fn new(
        schedule: RecurringSchedule,
        direction: Direction,
        from: LocalDate,
        bound: Option<LocalDate>,
    ) -> Self {
        Self {
            schedule,
            direction,
            cursor: from,
            inclusive: true,
            bound,
            done: false,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// True if nothing but a limit can end this walk.
    pub fn is_unbounded(&self) -> bool {
        self.bound.is_none()
    }

    fn is_beyond_bound(&self, date: LocalDate) -> bool {
        match (self.direction, self.bound) {
            (Direction::Ascending, Some(end)) => date > end,
            (Direction::Descending, Some(start)) => date < start,
            (_, None) => false,
        }
    }
}

impl Iterator for Occurrences {
    type Item = Result<LocalDate>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let step = match self.direction {
            Direction::Ascending => self.schedule.next_occurrence(self.cursor, self.inclusive),
            Direction::Descending => {
                self.schedule.previous_occurrence(self.cursor, self.inclusive)
            }
        };
        let occurrence = match step {
            Ok(occurrence) => occurrence,
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };
        if self.is_beyond_bound(occurrence) {
            self.done = true;
            return None;
        }
        self.cursor = occurrence;
        self.inclusive = false;
        Some(Ok(occurrence))
    }
}

impl FusedIterator for Occurrences {}

impl RecurringSchedule {
    /// Lazily walk the occurrences inside `range`.
    ///
    /// `today` is only used when the range has neither a start nor an end.
    pub fn occurrences(&self, range: &DateRange, today: LocalDate) -> Occurrences {
        match (range.start(), range.end()) {
            (Some(start), end) => Occurrences::new(*self, Direction::Ascending, start, end),
            (None, Some(end)) => Occurrences::new(*self, Direction::Descending, end, None),
            (None, None) => Occurrences::new(*self, Direction::Ascending, today, None),
        }
    }

    /// Occurrences inside `range`, at most `limit` of them.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::UnboundedEnumeration`] if `limit` is `None`
    /// and the range is open in the walk direction, once more than
    /// [`DEFAULT_UNBOUNDED_CAP`] occurrences would be produced.
    ///
    /// # Examples
    ///
    /// ```
    /// use recurrence_engine::{DateRange, LocalDate, RecurringSchedule, ScheduleDescription};
    ///
    /// let schedule = RecurringSchedule::new(&ScheduleDescription::monthly(31)).unwrap();
    /// let start: LocalDate = "2021-01-01".parse().unwrap();
    /// let dates: Vec<String> = schedule
    ///     .occurrences_in(&DateRange::starting(start), Some(3), start)
    ///     .unwrap()
    ///     .iter()
    ///     .map(|d| d.to_string())
    ///     .collect();
    /// assert_eq!(dates, ["2021-01-31", "2021-02-28", "2021-03-31"]);
    /// ```
    pub fn occurrences_in(
        &self,
        range: &DateRange,
        limit: Option<usize>,
        today: LocalDate,
    ) -> Result<Vec<LocalDate>> {
        let options = EnumerateOptions {
            limit,
            ..EnumerateOptions::default()
        };
        self.occurrences_in_with_options(range, today, &options)
    }

    pub fn occurrences_in_with_options(
        &self,
        range: &DateRange,
        today: LocalDate,
        options: &EnumerateOptions,
    ) -> Result<Vec<LocalDate>> {
        let mut walk = self.occurrences(range, today);
        let guarded = options.limit.is_none() && walk.is_unbounded();
        tracing::debug!(
            schedule = %self,
            %range,
            direction = ?walk.direction(),
            limit = ?options.limit,
            "enumerating occurrences"
        );

        let mut result = Vec::new();
        while options.limit.is_none_or(|limit| result.len() < limit) {
            let Some(occurrence) = walk.next() else {
                break;
            };
            if guarded && result.len() >= options.unbounded_cap {
                tracing::debug!(
                    cap = options.unbounded_cap,
                    "unbounded enumeration without a limit"
                );
                return Err(ScheduleError::UnboundedEnumeration {
                    cap: options.unbounded_cap,
                });
            }
            result.push(occurrence?);
        }
        Ok(result)
    }

    /// The next occurrence after `as_of` that lies inside `range`.
    ///
    /// If `as_of` is before the range, this is the first occurrence in the
    /// range. `None` when that occurrence falls after the range's end.
    pub fn next_occurrence_in_range(
        &self,
        range: &DateRange,
        as_of: LocalDate,
    ) -> Result<Option<LocalDate>> {
        let occurrence = match range.start() {
            Some(start) if as_of < start => self.next_occurrence(start, true)?,
            _ => self.next_occurrence(as_of, false)?,
        };
        Ok(range
            .end()
            .is_none_or(|end| occurrence <= end)
            .then_some(occurrence))
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
