//! Schedule descriptions and anchor resolution.
//!
//! A [`ScheduleDescription`] says *when* something recurs in the terms a
//! person would use ("every Wednesday", "the 27th of each month", "every
//! second week starting 15 July"). [`resolve_anchor`] turns that into a single
//! on-cycle [`LocalDate`], the anchor all occurrence math is relative to.
//!
//! Anniversary fields are placed in a fixed base period: January 2000. 2000 is
//! a leap year and January has 31 days, so every valid anniversary day (1–31)
//! and every valid day/month pair (including 29 February) exists there
//! without clamping. Any on-cycle date is an equally good anchor, so the base
//! year is never observable in results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{InvalidSchedule, Result, ScheduleError};
use crate::frequency::Frequency;
use crate::local_date::LocalDate;

/// A recurring schedule as described by a caller.
///
/// Each variant carries the fields its frequency can use. A `start_date`, when
/// present, always takes precedence over anniversary fields.
///
/// Deserializes from the tagged object shape
/// `{"frequency": "monthly", "anniversaryDay": 27}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "frequency",
    rename_all = "lowercase",
    rename_all_fields = "camelCase"
)]
pub enum ScheduleDescription {
    Daily {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_date: Option<LocalDate>,
    },
    Weekly {
        /// ISO weekday, 1 = Monday .. 7 = Sunday.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anniversary_day: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_date: Option<LocalDate>,
    },
    /// Every second week. Needs a start date: a weekday alone cannot tell
    /// "every second Tuesday" from the Tuesdays in between.
    Fortnightly {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_date: Option<LocalDate>,
    },
    Monthly {
        /// Day of month, 1..=31. Days past a month's end fall on its last day.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anniversary_day: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_date: Option<LocalDate>,
    },
    Annually {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anniversary_day: Option<u32>,
        /// Month of year, 1..=12.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        anniversary_month: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_date: Option<LocalDate>,
    },
}

impl ScheduleDescription {
    pub const fn daily() -> Self {
        Self::Daily { start_date: None }
    }

    /// Every week on ISO weekday `weekday` (1 = Monday).
    pub const fn weekly(weekday: u32) -> Self {
        Self::Weekly {
            anniversary_day: Some(weekday),
            start_date: None,
        }
    }

    pub const fn fortnightly(start_date: LocalDate) -> Self {
        Self::Fortnightly {
            start_date: Some(start_date),
        }
    }

    pub const fn monthly(day: u32) -> Self {
        Self::Monthly {
            anniversary_day: Some(day),
            start_date: None,
        }
    }

    pub const fn annually(day: u32, month: u32) -> Self {
        Self::Annually {
            anniversary_day: Some(day),
            anniversary_month: Some(month),
            start_date: None,
        }
    }

    /// A schedule of `frequency` anchored on `start_date`.
    pub const fn starting(frequency: Frequency, start_date: LocalDate) -> Self {
        let start_date = Some(start_date);
        match frequency {
            Frequency::Daily => Self::Daily { start_date },
            Frequency::Weekly => Self::Weekly {
                anniversary_day: None,
                start_date,
            },
            Frequency::Fortnightly => Self::Fortnightly { start_date },
            Frequency::Monthly => Self::Monthly {
                anniversary_day: None,
                start_date,
            },
            Frequency::Annually => Self::Annually {
                anniversary_day: None,
                anniversary_month: None,
                start_date,
            },
        }
    }

    pub const fn frequency(&self) -> Frequency {
        match self {
            Self::Daily { .. } => Frequency::Daily,
            Self::Weekly { .. } => Frequency::Weekly,
            Self::Fortnightly { .. } => Frequency::Fortnightly,
            Self::Monthly { .. } => Frequency::Monthly,
            Self::Annually { .. } => Frequency::Annually,
        }
    }

    pub const fn start_date(&self) -> Option<LocalDate> {
        match self {
            Self::Daily { start_date }
            | Self::Weekly { start_date, .. }
            | Self::Fortnightly { start_date }
            | Self::Monthly { start_date, .. }
            | Self::Annually { start_date, .. } => *start_date,
        }
    }

    fn has_anniversary_fields(&self) -> bool {
        match self {
            Self::Weekly {
                anniversary_day, ..
            }
            | Self::Monthly {
                anniversary_day, ..
            } => anniversary_day.is_some(),
            Self::Annually {
                anniversary_day,
                anniversary_month,
                ..
            } => anniversary_day.is_some() || anniversary_month.is_some(),
            Self::Daily { .. } | Self::Fortnightly { .. } => false,
        }
    }
}

// ── Options ─────────────────────────────────────────────────────────────────

/// Which anniversary days monthly and annual schedules accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnniversaryPolicy {
    /// Any day that exists in the anniversary month (1–31 for monthly,
    /// 1–29 for February). Shorter months fall back to their last day.
    #[default]
    Clamped,
    /// Only days 1–28, which exist in every month. Kept for callers that
    /// persisted schedules under the older rule.
    Strict,
}

/// Options for [`resolve_anchor_with_options`].
#[derive(Debug, Clone, Default)]
pub struct AnchorOptions {
    pub anniversary_policy: AnniversaryPolicy,
}

const STRICT_MAX_DAY: u32 = 28;

/// January 1st 2000: a leap year, in a 31-day month.
fn base_date() -> LocalDate {
    NaiveDate::from_ymd_opt(2000, 1, 1)
        .map_or(LocalDate::from_naive(NaiveDate::MIN), LocalDate::from_naive)
}

// ── resolve_anchor ──────────────────────────────────────────────────────────

/// Resolve a description to an anchor date using the default (clamped)
/// anniversary policy.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidSchedule`] when the description is missing
/// the field its frequency needs or a field is out of range.
///
/// # Examples
///
/// ```
/// use recurrence_engine::{resolve_anchor, ScheduleDescription};
///
/// let anchor = resolve_anchor(&ScheduleDescription::monthly(31)).unwrap();
/// assert_eq!(anchor.day_of_month(), 31);
/// ```
pub fn resolve_anchor(description: &ScheduleDescription) -> Result<LocalDate> {
    resolve_anchor_with_options(description, &AnchorOptions::default())
}

/// Resolve a description to an anchor date.
pub fn resolve_anchor_with_options(
    description: &ScheduleDescription,
    options: &AnchorOptions,
) -> Result<LocalDate> {
    let frequency = description.frequency();

    if let Some(start_date) = description.start_date() {
        if description.has_anniversary_fields() {
            tracing::debug!(
                %frequency,
                %start_date,
                "start date given, ignoring anniversary fields"
            );
        }
        return Ok(start_date);
    }

    let anchor = match *description {
        // Every date is on-cycle for a daily schedule.
        ScheduleDescription::Daily { .. } => base_date(),
        ScheduleDescription::Fortnightly { .. } => {
            return Err(InvalidSchedule::MissingStartDate { frequency }.into());
        }
        ScheduleDescription::Weekly {
            anniversary_day, ..
        } => {
            let day = require(frequency, "anniversaryDay", anniversary_day)?;
            base_date()
                .with_iso_weekday(day)
                .ok_or_else(|| out_of_range(frequency, day, 7))?
        }
        ScheduleDescription::Monthly {
            anniversary_day, ..
        } => {
            let day = require(frequency, "anniversaryDay", anniversary_day)?;
            let max = max_day(options.anniversary_policy, 31);
            if day > max {
                return Err(out_of_range(frequency, day, max));
            }
            base_date()
                .with_day_of_month(day)
                .ok_or_else(|| out_of_range(frequency, day, max))?
        }
        ScheduleDescription::Annually {
            anniversary_day,
            anniversary_month,
            ..
        } => {
            let day = require(frequency, "anniversaryDay", anniversary_day)?;
            let month = require(frequency, "anniversaryMonth", anniversary_month)?;
            let month_start = base_date()
                .with_month(month)
                .ok_or(InvalidSchedule::AnniversaryMonthOutOfRange { value: month })?;
            let max = max_day(options.anniversary_policy, month_start.days_in_month());
            if day > max {
                return Err(out_of_range(frequency, day, max));
            }
            month_start
                .with_day_of_month(day)
                .ok_or_else(|| out_of_range(frequency, day, max))?
        }
    };

    tracing::trace!(%frequency, %anchor, "resolved anchor from anniversary fields");
    Ok(anchor)
}

fn require(frequency: Frequency, field: &'static str, value: Option<u32>) -> Result<u32> {
    value.ok_or_else(|| InvalidSchedule::MissingAnniversary { frequency, field }.into())
}

fn max_day(policy: AnniversaryPolicy, month_length: u32) -> u32 {
    match policy {
        AnniversaryPolicy::Clamped => month_length,
        AnniversaryPolicy::Strict => month_length.min(STRICT_MAX_DAY),
    }
}

fn out_of_range(frequency: Frequency, value: u32, max: u32) -> ScheduleError {
    InvalidSchedule::AnniversaryOutOfRange {
        frequency,
        value,
        min: 1,
        max,
    }
    .into()
}

// ── Tests ───────────────────────────────────────────────────────────────────
