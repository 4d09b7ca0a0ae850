//! Timezone-free calendar dates.
//!
//! [`LocalDate`] is a thin wrapper over [`chrono::NaiveDate`] exposing the
//! handful of operations the recurrence calculus relies on: unit arithmetic
//! with month-end clamping, exact (fractional) differences, and field setters.
//!
//! Month and year arithmetic never overflows into the following month:
//! `2021-01-31 + 1 month = 2021-02-28` and `2020-02-29 + 1 year = 2021-02-28`.
//! Everything recurring on "the 31st" or on "29 February" depends on that.
//!
//! The only wall-clock reads are [`LocalDate::today_in`] and
//! [`LocalDate::today_in_named`]. Nothing else in the crate calls them; callers
//! resolve "today" once and pass it in.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Calendar unit for [`LocalDate::add`] and [`LocalDate::diff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateUnit {
    Day,
    Week,
    Month,
    Year,
}

impl fmt::Display for DateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DateUnit::Day => "day",
            DateUnit::Week => "week",
            DateUnit::Month => "month",
            DateUnit::Year => "year",
        };
        f.write_str(name)
    }
}

/// A civil date with no time-of-day and no timezone.
///
/// Serializes as an ISO 8601 `YYYY-MM-DD` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalDate(NaiveDate);

impl LocalDate {
    /// Build a date from a year, a 1-based month and a day of month.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidDate`] if the date does not exist
    /// (e.g. `2021-02-29`).
    ///
    /// # Examples
    ///
    /// ```
    /// use recurrence_engine::LocalDate;
    ///
    /// let date = LocalDate::from_ymd(2020, 2, 29).unwrap();
    /// assert_eq!(date.to_string(), "2020-02-29");
    /// assert!(LocalDate::from_ymd(2021, 2, 29).is_err());
    /// ```
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| {
                ScheduleError::InvalidDate(format!("{year:04}-{month:02}-{day:02} does not exist"))
            })
    }

    pub const fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub const fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// The calendar date of `instant` as observed in `tz`.
    pub fn from_utc_in(instant: DateTime<Utc>, tz: Tz) -> Self {
        Self(instant.with_timezone(&tz).date_naive())
    }

    /// Like [`LocalDate::from_utc_in`], with an IANA timezone name.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidTimezone`] if the name is not a known
    /// IANA timezone.
    pub fn from_utc_in_named(instant: DateTime<Utc>, timezone: &str) -> Result<Self> {
        Ok(Self::from_utc_in(instant, parse_timezone(timezone)?))
    }

    /// Today's date in `tz`, read from the system clock.
    pub fn today_in(tz: Tz) -> Self {
        Self::from_utc_in(Utc::now(), tz)
    }

    /// Today's date in the named IANA timezone, read from the system clock.
    pub fn today_in_named(timezone: &str) -> Result<Self> {
        Self::from_utc_in_named(Utc::now(), timezone)
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month of the year, 1 (January) to 12 (December).
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day_of_month(&self) -> u32 {
        self.0.day()
    }

    /// ISO weekday number: 1 = Monday .. 7 = Sunday.
    pub fn day_of_week(&self) -> u32 {
        self.0.weekday().number_from_monday()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn days_in_month(&self) -> u32 {
        // Month comes from a valid date, so the lookup cannot miss.
        month_length(self.year(), self.month()).unwrap_or(31)
    }

    // ── Arithmetic ──────────────────────────────────────────────────────

    /// Add `amount` units (negative to go back in time).
    ///
    /// Months and years clamp to the last day of the target month.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::DateOverflow`] if the result falls outside the
    /// representable date range.
    ///
    /// # Examples
    ///
    /// ```
    /// use recurrence_engine::{DateUnit, LocalDate};
    ///
    /// let jan31: LocalDate = "2021-01-31".parse().unwrap();
    /// assert_eq!(jan31.add(1, DateUnit::Month).unwrap().to_string(), "2021-02-28");
    /// ```
    pub fn add(self, amount: i64, unit: DateUnit) -> Result<Self> {
        shift(self.0, amount, unit)
            .map(Self)
            .ok_or_else(|| ScheduleError::DateOverflow(format!("{self} + {amount} {unit}")))
    }

    pub fn subtract(self, amount: i64, unit: DateUnit) -> Result<Self> {
        let negated = amount
            .checked_neg()
            .ok_or_else(|| ScheduleError::DateOverflow(format!("{self} - {amount} {unit}")))?;
        self.add(negated, unit)
    }

    /// The day before this one.
    pub fn pred(self) -> Result<Self> {
        self.subtract(1, DateUnit::Day)
    }

    /// The day after this one.
    pub fn succ(self) -> Result<Self> {
        self.add(1, DateUnit::Day)
    }

    /// Signed difference `self - other` measured in `unit`.
    ///
    /// With `exact`, month and year differences are fractional: whole months
    /// counted from `self` towards `other`, plus the fraction of the
    /// neighbouring month span left over. Dates that are a whole number of
    /// clamped months apart therefore produce integral values, e.g.
    /// `2021-02-28 - 2021-01-31 = 1.0` month. Without `exact` the value is
    /// truncated toward zero.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::DateOverflow`] if a neighbouring month needed
    /// for the fraction lies outside the representable range.
    pub fn diff(self, other: LocalDate, unit: DateUnit, exact: bool) -> Result<f64> {
        let value = match unit {
            DateUnit::Day => self.days_since(other) as f64,
            DateUnit::Week => self.days_since(other) as f64 / 7.0,
            DateUnit::Month => self.months_since(other)?,
            DateUnit::Year => self.months_since(other)? / 12.0,
        };
        Ok(if exact { value } else { value.trunc() })
    }

    fn days_since(self, other: LocalDate) -> i64 {
        self.0.signed_duration_since(other.0).num_days()
    }

    fn months_since(self, other: LocalDate) -> Result<f64> {
        month_diff(self.0, other.0).ok_or_else(|| {
            ScheduleError::DateOverflow(format!("month difference between {self} and {other}"))
        })
    }

    // ── Setters ─────────────────────────────────────────────────────────

    /// Same year and day in another month (1-based), clamping the day to the
    /// month's length. `None` if `month` is not in 1..=12.
    pub fn with_month(self, month: u32) -> Option<Self> {
        let day = self.day_of_month().min(month_length(self.year(), month)?);
        NaiveDate::from_ymd_opt(self.year(), month, day).map(Self)
    }

    /// Same year and month on another day. `None` if that day does not exist
    /// in this month, which lets callers validate by round-tripping.
    pub fn with_day_of_month(self, day: u32) -> Option<Self> {
        self.0.with_day(day).map(Self)
    }

    /// The date with ISO weekday `weekday` (1 = Monday) in the same
    /// Monday-started week. `None` if `weekday` is not in 1..=7.
    pub fn with_iso_weekday(self, weekday: u32) -> Option<Self> {
        if !(1..=7).contains(&weekday) {
            return None;
        }
        let delta = i64::from(weekday) - i64::from(self.day_of_week());
        shift_days(self.0, delta).map(Self)
    }
}

impl fmt::Display for LocalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for LocalDate {
    type Err = ScheduleError;

    /// Parse a strict `YYYY-MM-DD` value.
    fn from_str(s: &str) -> Result<Self> {
        if !is_iso_date_shape(s) {
            return Err(ScheduleError::InvalidDate(format!(
                "'{s}': expected YYYY-MM-DD"
            )));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|e| ScheduleError::InvalidDate(format!("'{s}': {e}")))
    }
}

impl From<NaiveDate> for LocalDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<LocalDate> for NaiveDate {
    fn from(date: LocalDate) -> Self {
        date.0
    }
}

// ── Internal helpers ────────────────────────────────────────────────────────

/// Parse an IANA timezone string into `Tz`.
fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| ScheduleError::InvalidTimezone(format!("'{s}'")))
}

fn is_iso_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn month_length(year: i32, month: u32) -> Option<u32> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => Some(29),
        2 => Some(28),
        _ => None,
    }
}

fn shift(date: NaiveDate, amount: i64, unit: DateUnit) -> Option<NaiveDate> {
    match unit {
        DateUnit::Day => shift_days(date, amount),
        DateUnit::Week => shift_days(date, amount.checked_mul(7)?),
        DateUnit::Month => shift_months(date, amount),
        DateUnit::Year => shift_months(date, amount.checked_mul(12)?),
    }
}

fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    }
}

/// chrono clamps month arithmetic to the end of the target month.
fn shift_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

/// Fractional month difference `a - b`.
fn month_diff(a: NaiveDate, b: NaiveDate) -> Option<f64> {
    if a.day() < b.day() {
        return month_diff(b, a).map(|d| -d);
    }
    let whole =
        i64::from(b.year() - a.year()) * 12 + i64::from(b.month()) - i64::from(a.month());
    let landing = shift_months(a, whole)?;
    let offset = b.signed_duration_since(landing).num_days();
    // Measure the remainder against the month span on the side `b` falls.
    let span = if offset < 0 {
        landing
            .signed_duration_since(shift_months(a, whole - 1)?)
            .num_days()
    } else {
        shift_months(a, whole + 1)?
            .signed_duration_since(landing)
            .num_days()
    };
    Some(-(whole as f64 + offset as f64 / span as f64))
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn d(s: &str) -> LocalDate {
        s.parse().unwrap()
    }

    // ── construction & parsing ──────────────────────────────────────────

    #[test]
    fn test_parse_and_display_round_trip() {
        assert_eq!(d("2020-04-27").to_string(), "2020-04-27");
        assert_eq!(d("0001-01-01").to_string(), "0001-01-01");
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        for bad in ["2020-4-27", "20200427", "2020-04-27T00:00:00Z", "", "abcd-ef-gh"] {
            let err = bad.parse::<LocalDate>().unwrap_err().to_string();
            assert!(err.contains("Invalid date"), "{bad}: {err}");
        }
    }

    #[test]
    fn test_parse_rejects_nonexistent_day() {
        assert!("2021-02-29".parse::<LocalDate>().is_err());
        assert!("2020-02-29".parse::<LocalDate>().is_ok());
    }

    #[test]
    fn test_from_ymd_invalid() {
        let err = LocalDate::from_ymd(2021, 13, 1).unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidDate(_)));
    }

    #[test]
    fn test_from_utc_in_crosses_date_line() {
        let instant = Utc.with_ymd_and_hms(2020, 9, 27, 20, 0, 0).unwrap();
        let sydney = LocalDate::from_utc_in_named(instant, "Australia/Sydney").unwrap();
        let new_york = LocalDate::from_utc_in_named(instant, "America/New_York").unwrap();
        assert_eq!(sydney, d("2020-09-28"));
        assert_eq!(new_york, d("2020-09-27"));
    }

    #[test]
    fn test_from_utc_in_invalid_timezone() {
        let instant = Utc.with_ymd_and_hms(2020, 9, 27, 20, 0, 0).unwrap();
        let err = LocalDate::from_utc_in_named(instant, "Invalid/Zone")
            .unwrap_err()
            .to_string();
        assert!(err.contains("Invalid timezone"), "got: {err}");
    }

    #[test]
    fn test_serde_as_iso_string() {
        let json = serde_json::to_string(&d("2020-07-15")).unwrap();
        assert_eq!(json, "\"2020-07-15\"");
        let back: LocalDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d("2020-07-15"));
    }

    // ── accessors ───────────────────────────────────────────────────────

    #[test]
    fn test_accessors() {
        let date = d("2020-11-01");
        assert_eq!(date.year(), 2020);
        assert_eq!(date.month(), 11);
        assert_eq!(date.day_of_month(), 1);
        assert_eq!(date.day_of_week(), 7); // Sunday
        assert_eq!(date.weekday(), Weekday::Sun);
        assert_eq!(date.days_in_month(), 30);
    }

    #[test]
    fn test_days_in_february() {
        assert_eq!(d("2096-02-01").days_in_month(), 29);
        assert_eq!(d("2100-02-01").days_in_month(), 28);
        assert_eq!(d("2000-02-01").days_in_month(), 29);
    }

    // ── arithmetic ──────────────────────────────────────────────────────

    #[test]
    fn test_add_days_and_weeks() {
        assert_eq!(d("2020-12-31").add(1, DateUnit::Day).unwrap(), d("2021-01-01"));
        assert_eq!(d("2020-11-02").add(2, DateUnit::Week).unwrap(), d("2020-11-16"));
        assert_eq!(d("2020-11-02").add(-1, DateUnit::Week).unwrap(), d("2020-10-26"));
    }

    #[test]
    fn test_add_month_clamps_to_month_end() {
        assert_eq!(d("2021-01-31").add(1, DateUnit::Month).unwrap(), d("2021-02-28"));
        assert_eq!(d("2020-01-31").add(1, DateUnit::Month).unwrap(), d("2020-02-29"));
        assert_eq!(d("2021-03-31").add(-1, DateUnit::Month).unwrap(), d("2021-02-28"));
        assert_eq!(d("2021-01-31").add(3, DateUnit::Month).unwrap(), d("2021-04-30"));
    }

    #[test]
    fn test_add_year_clamps_leap_day() {
        assert_eq!(d("2020-02-29").add(1, DateUnit::Year).unwrap(), d("2021-02-28"));
        assert_eq!(d("2020-02-29").add(4, DateUnit::Year).unwrap(), d("2024-02-29"));
        assert_eq!(d("2096-02-29").add(4, DateUnit::Year).unwrap(), d("2100-02-28"));
    }

    #[test]
    fn test_subtract() {
        assert_eq!(d("2021-01-01").subtract(1, DateUnit::Day).unwrap(), d("2020-12-31"));
        assert_eq!(d("2021-01-01").pred().unwrap(), d("2020-12-31"));
        assert_eq!(d("2020-12-31").succ().unwrap(), d("2021-01-01"));
    }

    #[test]
    fn test_add_overflow_is_an_error() {
        let err = d("2020-01-01").add(i64::MAX, DateUnit::Day).unwrap_err();
        assert!(matches!(err, ScheduleError::DateOverflow(_)));
        let err = d("2020-01-01").subtract(i64::MIN, DateUnit::Day).unwrap_err();
        assert!(matches!(err, ScheduleError::DateOverflow(_)));
    }

    // ── diff ────────────────────────────────────────────────────────────

    #[test]
    fn test_diff_days_and_weeks() {
        assert_eq!(d("2020-07-29").diff(d("2020-07-15"), DateUnit::Day, true).unwrap(), 14.0);
        assert_eq!(d("2020-07-29").diff(d("2020-07-15"), DateUnit::Week, true).unwrap(), 2.0);
        assert_eq!(d("2020-07-15").diff(d("2020-07-29"), DateUnit::Week, true).unwrap(), -2.0);
        let partial = d("2020-07-18").diff(d("2020-07-15"), DateUnit::Week, true).unwrap();
        assert!((partial - 3.0 / 7.0).abs() < 1e-12);
        assert_eq!(d("2020-07-18").diff(d("2020-07-15"), DateUnit::Week, false).unwrap(), 0.0);
    }

    #[test]
    fn test_diff_months_whole() {
        assert_eq!(d("2020-05-27").diff(d("2020-04-27"), DateUnit::Month, true).unwrap(), 1.0);
        assert_eq!(d("2020-03-27").diff(d("2020-04-27"), DateUnit::Month, true).unwrap(), -1.0);
        assert_eq!(d("2020-04-27").diff(d("2020-04-27"), DateUnit::Month, true).unwrap(), 0.0);
    }

    #[test]
    fn test_diff_months_clamped_month_end_is_integral() {
        let jan31 = d("2019-01-31");
        assert_eq!(d("2019-02-28").diff(jan31, DateUnit::Month, true).unwrap(), 1.0);
        assert_eq!(d("2001-02-28").diff(jan31, DateUnit::Month, true).unwrap(), -215.0);
        assert_eq!(d("2019-04-30").diff(jan31, DateUnit::Month, true).unwrap(), 3.0);
    }

    #[test]
    fn test_diff_months_fractional() {
        // 2001-01-01 sits 30 days short of 2001-01-31 inside a 31-day span.
        let value = d("2001-01-01")
            .diff(d("2019-01-31"), DateUnit::Month, true)
            .unwrap();
        assert!((value - (-216.0 - 30.0 / 31.0)).abs() < 1e-9, "got {value}");
        let truncated = d("2001-01-01")
            .diff(d("2019-01-31"), DateUnit::Month, false)
            .unwrap();
        assert_eq!(truncated, -216.0);
    }

    #[test]
    fn test_diff_years() {
        let leap = d("2000-02-29");
        assert_eq!(d("2096-02-29").diff(leap, DateUnit::Year, true).unwrap(), 96.0);
        assert_eq!(d("2097-02-28").diff(leap, DateUnit::Year, true).unwrap(), 97.0);
        let partial = d("2095-12-31").diff(leap, DateUnit::Year, true).unwrap();
        assert!(partial > 95.0 && partial < 96.0, "got {partial}");
    }

    // ── setters ─────────────────────────────────────────────────────────

    #[test]
    fn test_with_month_clamps_day() {
        assert_eq!(d("2000-01-31").with_month(2).unwrap(), d("2000-02-29"));
        assert_eq!(d("2000-01-15").with_month(6).unwrap(), d("2000-06-15"));
        assert!(d("2000-01-15").with_month(13).is_none());
        assert!(d("2000-01-15").with_month(0).is_none());
    }

    #[test]
    fn test_with_day_of_month_round_trips() {
        assert_eq!(d("2000-02-01").with_day_of_month(29).unwrap(), d("2000-02-29"));
        assert!(d("2000-02-01").with_day_of_month(30).is_none());
        assert!(d("2000-01-01").with_day_of_month(0).is_none());
    }

    #[test]
    fn test_with_iso_weekday_stays_in_week() {
        // 2000-01-01 is a Saturday; its ISO week runs Mon 1999-12-27 .. Sun 2000-01-02.
        let saturday = d("2000-01-01");
        assert_eq!(saturday.with_iso_weekday(1).unwrap(), d("1999-12-27"));
        assert_eq!(saturday.with_iso_weekday(6).unwrap(), saturday);
        assert_eq!(saturday.with_iso_weekday(7).unwrap(), d("2000-01-02"));
        assert!(saturday.with_iso_weekday(0).is_none());
        assert!(saturday.with_iso_weekday(8).is_none());
    }
}
