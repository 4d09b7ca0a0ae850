//! Human-readable schedule descriptions.

use std::fmt;

use crate::frequency::Frequency;
use crate::schedule::RecurringSchedule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScheduleFormat {
    /// "Wednesday each week", "27th January each year", ...
    #[default]
    Descriptive,
    /// Per-period suffix such as "/wk".
    Abbreviated,
}

impl RecurringSchedule {
    /// Render the schedule for display.
    ///
    /// # Examples
    ///
    /// ```
    /// use recurrence_engine::{RecurringSchedule, ScheduleDescription, ScheduleFormat};
    ///
    /// let schedule = RecurringSchedule::new(&ScheduleDescription::weekly(3)).unwrap();
    /// assert_eq!(schedule.format(ScheduleFormat::Descriptive), "Wednesday each week");
    /// assert_eq!(schedule.format(ScheduleFormat::Abbreviated), "/wk");
    /// ```
    pub fn format(&self, style: ScheduleFormat) -> String {
        match style {
            ScheduleFormat::Descriptive => self.describe(),
            ScheduleFormat::Abbreviated => self.frequency().abbreviation().to_string(),
        }
    }

    fn describe(&self) -> String {
        let anchor = self.anchor().as_naive();
        match self.frequency() {
            Frequency::Daily => "Every day".to_string(),
            Frequency::Weekly => format!("{} each week", anchor.format("%A")),
            Frequency::Fortnightly => {
                format!("Fortnightly starting with {}", anchor.format("%-d %b %Y"))
            }
            Frequency::Monthly => format!("{} of each month", ordinal(self.anchor().day_of_month())),
            Frequency::Annually => format!(
                "{} {} each year",
                ordinal(self.anchor().day_of_month()),
                anchor.format("%B")
            ),
        }
    }
}

impl fmt::Display for RecurringSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// 1 -> "1st", 12 -> "12th", 22 -> "22nd".
fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
