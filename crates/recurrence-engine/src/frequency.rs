//! Recurrence frequencies and their fixed periods.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::local_date::DateUnit;

/// How often a recurring schedule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Fortnightly,
    Monthly,
    Annually,
}

/// The fixed step between consecutive occurrences: `count` × `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Period {
    pub count: i64,
    pub unit: DateUnit,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Fortnightly,
        Frequency::Monthly,
        Frequency::Annually,
    ];

    /// The period between occurrences.
    ///
    /// # Examples
    ///
    /// ```
    /// use recurrence_engine::{DateUnit, Frequency};
    ///
    /// let period = Frequency::Fortnightly.period();
    /// assert_eq!((period.count, period.unit), (2, DateUnit::Week));
    /// ```
    pub const fn period(self) -> Period {
        match self {
            Frequency::Daily => Period {
                count: 1,
                unit: DateUnit::Day,
            },
            Frequency::Weekly => Period {
                count: 1,
                unit: DateUnit::Week,
            },
            Frequency::Fortnightly => Period {
                count: 2,
                unit: DateUnit::Week,
            },
            Frequency::Monthly => Period {
                count: 1,
                unit: DateUnit::Month,
            },
            Frequency::Annually => Period {
                count: 1,
                unit: DateUnit::Year,
            },
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Fortnightly => "fortnightly",
            Frequency::Monthly => "monthly",
            Frequency::Annually => "annually",
        }
    }

    /// Short per-period suffix, e.g. `"/wk"` for a weekly amount.
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Frequency::Daily => "/day",
            Frequency::Weekly => "/wk",
            Frequency::Fortnightly => "/fn",
            Frequency::Monthly => "/mo",
            Frequency::Annually => "/yr",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Frequency {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Frequency::ALL
            .into_iter()
            .find(|f| f.name() == normalized)
            .ok_or_else(|| ScheduleError::UnknownFrequency(format!("'{}'", s.trim())))
    }
}
