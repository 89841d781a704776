//! Calendar months formatted as `YYYY-MM`.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::Error;

/// A calendar month, e.g. 2025-03.
///
/// Budgets are set per category and month, and monthly summaries are keyed by
/// month, so both share this type. It serializes as a `YYYY-MM` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    // 1 to 12, kept numeric so that months order chronologically.
    month: u8,
}

impl YearMonth {
    /// Create a month from its parts.
    pub fn new(year: i32, month: Month) -> Self {
        Self {
            year,
            month: month as u8,
        }
    }

    /// The month that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self::new(date.year(), date.month())
    }

    /// The calendar year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// The month of the year.
    pub fn month(self) -> Month {
        Month::January.nth_next(self.month - 1)
    }

    /// Whether `date` falls inside this month.
    pub fn contains(self, date: Date) -> bool {
        date.year() == self.year && date.month() as u8 == self.month
    }

    /// The first and last day of the month.
    pub fn bounds(self) -> Option<(Date, Date)> {
        let month = self.month();
        let start = Date::from_calendar_date(self.year, month, 1).ok()?;
        let end = Date::from_calendar_date(
            self.year,
            month,
            time::util::days_in_month(month, self.year),
        )
        .ok()?;

        Some((start, end))
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth(s.to_owned());

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u8 = month.parse().map_err(|_| invalid())?;
        let month = Month::try_from(month).map_err(|_| invalid())?;

        Ok(Self::new(year, month))
    }
}

impl TryFrom<String> for YearMonth {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
