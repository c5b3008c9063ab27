//! Code for working with calendar-month periods.
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar month.
///
/// Periods are ordered by year, then month. Internally a period is stored as the first day of the
/// month, which is also the date that event dates are compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period(NaiveDate);

impl Period {
    /// Create a period from a year and a month (1-12).
    ///
    /// Returns `None` if the pair does not form a valid calendar month.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The period containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self(
            date.with_day(1)
                .expect("The first day of a month is always a valid date"),
        )
    }

    /// The first day of the period
    pub fn first_day(self) -> NaiveDate {
        self.0
    }

    /// The calendar year
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// The calendar month (1-12)
    pub fn month(self) -> u32 {
        self.0.month()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    /// Parse a period of the form `YYYY-MM`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let date = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
            .with_context(|| format!("Invalid period: {s}"))?;

        Ok(Self(date))
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
