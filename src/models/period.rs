//! Calendar period models.
//!
//! This module contains [`YearMonth`], the key used for monthly contribution
//! bases and price-index lookups, and [`DateInterval`], an inclusive span of
//! dates covered by an employment record.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month identified by its year and month number (1-12).
///
/// Ordering is chronological: year first, then month.
///
/// # Example
///
/// ```
/// use pension_engine::models::YearMonth;
///
/// let liquidation = YearMonth::new(2025, 3);
/// assert_eq!(liquidation.minus_years(10), YearMonth::new(2015, 3));
/// assert_eq!(YearMonth::new(2024, 12).next(), YearMonth::new(2025, 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    /// The calendar year.
    pub year: i32,
    /// The month number, 1 through 12.
    pub month: u32,
}

impl YearMonth {
    /// Creates a new year/month key.
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Returns the month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Returns the same month `years` years earlier.
    pub fn minus_years(self, years: i32) -> Self {
        Self::new(self.year - years, self.month)
    }

    /// Returns the following month.
    pub fn next(self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// Returns true if the month number is within 1-12.
    pub fn is_valid(self) -> bool {
        (1..=12).contains(&self.month)
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// An inclusive span of dates.
///
/// Constructed through [`DateInterval::new`], which rejects spans whose
/// start falls after their end.
///
/// # Example
///
/// ```
/// use pension_engine::models::DateInterval;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
/// let interval = DateInterval::new(start, end).unwrap();
/// assert_eq!(interval.midpoint(), NaiveDate::from_ymd_opt(2020, 7, 1).unwrap());
///
/// assert!(DateInterval::new(end, start).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInterval {
    /// First covered date.
    pub start: NaiveDate,
    /// Last covered date.
    pub end: NaiveDate,
}

impl DateInterval {
    /// Creates an interval, or `None` when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Returns the date halfway between start and end (rounded towards start).
    pub fn midpoint(&self) -> NaiveDate {
        let half = (self.end - self.start).num_days() / 2;
        self.start
            .checked_add_days(Days::new(half as u64))
            .unwrap_or(self.end)
    }

    /// Iterates over every calendar month touched by this interval.
    pub fn months(&self) -> impl Iterator<Item = YearMonth> {
        let last = YearMonth::from_date(self.end);
        std::iter::successors(Some(YearMonth::from_date(self.start)), move |ym| {
            let next = ym.next();
            (next <= last).then_some(next)
        })
    }
}
