//! Employment history models.
//!
//! An [`EmploymentHistory`] is the single structured input the engine consumes.
//! It is produced by an external document parser and carries two kinds of rows:
//! summary [`EmploymentRecord`]s (one per reported employer period) and, when
//! the source document provides it, a month-by-month [`MonthlyContribution`]
//! detail feed.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{DateInterval, YearMonth};

/// One reported contribution period for a single employer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentRecord {
    /// Employer identifier (tax id or payroll number).
    pub employer_id: String,
    /// Employer display name.
    pub employer_name: String,
    /// First day of the period, if reported.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day of the period, if reported.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Last or average monthly salary reported for the period.
    #[serde(default)]
    pub salary: Decimal,
    /// Weeks reported by the employer.
    #[serde(default)]
    pub reported_weeks: Decimal,
    /// Authoritative net weeks from the summary "total" column.
    #[serde(default)]
    pub total_weeks: Decimal,
    /// Weeks overlapping another employer, if reported.
    #[serde(default)]
    pub simultaneous_weeks: Option<Decimal>,
}

impl EmploymentRecord {
    /// Returns the covered interval when both dates are present and ordered.
    pub fn interval(&self) -> Option<DateInterval> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => DateInterval::new(start, end),
            _ => None,
        }
    }

    /// Rejects records whose start date falls after their end date.
    pub fn validate(&self) -> EngineResult<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(EngineError::InvalidRecord {
                    employer_id: self.employer_id.clone(),
                    message: format!("start date {} is after end date {}", start, end),
                });
            }
        }
        Ok(())
    }
}

/// A single contribution base reported for a specific month.
///
/// # Example
///
/// ```
/// use pension_engine::models::{MonthlyContribution, YearMonth};
/// use rust_decimal::Decimal;
///
/// let row = MonthlyContribution {
///     year: 2024,
///     month: 5,
///     base: Decimal::new(2_500_000, 0),
///     employer_id: None,
/// };
/// assert_eq!(row.year_month(), YearMonth::new(2024, 5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyContribution {
    /// The contribution year.
    pub year: i32,
    /// The contribution month (1-12).
    pub month: u32,
    /// The contribution base (IBC) paid on for that month.
    pub base: Decimal,
    /// The employer that paid the contribution, if known.
    #[serde(default)]
    pub employer_id: Option<String>,
}

impl MonthlyContribution {
    /// Returns the (year, month) key of this row.
    pub fn year_month(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }
}

/// Where monthly contribution bases come from, resolved once per history.
///
/// The detailed feed is preferred whenever the parser produced one; otherwise
/// summary records are expanded month by month with a constant salary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContributionSource<'a> {
    /// Explicit (year, month, base) rows.
    Detailed(&'a [MonthlyContribution]),
    /// Employer periods to be expanded across their date range.
    Summary(&'a [EmploymentRecord]),
}

impl ContributionSource<'_> {
    /// Machine-readable label for the resolved variant.
    pub fn label(&self) -> &'static str {
        match self {
            ContributionSource::Detailed(_) => "detailed",
            ContributionSource::Summary(_) => "summary",
        }
    }
}

/// The complete parsed contribution history of one person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmploymentHistory {
    /// Summary employer periods.
    #[serde(default)]
    pub records: Vec<EmploymentRecord>,
    /// Month-by-month contribution detail, when available.
    #[serde(default)]
    pub monthly_detail: Vec<MonthlyContribution>,
    /// A separately reported total-weeks figure, when the document has one.
    #[serde(default)]
    pub reported_total_weeks: Option<Decimal>,
}

impl EmploymentHistory {
    /// Resolves the monthly-base source for this history.
    ///
    /// # Example
    ///
    /// ```
    /// use pension_engine::models::{ContributionSource, EmploymentHistory};
    ///
    /// let history = EmploymentHistory::default();
    /// assert!(matches!(history.contribution_source(), ContributionSource::Summary(_)));
    /// ```
    pub fn contribution_source(&self) -> ContributionSource<'_> {
        if self.monthly_detail.is_empty() {
            ContributionSource::Summary(&self.records)
        } else {
            ContributionSource::Detailed(&self.monthly_detail)
        }
    }

    /// Validates every record and detail row.
    pub fn validate(&self) -> EngineResult<()> {
        for record in &self.records {
            record.validate()?;
        }
        for row in &self.monthly_detail {
            if !row.year_month().is_valid() {
                return Err(EngineError::InvalidRecord {
                    employer_id: row.employer_id.clone().unwrap_or_default(),
                    message: format!("month {} is outside 1-12", row.month),
                });
            }
        }
        Ok(())
    }

    /// Returns the intervals of every record with usable dates.
    pub fn dated_intervals(&self) -> Vec<DateInterval> {
        self.records.iter().filter_map(|r| r.interval()).collect()
    }
}
