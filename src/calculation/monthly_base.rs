//! Aggregation of monthly contribution bases.
//!
//! Concurrent employers' bases for the same month are summed into a single
//! entry keyed by (year, month). Summary records are expanded across every
//! month their date range touches, with the salary treated as constant.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::warn;

use crate::models::{AuditWarning, ContributionSource, WarningSeverity, YearMonth};

/// Summed contribution bases by month, plus anything skipped on the way.
#[derive(Debug, Clone, Default)]
pub struct MonthlyBases {
    /// Positive summed bases in chronological order.
    pub bases: BTreeMap<YearMonth, Decimal>,
    /// Warnings for skipped records.
    pub warnings: Vec<AuditWarning>,
}

/// Builds one summed base per month from either contribution source.
///
/// Summary records without both dates, or with a salary of zero or less,
/// are skipped. Months whose summed base is not positive are dropped.
///
/// # Examples
///
/// ```
/// use pension_engine::calculation::aggregate_monthly_bases;
/// use pension_engine::models::{ContributionSource, MonthlyContribution, YearMonth};
/// use rust_decimal::Decimal;
///
/// let rows = vec![
///     MonthlyContribution { year: 2024, month: 1, base: Decimal::new(1_000_000, 0), employer_id: None },
///     MonthlyContribution { year: 2024, month: 1, base: Decimal::new(500_000, 0), employer_id: None },
/// ];
/// let monthly = aggregate_monthly_bases(ContributionSource::Detailed(&rows));
/// assert_eq!(monthly.bases[&YearMonth::new(2024, 1)], Decimal::new(1_500_000, 0));
/// ```
pub fn aggregate_monthly_bases(source: ContributionSource<'_>) -> MonthlyBases {
    let mut bases: BTreeMap<YearMonth, Decimal> = BTreeMap::new();
    let mut warnings = Vec::new();

    match source {
        ContributionSource::Detailed(rows) => {
            for row in rows {
                *bases.entry(row.year_month()).or_default() += row.base;
            }
        }
        ContributionSource::Summary(records) => {
            let mut skipped_salary = Vec::new();
            let mut skipped_dates = 0usize;

            for record in records {
                if record.salary <= Decimal::ZERO {
                    skipped_salary.push(record.employer_id.clone());
                    continue;
                }
                let Some(interval) = record.interval() else {
                    skipped_dates += 1;
                    continue;
                };
                for month in interval.months() {
                    *bases.entry(month).or_default() += record.salary;
                }
            }

            if !skipped_salary.is_empty() {
                warn!(records = skipped_salary.len(), "Skipping records with non-positive salary");
                warnings.push(AuditWarning::new(
                    "NON_POSITIVE_SALARY",
                    format!(
                        "Records without a positive salary were not expanded: {}",
                        skipped_salary.join(", ")
                    ),
                    WarningSeverity::Medium,
                ));
            }
            if skipped_dates > 0 {
                warnings.push(AuditWarning::new(
                    "RECORD_WITHOUT_DATES",
                    format!(
                        "{} record(s) without usable dates could not be expanded into months",
                        skipped_dates
                    ),
                    WarningSeverity::Medium,
                ));
            }
        }
    }

    bases.retain(|_, base| *base > Decimal::ZERO);

    MonthlyBases { bases, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::dec;
    use crate::models::{EmploymentRecord, MonthlyContribution};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(id: &str, start: NaiveDate, end: NaiveDate, salary: &str) -> EmploymentRecord {
        EmploymentRecord {
            employer_id: id.to_string(),
            employer_name: format!("Employer {}", id),
            start_date: Some(start),
            end_date: Some(end),
            salary: dec(salary),
            reported_weeks: Decimal::ZERO,
            total_weeks: Decimal::ZERO,
            simultaneous_weeks: None,
        }
    }

    #[test]
    fn test_summary_record_expands_every_touched_month() {
        let records = vec![record("A", date(2020, 1, 15), date(2020, 4, 2), "2000000")];
        let monthly = aggregate_monthly_bases(ContributionSource::Summary(&records));

        assert_eq!(monthly.bases.len(), 4);
        assert!(monthly.bases.values().all(|b| *b == dec("2000000")));
    }

    #[test]
    fn test_concurrent_employers_are_summed() {
        let records = vec![
            record("A", date(2020, 1, 1), date(2020, 6, 30), "2000000"),
            record("B", date(2020, 3, 1), date(2020, 3, 31), "1500000"),
        ];
        let monthly = aggregate_monthly_bases(ContributionSource::Summary(&records));

        assert_eq!(monthly.bases[&YearMonth::new(2020, 2)], dec("2000000"));
        assert_eq!(monthly.bases[&YearMonth::new(2020, 3)], dec("3500000"));
    }

    #[test]
    fn test_non_positive_salary_is_skipped_with_warning() {
        let records = vec![
            record("A", date(2020, 1, 1), date(2020, 2, 28), "0"),
            record("B", date(2020, 1, 1), date(2020, 1, 31), "-5"),
        ];
        let monthly = aggregate_monthly_bases(ContributionSource::Summary(&records));

        assert!(monthly.bases.is_empty());
        assert_eq!(monthly.warnings.len(), 1);
        assert_eq!(monthly.warnings[0].code, "NON_POSITIVE_SALARY");
        assert!(monthly.warnings[0].message.contains("A, B"));
    }

    #[test]
    fn test_undated_summary_record_is_skipped() {
        let mut undated = record("A", date(2020, 1, 1), date(2020, 2, 28), "1000000");
        undated.end_date = None;
        let monthly = aggregate_monthly_bases(ContributionSource::Summary(&[undated]));

        assert!(monthly.bases.is_empty());
        assert_eq!(monthly.warnings[0].code, "RECORD_WITHOUT_DATES");
    }

    #[test]
    fn test_detailed_rows_drop_non_positive_months() {
        let rows = vec![
            MonthlyContribution {
                year: 2021,
                month: 5,
                base: dec("0"),
                employer_id: None,
            },
            MonthlyContribution {
                year: 2021,
                month: 6,
                base: dec("908526"),
                employer_id: None,
            },
        ];
        let monthly = aggregate_monthly_bases(ContributionSource::Detailed(&rows));

        assert_eq!(monthly.bases.len(), 1);
        assert!(monthly.bases.contains_key(&YearMonth::new(2021, 6)));
        assert!(monthly.warnings.is_empty());
    }
}
