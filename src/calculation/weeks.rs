//! Total contributed weeks.
//!
//! Weeks come from the first plausible source in a fixed priority order:
//! the per-record authoritative total column, then a separately reported
//! aggregate, and only then an estimate from merged employment dates. The
//! authoritative figures already include the regulator's own adjustments for
//! simultaneous employment and suspensions and are never re-derived.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{
    AuditStep, AuditWarning, EmploymentHistory, WarningSeverity, WeeksSource, WeeksSummary,
};

use super::day_count::{merge_intervals, total_days360};

/// A reported weeks figure must exceed this to be considered plausible.
pub const PLAUSIBLE_WEEKS_THRESHOLD: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

const DAYS_PER_WEEK: Decimal = Decimal::from_parts(7, 0, 0, false, 0);

/// The clause reference for weeks counting.
pub const WEEKS_CLAUSE: &str = "Ley 100/1993 art. 33";

/// The result of counting weeks, including the audit step and any warnings.
#[derive(Debug, Clone)]
pub struct WeeksResult {
    /// The weeks figure and its provenance.
    pub summary: WeeksSummary,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Warnings raised while counting.
    pub warnings: Vec<AuditWarning>,
}

/// Determines total contributed weeks from an employment history.
///
/// # Priority
///
/// 1. Sum of every record's `total_weeks` column, when it exceeds 100
/// 2. `reported_total_weeks`, when it exceeds 100
/// 3. 30/360 days over merged record intervals, divided by 7
///
/// An empty history yields zero weeks with source [`WeeksSource::NoRecords`].
///
/// # Examples
///
/// ```
/// use pension_engine::calculation::calculate_weeks;
/// use pension_engine::models::{EmploymentHistory, WeeksSource};
/// use rust_decimal::Decimal;
///
/// let history = EmploymentHistory {
///     reported_total_weeks: Some(Decimal::new(1150, 0)),
///     ..Default::default()
/// };
/// let result = calculate_weeks(&history, 1);
/// assert_eq!(result.summary.total_weeks, Decimal::new(1150, 0));
/// assert_eq!(result.summary.source, WeeksSource::ReportedTotalItem);
/// ```
pub fn calculate_weeks(history: &EmploymentHistory, step_number: u32) -> WeeksResult {
    let column_total: Decimal = history.records.iter().map(|r| r.total_weeks).sum();
    let reported_item = history.reported_total_weeks.unwrap_or(Decimal::ZERO);
    let mut warnings = Vec::new();

    let (total_weeks, source, estimate_days) = if column_total > PLAUSIBLE_WEEKS_THRESHOLD {
        (column_total, WeeksSource::SummaryTotalColumn, None)
    } else if reported_item > PLAUSIBLE_WEEKS_THRESHOLD {
        (reported_item, WeeksSource::ReportedTotalItem, None)
    } else {
        let intervals = history.dated_intervals();
        let undated = history.records.len() - intervals.len();
        if undated > 0 {
            warnings.push(AuditWarning::new(
                "RECORD_WITHOUT_DATES",
                format!("{} record(s) without usable dates left out of the weeks estimate", undated),
                WarningSeverity::Low,
            ));
        }

        if intervals.is_empty() {
            (Decimal::ZERO, WeeksSource::NoRecords, None)
        } else {
            let merged = merge_intervals(&intervals);
            let days = total_days360(&merged);
            warn!(
                days,
                merged_intervals = merged.len(),
                "No plausible authoritative weeks figure; estimating from dates"
            );
            warnings.push(AuditWarning::new(
                "WEEKS_ESTIMATED",
                format!(
                    "Weeks estimated from {} merged interval(s); authoritative totals were {} and {}",
                    merged.len(),
                    column_total.normalize(),
                    reported_item.normalize()
                ),
                WarningSeverity::High,
            ));
            (
                Decimal::from(days) / DAYS_PER_WEEK,
                WeeksSource::DateEstimate,
                Some(days),
            )
        }
    };

    debug!(total_weeks = %total_weeks, source = source.label(), "Weeks determined");

    let reasoning = match source {
        WeeksSource::SummaryTotalColumn => format!(
            "Summary total column sums to {} weeks across {} record(s)",
            total_weeks.normalize(),
            history.records.len()
        ),
        WeeksSource::ReportedTotalItem => format!(
            "Total column ({}) not plausible; using reported total item of {} weeks",
            column_total.normalize(),
            total_weeks.normalize()
        ),
        WeeksSource::DateEstimate => format!(
            "Authoritative totals not plausible; {} days (30/360) / 7 = {} weeks (estimate)",
            estimate_days.unwrap_or_default(),
            total_weeks.round_dp(2)
        ),
        WeeksSource::NoRecords => "No records with weeks or dates; 0 weeks".to_string(),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "weeks_count".to_string(),
        rule_name: "Contributed Weeks".to_string(),
        clause_ref: WEEKS_CLAUSE.to_string(),
        input: serde_json::json!({
            "records": history.records.len(),
            "column_total": column_total.normalize().to_string(),
            "reported_total_item": history.reported_total_weeks.map(|w| w.normalize().to_string()),
        }),
        output: serde_json::json!({
            "total_weeks": total_weeks.to_string(),
            "source": source,
            "verified": source.is_verified(),
            "estimate_days": estimate_days,
        }),
        reasoning,
    };

    WeeksResult {
        summary: WeeksSummary {
            total_weeks,
            source,
            verified: source.is_verified(),
        },
        audit_step,
        warnings,
    }
}
