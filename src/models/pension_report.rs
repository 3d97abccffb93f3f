//! Pension report models for the Pension Engine.
//!
//! This module contains the [`PensionReport`] type and the per-component
//! output structures it bundles: weeks, base settlement income (IBL),
//! replacement rate, monthly pension, eligibility, indemnity, contribution
//! burden, and goal-seeking horizons. All amounts are raw numbers; callers
//! format currency and dates themselves.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuditTrace, YearMonth};

/// Which source the total weeks figure was taken from.
///
/// # Example
///
/// ```
/// use pension_engine::models::WeeksSource;
///
/// assert_eq!(WeeksSource::SummaryTotalColumn.label(), "summary total column");
/// assert!(WeeksSource::SummaryTotalColumn.is_verified());
/// assert!(!WeeksSource::DateEstimate.is_verified());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeeksSource {
    /// Sum of the per-record authoritative "total" column.
    SummaryTotalColumn,
    /// A separately reported aggregate weeks figure.
    ReportedTotalItem,
    /// Estimated from merged employment dates.
    DateEstimate,
    /// No usable records at all.
    NoRecords,
}

impl WeeksSource {
    /// Short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            WeeksSource::SummaryTotalColumn => "summary total column",
            WeeksSource::ReportedTotalItem => "reported total item",
            WeeksSource::DateEstimate => "date estimate",
            WeeksSource::NoRecords => "no records",
        }
    }

    /// True when the figure comes from the regulator's own numbers.
    pub fn is_verified(&self) -> bool {
        matches!(
            self,
            WeeksSource::SummaryTotalColumn | WeeksSource::ReportedTotalItem
        )
    }
}

/// Total contributed weeks and their provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeksSummary {
    /// Total contributed weeks.
    pub total_weeks: Decimal,
    /// Where the figure came from.
    pub source: WeeksSource,
    /// True when the figure is authoritative rather than estimated.
    pub verified: bool,
}

/// Which average produced the base settlement income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IblMethod {
    /// Average of the months inside the last ten years.
    LastTenYears,
    /// Average over the whole career.
    Lifetime,
}

/// One month that entered the IBL averages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IblMonthDetail {
    /// The contribution month.
    pub year_month: YearMonth,
    /// Sum of all concurrent bases for the month.
    pub base: Decimal,
    /// Base after the 25 minimum wage cap.
    pub capped_base: Decimal,
    /// True when the cap reduced the base.
    pub cap_applied: bool,
    /// Final index divided by this month's index.
    pub index_factor: Decimal,
    /// Capped base brought to liquidation-month value.
    pub indexed_base: Decimal,
    /// True when the month falls inside the last-ten-years window.
    pub in_last_ten_years: bool,
}

/// The base settlement income (IBL) and both candidate averages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseSettlementIncome {
    /// The winning average, floored at one minimum wage.
    pub value: Decimal,
    /// Which average won.
    pub method: IblMethod,
    /// Average of indexed bases inside the last ten years.
    pub last_ten_years_average: Decimal,
    /// Average of indexed bases over the whole career.
    pub lifetime_average: Decimal,
    /// Number of months that entered the lifetime average.
    pub month_count: u32,
    /// Number of months inside the last-ten-years window.
    pub last_ten_years_months: u32,
    /// Sum of indexed bases inside the last-ten-years window.
    pub last_ten_years_sum: Decimal,
    /// True when both averages fell below one minimum wage.
    pub floor_applied: bool,
    /// Per-month breakdown, in chronological order.
    pub details: Vec<IblMonthDetail>,
    /// Months with a positive base that were left out of both averages.
    pub excluded_months: Vec<YearMonth>,
}

/// The replacement rate and its components, in percentage points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementRate {
    /// Final rate after the 55-80 clamp.
    pub rate: Decimal,
    /// `65.5 - 0.5 * s` before any bonus.
    pub base_rate: Decimal,
    /// Bonus points for weeks above the statutory minimum.
    pub bonus: Decimal,
    /// IBL expressed in minimum wages.
    pub s_ratio: Decimal,
    /// Weeks above (positive) or below (negative) the statutory minimum.
    pub extra_weeks: Decimal,
}

/// The monthly pension amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPension {
    /// Pension after the minimum wage floor and 25 minimum wage cap.
    pub amount: Decimal,
    /// `IBL * rate / 100` before clamping.
    pub raw_amount: Decimal,
    /// True when the floor raised the amount.
    pub floor_applied: bool,
    /// True when the cap lowered the amount.
    pub cap_applied: bool,
}

/// Whether the applicant meets the weeks and age requirements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    /// True only when both conditions hold.
    pub eligible: bool,
    /// True when total weeks reach the statutory minimum.
    pub weeks_met: bool,
    /// True when age reaches the required retirement age.
    pub age_met: bool,
    /// Statutory minimum weeks.
    pub required_weeks: Decimal,
    /// Retirement age for the applicant's gender.
    pub required_age: u32,
    /// Weeks still missing, never negative.
    pub weeks_remaining: Decimal,
    /// Years until the retirement age, never negative.
    pub years_to_age: u32,
    /// Whole years until both conditions hold.
    pub years_until_eligible: u32,
    /// Projected date on which both conditions hold.
    pub projected_eligibility_date: NaiveDate,
}

/// The lump-sum indemnity owed when weeks fall short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indemnity {
    /// True when total weeks are below the statutory minimum.
    pub applicable: bool,
    /// Indemnity amount, zero when not applicable.
    pub amount: Decimal,
    /// Day-weighted historical contribution rate (fraction).
    pub weighted_rate: Decimal,
    /// Total 30/360 days that weighted the rate.
    pub weighted_days: i64,
}

/// Statutory split of a monthly contribution base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBurden {
    /// The monthly contribution base.
    pub base: Decimal,
    /// Pension contribution.
    pub pension: Decimal,
    /// Health contribution.
    pub health: Decimal,
    /// Occupational-risk (tier I) contribution.
    pub occupational_risk: Decimal,
    /// Sum of all three components.
    pub total: Decimal,
}

/// One horizon of the goal seeker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSeekHorizon {
    /// Years of additional contributions.
    pub years: u32,
    /// Monthly contribution base needed to reach the target.
    pub required_monthly_base: Decimal,
    /// False when the target cannot be reached under the 25 minimum wage ceiling.
    pub feasible: bool,
    /// Contribution burden of the required base.
    pub burden: ContributionBurden,
    /// Total weeks at the end of the horizon.
    pub projected_weeks: Decimal,
    /// Pension the required base produces.
    pub projected_pension: Decimal,
}

/// The complete result of an entitlement calculation.
///
/// A new report is produced for every (applicant, liquidation date) request;
/// reports are never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionReport {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The liquidation date the IBL was indexed to.
    pub liquidation_date: NaiveDate,
    /// The reference date used for eligibility projection.
    pub as_of: NaiveDate,
    /// Total weeks and source.
    pub weeks: WeeksSummary,
    /// Base settlement income.
    pub ibl: BaseSettlementIncome,
    /// Replacement rate.
    pub replacement_rate: ReplacementRate,
    /// Monthly pension.
    pub pension: MonthlyPension,
    /// Eligibility determination.
    pub eligibility: Eligibility,
    /// Lump-sum indemnity.
    pub indemnity: Indemnity,
    /// Contribution burden of a base equal to the IBL.
    pub burden: ContributionBurden,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weeks_source_serialization() {
        assert_eq!(
            serde_json::to_string(&WeeksSource::SummaryTotalColumn).unwrap(),
            "\"summary_total_column\""
        );
        assert_eq!(
            serde_json::to_string(&WeeksSource::DateEstimate).unwrap(),
            "\"date_estimate\""
        );
    }

    #[test]
    fn test_weeks_source_labels() {
        assert_eq!(WeeksSource::ReportedTotalItem.label(), "reported total item");
        assert_eq!(WeeksSource::NoRecords.label(), "no records");
    }

    #[test]
    fn test_only_authoritative_sources_are_verified() {
        assert!(WeeksSource::ReportedTotalItem.is_verified());
        assert!(!WeeksSource::NoRecords.is_verified());
    }

    #[test]
    fn test_ibl_method_serialization() {
        assert_eq!(
            serde_json::to_string(&IblMethod::LastTenYears).unwrap(),
            "\"last_ten_years\""
        );
        let method: IblMethod = serde_json::from_str("\"lifetime\"").unwrap();
        assert_eq!(method, IblMethod::Lifetime);
    }

    #[test]
    fn test_burden_serializes_amounts_as_strings() {
        let burden = ContributionBurden {
            base: Decimal::new(1_000_000, 0),
            pension: Decimal::new(160_000, 0),
            health: Decimal::new(125_000, 0),
            occupational_risk: Decimal::new(5_220, 0),
            total: Decimal::new(290_220, 0),
        };
        let json = serde_json::to_string(&burden).unwrap();
        assert!(json.contains("\"total\":\"290220\""));
    }
}
