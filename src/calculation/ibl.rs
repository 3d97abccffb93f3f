//! Base settlement income (IBL) calculation.
//!
//! Each month's summed base is capped at 25 minimum wages of its own year,
//! then brought to liquidation-month value with the price index. Two averages
//! compete: the months inside the last ten years, and the whole career.
//! The larger one wins, floored at one minimum wage of the liquidation year.
//!
//! Both averages divide by the number of months actually present. A sparse
//! last-ten-years window is therefore not diluted by months without
//! contributions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::ReferenceTables;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditWarning, BaseSettlementIncome, ContributionSource, IblMethod, IblMonthDetail,
    WarningSeverity, YearMonth,
};

use super::monthly_base::aggregate_monthly_bases;

/// Monthly bases are capped at this many minimum wages.
pub const BASE_CAP_MINIMUM_WAGES: Decimal = Decimal::from_parts(25, 0, 0, false, 0);

/// Length of the recent-contributions window, in years.
pub const LAST_WINDOW_YEARS: i32 = 10;

/// The clause reference for the IBL.
pub const IBL_CLAUSE: &str = "Ley 100/1993 arts. 18, 21";

/// The result of the IBL calculation, including the audit step and warnings.
#[derive(Debug, Clone)]
pub struct IblResult {
    /// The base settlement income and both candidate averages.
    pub ibl: BaseSettlementIncome,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Warnings for months or records left out.
    pub warnings: Vec<AuditWarning>,
}

/// Why a month with a positive base did not enter the averages.
enum Exclusion {
    AfterLiquidation,
    MinimumWageMissing,
    PriceIndexMissing,
}

/// Calculates the base settlement income for a liquidation date.
///
/// # Errors
///
/// - `PriceIndexNotFound` when the liquidation month has no price index
/// - `MinimumWageNotFound` when the liquidation year has no minimum wage
/// - `CalculationError` when a historical month's price index is zero
///
/// Historical months without a price index or minimum wage, and months after
/// the liquidation month, are excluded from both averages and reported as
/// warnings.
pub fn calculate_ibl(
    source: ContributionSource<'_>,
    liquidation_date: NaiveDate,
    tables: &ReferenceTables,
    step_number: u32,
) -> EngineResult<IblResult> {
    let liquidation = YearMonth::from_date(liquidation_date);
    let index_final = tables.require_price_index(liquidation)?;
    let minimum_wage = tables.require_minimum_wage(liquidation.year)?;
    let window_start = liquidation.minus_years(LAST_WINDOW_YEARS);

    let monthly = aggregate_monthly_bases(source);
    let mut warnings = monthly.warnings;

    let mut details = Vec::with_capacity(monthly.bases.len());
    let mut excluded: Vec<(YearMonth, Exclusion)> = Vec::new();

    for (&month, &base) in &monthly.bases {
        if month > liquidation {
            excluded.push((month, Exclusion::AfterLiquidation));
            continue;
        }
        let Some(month_wage) = tables.minimum_wage(month.year) else {
            excluded.push((month, Exclusion::MinimumWageMissing));
            continue;
        };
        let Some(index_initial) = tables.price_index(month) else {
            excluded.push((month, Exclusion::PriceIndexMissing));
            continue;
        };

        // Cap first, then index.
        let cap = BASE_CAP_MINIMUM_WAGES * month_wage;
        let capped_base = base.min(cap);
        let index_factor =
            index_final
                .checked_div(index_initial)
                .ok_or_else(|| EngineError::CalculationError {
                    message: format!("price index for {} is zero", month),
                })?;

        details.push(IblMonthDetail {
            year_month: month,
            base,
            capped_base,
            cap_applied: base > cap,
            index_factor,
            indexed_base: capped_base * index_factor,
            in_last_ten_years: month >= window_start,
        });
    }

    let lifetime_sum: Decimal = details.iter().map(|d| d.indexed_base).sum();
    let month_count = details.len() as u32;
    let last_ten_years_sum: Decimal = details
        .iter()
        .filter(|d| d.in_last_ten_years)
        .map(|d| d.indexed_base)
        .sum();
    let last_ten_years_months = details.iter().filter(|d| d.in_last_ten_years).count() as u32;

    let last_ten_years_average = average(last_ten_years_sum, last_ten_years_months);
    let lifetime_average = average(lifetime_sum, month_count);

    let (best, method) = if last_ten_years_average >= lifetime_average {
        (last_ten_years_average, IblMethod::LastTenYears)
    } else {
        (lifetime_average, IblMethod::Lifetime)
    };
    let floor_applied = best < minimum_wage;
    let value = best.max(minimum_wage);

    warnings.extend(exclusion_warnings(&excluded));

    debug!(
        liquidation = %liquidation,
        value = %value,
        method = ?method,
        last_ten_years_average = %last_ten_years_average,
        lifetime_average = %lifetime_average,
        month_count,
        excluded = excluded.len(),
        "IBL calculated"
    );

    let reasoning = format!(
        "Last 10 years: {} over {} month(s) = {}; lifetime: {} over {} month(s) = {}; {} wins{}",
        last_ten_years_sum.round_dp(2),
        last_ten_years_months,
        last_ten_years_average.round_dp(2),
        lifetime_sum.round_dp(2),
        month_count,
        lifetime_average.round_dp(2),
        match method {
            IblMethod::LastTenYears => "last 10 years",
            IblMethod::Lifetime => "lifetime",
        },
        if floor_applied {
            format!(", raised to one minimum wage ({})", minimum_wage)
        } else {
            String::new()
        }
    );

    let audit_step = AuditStep {
        step_number,
        rule_id: "ibl".to_string(),
        rule_name: "Base Settlement Income".to_string(),
        clause_ref: IBL_CLAUSE.to_string(),
        input: serde_json::json!({
            "source": source.label(),
            "liquidation_month": liquidation.to_string(),
            "index_final": index_final.to_string(),
            "minimum_wage": minimum_wage.to_string(),
            "months_with_base": monthly.bases.len(),
        }),
        output: serde_json::json!({
            "value": value.to_string(),
            "method": method,
            "last_ten_years_average": last_ten_years_average.to_string(),
            "last_ten_years_months": last_ten_years_months,
            "lifetime_average": lifetime_average.to_string(),
            "month_count": month_count,
            "floor_applied": floor_applied,
            "excluded_months": excluded.len(),
        }),
        reasoning,
    };

    Ok(IblResult {
        ibl: BaseSettlementIncome {
            value,
            method,
            last_ten_years_average,
            lifetime_average,
            month_count,
            last_ten_years_months,
            last_ten_years_sum,
            floor_applied,
            details,
            excluded_months: excluded.into_iter().map(|(m, _)| m).collect(),
        },
        audit_step,
        warnings,
    })
}

fn average(sum: Decimal, months: u32) -> Decimal {
    if months == 0 {
        Decimal::ZERO
    } else {
        sum / Decimal::from(months)
    }
}

/// Collapses per-month exclusions into one warning per reason.
fn exclusion_warnings(excluded: &[(YearMonth, Exclusion)]) -> Vec<AuditWarning> {
    let mut after = Vec::new();
    let mut no_wage = Vec::new();
    let mut no_index = Vec::new();
    for (month, reason) in excluded {
        match reason {
            Exclusion::AfterLiquidation => after.push(*month),
            Exclusion::MinimumWageMissing => no_wage.push(*month),
            Exclusion::PriceIndexMissing => no_index.push(*month),
        }
    }

    let mut warnings = Vec::new();
    let groups = [
        (
            after,
            "MONTH_AFTER_LIQUIDATION",
            "after the liquidation month",
            WarningSeverity::Low,
        ),
        (
            no_wage,
            "MINIMUM_WAGE_MISSING",
            "without a minimum wage for their year",
            WarningSeverity::Medium,
        ),
        (
            no_index,
            "PRICE_INDEX_MISSING",
            "without a price index",
            WarningSeverity::Medium,
        ),
    ];
    for (months, code, why, severity) in groups {
        if let (Some(first), Some(last)) = (months.first(), months.last()) {
            warn!(code, months = months.len(), first = %first, last = %last, "Months excluded from IBL");
            warnings.push(AuditWarning::new(
                code,
                format!(
                    "{} month(s) {} excluded from both averages ({} to {})",
                    months.len(),
                    why,
                    first,
                    last
                ),
                severity,
            ));
        }
    }
    warnings
}
