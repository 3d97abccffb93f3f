//! Monthly pension and lump-sum indemnity.
//!
//! The pension is the IBL times the replacement rate, kept between one and
//! twenty-five minimum wages. Applicants who fall short of the minimum weeks
//! receive a one-time indemnity instead, weighted by the contribution rate
//! that applied during each employment period.

use chrono::Datelike;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::config::ReferenceTables;
use crate::error::EngineResult;
use crate::models::{AuditStep, EmploymentRecord, Indemnity, MonthlyPension};

use super::day_count::day360;
use super::ibl::BASE_CAP_MINIMUM_WAGES;
use super::replacement_rate::MINIMUM_WEEKS;

/// Contribution rate assumed for periods outside every band, and when no
/// period has dates.
pub const DEFAULT_INDEMNITY_RATE: Decimal = Decimal::from_parts(16, 0, 0, false, 2);

/// The clause reference for the pension amount.
pub const PENSION_CLAUSE: &str = "Ley 100/1993 arts. 34, 35";

/// The clause reference for the indemnity.
pub const INDEMNITY_CLAUSE: &str = "Ley 100/1993 art. 37";

/// The result of the monthly pension calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct MonthlyPensionResult {
    /// The pension amount.
    pub pension: MonthlyPension,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// The result of the indemnity calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct IndemnityResult {
    /// The indemnity amount and weighting.
    pub indemnity: Indemnity,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Applies a replacement rate (in percentage points) to an IBL.
///
/// The floor holds even when the raw product is below one minimum wage.
///
/// # Examples
///
/// ```
/// use pension_engine::calculation::monthly_pension;
/// use rust_decimal::Decimal;
///
/// let wage = Decimal::new(1_300_000, 0);
/// let pension = monthly_pension(wage, Decimal::new(55, 0), wage);
/// assert_eq!(pension.amount, wage);
/// assert!(pension.floor_applied);
/// ```
pub fn monthly_pension(ibl: Decimal, rate: Decimal, minimum_wage: Decimal) -> MonthlyPension {
    let raw_amount = ibl * (rate / Decimal::ONE_HUNDRED);
    let ceiling = BASE_CAP_MINIMUM_WAGES * minimum_wage;
    let amount = raw_amount.clamp(minimum_wage, ceiling);

    MonthlyPension {
        amount,
        raw_amount,
        floor_applied: raw_amount < minimum_wage,
        cap_applied: raw_amount > ceiling,
    }
}

/// Calculates the monthly pension for a liquidation year.
///
/// # Errors
///
/// Returns `MinimumWageNotFound` when the liquidation year has no minimum wage.
pub fn calculate_monthly_pension(
    ibl: Decimal,
    rate: Decimal,
    liquidation_year: i32,
    tables: &ReferenceTables,
    step_number: u32,
) -> EngineResult<MonthlyPensionResult> {
    let minimum_wage = tables.require_minimum_wage(liquidation_year)?;
    let pension = monthly_pension(ibl, rate, minimum_wage);

    debug!(amount = %pension.amount, raw = %pension.raw_amount, "Monthly pension calculated");

    let reasoning = if pension.floor_applied {
        format!(
            "{} x {}% = {} is below one minimum wage; pension raised to {}",
            ibl.round_dp(2),
            rate.round_dp(4),
            pension.raw_amount.round_dp(2),
            pension.amount
        )
    } else if pension.cap_applied {
        format!(
            "{} x {}% = {} exceeds 25 minimum wages; pension capped at {}",
            ibl.round_dp(2),
            rate.round_dp(4),
            pension.raw_amount.round_dp(2),
            pension.amount
        )
    } else {
        format!(
            "{} x {}% = {}",
            ibl.round_dp(2),
            rate.round_dp(4),
            pension.amount.round_dp(2)
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "monthly_pension".to_string(),
        rule_name: "Monthly Pension".to_string(),
        clause_ref: PENSION_CLAUSE.to_string(),
        input: serde_json::json!({
            "ibl": ibl.to_string(),
            "rate": rate.to_string(),
            "minimum_wage": minimum_wage.to_string(),
        }),
        output: serde_json::json!({
            "amount": pension.amount.to_string(),
            "raw_amount": pension.raw_amount.to_string(),
            "floor_applied": pension.floor_applied,
            "cap_applied": pension.cap_applied,
        }),
        reasoning,
    };

    Ok(MonthlyPensionResult {
        pension,
        audit_step,
    })
}

/// Calculates the lump-sum indemnity for applicants below the minimum weeks.
///
/// Each dated record contributes its 30/360 length, weighted by the
/// contribution rate in force in the year of its midpoint. The amount is
/// `round(IBL × total_weeks × weighted_rate)`, or zero when the minimum
/// weeks are met.
pub fn calculate_indemnity(
    ibl: Decimal,
    total_weeks: Decimal,
    records: &[EmploymentRecord],
    tables: &ReferenceTables,
    step_number: u32,
) -> IndemnityResult {
    let applicable = total_weeks < MINIMUM_WEEKS;
    let schedule = tables.contribution_rates();

    let mut weighted_days: i64 = 0;
    let mut weighted_sum = Decimal::ZERO;
    for interval in records.iter().filter_map(|r| r.interval()) {
        let days = day360(interval.start, interval.end);
        let rate = schedule
            .rate_for_year(interval.midpoint().year())
            .unwrap_or(DEFAULT_INDEMNITY_RATE);
        weighted_days += days;
        weighted_sum += Decimal::from(days) * rate;
    }

    let weighted_rate = if weighted_days > 0 {
        weighted_sum / Decimal::from(weighted_days)
    } else {
        DEFAULT_INDEMNITY_RATE
    };

    let amount = if applicable {
        (ibl * total_weeks * weighted_rate)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    };

    debug!(applicable, amount = %amount, weighted_rate = %weighted_rate, "Indemnity calculated");

    let reasoning = if applicable {
        format!(
            "{} weeks below {}; {} x {} x {} = {}",
            total_weeks.round_dp(2),
            MINIMUM_WEEKS,
            ibl.round_dp(2),
            total_weeks.round_dp(2),
            weighted_rate.round_dp(6),
            amount
        )
    } else {
        format!(
            "{} weeks meet the {} week minimum; no indemnity",
            total_weeks.round_dp(2),
            MINIMUM_WEEKS
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "indemnity".to_string(),
        rule_name: "Substitute Indemnity".to_string(),
        clause_ref: INDEMNITY_CLAUSE.to_string(),
        input: serde_json::json!({
            "ibl": ibl.to_string(),
            "total_weeks": total_weeks.to_string(),
            "dated_records": records.iter().filter(|r| r.interval().is_some()).count(),
        }),
        output: serde_json::json!({
            "applicable": applicable,
            "amount": amount.to_string(),
            "weighted_rate": weighted_rate.to_string(),
            "weighted_days": weighted_days,
        }),
        reasoning,
    };

    IndemnityResult {
        indemnity: Indemnity {
            applicable,
            amount,
            weighted_rate,
            weighted_days,
        },
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::{dec, test_tables};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(start: Option<NaiveDate>, end: Option<NaiveDate>) -> EmploymentRecord {
        EmploymentRecord {
            employer_id: "900111".to_string(),
            employer_name: "Servicios SA".to_string(),
            start_date: start,
            end_date: end,
            salary: dec("1000000"),
            reported_weeks: Decimal::ZERO,
            total_weeks: Decimal::ZERO,
            simultaneous_weeks: None,
        }
    }

    #[test]
    fn test_pension_floor_overrides_raw_product() {
        let wage = dec("1300000");
        let pension = monthly_pension(wage, dec("55"), wage);
        assert_eq!(pension.raw_amount, dec("715000"));
        assert_eq!(pension.amount, wage);
        assert!(pension.floor_applied);
        assert!(!pension.cap_applied);
    }

    #[test]
    fn test_pension_cap_at_25_minimum_wages() {
        let wage = dec("1000000");
        let pension = monthly_pension(dec("40000000"), dec("80"), wage);
        assert_eq!(pension.amount, dec("25000000"));
        assert!(pension.cap_applied);
    }

    #[test]
    fn test_pension_within_bounds_is_raw_product() {
        let pension = monthly_pension(dec("4000000"), dec("62.5"), dec("1000000"));
        assert_eq!(pension.amount, dec("2500000"));
        assert!(!pension.floor_applied && !pension.cap_applied);
    }

    #[test]
    fn test_calculate_monthly_pension_records_audit_step() {
        let tables = test_tables();
        let result = calculate_monthly_pension(dec("2600000"), dec("64.5"), 2024, &tables, 4).unwrap();
        assert_eq!(result.pension.amount, dec("1677000"));
        assert_eq!(result.audit_step.rule_id, "monthly_pension");
    }

    #[test]
    fn test_indemnity_not_applicable_at_minimum_weeks() {
        let tables = test_tables();
        let result = calculate_indemnity(dec("2000000"), dec("1300"), &[], &tables, 1);
        assert!(!result.indemnity.applicable);
        assert_eq!(result.indemnity.amount, Decimal::ZERO);
    }

    #[test]
    fn test_indemnity_defaults_to_16_percent_without_dates() {
        let tables = test_tables();
        let records = vec![record(None, None)];
        let result = calculate_indemnity(dec("1000000"), dec("500"), &records, &tables, 1);

        assert_eq!(result.indemnity.weighted_rate, dec("0.16"));
        assert_eq!(result.indemnity.weighted_days, 0);
        assert_eq!(result.indemnity.amount, dec("80000000"));
    }

    #[test]
    fn test_indemnity_weights_rates_by_days() {
        let tables = test_tables();
        // 360 days at 13.5% (midpoint 2000) and 1080 days at 16% (midpoint 2011)
        let records = vec![
            record(Some(date(2000, 1, 1)), Some(date(2000, 12, 30))),
            record(Some(date(2010, 1, 1)), Some(date(2012, 12, 30))),
        ];
        let result = calculate_indemnity(dec("1000000"), dec("200"), &records, &tables, 1);

        // (360 * 0.135 + 1080 * 0.16) / 1440 = 0.15375
        assert_eq!(result.indemnity.weighted_days, 1440);
        assert_eq!(result.indemnity.weighted_rate, dec("0.15375"));
        assert_eq!(result.indemnity.amount, dec("30750000"));
    }

    #[test]
    fn test_indemnity_rounds_to_whole_units() {
        let tables = test_tables();
        let result = calculate_indemnity(dec("1000000.03"), dec("10.5"), &[], &tables, 1);
        // 1000000.03 * 10.5 * 0.16 = 1680000.0504
        assert_eq!(result.indemnity.amount, dec("1680000"));
    }
}
