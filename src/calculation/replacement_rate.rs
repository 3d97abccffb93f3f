//! Replacement rate calculation.
//!
//! The rate falls as income rises: `65.5 - 0.5 * s`, where `s` is the IBL in
//! minimum wages. Every full 50 weeks above the 1300-week minimum adds 1.5
//! points. The result is clamped to 55-80 percent.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::ReferenceTables;
use crate::error::EngineResult;
use crate::models::{AuditStep, ReplacementRate};

/// Statutory minimum weeks for an old-age pension.
pub const MINIMUM_WEEKS: Decimal = Decimal::from_parts(1300, 0, 0, false, 0);

/// Intercept of the base rate formula, in percentage points.
pub const BASE_RATE_INTERCEPT: Decimal = Decimal::from_parts(655, 0, 0, false, 1);

/// Points removed per minimum wage of IBL.
pub const BASE_RATE_SLOPE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Weeks above the minimum that earn one bonus increment.
pub const BONUS_WEEKS_STEP: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Points earned per full bonus step.
pub const BONUS_POINTS_PER_STEP: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Lowest permitted replacement rate.
pub const MINIMUM_RATE: Decimal = Decimal::from_parts(55, 0, 0, false, 0);

/// Highest permitted replacement rate.
pub const MAXIMUM_RATE: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// The clause reference for the replacement rate.
pub const REPLACEMENT_RATE_CLAUSE: &str = "Ley 100/1993 art. 34 (Ley 797/2003 art. 10)";

/// The result of the replacement rate calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct ReplacementRateResult {
    /// The rate and its components.
    pub rate: ReplacementRate,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the replacement rate from an IBL and total weeks.
///
/// This is the table-free core used by both the report and the goal seeker;
/// `minimum_wage` is the liquidation-year minimum wage.
///
/// # Examples
///
/// ```
/// use pension_engine::calculation::replacement_rate;
/// use rust_decimal::Decimal;
///
/// let wage = Decimal::new(1_000_000, 0);
/// // s = 3: 65.5 - 1.5 = 64; 1420 weeks: floor(120 / 50) * 1.5 = 3
/// let rate = replacement_rate(Decimal::new(3_000_000, 0), Decimal::new(1420, 0), wage);
/// assert_eq!(rate.base_rate, Decimal::new(64, 0));
/// assert_eq!(rate.bonus, Decimal::new(3, 0));
/// assert_eq!(rate.rate, Decimal::new(67, 0));
/// ```
pub fn replacement_rate(ibl: Decimal, total_weeks: Decimal, minimum_wage: Decimal) -> ReplacementRate {
    let s_ratio = ibl / minimum_wage;
    let base_rate = BASE_RATE_INTERCEPT - BASE_RATE_SLOPE * s_ratio;

    let extra_weeks = total_weeks - MINIMUM_WEEKS;
    let bonus = if extra_weeks > Decimal::ZERO {
        (extra_weeks / BONUS_WEEKS_STEP).floor() * BONUS_POINTS_PER_STEP
    } else {
        Decimal::ZERO
    };

    let rate = (base_rate + bonus).clamp(MINIMUM_RATE, MAXIMUM_RATE);

    ReplacementRate {
        rate,
        base_rate,
        bonus,
        s_ratio,
        extra_weeks,
    }
}

/// Calculates the replacement rate for a liquidation year.
///
/// # Errors
///
/// Returns `MinimumWageNotFound` when the liquidation year has no minimum wage.
pub fn calculate_replacement_rate(
    ibl: Decimal,
    total_weeks: Decimal,
    liquidation_year: i32,
    tables: &ReferenceTables,
    step_number: u32,
) -> EngineResult<ReplacementRateResult> {
    let minimum_wage = tables.require_minimum_wage(liquidation_year)?;
    let rate = replacement_rate(ibl, total_weeks, minimum_wage);

    debug!(rate = %rate.rate, s_ratio = %rate.s_ratio, bonus = %rate.bonus, "Replacement rate calculated");

    let raw = rate.base_rate + rate.bonus;
    let clamp_note = if raw > MAXIMUM_RATE {
        format!(" capped at {}", MAXIMUM_RATE)
    } else if raw < MINIMUM_RATE {
        format!(" raised to {}", MINIMUM_RATE)
    } else {
        String::new()
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "replacement_rate".to_string(),
        rule_name: "Replacement Rate".to_string(),
        clause_ref: REPLACEMENT_RATE_CLAUSE.to_string(),
        input: serde_json::json!({
            "ibl": ibl.to_string(),
            "total_weeks": total_weeks.to_string(),
            "minimum_wage": minimum_wage.to_string(),
        }),
        output: serde_json::json!({
            "rate": rate.rate.to_string(),
            "base_rate": rate.base_rate.to_string(),
            "bonus": rate.bonus.to_string(),
            "s_ratio": rate.s_ratio.to_string(),
            "extra_weeks": rate.extra_weeks.to_string(),
        }),
        reasoning: format!(
            "s = {}; 65.5 - 0.5 x s = {}; bonus {} points for {} extra weeks; rate {}%{}",
            rate.s_ratio.round_dp(4),
            rate.base_rate.round_dp(4),
            rate.bonus,
            rate.extra_weeks.max(Decimal::ZERO).round_dp(2),
            rate.rate.round_dp(4),
            clamp_note
        ),
    };

    Ok(ReplacementRateResult { rate, audit_step })
}
