//! Inverse solver for the contribution base that reaches a target pension.
//!
//! For each horizon the solver assumes the person keeps contributing a
//! constant monthly base for that many years, with 48 weeks credited per
//! year. New months enter the rolling 120-month window and push the oldest
//! existing months out. A fixed-count bisection over one to twenty-five
//! minimum wages then finds the smallest base whose simulated pension meets
//! the target.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info};

use crate::config::ReferenceTables;
use crate::error::{EngineError, EngineResult};
use crate::models::GoalSeekHorizon;

use super::burden::calculate_contribution_burden;
use super::eligibility::WEEKS_PER_YEAR;
use super::ibl::BASE_CAP_MINIMUM_WAGES;
use super::pension::monthly_pension;
use super::replacement_rate::replacement_rate;

/// Horizons, in years, evaluated by the solver.
pub const GOAL_SEEK_HORIZONS: [u32; 5] = [1, 2, 3, 5, 10];

/// Bisection steps per horizon. The count is fixed so results do not depend
/// on a tolerance.
pub const GOAL_SEEK_ITERATIONS: u32 = 60;

/// Length of the rolling averaging window, in months.
pub const WINDOW_MONTHS: u32 = 120;

/// Largest month count the IBL reports for its window: ten years plus the
/// liquidation month itself.
pub const MAX_EXISTING_MONTHS: u32 = WINDOW_MONTHS + 1;

/// Existing contributions inside the window after `years` more of new ones.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WindowProjection {
    /// Existing indexed sum, scaled by the share of months that survive.
    surviving_sum: Decimal,
    /// New months that land inside the window.
    new_months: u32,
}

impl WindowProjection {
    /// `existing_months` may be [`MAX_EXISTING_MONTHS`], since the IBL window
    /// includes both of its boundary months. The existing average is taken
    /// over that count before the oldest months are pushed out.
    fn new(existing_sum: Decimal, existing_months: u32, years: u32) -> Self {
        let new_months = years.saturating_mul(12).min(WINDOW_MONTHS);
        let surviving = existing_months.min(WINDOW_MONTHS - new_months);

        let surviving_sum = if existing_months == 0 {
            Decimal::ZERO
        } else {
            existing_sum / Decimal::from(existing_months) * Decimal::from(surviving)
        };

        Self {
            surviving_sum,
            new_months,
        }
    }

    /// IBL when every new month contributes `base`.
    fn simulated_ibl(&self, base: Decimal) -> Decimal {
        (self.surviving_sum + base * Decimal::from(self.new_months)) / Decimal::from(WINDOW_MONTHS)
    }
}

/// Finds the monthly base needed to reach `target_pension` at each horizon.
///
/// The last-ten-years sum and month count are the ones reported by the IBL
/// calculation; they describe the window as it stands today. Because that
/// window includes both boundary months the count can be 121; the solver
/// averages over the reported count, then keeps only the months that still
/// fit alongside the new ones.
///
/// # Errors
///
/// - `InvalidInput` when the target is not positive, the weeks or sum are
///   negative, or the month count exceeds [`MAX_EXISTING_MONTHS`]
/// - `MinimumWageNotFound` when the liquidation year has no minimum wage
///
/// A target the solver cannot reach is not an error. The horizon is returned
/// with `feasible = false` and the base at the 25-minimum-wage ceiling.
///
/// # Examples
///
/// ```no_run
/// use pension_engine::calculation::seek_required_base;
/// use pension_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::load("./config/colombia").unwrap();
/// let horizons = seek_required_base(
///     Decimal::new(3_000_000, 0),
///     Decimal::new(1100, 0),
///     Decimal::new(240_000_000, 0),
///     120,
///     2025,
///     config.tables(),
/// )
/// .unwrap();
/// assert_eq!(horizons.len(), 5);
/// ```
pub fn seek_required_base(
    target_pension: Decimal,
    total_weeks: Decimal,
    last_ten_years_sum: Decimal,
    last_ten_years_months: u32,
    liquidation_year: i32,
    tables: &ReferenceTables,
) -> EngineResult<Vec<GoalSeekHorizon>> {
    if target_pension <= Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "target_pension".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    if total_weeks < Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "total_weeks".to_string(),
            message: "must not be negative".to_string(),
        });
    }
    if last_ten_years_sum < Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "last_ten_years_sum".to_string(),
            message: "must not be negative".to_string(),
        });
    }

    if last_ten_years_months > MAX_EXISTING_MONTHS {
        return Err(EngineError::InvalidInput {
            field: "last_ten_years_months".to_string(),
            message: format!("must be at most {}", MAX_EXISTING_MONTHS),
        });
    }

    let minimum_wage = tables.require_minimum_wage(liquidation_year)?;
    let ceiling = BASE_CAP_MINIMUM_WAGES * minimum_wage;

    info!(
        target = %target_pension,
        total_weeks = %total_weeks,
        liquidation_year,
        "Seeking required contribution base"
    );

    let horizons = GOAL_SEEK_HORIZONS
        .iter()
        .map(|&years| {
            let projected_weeks = total_weeks + Decimal::from(years) * WEEKS_PER_YEAR;
            let window =
                WindowProjection::new(last_ten_years_sum, last_ten_years_months, years);

            let pension_for = |base: Decimal| {
                let ibl = window.simulated_ibl(base);
                let rate = replacement_rate(ibl, projected_weeks, minimum_wage);
                monthly_pension(ibl, rate.rate, minimum_wage).amount
            };

            let mut lo = minimum_wage;
            let mut hi = ceiling;
            for _ in 0..GOAL_SEEK_ITERATIONS {
                let mid = (lo + hi) / Decimal::TWO;
                if pension_for(mid) >= target_pension {
                    hi = mid;
                } else {
                    lo = mid;
                }
            }

            let projected_pension = pension_for(hi);
            let feasible = projected_pension >= target_pension;
            let required_monthly_base =
                hi.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

            debug!(
                years,
                required_base = %required_monthly_base,
                projected_pension = %projected_pension,
                feasible,
                "Horizon solved"
            );

            GoalSeekHorizon {
                years,
                required_monthly_base,
                feasible,
                burden: calculate_contribution_burden(required_monthly_base),
                projected_weeks,
                projected_pension: projected_pension
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            }
        })
        .collect();

    Ok(horizons)
}
