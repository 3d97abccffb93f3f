//! Calculation logic for the Pension Engine.
//!
//! This module contains the statutory calculations that turn an employment
//! history into a pension report: 30/360 day counting and interval merging,
//! the contributed-weeks cascade, monthly base aggregation, the base
//! settlement income (IBL), the replacement rate, the monthly pension and
//! substitute indemnity, eligibility, the contribution burden, and the
//! goal-seeking solver for a target pension.

mod burden;
mod day_count;
mod eligibility;
mod goal_seek;
mod ibl;
mod monthly_base;
mod pension;
mod replacement_rate;
mod report;
mod weeks;

pub use burden::{
    HEALTH_CONTRIBUTION_RATE, OCCUPATIONAL_RISK_RATE, PENSION_CONTRIBUTION_RATE,
    calculate_contribution_burden,
};
pub use day_count::{day360, merge_intervals, total_days360};
pub use eligibility::{
    EligibilityResult, FEMALE_RETIREMENT_AGE, MALE_RETIREMENT_AGE, WEEKS_PER_YEAR,
    evaluate_eligibility, required_retirement_age,
};
pub use goal_seek::{
    GOAL_SEEK_HORIZONS, GOAL_SEEK_ITERATIONS, MAX_EXISTING_MONTHS, WINDOW_MONTHS, seek_required_base,
};
pub use ibl::{BASE_CAP_MINIMUM_WAGES, IblResult, LAST_WINDOW_YEARS, calculate_ibl};
pub use monthly_base::{MonthlyBases, aggregate_monthly_bases};
pub use pension::{
    DEFAULT_INDEMNITY_RATE, IndemnityResult, MonthlyPensionResult, calculate_indemnity,
    calculate_monthly_pension, monthly_pension,
};
pub use replacement_rate::{
    MAXIMUM_RATE, MINIMUM_RATE, MINIMUM_WEEKS, ReplacementRateResult, calculate_replacement_rate,
    replacement_rate,
};
pub use report::{calculate_pension_report, project_pension_report};
pub use weeks::{PLAUSIBLE_WEEKS_THRESHOLD, WeeksResult, calculate_weeks};
