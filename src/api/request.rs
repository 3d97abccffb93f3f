//! Request types for the Pension Engine API.
//!
//! Employment histories and applicants deserialize straight into the domain
//! models; only the envelope around them lives here.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ProjectionAssumptions;
use crate::models::{Applicant, EmploymentHistory};

/// Request body for the `/calculate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The parsed employment and contribution history.
    pub history: EmploymentHistory,
    /// Age and gender of the applicant.
    pub applicant: Applicant,
    /// The date the pension would be liquidated.
    pub liquidation_date: NaiveDate,
    /// Start date for eligibility projections. Defaults to today (UTC).
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    /// When present, reference tables are extrapolated through the
    /// liquidation month with these assumptions.
    #[serde(default)]
    pub projection: Option<ProjectionAssumptions>,
}

/// Request body for the `/goal-seek` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalSeekRequest {
    /// The monthly pension to reach.
    pub target_pension: Decimal,
    /// Weeks contributed so far.
    pub total_weeks: Decimal,
    /// Indexed sum of the months currently inside the ten-year window.
    pub last_ten_years_sum: Decimal,
    /// Number of months currently inside the ten-year window.
    pub last_ten_years_months: u32,
    /// Year whose minimum wage bounds the search.
    pub liquidation_year: i32,
}

/// Request body for the `/burden` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurdenRequest {
    /// The monthly contribution base to split.
    pub base: Decimal,
}
