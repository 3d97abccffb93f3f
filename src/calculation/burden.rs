//! Contribution burden on a monthly base.
//!
//! A flat split into pension, health and occupational-risk (tier I)
//! contributions. No year bands apply.

use rust_decimal::Decimal;

use crate::models::ContributionBurden;

/// Pension contribution rate.
pub const PENSION_CONTRIBUTION_RATE: Decimal = Decimal::from_parts(16, 0, 0, false, 2);

/// Health contribution rate.
pub const HEALTH_CONTRIBUTION_RATE: Decimal = Decimal::from_parts(125, 0, 0, false, 3);

/// Occupational-risk contribution rate, risk class I.
pub const OCCUPATIONAL_RISK_RATE: Decimal = Decimal::from_parts(522, 0, 0, false, 5);

/// Splits a monthly contribution base into its statutory components.
///
/// # Examples
///
/// ```
/// use pension_engine::calculation::calculate_contribution_burden;
/// use rust_decimal::Decimal;
///
/// let burden = calculate_contribution_burden(Decimal::new(1_000_000, 0));
/// assert_eq!(burden.pension, Decimal::new(160_000, 0));
/// assert_eq!(burden.health, Decimal::new(125_000, 0));
/// assert_eq!(burden.occupational_risk, Decimal::new(5_220, 0));
/// assert_eq!(burden.total, Decimal::new(290_220, 0));
/// ```
pub fn calculate_contribution_burden(base: Decimal) -> ContributionBurden {
    let pension = base * PENSION_CONTRIBUTION_RATE;
    let health = base * HEALTH_CONTRIBUTION_RATE;
    let occupational_risk = base * OCCUPATIONAL_RISK_RATE;

    ContributionBurden {
        base,
        pension,
        health,
        occupational_risk,
        total: pension + health + occupational_risk,
    }
}
