//! Old-age pension eligibility.
//!
//! Both the minimum weeks and the retirement age must hold at once. When
//! either is missing, the evaluator projects a date by assuming 48
//! contributed weeks per calendar year going forward.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use crate::models::{Applicant, AuditStep, Eligibility, Gender};

use super::replacement_rate::MINIMUM_WEEKS;

/// Weeks assumed to be contributed per year when projecting.
pub const WEEKS_PER_YEAR: Decimal = Decimal::from_parts(48, 0, 0, false, 0);

/// Retirement age for men, and for unrecognised gender.
pub const MALE_RETIREMENT_AGE: u32 = 62;

/// Retirement age for women.
pub const FEMALE_RETIREMENT_AGE: u32 = 57;

/// The clause reference for eligibility.
pub const ELIGIBILITY_CLAUSE: &str = "Ley 100/1993 art. 33 (Ley 797/2003 art. 9)";

/// The result of the eligibility evaluation, including the audit step.
#[derive(Debug, Clone)]
pub struct EligibilityResult {
    /// The eligibility determination.
    pub eligibility: Eligibility,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Returns the statutory retirement age for a gender.
pub fn required_retirement_age(gender: Gender) -> u32 {
    match gender {
        Gender::Female => FEMALE_RETIREMENT_AGE,
        Gender::Male | Gender::Unspecified => MALE_RETIREMENT_AGE,
    }
}

/// Evaluates eligibility as of a given date.
///
/// `years_until_eligible` is the larger of `weeks_remaining / 48` and
/// `years_to_age`, rounded up. The projected date adds that many whole years
/// to `as_of`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use pension_engine::calculation::evaluate_eligibility;
/// use pension_engine::models::{Applicant, Gender};
/// use rust_decimal::Decimal;
///
/// let applicant = Applicant { age: 60, gender: Gender::Male };
/// let as_of = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let result = evaluate_eligibility(Decimal::new(1000, 0), &applicant, as_of, 1);
///
/// // 300 weeks / 48 = 6.25 years, rounded up
/// assert_eq!(result.eligibility.years_until_eligible, 7);
/// assert!(!result.eligibility.eligible);
/// ```
pub fn evaluate_eligibility(
    total_weeks: Decimal,
    applicant: &Applicant,
    as_of: NaiveDate,
    step_number: u32,
) -> EligibilityResult {
    let required_age = required_retirement_age(applicant.gender);
    let weeks_met = total_weeks >= MINIMUM_WEEKS;
    let age_met = applicant.age >= required_age;

    let weeks_remaining = (MINIMUM_WEEKS - total_weeks).max(Decimal::ZERO);
    let years_to_age = required_age.saturating_sub(applicant.age);

    let years_for_weeks = (weeks_remaining / WEEKS_PER_YEAR).ceil();
    let years_until_eligible = years_for_weeks
        .max(Decimal::from(years_to_age))
        .to_u32()
        .unwrap_or(u32::MAX);

    let projected_eligibility_date = years_until_eligible
        .checked_mul(12)
        .and_then(|months| as_of.checked_add_months(Months::new(months)))
        .unwrap_or(NaiveDate::MAX);

    let eligible = weeks_met && age_met;

    debug!(
        eligible,
        weeks_met,
        age_met,
        years_until_eligible,
        "Eligibility evaluated"
    );

    let reasoning = if eligible {
        format!(
            "{} weeks >= {} and age {} >= {}; eligible",
            total_weeks.round_dp(2),
            MINIMUM_WEEKS,
            applicant.age,
            required_age
        )
    } else {
        format!(
            "{} weeks remaining ({} year(s) at 48/yr), {} year(s) to age {}; eligible in {} year(s), around {}",
            weeks_remaining.round_dp(2),
            years_for_weeks,
            years_to_age,
            required_age,
            years_until_eligible,
            projected_eligibility_date
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "eligibility".to_string(),
        rule_name: "Old-Age Eligibility".to_string(),
        clause_ref: ELIGIBILITY_CLAUSE.to_string(),
        input: serde_json::json!({
            "total_weeks": total_weeks.to_string(),
            "age": applicant.age,
            "gender": applicant.gender,
            "as_of": as_of.to_string(),
        }),
        output: serde_json::json!({
            "eligible": eligible,
            "weeks_met": weeks_met,
            "age_met": age_met,
            "weeks_remaining": weeks_remaining.to_string(),
            "years_to_age": years_to_age,
            "years_until_eligible": years_until_eligible,
            "projected_eligibility_date": projected_eligibility_date.to_string(),
        }),
        reasoning,
    };

    EligibilityResult {
        eligibility: Eligibility {
            eligible,
            weeks_met,
            age_met,
            required_weeks: MINIMUM_WEEKS,
            required_age,
            weeks_remaining,
            years_to_age,
            years_until_eligible,
            projected_eligibility_date,
        },
        audit_step,
    }
}
