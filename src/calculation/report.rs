//! Full pension report assembly.
//!
//! Runs weeks, IBL, replacement rate, pension, eligibility and indemnity in
//! that order against one set of reference tables, numbering audit steps as
//! it goes.

use std::time::Instant;

use chrono::{Datelike, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::config::{ReferenceOverlay, ReferenceTables};
use crate::error::EngineResult;
use crate::models::{Applicant, AuditTrace, EmploymentHistory, PensionReport};

use super::burden::calculate_contribution_burden;
use super::eligibility::evaluate_eligibility;
use super::ibl::calculate_ibl;
use super::pension::{calculate_indemnity, calculate_monthly_pension};
use super::replacement_rate::calculate_replacement_rate;
use super::weeks::calculate_weeks;

/// Calculates the complete pension report for one applicant.
///
/// `as_of` is the date eligibility projections start from. It is separate
/// from `liquidation_date`, which fixes the indexation target and the
/// minimum wage year.
///
/// # Errors
///
/// - `InvalidRecord` when a record or detail row fails validation
/// - `PriceIndexNotFound` / `MinimumWageNotFound` when the liquidation month
///   or year is missing from the tables
pub fn calculate_pension_report(
    history: &EmploymentHistory,
    applicant: &Applicant,
    liquidation_date: NaiveDate,
    as_of: NaiveDate,
    tables: &ReferenceTables,
) -> EngineResult<PensionReport> {
    let start_time = Instant::now();
    history.validate()?;

    let mut steps = Vec::new();
    let mut warnings = Vec::new();
    let mut step_number: u32 = 1;
    let liquidation_year = liquidation_date.year();

    let weeks_result = calculate_weeks(history, step_number);
    let weeks = weeks_result.summary;
    steps.push(weeks_result.audit_step);
    warnings.extend(weeks_result.warnings);
    step_number += 1;

    let ibl_result = calculate_ibl(
        history.contribution_source(),
        liquidation_date,
        tables,
        step_number,
    )?;
    let ibl = ibl_result.ibl;
    steps.push(ibl_result.audit_step);
    warnings.extend(ibl_result.warnings);
    step_number += 1;

    let rate_result = calculate_replacement_rate(
        ibl.value,
        weeks.total_weeks,
        liquidation_year,
        tables,
        step_number,
    )?;
    let replacement_rate = rate_result.rate;
    steps.push(rate_result.audit_step);
    step_number += 1;

    let pension_result = calculate_monthly_pension(
        ibl.value,
        replacement_rate.rate,
        liquidation_year,
        tables,
        step_number,
    )?;
    steps.push(pension_result.audit_step);
    step_number += 1;

    let eligibility_result = evaluate_eligibility(weeks.total_weeks, applicant, as_of, step_number);
    steps.push(eligibility_result.audit_step);
    step_number += 1;

    let indemnity_result = calculate_indemnity(
        ibl.value,
        weeks.total_weeks,
        &history.records,
        tables,
        step_number,
    );
    steps.push(indemnity_result.audit_step);

    let burden = calculate_contribution_burden(ibl.value);
    let duration_us = start_time.elapsed().as_micros() as u64;

    info!(
        total_weeks = %weeks.total_weeks,
        ibl = %ibl.value,
        rate = %replacement_rate.rate,
        pension = %pension_result.pension.amount,
        eligible = eligibility_result.eligibility.eligible,
        warnings = warnings.len(),
        duration_us,
        "Pension report calculated"
    );

    Ok(PensionReport {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        liquidation_date,
        as_of,
        weeks,
        ibl,
        replacement_rate,
        pension: pension_result.pension,
        eligibility: eligibility_result.eligibility,
        indemnity: indemnity_result.indemnity,
        burden,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us,
        },
    })
}

/// Calculates a report against `base` with `overlay` rows layered on top.
///
/// Use this for liquidation dates beyond the published tables, typically
/// with an overlay from [`ReferenceOverlay::extrapolate`]. `base` is not
/// modified.
pub fn project_pension_report(
    history: &EmploymentHistory,
    applicant: &Applicant,
    liquidation_date: NaiveDate,
    as_of: NaiveDate,
    base: &ReferenceTables,
    overlay: &ReferenceOverlay,
) -> EngineResult<PensionReport> {
    let tables = base.with_overlay(overlay);
    calculate_pension_report(history, applicant, liquidation_date, as_of, &tables)
}
