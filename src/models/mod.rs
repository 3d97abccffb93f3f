//! Core data models for the Pension Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod applicant;
mod audit;
mod employment;
mod pension_report;
mod period;

pub use applicant::{Applicant, Gender};
pub use audit::{AuditStep, AuditTrace, AuditWarning, WarningSeverity};
pub use employment::{
    ContributionSource, EmploymentHistory, EmploymentRecord, MonthlyContribution,
};
pub use pension_report::{
    BaseSettlementIncome, ContributionBurden, Eligibility, GoalSeekHorizon, IblMethod,
    IblMonthDetail, Indemnity, MonthlyPension, PensionReport, ReplacementRate, WeeksSource,
    WeeksSummary,
};
pub use period::{DateInterval, YearMonth};
