//! Error types for the Pension Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for the hard failures that can occur while computing an entitlement.
//! Soft conditions (a historical month without a price index, a record
//! without dates) are never errors; they surface as audit warnings.

use thiserror::Error;

/// The main error type for the Pension Engine.
///
/// # Example
///
/// ```
/// use pension_engine::error::EngineError;
///
/// let error = EngineError::PriceIndexNotFound { year: 2025, month: 9 };
/// assert_eq!(error.to_string(), "Price index not found for 2025-09");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The price index for the liquidation month is missing, so nothing can be indexed.
    #[error("Price index not found for {year}-{month:02}")]
    PriceIndexNotFound {
        /// The year of the missing index value.
        year: i32,
        /// The month (1-12) of the missing index value.
        month: u32,
    },

    /// The minimum wage for a year required as a floor/cap unit is missing.
    #[error("Minimum wage not found for year {year}")]
    MinimumWageNotFound {
        /// The year without a minimum wage entry.
        year: i32,
    },

    /// An employment record was structurally invalid.
    #[error("Invalid employment record '{employer_id}': {message}")]
    InvalidRecord {
        /// The employer identifier of the offending record.
        employer_id: String,
        /// A description of what made the record invalid.
        message: String,
    },

    /// A caller-supplied input was outside the accepted domain.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The input field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
