//! Reference table types for entitlement calculation.
//!
//! This module contains the strongly-typed file structures deserialized from
//! the YAML reference directory and the immutable [`ReferenceTables`] the
//! calculators read from.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};
use crate::models::YearMonth;

/// Metadata about the statute the tables implement.
#[derive(Debug, Clone, Deserialize)]
pub struct LawMetadata {
    /// Short jurisdiction code (e.g., "CO-RPM").
    pub code: String,
    /// The human-readable name of the regime.
    pub name: String,
    /// The version or publication date of the tables.
    pub version: String,
    /// URL to the official statute text.
    pub source_url: String,
}

/// Minimum wage file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct MinimumWageConfig {
    /// Monthly minimum wage by calendar year.
    pub minimum_wages: BTreeMap<i32, Decimal>,
}

/// One year of the price-index series, as stored in `price_index/<year>.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceIndexYear {
    /// The calendar year.
    pub year: i32,
    /// Index values starting at January; a partial year lists fewer than 12.
    pub months: Vec<Decimal>,
}

/// A band of the historical pension contribution rate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContributionRateBand {
    /// First year the rate applied (inclusive).
    pub start_year: i32,
    /// Last year the rate applied (inclusive).
    pub end_year: i32,
    /// Contribution rate as a fraction (e.g., 0.16).
    pub rate: Decimal,
}

/// Contribution rate file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ContributionRateConfig {
    /// Rate bands in any order.
    pub bands: Vec<ContributionRateBand>,
}

/// Ordered historical contribution-rate bands.
///
/// # Example
///
/// ```
/// use pension_engine::config::{ContributionRateBand, ContributionRateSchedule};
/// use rust_decimal::Decimal;
///
/// let schedule = ContributionRateSchedule::new(vec![
///     ContributionRateBand { start_year: 2008, end_year: 2100, rate: Decimal::new(16, 2) },
///     ContributionRateBand { start_year: 1994, end_year: 2007, rate: Decimal::new(135, 3) },
/// ]);
/// assert_eq!(schedule.rate_for_year(2001), Some(Decimal::new(135, 3)));
/// assert_eq!(schedule.rate_for_year(1980), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributionRateSchedule {
    bands: Vec<ContributionRateBand>,
}

impl ContributionRateSchedule {
    /// Creates a schedule, sorting bands by start year.
    pub fn new(bands: Vec<ContributionRateBand>) -> Self {
        let mut sorted = bands;
        sorted.sort_by_key(|b| b.start_year);
        Self { bands: sorted }
    }

    /// Returns the rate of the band containing `year`, if any.
    pub fn rate_for_year(&self, year: i32) -> Option<Decimal> {
        self.bands
            .iter()
            .find(|b| b.start_year <= year && year <= b.end_year)
            .map(|b| b.rate)
    }

    /// Returns all bands in chronological order.
    pub fn bands(&self) -> &[ContributionRateBand] {
        &self.bands
    }
}

/// The complete reference data loaded at engine construction.
///
/// Tables are read-only once built. What-if projections build a new value
/// with [`ReferenceTables::with_overlay`] instead of editing this one.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    metadata: LawMetadata,
    minimum_wages: BTreeMap<i32, Decimal>,
    price_index: BTreeMap<YearMonth, Decimal>,
    contribution_rates: ContributionRateSchedule,
}

impl ReferenceTables {
    /// Creates reference tables from their component parts.
    pub fn new(
        metadata: LawMetadata,
        minimum_wages: BTreeMap<i32, Decimal>,
        price_index: BTreeMap<YearMonth, Decimal>,
        contribution_rates: ContributionRateSchedule,
    ) -> Self {
        Self {
            metadata,
            minimum_wages,
            price_index,
            contribution_rates,
        }
    }

    /// Returns the statute metadata.
    pub fn metadata(&self) -> &LawMetadata {
        &self.metadata
    }

    /// Returns the minimum wage for `year`, if known.
    pub fn minimum_wage(&self, year: i32) -> Option<Decimal> {
        self.minimum_wages.get(&year).copied()
    }

    /// Returns the minimum wage for `year` or a `MinimumWageNotFound` error.
    pub fn require_minimum_wage(&self, year: i32) -> EngineResult<Decimal> {
        self.minimum_wage(year)
            .ok_or(EngineError::MinimumWageNotFound { year })
    }

    /// Returns the price index for a month, if known.
    pub fn price_index(&self, month: YearMonth) -> Option<Decimal> {
        self.price_index.get(&month).copied()
    }

    /// Returns the price index for a month or a `PriceIndexNotFound` error.
    pub fn require_price_index(&self, month: YearMonth) -> EngineResult<Decimal> {
        self.price_index(month)
            .ok_or(EngineError::PriceIndexNotFound {
                year: month.year,
                month: month.month,
            })
    }

    /// Returns the historical contribution-rate schedule.
    pub fn contribution_rates(&self) -> &ContributionRateSchedule {
        &self.contribution_rates
    }

    /// Returns the most recent year with a minimum wage.
    pub fn latest_minimum_wage(&self) -> Option<(i32, Decimal)> {
        self.minimum_wages.iter().next_back().map(|(y, w)| (*y, *w))
    }

    /// Returns the most recent month with a price index.
    pub fn latest_price_index(&self) -> Option<(YearMonth, Decimal)> {
        self.price_index.iter().next_back().map(|(m, v)| (*m, *v))
    }

    pub(crate) fn minimum_wages(&self) -> &BTreeMap<i32, Decimal> {
        &self.minimum_wages
    }

    pub(crate) fn price_index_series(&self) -> &BTreeMap<YearMonth, Decimal> {
        &self.price_index
    }
}
