//! Reference table loading and management for the Pension Engine.
//!
//! This module loads the statutory reference data from YAML files: minimum
//! wages by year, the monthly price index, and the historical contribution
//! rate schedule. It also provides value-level overlays for what-if
//! projections.
//!
//! # Example
//!
//! ```no_run
//! use pension_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/colombia").unwrap();
//! println!("Loaded regime: {}", config.law().name);
//! ```

mod loader;
mod overlay;
mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use loader::ConfigLoader;
pub use overlay::{MAX_PROJECTION_YEARS, ProjectionAssumptions, ReferenceOverlay};
pub use types::{
    ContributionRateBand, ContributionRateConfig, ContributionRateSchedule, LawMetadata,
    MinimumWageConfig, PriceIndexYear, ReferenceTables,
};
