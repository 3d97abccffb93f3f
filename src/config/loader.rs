//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading reference
//! tables from YAML files.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::YearMonth;

use super::types::{
    ContributionRateConfig, ContributionRateSchedule, LawMetadata, MinimumWageConfig,
    PriceIndexYear, ReferenceTables,
};

/// Loads and provides access to the reference tables.
///
/// # Directory Structure
///
/// ```text
/// config/colombia/
/// ├── law.yaml                 # Statute metadata
/// ├── minimum_wage.yaml        # Monthly minimum wage by year
/// ├── contribution_rates.yaml  # Historical pension contribution rates
/// └── price_index/
///     └── 2024.yaml            # Monthly price index for one year
/// ```
///
/// # Example
///
/// ```no_run
/// use pension_engine::config::ConfigLoader;
/// use pension_engine::models::YearMonth;
///
/// let loader = ConfigLoader::load("./config/colombia")?;
/// let wage = loader.tables().require_minimum_wage(2024)?;
/// let index = loader.tables().require_price_index(YearMonth::new(2024, 6))?;
/// println!("2024 minimum wage {} at index {}", wage, index);
/// # Ok::<(), pension_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    tables: ReferenceTables,
}

impl ConfigLoader {
    /// Loads reference tables from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A price-index year lists more than 12 months
    /// - A minimum wage or price-index value is zero or negative
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<LawMetadata>(&path.join("law.yaml"))?;
        let wages_path = path.join("minimum_wage.yaml");
        let wages = Self::load_yaml::<MinimumWageConfig>(&wages_path)?;
        if let Some((year, wage)) = wages.minimum_wages.iter().find(|(_, w)| **w <= Decimal::ZERO) {
            return Err(EngineError::ConfigParseError {
                path: wages_path.display().to_string(),
                message: format!("minimum wage for {} must be positive, got {}", year, wage),
            });
        }
        let rates =
            Self::load_yaml::<ContributionRateConfig>(&path.join("contribution_rates.yaml"))?;
        let price_index = Self::load_price_index(&path.join("price_index"))?;

        debug!(
            path = %path.display(),
            minimum_wage_years = wages.minimum_wages.len(),
            price_index_months = price_index.len(),
            rate_bands = rates.bands.len(),
            "Loaded reference tables"
        );

        let tables = ReferenceTables::new(
            metadata,
            wages.minimum_wages,
            price_index,
            ContributionRateSchedule::new(rates.bands),
        );

        Ok(Self { tables })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads every yearly price-index file into one monthly series.
    fn load_price_index(dir: &Path) -> EngineResult<BTreeMap<YearMonth, Decimal>> {
        let dir_str = dir.display().to_string();

        if !dir.exists() {
            return Err(EngineError::ConfigNotFound { path: dir_str });
        }

        let entries = fs::read_dir(dir).map_err(|_| EngineError::ConfigNotFound {
            path: dir_str.clone(),
        })?;

        let mut series = BTreeMap::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let year = Self::load_yaml::<PriceIndexYear>(&path)?;
                if year.months.len() > 12 {
                    return Err(EngineError::ConfigParseError {
                        path: path.display().to_string(),
                        message: format!("{} lists {} months", year.year, year.months.len()),
                    });
                }
                if let Some((i, value)) =
                    year.months.iter().enumerate().find(|(_, v)| **v <= Decimal::ZERO)
                {
                    return Err(EngineError::ConfigParseError {
                        path: path.display().to_string(),
                        message: format!(
                            "price index for {} must be positive, got {}",
                            YearMonth::new(year.year, i as u32 + 1),
                            value
                        ),
                    });
                }
                for (i, value) in year.months.into_iter().enumerate() {
                    series.insert(YearMonth::new(year.year, i as u32 + 1), value);
                }
            }
        }

        if series.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no price index files found)", dir_str),
            });
        }

        Ok(series)
    }

    /// Returns the loaded reference tables.
    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    /// Returns the statute metadata.
    pub fn law(&self) -> &LawMetadata {
        self.tables.metadata()
    }
}
