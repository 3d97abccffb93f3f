//! Value-level overrides for "what-if" projections.
//!
//! A projection to a future liquidation date needs minimum wages and price
//! index values that have not been published yet. Rather than inserting
//! synthetic rows into the loaded tables and removing them afterwards, a
//! [`ReferenceOverlay`] carries those rows and
//! [`ReferenceTables::with_overlay`] combines both into a new table set.

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::YearMonth;

use super::ReferenceTables;

/// Furthest a projection may run past the latest published table year.
pub const MAX_PROJECTION_YEARS: i32 = 60;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Growth assumptions used to extrapolate reference tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionAssumptions {
    /// Annual minimum wage growth as a fraction (e.g., 0.05).
    pub wage_growth: Decimal,
    /// Annual price-index inflation as a fraction (e.g., 0.04).
    pub inflation: Decimal,
}

/// Synthetic reference rows that take precedence over the base tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceOverlay {
    /// Minimum wage rows by year.
    pub minimum_wages: BTreeMap<i32, Decimal>,
    /// Price index rows by month.
    pub price_index: BTreeMap<YearMonth, Decimal>,
}

impl ReferenceOverlay {
    /// Creates an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the overlay carries no rows.
    pub fn is_empty(&self) -> bool {
        self.minimum_wages.is_empty() && self.price_index.is_empty()
    }

    /// Builds future rows from the latest published values up to `through`.
    ///
    /// Minimum wages grow by `wage_growth` per year from the latest published
    /// year and are rounded to whole pesos. The price index compounds monthly
    /// from the latest published month by `(1 + inflation)^(1/12)`, so twelve
    /// projected months add exactly one year of inflation; stored values are
    /// rounded to two places while the running level is kept exact.
    ///
    /// # Errors
    ///
    /// - `CalculationError` when either base table is empty, or growth
    ///   overflows
    /// - `InvalidInput` when a rate is -100% or lower, or `through` lies more
    ///   than [`MAX_PROJECTION_YEARS`] years past the latest published month
    ///
    /// # Example
    ///
    /// ```
    /// # use pension_engine::config::{LawMetadata, ContributionRateSchedule, ReferenceTables};
    /// use pension_engine::config::{ProjectionAssumptions, ReferenceOverlay};
    /// use pension_engine::models::YearMonth;
    /// use rust_decimal::Decimal;
    /// use std::collections::BTreeMap;
    ///
    /// # let metadata = LawMetadata {
    /// #     code: "CO-RPM".into(), name: "RPM".into(), version: "1".into(), source_url: "-".into(),
    /// # };
    /// let wages = BTreeMap::from([(2025, Decimal::new(1_000_000, 0))]);
    /// let index = BTreeMap::from([(YearMonth::new(2025, 12), Decimal::new(100, 0))]);
    /// let base = ReferenceTables::new(metadata, wages, index, ContributionRateSchedule::default());
    ///
    /// let assumptions = ProjectionAssumptions {
    ///     wage_growth: Decimal::new(5, 2),
    ///     inflation: Decimal::new(4, 2),
    /// };
    /// let overlay = ReferenceOverlay::extrapolate(&base, YearMonth::new(2026, 2), assumptions).unwrap();
    /// assert_eq!(overlay.minimum_wages[&2026], Decimal::new(1_050_000, 0));
    /// assert_eq!(overlay.price_index.len(), 2);
    /// assert!(overlay.price_index[&YearMonth::new(2026, 1)] > Decimal::new(100, 0));
    /// ```
    pub fn extrapolate(
        base: &ReferenceTables,
        through: YearMonth,
        assumptions: ProjectionAssumptions,
    ) -> EngineResult<Self> {
        if assumptions.wage_growth <= -Decimal::ONE {
            return Err(EngineError::InvalidInput {
                field: "wage_growth".to_string(),
                message: "must be greater than -1".to_string(),
            });
        }
        if assumptions.inflation <= -Decimal::ONE {
            return Err(EngineError::InvalidInput {
                field: "inflation".to_string(),
                message: "must be greater than -1".to_string(),
            });
        }

        let (last_year, last_wage) =
            base.latest_minimum_wage()
                .ok_or_else(|| EngineError::CalculationError {
                    message: "no minimum wage rows to extrapolate from".to_string(),
                })?;
        let (last_month, last_index) =
            base.latest_price_index()
                .ok_or_else(|| EngineError::CalculationError {
                    message: "no price index rows to extrapolate from".to_string(),
                })?;

        let horizon_end = last_month.year.max(last_year) + MAX_PROJECTION_YEARS;
        if through.year > horizon_end {
            return Err(EngineError::InvalidInput {
                field: "through".to_string(),
                message: format!(
                    "projection may not extend past {}, {} years beyond the published tables",
                    horizon_end, MAX_PROJECTION_YEARS
                ),
            });
        }

        let overflow = || EngineError::CalculationError {
            message: "projected reference value overflows".to_string(),
        };

        let mut overlay = Self::new();

        let wage_factor = Decimal::ONE + assumptions.wage_growth;
        let mut wage = last_wage;
        for year in (last_year + 1)..=through.year {
            wage = wage
                .checked_mul(wage_factor)
                .ok_or_else(overflow)?
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            overlay.minimum_wages.insert(year, wage);
        }

        let monthly_factor = (Decimal::ONE + assumptions.inflation)
            .checked_powd(Decimal::ONE / MONTHS_PER_YEAR)
            .ok_or_else(overflow)?;
        let mut level = last_index;
        let mut month = last_month.next();
        while month <= through {
            level = level.checked_mul(monthly_factor).ok_or_else(overflow)?;
            overlay.price_index.insert(
                month,
                level.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            );
            month = month.next();
        }

        debug!(
            through = %through,
            minimum_wage_rows = overlay.minimum_wages.len(),
            price_index_rows = overlay.price_index.len(),
            "Extrapolated reference overlay"
        );

        Ok(overlay)
    }
}

impl ReferenceTables {
    /// Returns a new table set with `overlay` rows taking precedence.
    ///
    /// `self` is left untouched.
    pub fn with_overlay(&self, overlay: &ReferenceOverlay) -> ReferenceTables {
        let mut minimum_wages = self.minimum_wages().clone();
        minimum_wages.extend(overlay.minimum_wages.iter().map(|(y, w)| (*y, *w)));

        let mut price_index = self.price_index_series().clone();
        price_index.extend(overlay.price_index.iter().map(|(m, v)| (*m, *v)));

        ReferenceTables::new(
            self.metadata().clone(),
            minimum_wages,
            price_index,
            self.contribution_rates().clone(),
        )
    }
}
