//! In-memory reference tables shared by unit tests.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::models::YearMonth;

use super::{ContributionRateBand, ContributionRateSchedule, LawMetadata, ReferenceTables};

pub(crate) fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub(crate) fn test_metadata() -> LawMetadata {
    LawMetadata {
        code: "CO-RPM".to_string(),
        name: "Regimen de Prima Media".to_string(),
        version: "2025-01-01".to_string(),
        source_url: "https://example.com".to_string(),
    }
}

pub(crate) fn test_minimum_wages() -> BTreeMap<i32, Decimal> {
    [
        (2005, "381500"),
        (2006, "408000"),
        (2007, "433700"),
        (2008, "461500"),
        (2009, "496900"),
        (2010, "515000"),
        (2011, "535600"),
        (2012, "566700"),
        (2013, "589500"),
        (2014, "616000"),
        (2015, "644350"),
        (2016, "689455"),
        (2017, "737717"),
        (2018, "781242"),
        (2019, "828116"),
        (2020, "877803"),
        (2021, "908526"),
        (2022, "1000000"),
        (2023, "1160000"),
        (2024, "1300000"),
        (2025, "1423500"),
    ]
    .into_iter()
    .map(|(year, wage)| (year, dec(wage)))
    .collect()
}

pub(crate) fn test_contribution_rates() -> ContributionRateSchedule {
    ContributionRateSchedule::new(vec![
        ContributionRateBand {
            start_year: 1967,
            end_year: 1993,
            rate: dec("0.065"),
        },
        ContributionRateBand {
            start_year: 1994,
            end_year: 2007,
            rate: dec("0.135"),
        },
        ContributionRateBand {
            start_year: 2008,
            end_year: 2100,
            rate: dec("0.16"),
        },
    ])
}

/// Flat price index of 100 for 2005-01 through 2025-12, so every index factor is 1.
pub(crate) fn flat_price_index() -> BTreeMap<YearMonth, Decimal> {
    let mut index = BTreeMap::new();
    for year in 2005..=2025 {
        for month in 1..=12 {
            index.insert(YearMonth::new(year, month), dec("100"));
        }
    }
    index
}

pub(crate) fn tables_with_price_index(price_index: BTreeMap<YearMonth, Decimal>) -> ReferenceTables {
    ReferenceTables::new(
        test_metadata(),
        test_minimum_wages(),
        price_index,
        test_contribution_rates(),
    )
}

pub(crate) fn test_tables() -> ReferenceTables {
    tables_with_price_index(flat_price_index())
}
