//! Shared domain types.
//!
//! Series are keyed by calendar year in ordered maps so every consumer iterates
//! in ascending year order without having to sort.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One raw reading from a provider, before annual aggregation.
///
/// `period` is whatever the provider uses (`2020`, `2020-01-01`, `2020M01`,
/// `2020 JAN`); the first four characters must be the year.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesObservation {
    pub period: String,
    pub raw_value: f64,
}

impl TimeSeriesObservation {
    pub fn new(period: impl Into<String>, raw_value: f64) -> Self {
        Self {
            period: period.into(),
            raw_value,
        }
    }

    /// Calendar year encoded in the leading four characters of `period`.
    pub fn year(&self) -> Option<i32> {
        let head = self.period.trim().get(..4)?;
        if !head.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        head.parse().ok()
    }
}

/// What a provider's values mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    /// Absolute levels (CPI points, home-price index, income).
    Level,
    /// Annual percentage change (`3.2` means 3.2 %).
    Rate,
}

/// How a normalized series expresses its base year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum IndexConvention {
    /// Base year = 1.0.
    #[default]
    Ratio,
    /// Base year = 100.
    Index100,
}

impl IndexConvention {
    pub fn scale(self) -> f64 {
        match self {
            IndexConvention::Ratio => 1.0,
            IndexConvention::Index100 => 100.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IndexConvention::Ratio => "ratio",
            IndexConvention::Index100 => "index100",
        }
    }
}

/// Price levels by year. Values are finite and non-negative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnualSeries(BTreeMap<i32, f64>);

/// Annual percentage rates by year. Values are finite; negatives are deflation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnualRateSeries(BTreeMap<i32, f64>);

macro_rules! year_map_accessors {
    ($ty:ty) => {
        impl $ty {
            pub(crate) fn from_map(values: BTreeMap<i32, f64>) -> Self {
                Self(values)
            }

            pub fn get(&self, year: i32) -> Option<f64> {
                self.0.get(&year).copied()
            }

            pub fn contains(&self, year: i32) -> bool {
                self.0.contains_key(&year)
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn earliest(&self) -> Option<i32> {
                self.0.keys().next().copied()
            }

            pub fn latest(&self) -> Option<i32> {
                self.0.keys().next_back().copied()
            }

            /// `(year, value)` pairs in ascending year order.
            pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
                self.0.iter().map(|(y, v)| (*y, *v))
            }

            /// Keep only years inside `range`.
            pub fn restrict(&self, range: YearRange) -> Self {
                Self(
                    self.0
                        .iter()
                        .filter(|(y, _)| range.contains(**y))
                        .map(|(y, v)| (*y, *v))
                        .collect(),
                )
            }
        }
    };
}

year_map_accessors!(AnnualSeries);
year_map_accessors!(AnnualRateSeries);

/// Optional inclusive year window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct YearRange {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

impl YearRange {
    pub const ALL: YearRange = YearRange {
        start: None,
        end: None,
    };

    pub fn new(start: Option<i32>, end: Option<i32>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start.is_none_or(|s| year >= s) && self.end.is_none_or(|e| year <= e)
    }
}

/// A series rescaled so `values[base_year]` equals the convention's scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSeries {
    pub base_year: i32,
    pub convention: IndexConvention,
    pub values: BTreeMap<i32, f64>,
}

impl NormalizedSeries {
    pub fn get(&self, year: i32) -> Option<f64> {
        self.values.get(&year).copied()
    }

    pub fn earliest(&self) -> Option<i32> {
        self.values.keys().next().copied()
    }

    pub fn latest(&self) -> Option<i32> {
        self.values.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Output of a purchasing-power projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub start_amount: f64,
    pub end_amount: f64,
    pub from_year: i32,
    pub to_year: i32,
    pub total_inflation_percent: f64,
    /// `(end - start) / end * 100` when `end > start`, otherwise `0.0`.
    pub purchasing_power_loss_percent: f64,
}

/// One year of the price-to-income calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceToIncome {
    pub home_price: f64,
    pub median_income: f64,
    pub ratio: f64,
}

/// The persisted per-currency artifact read by calculator pages.
///
/// Key names are a stable external contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencySeriesRecord {
    pub currency: String,
    pub symbol: String,
    pub name: String,
    pub flag: String,
    pub earliest: i32,
    pub latest: i32,
    pub last_updated: DateTime<Utc>,
    pub source: String,
    #[serde(default)]
    pub convention: IndexConvention,
    pub data: BTreeMap<i32, f64>,
}

impl CurrencySeriesRecord {
    /// View the record's data as a normalized series for further arithmetic.
    pub fn series(&self) -> NormalizedSeries {
        NormalizedSeries {
            base_year: self.earliest,
            convention: self.convention,
            values: self.data.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_year_reads_leading_digits() {
        assert_eq!(TimeSeriesObservation::new("2020-01-01", 1.0).year(), Some(2020));
        assert_eq!(TimeSeriesObservation::new("1998M07", 1.0).year(), Some(1998));
        assert_eq!(TimeSeriesObservation::new("2004 JAN", 1.0).year(), Some(2004));
        assert_eq!(TimeSeriesObservation::new("Q1-2020", 1.0).year(), None);
        assert_eq!(TimeSeriesObservation::new("20", 1.0).year(), None);
    }

    #[test]
    fn year_range_bounds_are_inclusive() {
        let r = YearRange::new(Some(2000), Some(2010));
        assert!(r.contains(2000));
        assert!(r.contains(2010));
        assert!(!r.contains(1999));
        assert!(!r.contains(2011));
        assert!(YearRange::ALL.contains(1850));
    }

    #[test]
    fn record_json_uses_camel_case_and_string_year_keys() {
        let record = CurrencySeriesRecord {
            currency: "USD".to_string(),
            symbol: "$".to_string(),
            name: "US Dollar".to_string(),
            flag: "🇺🇸".to_string(),
            earliest: 2000,
            latest: 2001,
            last_updated: DateTime::parse_from_rfc3339("2024-05-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            source: "BLS".to_string(),
            convention: IndexConvention::Ratio,
            data: BTreeMap::from([(2000, 1.0), (2001, 1.03)]),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["lastUpdated"], "2024-05-01T00:00:00Z");
        assert_eq!(json["convention"], "ratio");
        assert_eq!(json["data"]["2001"], 1.03);

        let back: CurrencySeriesRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn record_without_convention_defaults_to_ratio() {
        let json = r#"{"currency":"GBP","symbol":"£","name":"British Pound","flag":"🇬🇧",
            "earliest":1989,"latest":1989,"lastUpdated":"2024-01-01T00:00:00Z",
            "source":"ONS","data":{"1989":1.0}}"#;
        let record: CurrencySeriesRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.convention, IndexConvention::Ratio);
        assert_eq!(record.series().get(1989), Some(1.0));
    }
}
