//! PPP adjustment and price-to-income ratios.

use std::collections::{BTreeMap, HashMap};

use crate::domain::{AnnualSeries, PriceToIncome};
use crate::error::IndexError;
use crate::math::round_to;

const RATIO_DECIMALS: u32 = 2;

fn usable_factor(factor: Option<f64>) -> Option<f64> {
    factor.filter(|f| f.is_finite() && *f != 0.0)
}

/// Convert `amount` between two countries' price levels: `amount * to / from`.
///
/// `from_label` / `to_label` and `year` only shape the error.
pub fn ppp_adjust(
    amount: f64,
    from_factor: Option<f64>,
    to_factor: Option<f64>,
    from_label: &str,
    to_label: &str,
    year: i32,
) -> Result<f64, IndexError> {
    let from = usable_factor(from_factor).ok_or_else(|| IndexError::MissingPppFactor {
        country: from_label.to_string(),
        year,
    })?;
    let to = usable_factor(to_factor).ok_or_else(|| IndexError::MissingPppFactor {
        country: to_label.to_string(),
        year,
    })?;
    Ok(amount * (to / from))
}

/// PPP conversion factors keyed by country code, then year.
///
/// Coverage is sparse for some country/year pairs; lookups that miss return
/// `MissingPppFactor` rather than a number.
#[derive(Debug, Clone, Default)]
pub struct PppTable {
    factors: HashMap<String, BTreeMap<i32, f64>>,
}

impl PppTable {
    pub fn insert(&mut self, country: &str, year: i32, factor: f64) {
        self.factors
            .entry(country.to_ascii_uppercase())
            .or_default()
            .insert(year, factor);
    }

    pub fn insert_series(&mut self, country: &str, series: &AnnualSeries) {
        for (year, factor) in series.iter() {
            self.insert(country, year, factor);
        }
    }

    pub fn factor(&self, country: &str, year: i32) -> Option<f64> {
        self.factors
            .get(&country.to_ascii_uppercase())
            .and_then(|by_year| by_year.get(&year))
            .copied()
    }

    /// Latest year for which both countries have a usable factor.
    pub fn latest_common_year(&self, a: &str, b: &str) -> Option<i32> {
        let a = self.factors.get(&a.to_ascii_uppercase())?;
        let b = self.factors.get(&b.to_ascii_uppercase())?;
        a.iter()
            .rev()
            .filter(|(_, f)| usable_factor(Some(**f)).is_some())
            .map(|(y, _)| *y)
            .find(|y| usable_factor(b.get(y).copied()).is_some())
    }

    /// The requested year, or the latest common one when none was asked for.
    pub fn resolve_year(&self, from_country: &str, to_country: &str, year: Option<i32>) -> Result<i32, IndexError> {
        year.or_else(|| self.latest_common_year(from_country, to_country))
            .ok_or_else(|| IndexError::NoCommonPppYear {
                from_country: from_country.to_string(),
                to_country: to_country.to_string(),
            })
    }

    pub fn adjust(&self, amount: f64, from_country: &str, to_country: &str, year: i32) -> Result<f64, IndexError> {
        ppp_adjust(
            amount,
            self.factor(from_country, year),
            self.factor(to_country, year),
            from_country,
            to_country,
            year,
        )
    }
}

/// Home price over median income, per year present in both series.
///
/// The index is turned into an approximate price by scaling
/// `base_year_median_home_price` with `index[y] / index[base_year]`. Years
/// present in only one series, and years with non-positive income, are
/// skipped rather than interpolated.
pub fn price_to_income_ratio(
    home_price_index: &AnnualSeries,
    median_income: &AnnualSeries,
    base_year: i32,
    base_year_median_home_price: f64,
) -> Result<BTreeMap<i32, PriceToIncome>, IndexError> {
    let base_index = home_price_index
        .get(base_year)
        .filter(|v| v.is_finite() && *v != 0.0)
        .ok_or(IndexError::InvalidBaseYear { year: base_year })?;

    let mut out = BTreeMap::new();
    let mut shared_years = 0usize;
    for (year, index) in home_price_index.iter() {
        let Some(income) = median_income.get(year) else {
            continue;
        };
        shared_years += 1;
        if !(income.is_finite() && income > 0.0) {
            continue;
        }
        let home_price = index / base_index * base_year_median_home_price;
        let ratio = home_price / income;
        if !ratio.is_finite() {
            continue;
        }
        out.insert(
            year,
            PriceToIncome {
                home_price,
                median_income: income,
                ratio: round_to(ratio, RATIO_DECIMALS),
            },
        );
    }

    if shared_years == 0 {
        return Err(IndexError::IncompleteYearPair);
    }
    Ok(out)
}
