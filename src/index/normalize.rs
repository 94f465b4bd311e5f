//! Base-year normalization of level series and compounding of rate series.

use std::collections::BTreeMap;

use crate::domain::{
    AnnualRateSeries, AnnualSeries, IndexConvention, NormalizedSeries, SeriesKind, TimeSeriesObservation,
};
use crate::error::IndexError;
use crate::index::aggregate::{annual_levels, annual_rates};
use crate::math::round_to;

/// Precision of ratio-style indices produced by [`normalize`].
pub const RATIO_DECIMALS: u32 = 2;

/// Precision of cumulative indices compounded from annual rates.
pub const COMPOUND_DECIMALS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeOptions {
    /// Defaults to the earliest year with a finite value.
    pub base_year: Option<i32>,
    pub convention: IndexConvention,
    /// Decimal places kept in each output value (on the convention's scale).
    pub decimals: u32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            base_year: None,
            convention: IndexConvention::Ratio,
            decimals: RATIO_DECIMALS,
        }
    }
}

/// Normalize a level series to ratios of its base year (2 decimals).
pub fn normalize(series: &AnnualSeries, base_year: Option<i32>) -> Result<NormalizedSeries, IndexError> {
    normalize_with(
        series,
        &NormalizeOptions {
            base_year,
            ..NormalizeOptions::default()
        },
    )
}

/// Normalize a level series with explicit base year, convention and precision.
///
/// The base year maps to exactly `convention.scale()`. A zero, missing or
/// non-finite base value fails instead of producing infinities.
pub fn normalize_with(series: &AnnualSeries, options: &NormalizeOptions) -> Result<NormalizedSeries, IndexError> {
    if series.is_empty() {
        return Err(IndexError::EmptySeries);
    }

    let base_year = match options.base_year {
        Some(year) => year,
        None => series
            .iter()
            .find(|(_, v)| v.is_finite())
            .map(|(y, _)| y)
            .ok_or(IndexError::EmptySeries)?,
    };

    let base_value = series
        .get(base_year)
        .filter(|v| v.is_finite() && *v != 0.0)
        .ok_or(IndexError::InvalidBaseYear { year: base_year })?;

    let scale = options.convention.scale();
    let mut values = BTreeMap::new();
    for (year, value) in series.iter() {
        if year == base_year {
            values.insert(year, scale);
            continue;
        }
        let scaled = value / base_value * scale;
        if scaled.is_finite() {
            values.insert(year, round_to(scaled, options.decimals));
        }
    }

    Ok(NormalizedSeries {
        base_year,
        convention: options.convention,
        values,
    })
}

/// Compound annual percentage rates into a cumulative ratio index.
///
/// The start year (default: earliest rate year) is 1.0 and every later year
/// multiplies the running level by `1 + rate / 100`. The start year's own
/// rate is not applied. An explicit start year earlier than every rate is
/// placed at 1.0 and all rates are compounded onto it.
///
/// Years are visited in ascending numeric order: the rates live in a
/// `BTreeMap`, so caller insertion order never affects the result.
/// Compounding runs at full precision; each output value is then divided by
/// the start year's level and rounded to [`COMPOUND_DECIMALS`].
pub fn normalize_from_annual_rates(
    rates: &AnnualRateSeries,
    start_year: Option<i32>,
) -> Result<NormalizedSeries, IndexError> {
    let start = match start_year {
        Some(year) => year,
        None => rates.earliest().ok_or(IndexError::EmptySeries)?,
    };
    if rates.latest().is_none_or(|latest| latest < start) {
        return Err(IndexError::EmptySeries);
    }

    let mut cumulative = BTreeMap::new();
    cumulative.insert(start, 1.0_f64);

    let mut level = 1.0_f64;
    for (year, rate) in rates.iter().filter(|(y, _)| *y > start) {
        if !rate.is_finite() || rate <= -100.0 {
            return Err(IndexError::InvalidRate { year, rate });
        }
        level *= 1.0 + rate / 100.0;
        cumulative.insert(year, level);
    }

    let first = cumulative[&start];
    let values = cumulative
        .into_iter()
        .map(|(year, v)| (year, round_to(v / first, COMPOUND_DECIMALS)))
        .collect();

    Ok(NormalizedSeries {
        base_year: start,
        convention: IndexConvention::Ratio,
        values,
    })
}

/// Re-express a normalized series in another convention, rounding to `decimals`.
pub fn rescale(series: &NormalizedSeries, convention: IndexConvention, decimals: u32) -> NormalizedSeries {
    let factor = convention.scale() / series.convention.scale();
    let values = series
        .values
        .iter()
        .map(|(year, v)| {
            let scaled = if *year == series.base_year {
                convention.scale()
            } else {
                round_to(v * factor, decimals)
            };
            (*year, scaled)
        })
        .collect();

    NormalizedSeries {
        base_year: series.base_year,
        convention,
        values,
    }
}

/// Turn provider observations of either kind into the canonical index.
///
/// Levels are averaged per year and normalized; rates are averaged per year
/// and compounded. Both come out in `options.convention` at `options.decimals`.
pub fn to_index(
    kind: SeriesKind,
    observations: &[TimeSeriesObservation],
    options: &NormalizeOptions,
) -> Result<NormalizedSeries, IndexError> {
    match kind {
        SeriesKind::Level => {
            let (series, _) = annual_levels(observations);
            normalize_with(&series, options)
        }
        SeriesKind::Rate => {
            let (rates, _) = annual_rates(observations);
            let index = normalize_from_annual_rates(&rates, options.base_year)?;
            Ok(rescale(&index, options.convention, options.decimals))
        }
    }
}
