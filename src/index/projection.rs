//! Purchasing-power projection over a normalized index.
//!
//! The index table is the one representation the arithmetic runs on; rate
//! tables are compounded into an index first (see [`project_with_rates`]).

use crate::domain::{AnnualRateSeries, NormalizedSeries, Projection};
use crate::error::IndexError;
use crate::index::normalize::normalize_from_annual_rates;

fn index_value(series: &NormalizedSeries, year: i32) -> Result<f64, IndexError> {
    let (Some(earliest), Some(latest)) = (series.earliest(), series.latest()) else {
        return Err(IndexError::EmptySeries);
    };
    series.get(year).ok_or(IndexError::YearOutOfRange {
        year,
        earliest,
        latest,
    })
}

/// What `amount` in `from_year` is worth in `to_year`.
///
/// Works in both directions: a backward projection uses the same ratio
/// `series[to] / series[from]`, which is simply below one.
pub fn project(
    amount: f64,
    from_year: i32,
    to_year: i32,
    series: &NormalizedSeries,
) -> Result<Projection, IndexError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(IndexError::InvalidAmount(amount));
    }

    let from = index_value(series, from_year)?;
    let to = index_value(series, to_year)?;
    if !(from.is_finite() && from > 0.0) {
        return Err(IndexError::InvalidBaseYear { year: from_year });
    }

    let ratio = to / from;
    let end_amount = amount * ratio;

    Ok(Projection {
        start_amount: amount,
        end_amount,
        from_year,
        to_year,
        total_inflation_percent: (ratio - 1.0) * 100.0,
        purchasing_power_loss_percent: purchasing_power_loss_percent(amount, end_amount),
    })
}

/// Loss of purchasing power, measured against the *ending* amount.
///
/// This is `(end - start) / end * 100` and is `0.0` unless `end > start`.
/// Calculator pages bind to this exact figure.
pub fn purchasing_power_loss_percent(start_amount: f64, end_amount: f64) -> f64 {
    if end_amount > start_amount {
        (end_amount - start_amount) / end_amount * 100.0
    } else {
        0.0
    }
}

/// Percentage change of the index between two years.
pub fn cumulative_inflation(from_year: i32, to_year: i32, series: &NormalizedSeries) -> Result<f64, IndexError> {
    Ok(project(1.0, from_year, to_year, series)?.total_inflation_percent)
}

/// Project through an annual-rate table by compounding it into an index first.
///
/// The index starts at the earlier of the two years, so each year boundary
/// between them applies that year's rate once. Both years must lie inside
/// the table's covered range.
pub fn project_with_rates(
    amount: f64,
    from_year: i32,
    to_year: i32,
    rates: &AnnualRateSeries,
) -> Result<Projection, IndexError> {
    let (Some(earliest), Some(latest)) = (rates.earliest(), rates.latest()) else {
        return Err(IndexError::EmptySeries);
    };
    for year in [from_year, to_year] {
        if !(earliest..=latest).contains(&year) {
            return Err(IndexError::YearOutOfRange {
                year,
                earliest,
                latest,
            });
        }
    }
    let start = from_year.min(to_year);
    let index = normalize_from_annual_rates(rates, Some(start))?;
    project(amount, from_year, to_year, &index)
}

/// Clamp `year` into the series' covered range.
pub fn clamp_year(year: i32, series: &NormalizedSeries) -> Option<i32> {
    let earliest = series.earliest()?;
    let latest = series.latest()?;
    Some(year.clamp(earliest, latest))
}
