//! Sub-year observations to annual series.
//!
//! Every year's value is the arithmetic mean of all observations that fall in
//! it (sum / count), so the result does not depend on arrival order.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{AnnualRateSeries, AnnualSeries, TimeSeriesObservation};
use crate::math::Mean;

/// Counts of observations that did not make it into the annual series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub used: usize,
    pub bad_period: usize,
    pub bad_value: usize,
}

fn mean_by_year(
    observations: &[TimeSeriesObservation],
    accept: impl Fn(f64) -> bool,
) -> (BTreeMap<i32, f64>, AggregateStats) {
    let mut stats = AggregateStats::default();
    let mut acc: BTreeMap<i32, Mean> = BTreeMap::new();

    for obs in observations {
        let Some(year) = obs.year() else {
            stats.bad_period += 1;
            continue;
        };
        if !accept(obs.raw_value) {
            stats.bad_value += 1;
            continue;
        }
        acc.entry(year).or_default().push(obs.raw_value);
        stats.used += 1;
    }

    let means = acc
        .into_iter()
        .filter_map(|(year, mean)| mean.value().map(|v| (year, v)))
        .collect();

    if stats.bad_period > 0 || stats.bad_value > 0 {
        debug!(
            used = stats.used,
            bad_period = stats.bad_period,
            bad_value = stats.bad_value,
            "dropped observations during annual aggregation"
        );
    }

    (means, stats)
}

/// Average price-level observations into one value per year.
///
/// Non-finite and negative readings are dropped.
pub fn annual_levels(observations: &[TimeSeriesObservation]) -> (AnnualSeries, AggregateStats) {
    let (means, stats) = mean_by_year(observations, |v| v.is_finite() && v >= 0.0);
    (AnnualSeries::from_map(means), stats)
}

/// Average rate observations into one rate per year. Negative rates are kept.
pub fn annual_rates(observations: &[TimeSeriesObservation]) -> (AnnualRateSeries, AggregateStats) {
    let (means, stats) = mean_by_year(observations, f64::is_finite);
    (AnnualRateSeries::from_map(means), stats)
}

impl AnnualSeries {
    pub fn from_observations(observations: &[TimeSeriesObservation]) -> Self {
        annual_levels(observations).0
    }

    /// Build from `(year, value)` pairs; repeated years are averaged.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (i32, f64)>) -> Self {
        Self::from_observations(&pairs_to_observations(pairs))
    }
}

impl AnnualRateSeries {
    pub fn from_observations(observations: &[TimeSeriesObservation]) -> Self {
        annual_rates(observations).0
    }

    /// Build from `(year, rate)` pairs in any order; repeated years are averaged.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (i32, f64)>) -> Self {
        Self::from_observations(&pairs_to_observations(pairs))
    }
}

fn pairs_to_observations(pairs: impl IntoIterator<Item = (i32, f64)>) -> Vec<TimeSeriesObservation> {
    pairs
        .into_iter()
        .map(|(year, value)| TimeSeriesObservation::new(format!("{year:04}"), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(period: &str, v: f64) -> TimeSeriesObservation {
        TimeSeriesObservation::new(period, v)
    }

    #[test]
    fn two_monthly_values_average_to_their_mean() {
        let (series, stats) = annual_levels(&[obs("2020M01", 10.0), obs("2020M02", 20.0)]);
        assert_eq!(series.get(2020), Some(15.0));
        assert_eq!(stats.used, 2);
    }

    #[test]
    fn three_values_use_true_mean_not_pairwise_running_average() {
        // Pairwise running averaging would give ((10 + 20) / 2 + 30) / 2 = 22.5.
        let series = AnnualSeries::from_observations(&[
            obs("2021-01-01", 10.0),
            obs("2021-02-01", 20.0),
            obs("2021-03-01", 30.0),
        ]);
        assert_eq!(series.get(2021), Some(20.0));
    }

    #[test]
    fn levels_drop_negative_and_non_finite_readings() {
        let (series, stats) = annual_levels(&[
            obs("2019", -1.0),
            obs("2019", f64::NAN),
            obs("2019", 4.0),
            obs("bad", 1.0),
        ]);
        assert_eq!(series.get(2019), Some(4.0));
        assert_eq!(stats.bad_value, 2);
        assert_eq!(stats.bad_period, 1);
    }

    #[test]
    fn rates_keep_negative_values() {
        let rates = AnnualRateSeries::from_pairs([(2009, -0.4), (2010, 1.6)]);
        assert_eq!(rates.get(2009), Some(-0.4));
        assert_eq!(rates.earliest(), Some(2009));
    }

    #[test]
    fn from_pairs_sorts_years() {
        let series = AnnualSeries::from_pairs([(2010, 2.0), (2000, 1.0), (2005, 1.5)]);
        let years: Vec<i32> = series.iter().map(|(y, _)| y).collect();
        assert_eq!(years, vec![2000, 2005, 2010]);
    }
}
