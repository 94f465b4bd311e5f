use std::collections::BTreeMap;

use inflation_index::domain::{AnnualRateSeries, AnnualSeries, TimeSeriesObservation};
use inflation_index::error::IndexError;
use inflation_index::index::{
    NormalizeOptions, normalize, normalize_from_annual_rates, normalize_with, price_to_income_ratio, project,
};
use proptest::prelude::*;

fn level_series_strategy() -> impl Strategy<Value = BTreeMap<i32, f64>> {
    proptest::collection::btree_map(1900i32..2100, 0.01f64..10_000.0, 1..60)
}

fn rate_pairs_strategy() -> impl Strategy<Value = Vec<(i32, f64)>> {
    proptest::collection::btree_map(1950i32..2050, -20.0f64..50.0, 1..40)
        .prop_map(|m| m.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

proptest! {
    #[test]
    fn base_year_is_exactly_one(values in level_series_strategy()) {
        let base = *values.keys().next().unwrap();
        let series = AnnualSeries::from_pairs(values);
        let out = normalize(&series, None).unwrap();
        prop_assert_eq!(out.base_year, base);
        prop_assert_eq!(out.get(base), Some(1.0));
    }

    #[test]
    fn normalized_values_are_always_finite(values in level_series_strategy(), picks in 0usize..60) {
        let series = AnnualSeries::from_pairs(values.clone());
        let base = *values.keys().nth(picks % values.len()).unwrap();
        let out = normalize_with(&series, &NormalizeOptions { base_year: Some(base), ..NormalizeOptions::default() }).unwrap();
        prop_assert!(out.values.values().all(|v| v.is_finite()));
        prop_assert_eq!(out.len(), series.len());
    }

    #[test]
    fn zero_base_fails_instead_of_dividing(mut values in level_series_strategy()) {
        let base = *values.keys().next().unwrap();
        values.insert(base, 0.0);
        let series = AnnualSeries::from_pairs(values);
        prop_assert_eq!(normalize(&series, None), Err(IndexError::InvalidBaseYear { year: base }));
    }

    #[test]
    fn projection_round_trips(values in level_series_strategy(), amount in 0.01f64..1_000_000.0, a in 0usize..60, b in 0usize..60) {
        let years: Vec<i32> = values.keys().copied().collect();
        let from = years[a % years.len()];
        let to = years[b % years.len()];
        // Keep values at full precision so the index has no zero entries.
        let series = normalize_with(
            &AnnualSeries::from_pairs(values),
            &NormalizeOptions { decimals: 12, ..NormalizeOptions::default() },
        ).unwrap();

        let there = project(amount, from, to, &series).unwrap();
        let back = project(there.end_amount, to, from, &series).unwrap();
        prop_assert!(((back.end_amount - amount) / amount).abs() < 1e-6);
    }

    #[test]
    fn compounding_ignores_insertion_order(pairs in rate_pairs_strategy()) {
        let mut sorted = pairs.clone();
        sorted.sort_by_key(|(y, _)| *y);
        let shuffled = normalize_from_annual_rates(&AnnualRateSeries::from_pairs(pairs), None).unwrap();
        let ordered = normalize_from_annual_rates(&AnnualRateSeries::from_pairs(sorted), None).unwrap();
        prop_assert_eq!(shuffled, ordered);
    }

    #[test]
    fn same_year_observations_average_to_true_mean(values in proptest::collection::vec(0.0f64..1000.0, 1..12)) {
        let observations: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, v)| TimeSeriesObservation::new(format!("2020M{:02}", i + 1), *v))
            .collect();
        let expected = values.iter().sum::<f64>() / values.len() as f64;

        let mut reversed = observations.clone();
        reversed.reverse();
        let forward = AnnualSeries::from_observations(&observations).get(2020).unwrap();
        let backward = AnnualSeries::from_observations(&reversed).get(2020).unwrap();
        prop_assert!((forward - expected).abs() < 1e-9);
        prop_assert!((backward - expected).abs() < 1e-9);
    }
}

#[test]
fn worked_examples() {
    let rates = AnnualRateSeries::from_pairs([(2022, 8.0), (2020, 1.0), (2021, 5.0)]);
    let index = normalize_from_annual_rates(&rates, None).unwrap();
    assert_eq!(index.values, BTreeMap::from([(2020, 1.0), (2021, 1.05), (2022, 1.134)]));

    let series = normalize(&AnnualSeries::from_pairs([(2000, 50.0), (2010, 75.0), (2020, 100.0)]), None).unwrap();
    assert_eq!(series.values, BTreeMap::from([(2000, 1.0), (2010, 1.5), (2020, 2.0)]));

    let p = project(100.0, 2000, 2020, &series).unwrap();
    assert_eq!(p.end_amount, 200.0);
    assert_eq!(p.total_inflation_percent, 100.0);
    // Loss is measured against the ending amount: (200 - 100) / 200.
    assert_eq!(p.purchasing_power_loss_percent, 50.0);
}

#[test]
fn price_to_income_skips_unpaired_years() {
    let home = AnnualSeries::from_pairs([(1999, 95.0), (2000, 100.0), (2001, 104.0)]);
    let income = AnnualSeries::from_pairs([(2000, 42_000.0), (2001, 43_000.0), (2002, 44_000.0)]);
    let rows = price_to_income_ratio(&home, &income, 2000, 120_000.0).unwrap();
    assert_eq!(rows.keys().copied().collect::<Vec<_>>(), vec![2000, 2001]);
}

#[test]
fn three_monthly_values_average_to_twenty() {
    let series = AnnualSeries::from_observations(&[
        TimeSeriesObservation::new("2020M01", 10.0),
        TimeSeriesObservation::new("2020M02", 20.0),
        TimeSeriesObservation::new("2020M03", 30.0),
    ]);
    assert_eq!(series.get(2020), Some(20.0));
}
