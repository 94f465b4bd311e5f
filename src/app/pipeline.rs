//! Shared ingestion pipeline used by the CLI commands.
//!
//! fetch -> filter to range -> annual aggregation -> normalize -> record -> write
//!
//! Every currency is processed independently; one source failing is recorded
//! in the report and never stops its siblings. Two runs writing the same
//! output directory at once are not coordinated here; schedule them apart.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::data::fred::{SERIES_CASE_SHILLER, SERIES_MEDIAN_INCOME};
use crate::data::{FredClient, SeriesProvider, WorldBankClient};
use crate::domain::{
    AnnualSeries, CurrencySeriesRecord, CurrencySpec, IndexConvention, NormalizedSeries, PriceToIncome, YearRange,
};
use crate::error::{AppError, IndexError};
use crate::events::{EventSink, IngestEvent};
use crate::index::{COMPOUND_DECIMALS, NormalizeOptions, price_to_income_ratio, to_index};
use crate::io::{record_path, write_record_json};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchOptions {
    pub range: YearRange,
    pub convention: IndexConvention,
    pub decimals: u32,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            range: YearRange::ALL,
            convention: IndexConvention::Ratio,
            decimals: COMPOUND_DECIMALS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceFailure {
    pub currency: String,
    pub provider: &'static str,
    pub error: IndexError,
}

/// Outcome of one batch: records that normalized cleanly, plus every failure.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub records: Vec<CurrencySeriesRecord>,
    pub failures: Vec<SourceFailure>,
}

impl BatchReport {
    pub fn all_failed(&self) -> bool {
        self.records.is_empty() && !self.failures.is_empty()
    }
}

/// Fetch and normalize one currency.
pub fn ingest_one(
    spec: &CurrencySpec,
    provider: &dyn SeriesProvider,
    options: &BatchOptions,
    now: DateTime<Utc>,
) -> Result<CurrencySeriesRecord, IndexError> {
    let fetched = provider.fetch(&spec.source, options.range)?;
    let observations: Vec<_> = fetched
        .observations
        .into_iter()
        .filter(|o| o.year().is_some_and(|y| options.range.contains(y)))
        .collect();

    let normalize = NormalizeOptions {
        base_year: None,
        convention: options.convention,
        decimals: options.decimals,
    };
    let series = to_index(fetched.kind, &observations, &normalize)?;
    build_record(spec, series, now)
}

pub fn build_record(
    spec: &CurrencySpec,
    series: NormalizedSeries,
    now: DateTime<Utc>,
) -> Result<CurrencySeriesRecord, IndexError> {
    let (Some(earliest), Some(latest)) = (series.earliest(), series.latest()) else {
        return Err(IndexError::EmptySeries);
    };
    Ok(CurrencySeriesRecord {
        currency: spec.currency.clone(),
        symbol: spec.symbol.clone(),
        name: spec.name.clone(),
        flag: spec.flag.clone(),
        earliest,
        latest,
        last_updated: now,
        source: spec.source.attribution(),
        convention: series.convention,
        data: series.values,
    })
}

/// Ingest every spec, in parallel, catching failures per source.
///
/// Records come back in the same order as `specs`.
pub fn run_batch(
    specs: &[CurrencySpec],
    provider: &dyn SeriesProvider,
    options: &BatchOptions,
    sink: &dyn EventSink,
) -> BatchReport {
    let now = Utc::now();

    let results: Vec<(&CurrencySpec, Result<CurrencySeriesRecord, IndexError>)> = specs
        .par_iter()
        .map(|spec| {
            sink.record(&IngestEvent::SourceStarted {
                currency: spec.currency.clone(),
                provider: spec.source.provider_name(),
            });
            (spec, ingest_one(spec, provider, options, now))
        })
        .collect();

    let mut report = BatchReport::default();
    for (spec, result) in results {
        match result {
            Ok(record) => {
                sink.record(&IngestEvent::SourceSucceeded {
                    currency: record.currency.clone(),
                    years: record.data.len(),
                    earliest: record.earliest,
                    latest: record.latest,
                });
                report.records.push(record);
            }
            Err(error) => {
                sink.record(&IngestEvent::SourceFailed {
                    currency: spec.currency.clone(),
                    provider: spec.source.provider_name(),
                    reason: error.to_string(),
                });
                report.failures.push(SourceFailure {
                    currency: spec.currency.clone(),
                    provider: spec.source.provider_name(),
                    error,
                });
            }
        }
    }

    info!(
        succeeded = report.records.len(),
        failed = report.failures.len(),
        "batch complete"
    );
    report
}

/// Persist every successful record under `dir`. Failed sources write nothing.
pub fn write_batch(dir: &Path, report: &BatchReport, sink: &dyn EventSink) -> Result<Vec<PathBuf>, AppError> {
    let mut written = Vec::with_capacity(report.records.len());
    for record in &report.records {
        let path = record_path(dir, &record.currency);
        write_record_json(&path, record)?;
        sink.record(&IngestEvent::RecordWritten {
            currency: record.currency.clone(),
            path: path.clone(),
        });
        written.push(path);
    }
    sink.flush();
    Ok(written)
}

/// U.S. price-to-income ratios from FRED's Case-Shiller index and median income.
///
/// The two series are fetched concurrently.
pub fn fetch_price_to_income(
    fred: &FredClient,
    range: YearRange,
    base_year: i32,
    base_year_median_home_price: f64,
) -> Result<BTreeMap<i32, PriceToIncome>, IndexError> {
    let (home, income) = rayon::join(
        || fred.fetch_series(SERIES_CASE_SHILLER, range),
        || fred.fetch_series(SERIES_MEDIAN_INCOME, range),
    );
    let home = AnnualSeries::from_observations(&home?);
    let income = AnnualSeries::from_observations(&income?);
    price_to_income_ratio(&home, &income, base_year, base_year_median_home_price)
}

/// Convert `amount` between two countries using World Bank PPP factors.
///
/// Without an explicit year the latest year covered for both countries is
/// used. Returns the year used and the converted amount.
pub fn fetch_ppp_adjustment(
    world_bank: &WorldBankClient,
    amount: f64,
    from_country: &str,
    to_country: &str,
    year: Option<i32>,
) -> Result<(i32, f64), IndexError> {
    let range = match year {
        Some(y) => YearRange::new(Some(y), Some(y)),
        None => YearRange::ALL,
    };
    let table = world_bank.fetch_ppp(&[from_country, to_country], range)?;

    let year = table.resolve_year(from_country, to_country, year).inspect_err(|_| {
        warn!(from_country, to_country, "no common PPP year");
    })?;
    let adjusted = table.adjust(amount, from_country, to_country, year)?;
    Ok((year, adjusted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FetchedSeries;
    use crate::domain::{SeriesKind, SourceRef, TimeSeriesObservation};
    use crate::events::MemorySink;

    struct Fixed;

    impl SeriesProvider for Fixed {
        fn fetch(&self, source: &SourceRef, _range: YearRange) -> Result<FetchedSeries, IndexError> {
            match source {
                SourceRef::Fred { .. } => Ok(FetchedSeries {
                    kind: SeriesKind::Level,
                    observations: vec![
                        TimeSeriesObservation::new("1999-06-01", 80.0),
                        TimeSeriesObservation::new("2000-01-01", 100.0),
                        TimeSeriesObservation::new("2001-01-01", 110.0),
                    ],
                }),
                _ => Err(IndexError::unavailable(source.provider_name(), "offline")),
            }
        }
    }

    fn spec(code: &str, source: SourceRef) -> CurrencySpec {
        CurrencySpec {
            currency: code.to_string(),
            symbol: "$".to_string(),
            name: code.to_string(),
            flag: String::new(),
            source,
        }
    }

    #[test]
    fn range_is_applied_before_normalizing() {
        let options = BatchOptions {
            range: YearRange::new(Some(2000), None),
            ..BatchOptions::default()
        };
        let fred = spec(
            "USD",
            SourceRef::Fred {
                series_id: "CPIAUCSL".to_string(),
            },
        );
        let record = ingest_one(&fred, &Fixed, &options, Utc::now()).unwrap();
        assert_eq!(record.earliest, 2000);
        assert_eq!(record.data.get(&2000), Some(&1.0));
        assert_eq!(record.data.get(&2001), Some(&1.1));
        assert!(record.source.contains("CPIAUCSL"));
    }

    #[test]
    fn failures_are_reported_not_raised() {
        let specs = vec![
            spec("GBP", SourceRef::Ons {
                cdid: "D7BT".to_string(),
                dataset: "MM23".to_string(),
            }),
            spec("USD", SourceRef::Fred {
                series_id: "CPIAUCSL".to_string(),
            }),
        ];
        let sink = MemorySink::default();
        let report = run_batch(&specs, &Fixed, &BatchOptions::default(), &sink);

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].currency, "USD");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].currency, "GBP");
        assert!(!report.all_failed());
        assert_eq!(sink.events().len(), 4);
    }
}
