//! Terminal formatting for batch reports, records and calculator results.
//!
//! We keep formatting code in one place so the arithmetic and ingestion code
//! stays free of presentation details.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::app::pipeline::BatchReport;
use crate::domain::{CurrencySeriesRecord, CurrencySpec, NormalizedSeries, PriceToIncome, Projection};
use crate::index::cumulative_inflation;

pub fn format_batch_report(report: &BatchReport, written: &[PathBuf]) -> String {
    let mut out = String::new();
    out.push_str("=== infl - ingestion run ===\n");
    out.push_str(&format!(
        "Sources: {} ok, {} failed\n",
        report.records.len(),
        report.failures.len()
    ));

    for record in &report.records {
        out.push_str(&format!(
            "  ok    {:<4} {}..={} ({} years)  {}\n",
            record.currency,
            record.earliest,
            record.latest,
            record.data.len(),
            record.source
        ));
    }
    for failure in &report.failures {
        out.push_str(&format!(
            "  FAIL  {:<4} [{}] {}\n",
            failure.currency, failure.provider, failure.error
        ));
    }

    if !written.is_empty() {
        out.push_str("Wrote:\n");
        for path in written {
            out.push_str(&format!("  {}\n", path.display()));
        }
    }
    out
}

pub fn format_record_summary(record: &CurrencySeriesRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {} ({})\n", record.flag, record.name, record.currency));
    out.push_str(&format!("Source: {}\n", record.source));
    out.push_str(&format!("Updated: {}\n", record.last_updated.to_rfc3339()));
    out.push_str(&format!(
        "Years: {}..={} | n={} | convention={}\n",
        record.earliest,
        record.latest,
        record.data.len(),
        record.convention.label()
    ));

    if let Ok(total) = cumulative_inflation(record.earliest, record.latest, &record.series()) {
        out.push_str(&format!(
            "Cumulative inflation {}-{}: {:+.2}%\n",
            record.earliest, record.latest, total
        ));
    }

    out.push('\n');
    out.push_str(&format_series_table(&record.series(), 10));
    out
}

/// Year/value table; with `every > 1` only every n-th year plus the last one.
pub fn format_series_table(series: &NormalizedSeries, every: usize) -> String {
    let every = every.max(1);
    let mut out = format!("{:>6}  {:>10}\n", "year", series.convention.label());
    let last = series.latest();
    for (i, (year, value)) in series.values.iter().enumerate() {
        if i % every == 0 || Some(*year) == last {
            out.push_str(&format!("{year:>6}  {value:>10.4}\n"));
        }
    }
    out
}

pub fn format_projection(p: &Projection, symbol: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{symbol}{:.2} in {} is worth {symbol}{:.2} in {}\n",
        p.start_amount, p.from_year, p.end_amount, p.to_year
    ));
    out.push_str(&format!("Total inflation: {:+.2}%\n", p.total_inflation_percent));
    out.push_str(&format!(
        "Purchasing power loss: {:.2}%\n",
        p.purchasing_power_loss_percent
    ));
    out
}

pub fn format_price_to_income(rows: &BTreeMap<i32, PriceToIncome>) -> String {
    let mut out = format!("{:>6}  {:>12}  {:>12}  {:>6}\n", "year", "home price", "income", "ratio");
    for (year, row) in rows {
        out.push_str(&format!(
            "{year:>6}  {:>12.0}  {:>12.0}  {:>6.2}\n",
            row.home_price, row.median_income, row.ratio
        ));
    }
    out
}

pub fn format_catalog(catalog: &[CurrencySpec]) -> String {
    let mut out = String::new();
    for spec in catalog {
        out.push_str(&format!(
            "{} {:<4} {:<20} {}\n",
            spec.flag,
            spec.currency,
            spec.name,
            spec.source.attribution()
        ));
    }
    out
}
