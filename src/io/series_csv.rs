//! CSV import and export of yearly series.
//!
//! Import accepts a two-column file (`year,value`) with a little latitude on
//! the header names. Bad rows are collected rather than failing the file.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{NormalizedSeries, TimeSeriesObservation};
use crate::error::AppError;

const PERIOD_COLUMNS: &[&str] = &["year", "period", "date"];
const VALUE_COLUMNS: &[&str] = &["value", "rate", "index", "cpi"];

/// A row-level problem encountered during import.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct CsvSeries {
    pub observations: Vec<TimeSeriesObservation>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    /// Rows whose value cell was empty.
    pub rows_missing: usize,
}

pub fn read_series_csv(path: &Path) -> Result<CsvSeries, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_series(file)
}

pub fn read_series<R: Read>(input: R) -> Result<CsvSeries, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let period_idx = find_column(&header_map, PERIOD_COLUMNS)?;
    let value_idx = find_column(&header_map, VALUE_COLUMNS)?;

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_missing = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let period = record.get(period_idx).unwrap_or("");
        let raw = record.get(value_idx).unwrap_or("");
        if raw.is_empty() {
            rows_missing += 1;
            continue;
        }

        let obs = match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => TimeSeriesObservation::new(period, v),
            _ => {
                row_errors.push(RowError {
                    line,
                    message: format!("Invalid value '{raw}'"),
                });
                continue;
            }
        };
        if obs.year().is_none() {
            row_errors.push(RowError {
                line,
                message: format!("Invalid period '{period}'"),
            });
            continue;
        }
        observations.push(obs);
    }

    if observations.is_empty() {
        return Err(AppError::new(3, "No valid rows in CSV."));
    }

    Ok(CsvSeries {
        observations,
        row_errors,
        rows_read,
        rows_missing,
    })
}

/// Write `year,<convention>` rows for a normalized series.
pub fn write_series_csv(path: &Path, series: &NormalizedSeries) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writer
        .write_record(["year", series.convention.label()])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for (year, value) in &series.values {
        writer
            .write_record([year.to_string(), value.to_string()])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, candidates: &[&str]) -> Result<usize, AppError> {
    candidates
        .iter()
        .find_map(|c| header_map.get(*c).copied())
        .ok_or_else(|| {
            AppError::new(
                2,
                format!("CSV is missing a column named one of: {}", candidates.join(", ")),
            )
        })
}
