//! Read/write `CurrencySeriesRecord` JSON files.
//!
//! Records are written to a sibling temp file and renamed into place, so a
//! reader never sees a half-written record and a failed run leaves the
//! previous one untouched.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::domain::CurrencySeriesRecord;
use crate::error::AppError;

/// `<dir>/<currency lowercase>.json`
pub fn record_path(dir: &Path, currency: &str) -> PathBuf {
    dir.join(format!("{}.json", currency.to_ascii_lowercase()))
}

/// Write a record JSON file, replacing any existing one.
pub fn write_record_json(path: &Path, record: &CurrencySeriesRecord) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", parent.display())))?;
    }

    let tmp = path.with_extension("json.tmp");
    let result = write_pretty(&tmp, record).and_then(|()| {
        fs::rename(&tmp, path).map_err(|e| {
            AppError::new(
                2,
                format!("Failed to move record into place at '{}': {e}", path.display()),
            )
        })
    });

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_pretty(path: &Path, record: &CurrencySeriesRecord) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create record JSON '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, record)
        .map_err(|e| AppError::new(2, format!("Failed to write record JSON: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush record JSON: {e}")))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| AppError::new(2, format!("Failed to sync record JSON: {e}")))?;
    Ok(())
}

/// Read a record JSON file.
pub fn read_record_json(path: &Path) -> Result<CurrencySeriesRecord, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open record JSON '{}': {e}", path.display())))?;
    let record: CurrencySeriesRecord = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid record JSON '{}': {e}", path.display())))?;
    if record.data.is_empty() {
        return Err(AppError::new(3, format!("Record '{}' has no data.", path.display())));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use super::*;
    use crate::domain::IndexConvention;

    fn record() -> CurrencySeriesRecord {
        CurrencySeriesRecord {
            currency: "SEK".to_string(),
            symbol: "kr".to_string(),
            name: "Swedish Krona".to_string(),
            flag: "🇸🇪".to_string(),
            earliest: 1980,
            latest: 1981,
            last_updated: Utc::now(),
            source: "Statistics Sweden".to_string(),
            convention: IndexConvention::Ratio,
            data: BTreeMap::from([(1980, 1.0), (1981, 1.1211)]),
        }
    }

    #[test]
    fn write_then_read_and_replace() {
        let dir = tempfile::tempdir().unwrap();
        let path = record_path(dir.path(), "SEK");
        assert!(path.ends_with("sek.json"));

        write_record_json(&path, &record()).unwrap();
        let mut updated = record();
        updated.latest = 1982;
        updated.data.insert(1982, 1.2);
        write_record_json(&path, &updated).unwrap();

        let back = read_record_json(&path).unwrap();
        assert_eq!(back, updated);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = record_path(&dir.path().join("nested/out"), "usd");
        write_record_json(&path, &record()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn read_rejects_empty_data_and_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.json");

        let mut empty = record();
        empty.data.clear();
        write_record_json(&path, &empty).unwrap();
        assert_eq!(read_record_json(&path).unwrap_err().exit_code(), 3);

        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(read_record_json(&path).unwrap_err().exit_code(), 2);
    }
}
