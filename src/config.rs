//! Runtime settings read from the environment (and a `.env` file if present).

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::AppError;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Settings {
    pub fred_api_key: Option<String>,
    pub bls_api_key: Option<String>,
    /// Directory generated records are written to.
    pub data_dir: PathBuf,
    /// Endpoint pinged after records change (best effort).
    pub notify_url: Option<String>,
    pub http_timeout: Duration,
    pub log_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fred_api_key: None,
            bls_api_key: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            notify_url: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            log_json: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let http_timeout = match non_empty("INFL_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .map_err(|e| AppError::new(2, format!("Invalid INFL_HTTP_TIMEOUT_SECS '{raw}': {e}")))?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        let log_json = match non_empty("INFL_LOG_JSON").as_deref() {
            None => false,
            Some("1" | "true" | "yes" | "on") => true,
            Some("0" | "false" | "no" | "off") => false,
            Some(other) => {
                warn!("INFL_LOG_JSON={other} not understood, using plain logs");
                false
            }
        };

        let data_dir = non_empty("INFL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                debug!("INFL_DATA_DIR not set, using default: {DEFAULT_DATA_DIR}");
                PathBuf::from(DEFAULT_DATA_DIR)
            });

        Ok(Self {
            fred_api_key: non_empty("FRED_API_KEY"),
            bls_api_key: non_empty("BLS_API_KEY"),
            data_dir,
            notify_url: non_empty("INFL_NOTIFY_URL"),
            http_timeout,
            log_json,
        })
    }
}
