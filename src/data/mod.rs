//! Statistical-provider adapters.
//!
//! Each adapter only knows its provider's wire shape: it issues the HTTP call
//! and turns the payload into [`TimeSeriesObservation`]s, dropping values the
//! provider marks as missing. All arithmetic lives in `crate::index`.

use reqwest::blocking::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::domain::{SeriesKind, TimeSeriesObservation};
use crate::error::IndexError;

pub mod bls;
pub mod fred;
pub mod gus;
pub mod ons;
pub mod provider;
pub mod scb;
pub mod worldbank;

pub use bls::BlsClient;
pub use fred::FredClient;
pub use gus::GusClient;
pub use ons::OnsClient;
pub use provider::{HttpProvider, SeriesProvider};
pub use scb::ScbClient;
pub use worldbank::WorldBankClient;

/// Observations fetched from one source, with what their values mean.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedSeries {
    pub kind: SeriesKind,
    pub observations: Vec<TimeSeriesObservation>,
}

/// Parse a provider's numeric string, treating its sentinels as missing.
///
/// Empty strings and non-finite parses are always missing.
pub fn parse_value(raw: &str, sentinels: &[&str]) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || sentinels.contains(&trimmed) {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

/// Send a request and decode a JSON body, mapping every failure to a typed error.
pub(crate) fn send_json<T: DeserializeOwned>(source_name: &str, request: RequestBuilder) -> Result<T, IndexError> {
    let resp = request
        .send()
        .map_err(|e| IndexError::unavailable(source_name, format!("request failed: {e}")))?;

    if !resp.status().is_success() {
        return Err(IndexError::unavailable(
            source_name,
            format!("request failed with status {}", resp.status()),
        ));
    }

    resp.json::<T>()
        .map_err(|e| IndexError::malformed(source_name, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_value_filters_sentinels() {
        assert_eq!(parse_value(" 12.5 ", &["."]), Some(12.5));
        assert_eq!(parse_value(".", &["."]), None);
        assert_eq!(parse_value("", &[]), None);
        assert_eq!(parse_value("-", &["-"]), None);
        assert_eq!(parse_value("NaN", &[]), None);
        assert_eq!(parse_value("n/a", &[]), None);
        assert_eq!(parse_value("0", &["."]), Some(0.0));
    }
}
