//! FRED API integration (St. Louis Fed series observations).

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::data::{parse_value, send_json};
use crate::domain::{TimeSeriesObservation, YearRange};
use crate::error::IndexError;

const BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";
const SOURCE: &str = "FRED";
const OBS_LIMIT: usize = 100000;

/// S&P/Case-Shiller U.S. National Home Price Index (not seasonally adjusted).
pub const SERIES_CASE_SHILLER: &str = "CSUSHPINSA";
/// Median household income in the United States (current dollars).
pub const SERIES_MEDIAN_INCOME: &str = "MEHOINUSA646N";

pub struct FredClient {
    client: Client,
    api_key: String,
}

impl FredClient {
    /// A missing key is reported as the source being unavailable.
    pub fn new(client: Client, api_key: Option<&str>) -> Result<Self, IndexError> {
        let api_key = api_key.ok_or_else(|| IndexError::unavailable(SOURCE, "missing FRED_API_KEY"))?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
        })
    }

    pub fn fetch_series(&self, series_id: &str, range: YearRange) -> Result<Vec<TimeSeriesObservation>, IndexError> {
        let mut req = self.client.get(BASE_URL).query(&[
            ("series_id", series_id),
            ("api_key", &self.api_key),
            ("file_type", "json"),
            ("sort_order", "asc"),
            ("limit", &OBS_LIMIT.to_string()),
        ]);

        if let Some(start) = range.start {
            req = req.query(&[("observation_start", format!("{start:04}-01-01"))]);
        }
        if let Some(end) = range.end {
            req = req.query(&[("observation_end", format!("{end:04}-12-31"))]);
        }

        let body: ObservationsResponse = send_json(SOURCE, req)?;
        Ok(parse_observations(body))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ObservationsResponse {
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    date: String,
    value: String,
}

/// FRED marks missing observations with `"."`.
fn parse_observations(body: ObservationsResponse) -> Vec<TimeSeriesObservation> {
    body.observations
        .into_iter()
        .filter_map(|obs| parse_value(&obs.value, &["."]).map(|v| TimeSeriesObservation::new(obs.date, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dot_values_are_dropped() {
        let body: ObservationsResponse = serde_json::from_str(
            r#"{"realtime_start":"2024-01-01","count":3,"observations":[
                {"realtime_start":"2024-01-01","date":"2020-01-01","value":"258.682"},
                {"realtime_start":"2024-01-01","date":"2020-02-01","value":"."},
                {"realtime_start":"2024-01-01","date":"2020-03-01","value":"258.115"}
            ]}"#,
        )
        .unwrap();

        let out = parse_observations(body);
        assert_eq!(
            out,
            vec![
                TimeSeriesObservation::new("2020-01-01", 258.682),
                TimeSeriesObservation::new("2020-03-01", 258.115),
            ]
        );
    }

    #[test]
    fn missing_key_is_unavailable() {
        let err = FredClient::new(Client::new(), None).err().unwrap();
        assert!(matches!(err, IndexError::DataSourceUnavailable { .. }));
    }
}
