//! BLS Public Data API v2 (timeseries).

use chrono::{Datelike, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::{parse_value, send_json};
use crate::domain::{TimeSeriesObservation, YearRange};
use crate::error::IndexError;

const BASE_URL: &str = "https://api.bls.gov/publicAPI/v2/timeseries/data/";
const SOURCE: &str = "BLS";
const REQUEST_SUCCEEDED: &str = "REQUEST_SUCCEEDED";

/// First year of the CPI-U history.
const EARLIEST_YEAR: i32 = 1913;
/// Maximum years per request: 20 with a registration key, 10 without.
const SPAN_WITH_KEY: i32 = 20;
const SPAN_WITHOUT_KEY: i32 = 10;

pub struct BlsClient {
    client: Client,
    api_key: Option<String>,
}

impl BlsClient {
    pub fn new(client: Client, api_key: Option<&str>) -> Self {
        Self {
            client,
            api_key: api_key.map(str::to_string),
        }
    }

    /// Fetch monthly observations, splitting the year range into API-sized windows.
    pub fn fetch_series(&self, series_id: &str, range: YearRange) -> Result<Vec<TimeSeriesObservation>, IndexError> {
        let start = range.start.unwrap_or(EARLIEST_YEAR);
        let end = range.end.unwrap_or_else(|| Utc::now().year());
        let span = if self.api_key.is_some() { SPAN_WITH_KEY } else { SPAN_WITHOUT_KEY };

        let mut out = Vec::new();
        for (from, to) in year_windows(start, end, span) {
            debug!(series_id, from, to, "requesting BLS window");
            let body = BlsRequest {
                seriesid: vec![series_id],
                startyear: from.to_string(),
                endyear: to.to_string(),
                registrationkey: self.api_key.as_deref(),
            };
            let resp: BlsResponse = send_json(SOURCE, self.client.post(BASE_URL).json(&body))?;
            out.extend(parse_response(resp)?);
        }
        Ok(out)
    }
}

/// Inclusive `(from, to)` windows of at most `span` years covering `start..=end`.
fn year_windows(start: i32, end: i32, span: i32) -> Vec<(i32, i32)> {
    let mut windows = Vec::new();
    let mut from = start;
    while from <= end {
        let to = (from + span - 1).min(end);
        windows.push((from, to));
        from = to + 1;
    }
    windows
}

#[derive(Debug, Serialize)]
struct BlsRequest<'a> {
    seriesid: Vec<&'a str>,
    startyear: String,
    endyear: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    registrationkey: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BlsResponse {
    status: String,
    #[serde(default)]
    message: Vec<String>,
    #[serde(rename = "Results")]
    results: Option<BlsResults>,
}

#[derive(Debug, Deserialize)]
struct BlsResults {
    series: Vec<BlsSeries>,
}

#[derive(Debug, Deserialize)]
struct BlsSeries {
    data: Vec<BlsDatum>,
}

#[derive(Debug, Deserialize)]
struct BlsDatum {
    year: String,
    period: String,
    value: String,
}

/// Keep monthly readings (`M01`..`M12`). `M13` is BLS's own annual average
/// and would double-count once months are averaged.
fn parse_response(resp: BlsResponse) -> Result<Vec<TimeSeriesObservation>, IndexError> {
    if resp.status != REQUEST_SUCCEEDED {
        let reason = if resp.message.is_empty() {
            resp.status
        } else {
            resp.message.join("; ")
        };
        return Err(IndexError::unavailable(SOURCE, reason));
    }

    let results = resp
        .results
        .ok_or_else(|| IndexError::malformed(SOURCE, "response has no Results"))?;

    let mut out = Vec::new();
    for series in results.series {
        for datum in series.data {
            let is_month = datum.period.len() == 3
                && datum.period.starts_with('M')
                && datum.period != "M13";
            if !is_month {
                continue;
            }
            if let Some(v) = parse_value(&datum.value, &["-"]) {
                out.push(TimeSeriesObservation::new(format!("{}-{}", datum.year, datum.period), v));
            }
        }
    }
    Ok(out)
}
