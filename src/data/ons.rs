//! ONS time-series API (UK Office for National Statistics).

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::data::{parse_value, send_json};
use crate::domain::TimeSeriesObservation;
use crate::error::IndexError;

const BASE_URL: &str = "https://api.ons.gov.uk/timeseries";
const SOURCE: &str = "ONS";

pub struct OnsClient {
    client: Client,
}

impl OnsClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn fetch_series(&self, cdid: &str, dataset: &str) -> Result<Vec<TimeSeriesObservation>, IndexError> {
        let url = format!(
            "{BASE_URL}/{}/dataset/{}/data",
            cdid.to_ascii_lowercase(),
            dataset.to_ascii_lowercase()
        );
        let body: OnsResponse = send_json(SOURCE, self.client.get(url))?;
        Ok(parse_response(body))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OnsResponse {
    #[serde(default)]
    years: Vec<OnsPoint>,
    #[serde(default)]
    months: Vec<OnsPoint>,
}

#[derive(Debug, Deserialize)]
struct OnsPoint {
    year: String,
    #[serde(default)]
    month: String,
    value: String,
}

/// Monthly points when published, otherwise the yearly ones.
fn parse_response(body: OnsResponse) -> Vec<TimeSeriesObservation> {
    let points = if body.months.is_empty() { body.years } else { body.months };
    points
        .into_iter()
        .filter_map(|p| {
            let value = parse_value(&p.value, &[])?;
            let period = if p.month.is_empty() {
                p.year
            } else {
                format!("{} {}", p.year, p.month)
            };
            Some(TimeSeriesObservation::new(period, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_months_over_years() {
        let body: OnsResponse = serde_json::from_str(
            r#"{"description":{"cdid":"D7BT"},
                "years":[{"date":"1989","value":"47.8","year":"1989","month":""}],
                "months":[
                    {"date":"1989 JAN","value":"46.9","year":"1989","month":"January"},
                    {"date":"1989 FEB","value":"","year":"1989","month":"February"}
                ]}"#,
        )
        .unwrap();
        assert_eq!(
            parse_response(body),
            vec![TimeSeriesObservation::new("1989 January", 46.9)]
        );
    }

    #[test]
    fn falls_back_to_years() {
        let body: OnsResponse =
            serde_json::from_str(r#"{"years":[{"date":"1990","value":"51.3","year":"1990"}],"months":[]}"#).unwrap();
        assert_eq!(parse_response(body), vec![TimeSeriesObservation::new("1990", 51.3)]);
    }
}
