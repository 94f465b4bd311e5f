//! Statistics Sweden PxWeb API.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::data::{parse_value, send_json};
use crate::domain::TimeSeriesObservation;
use crate::error::IndexError;

const BASE_URL: &str = "https://api.scb.se/OV0104/v1/doris/en/ssd";
const SOURCE: &str = "SCB";

pub struct ScbClient {
    client: Client,
}

impl ScbClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Query one contents code of a PxWeb table; every time period is returned.
    pub fn fetch_series(&self, table: &str, contents_code: &str) -> Result<Vec<TimeSeriesObservation>, IndexError> {
        let url = format!("{BASE_URL}/{}", table.trim_matches('/'));
        let query = PxQuery {
            query: vec![PxSelection {
                code: "ContentsCode",
                selection: PxFilter {
                    filter: "item",
                    values: vec![contents_code],
                },
            }],
            response: PxFormat { format: "json" },
        };
        let body: PxResponse = send_json(SOURCE, self.client.post(url).json(&query))?;
        Ok(parse_response(body))
    }
}

#[derive(Debug, Serialize)]
struct PxQuery<'a> {
    query: Vec<PxSelection<'a>>,
    response: PxFormat,
}

#[derive(Debug, Serialize)]
struct PxSelection<'a> {
    code: &'a str,
    selection: PxFilter<'a>,
}

#[derive(Debug, Serialize)]
struct PxFilter<'a> {
    filter: &'a str,
    values: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct PxFormat {
    format: &'static str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PxResponse {
    data: Vec<PxRow>,
}

#[derive(Debug, Deserialize)]
struct PxRow {
    key: Vec<String>,
    values: Vec<String>,
}

/// Rows are keyed by period (`1980M01`); PxWeb writes `..` for missing cells.
fn parse_response(body: PxResponse) -> Vec<TimeSeriesObservation> {
    body.data
        .into_iter()
        .filter_map(|row| {
            let period = row
                .key
                .into_iter()
                .find(|k| TimeSeriesObservation::new(k.as_str(), 0.0).year().is_some())?;
            let value = parse_value(row.values.first()?, &["..", "."])?;
            Some(TimeSeriesObservation::new(period, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_period_keys_and_skips_dots() {
        let body: PxResponse = serde_json::from_str(
            r#"{"columns":[{"code":"Tid","text":"month","type":"t"}],"comments":[],
                "data":[
                    {"key":["1980M01"],"values":["100.00"]},
                    {"key":["1980M02"],"values":[".."]},
                    {"key":["1980M03"],"values":["101.10"]}
                ]}"#,
        )
        .unwrap();
        assert_eq!(
            parse_response(body),
            vec![
                TimeSeriesObservation::new("1980M01", 100.0),
                TimeSeriesObservation::new("1980M03", 101.1),
            ]
        );
    }

    #[test]
    fn query_body_matches_pxweb_shape() {
        let query = PxQuery {
            query: vec![PxSelection {
                code: "ContentsCode",
                selection: PxFilter {
                    filter: "item",
                    values: vec!["000004VU"],
                },
            }],
            response: PxFormat { format: "json" },
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["query"][0]["selection"]["values"][0], "000004VU");
        assert_eq!(json["response"]["format"], "json");
    }
}
