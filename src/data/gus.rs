//! Statistics Poland BDL API (Bank Danych Lokalnych).

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::data::send_json;
use crate::domain::TimeSeriesObservation;
use crate::error::IndexError;

const BASE_URL: &str = "https://bdl.stat.gov.pl/api/v1/data/by-variable";
const SOURCE: &str = "GUS";
const PAGE_SIZE: &str = "100";

pub struct GusClient {
    client: Client,
}

impl GusClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Country-level values of a BDL variable published as "previous year = 100".
    ///
    /// Returned observations are annual percentage rates (`val - 100`).
    pub fn fetch_rates(&self, variable_id: u64) -> Result<Vec<TimeSeriesObservation>, IndexError> {
        let url = format!("{BASE_URL}/{variable_id}");
        let req = self.client.get(url).query(&[
            ("format", "json"),
            ("unit-level", "0"),
            ("page-size", PAGE_SIZE),
        ]);
        let body: BdlResponse = send_json(SOURCE, req)?;
        parse_response(body)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BdlResponse {
    #[serde(default)]
    results: Vec<BdlUnit>,
}

#[derive(Debug, Deserialize)]
struct BdlUnit {
    #[serde(default)]
    values: Vec<BdlValue>,
}

#[derive(Debug, Deserialize)]
struct BdlValue {
    year: String,
    val: Option<f64>,
}

fn parse_response(body: BdlResponse) -> Result<Vec<TimeSeriesObservation>, IndexError> {
    let unit = body
        .results
        .into_iter()
        .next()
        .ok_or_else(|| IndexError::malformed(SOURCE, "no country-level unit in response"))?;

    Ok(unit
        .values
        .into_iter()
        .filter_map(|v| {
            let index = v.val.filter(|x| x.is_finite())?;
            Some(TimeSeriesObservation::new(v.year, index - 100.0))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_previous_year_index_to_rate() {
        let body: BdlResponse = serde_json::from_str(
            r#"{"totalRecords":1,"page":0,"pageSize":100,"results":[
                {"id":"000000000000","name":"POLSKA","values":[
                    {"year":"2021","val":105.1,"attrId":1},
                    {"year":"2022","val":null,"attrId":0},
                    {"year":"2023","val":111.4,"attrId":1}
                ]}]}"#,
        )
        .unwrap();
        let out = parse_response(body).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].period, "2021");
        assert!((out[0].raw_value - 5.1).abs() < 1e-9);
        assert!((out[1].raw_value - 11.4).abs() < 1e-9);
    }

    #[test]
    fn empty_results_are_malformed() {
        let body: BdlResponse = serde_json::from_str(r#"{"results":[]}"#).unwrap();
        assert!(matches!(parse_response(body), Err(IndexError::MalformedPayload { .. })));
    }
}
