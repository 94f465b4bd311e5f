//! World Bank Indicators API v2.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::data::send_json;
use crate::domain::{TimeSeriesObservation, WORLD_BANK_PPP, YearRange};
use crate::error::IndexError;
use crate::index::PppTable;

const BASE_URL: &str = "https://api.worldbank.org/v2/country";
const SOURCE: &str = "World Bank";
const PER_PAGE: &str = "20000";

pub struct WorldBankClient {
    client: Client,
}

impl WorldBankClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn fetch_indicator(
        &self,
        country: &str,
        indicator: &str,
        range: YearRange,
    ) -> Result<Vec<TimeSeriesObservation>, IndexError> {
        let entries = self.fetch_entries(country, indicator, range)?;
        Ok(entries
            .into_iter()
            .filter_map(|e| e.value.map(|v| TimeSeriesObservation::new(e.date, v)))
            .filter(|o| o.raw_value.is_finite())
            .collect())
    }

    /// PPP conversion factors (`PA.NUS.PPP`) for several countries in one call.
    pub fn fetch_ppp(&self, countries: &[&str], range: YearRange) -> Result<PppTable, IndexError> {
        let entries = self.fetch_entries(&countries.join(";"), WORLD_BANK_PPP, range)?;
        Ok(ppp_table(entries))
    }

    fn fetch_entries(&self, country: &str, indicator: &str, range: YearRange) -> Result<Vec<WbEntry>, IndexError> {
        let url = format!("{BASE_URL}/{country}/indicator/{indicator}");
        let mut req = self
            .client
            .get(url)
            .query(&[("format", "json"), ("per_page", PER_PAGE)]);
        if let (Some(start), Some(end)) = (range.start, range.end) {
            req = req.query(&[("date", format!("{start}:{end}"))]);
        }
        let body: Value = send_json(SOURCE, req)?;
        parse_entries(body)
    }
}

#[derive(Debug, Deserialize)]
struct WbEntry {
    #[serde(default)]
    country: Option<WbRef>,
    #[serde(default)]
    countryiso3code: String,
    date: String,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WbRef {
    id: String,
}

/// The body is `[meta, entries]` on success and `[{"message": [...]}]` on error.
/// `entries` is `null` when the query matched nothing.
fn parse_entries(body: Value) -> Result<Vec<WbEntry>, IndexError> {
    let Value::Array(mut parts) = body else {
        return Err(IndexError::malformed(SOURCE, "expected a JSON array"));
    };

    if parts.len() < 2 {
        let message = parts
            .first()
            .and_then(|meta| meta.get("message"))
            .and_then(|m| m.get(0))
            .and_then(|m| m.get("value"))
            .and_then(Value::as_str)
            .unwrap_or("response has no data page")
            .to_string();
        return Err(IndexError::unavailable(SOURCE, message));
    }

    match parts.swap_remove(1) {
        Value::Null => Ok(Vec::new()),
        page => serde_json::from_value(page).map_err(|e| IndexError::malformed(SOURCE, e.to_string())),
    }
}

fn ppp_table(entries: Vec<WbEntry>) -> PppTable {
    let mut table = PppTable::default();
    for entry in entries {
        let Some(value) = entry.value else { continue };
        let Ok(year) = entry.date.parse::<i32>() else { continue };
        let code = if entry.countryiso3code.is_empty() {
            entry.country.map(|c| c.id).unwrap_or_default()
        } else {
            entry.countryiso3code
        };
        if code.is_empty() {
            continue;
        }
        table.insert(&code, year, value);
    }
    table
}
