//! Built-in currency catalog: display metadata plus where each series comes from.

use serde::{Deserialize, Serialize};

use crate::domain::SeriesKind;

/// Identifies a provider and the series within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum SourceRef {
    Fred { series_id: String },
    Bls { series_id: String },
    Ons { cdid: String, dataset: String },
    Scb { table: String, contents_code: String },
    Gus { variable_id: u64 },
    WorldBank { country: String, indicator: String },
}

impl SourceRef {
    /// Short provider label used in logs and failure reports.
    pub fn provider_name(&self) -> &'static str {
        match self {
            SourceRef::Fred { .. } => "FRED",
            SourceRef::Bls { .. } => "BLS",
            SourceRef::Ons { .. } => "ONS",
            SourceRef::Scb { .. } => "SCB",
            SourceRef::Gus { .. } => "GUS",
            SourceRef::WorldBank { .. } => "World Bank",
        }
    }

    /// Whether the source publishes index levels or annual percentage rates.
    ///
    /// Rates are compounded into an index; levels are normalized directly.
    /// GUS publishes "previous year = 100", which its adapter turns into rates.
    pub fn kind(&self) -> SeriesKind {
        match self {
            SourceRef::Fred { .. } | SourceRef::Bls { .. } | SourceRef::Ons { .. } | SourceRef::Scb { .. } => {
                SeriesKind::Level
            }
            SourceRef::Gus { .. } => SeriesKind::Rate,
            SourceRef::WorldBank { indicator, .. } if indicator == WORLD_BANK_CPI_INFLATION => SeriesKind::Rate,
            SourceRef::WorldBank { .. } => SeriesKind::Level,
        }
    }

    /// Human-readable attribution stored in the record's `source` field.
    pub fn attribution(&self) -> String {
        match self {
            SourceRef::Fred { series_id } => {
                format!("Federal Reserve Bank of St. Louis (FRED {series_id})")
            }
            SourceRef::Bls { series_id } => format!("U.S. Bureau of Labor Statistics ({series_id})"),
            SourceRef::Ons { cdid, dataset } => {
                format!("Office for National Statistics ({cdid}/{dataset})")
            }
            SourceRef::Scb { contents_code, .. } => format!("Statistics Sweden ({contents_code})"),
            SourceRef::Gus { variable_id } => format!("Statistics Poland (BDL variable {variable_id})"),
            SourceRef::WorldBank { country, indicator } => {
                format!("World Bank ({indicator}, {country})")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencySpec {
    pub currency: String,
    pub symbol: String,
    pub name: String,
    pub flag: String,
    pub source: SourceRef,
}

impl CurrencySpec {
    fn new(currency: &str, symbol: &str, name: &str, flag: &str, source: SourceRef) -> Self {
        Self {
            currency: currency.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            flag: flag.to_string(),
            source,
        }
    }
}

pub const WORLD_BANK_CPI_INFLATION: &str = "FP.CPI.TOTL.ZG";
pub const WORLD_BANK_PPP: &str = "PA.NUS.PPP";

/// The currencies ingested by `infl fetch` when no subset is requested.
pub fn builtin_catalog() -> Vec<CurrencySpec> {
    let world_bank = |country: &str| SourceRef::WorldBank {
        country: country.to_string(),
        indicator: WORLD_BANK_CPI_INFLATION.to_string(),
    };

    vec![
        CurrencySpec::new(
            "USD",
            "$",
            "US Dollar",
            "🇺🇸",
            SourceRef::Bls {
                series_id: "CUUR0000SA0".to_string(),
            },
        ),
        CurrencySpec::new(
            "GBP",
            "£",
            "British Pound",
            "🇬🇧",
            SourceRef::Ons {
                cdid: "D7BT".to_string(),
                dataset: "MM23".to_string(),
            },
        ),
        CurrencySpec::new(
            "SEK",
            "kr",
            "Swedish Krona",
            "🇸🇪",
            SourceRef::Scb {
                table: "PR/PR0101/PR0101A/KPItotM".to_string(),
                contents_code: "000004VU".to_string(),
            },
        ),
        CurrencySpec::new(
            "PLN",
            "zł",
            "Polish Złoty",
            "🇵🇱",
            SourceRef::Gus { variable_id: 217230 },
        ),
        CurrencySpec::new("EUR", "€", "Euro", "🇪🇺", world_bank("EMU")),
        CurrencySpec::new("CAD", "C$", "Canadian Dollar", "🇨🇦", world_bank("CAN")),
        CurrencySpec::new("AUD", "A$", "Australian Dollar", "🇦🇺", world_bank("AUS")),
        CurrencySpec::new("JPY", "¥", "Japanese Yen", "🇯🇵", world_bank("JPN")),
    ]
}

/// Look up catalog entries by currency code (case-insensitive), keeping catalog order.
pub fn select(catalog: &[CurrencySpec], codes: &[String]) -> Result<Vec<CurrencySpec>, String> {
    if codes.is_empty() {
        return Ok(catalog.to_vec());
    }
    let mut unknown = Vec::new();
    for code in codes {
        if !catalog.iter().any(|c| c.currency.eq_ignore_ascii_case(code)) {
            unknown.push(code.clone());
        }
    }
    if !unknown.is_empty() {
        return Err(format!("Unknown currency code(s): {}", unknown.join(", ")));
    }
    Ok(catalog
        .iter()
        .filter(|c| codes.iter().any(|code| c.currency.eq_ignore_ascii_case(code)))
        .cloned()
        .collect())
}
