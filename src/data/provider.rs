//! The seam between the batch runner and the network.

use reqwest::blocking::Client;
use tracing::info;

use crate::config::Settings;
use crate::data::{BlsClient, FetchedSeries, FredClient, GusClient, OnsClient, ScbClient, WorldBankClient};
use crate::domain::{SourceRef, YearRange};
use crate::error::{AppError, IndexError};

/// Anything that can produce observations for a [`SourceRef`].
///
/// Implementations must be shareable across the rayon pool.
pub trait SeriesProvider: Send + Sync {
    fn fetch(&self, source: &SourceRef, range: YearRange) -> Result<FetchedSeries, IndexError>;
}

/// Live provider: one shared HTTP client plus credentials.
pub struct HttpProvider {
    client: Client,
    fred_api_key: Option<String>,
    bls_api_key: Option<String>,
}

impl HttpProvider {
    pub fn new(client: Client, settings: &Settings) -> Self {
        Self {
            client,
            fred_api_key: settings.fred_api_key.clone(),
            bls_api_key: settings.bls_api_key.clone(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(settings.http_timeout)
            .user_agent(concat!("inflation-index/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::new(2, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::new(client, settings))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn fred(&self) -> Result<FredClient, IndexError> {
        FredClient::new(self.client.clone(), self.fred_api_key.as_deref())
    }

    pub fn world_bank(&self) -> WorldBankClient {
        WorldBankClient::new(self.client.clone())
    }
}

impl SeriesProvider for HttpProvider {
    fn fetch(&self, source: &SourceRef, range: YearRange) -> Result<FetchedSeries, IndexError> {
        info!(provider = source.provider_name(), "fetching {}", source.attribution());

        let client = self.client.clone();
        let observations = match source {
            SourceRef::Fred { series_id } => self.fred()?.fetch_series(series_id, range)?,
            SourceRef::Bls { series_id } => {
                BlsClient::new(client, self.bls_api_key.as_deref()).fetch_series(series_id, range)?
            }
            SourceRef::Ons { cdid, dataset } => OnsClient::new(client).fetch_series(cdid, dataset)?,
            SourceRef::Scb { table, contents_code } => ScbClient::new(client).fetch_series(table, contents_code)?,
            SourceRef::Gus { variable_id } => GusClient::new(client).fetch_rates(*variable_id)?,
            SourceRef::WorldBank { country, indicator } => {
                WorldBankClient::new(client).fetch_indicator(country, indicator, range)?
            }
        };

        Ok(FetchedSeries {
            kind: source.kind(),
            observations,
        })
    }
}
