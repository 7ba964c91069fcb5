//! Where the view gets its data: the proxy's two endpoints.

use crate::domain::{CurrentConditions, ForecastEntry, ProviderCurrent, ProviderForecast, WeatherQuery};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{endpoint} returned status {status}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("refresh timed out after {0:?}")]
    Timeout(Duration),
}

/// The two reads a refresh needs. Implementations must be safe to call concurrently.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self, query: &WeatherQuery) -> Result<CurrentConditions, FetchError>;

    /// Every entry the provider returned, in provider order.
    async fn forecast(&self, query: &WeatherQuery) -> Result<Vec<ForecastEntry>, FetchError>;
}

/// `WeatherSource` backed by the proxy server over HTTP
#[derive(Debug, Clone)]
pub struct ProxySource {
    http: Client,
    base_url: String,
}

impl ProxySource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &WeatherQuery,
    ) -> Result<T, FetchError> {
        let url = format!("{}/api/weather/{}", self.base_url, endpoint);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("city", query.city.as_str()),
                ("units", query.unit_system.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| FetchError::Decode { endpoint, source })
    }
}

#[async_trait]
impl WeatherSource for ProxySource {
    async fn current(&self, query: &WeatherQuery) -> Result<CurrentConditions, FetchError> {
        let raw: ProviderCurrent = self.get("current", query).await?;
        Ok(raw.into())
    }

    async fn forecast(&self, query: &WeatherQuery) -> Result<Vec<ForecastEntry>, FetchError> {
        let raw: ProviderForecast = self.get("forecast", query).await?;
        Ok(raw.into_entries())
    }
}
