/// External API clients module
use crate::config::ProviderConfig;
use crate::domain::UnitSystem;
use crate::errors::{ApiError, ApiResult};
use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Certificate, Client};
use tracing::{debug, warn};

/// Reports requested from the forecast resource: 3 days at 8 reports per day.
pub const FORECAST_COUNT: u32 = 24;

/// HTTP client wrapper with common configuration
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &ProviderConfig) -> ApiResult<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("weather-app/", env!("CARGO_PKG_VERSION")));

        if let Some(path) = &config.ca_bundle_path {
            let pem = std::fs::read(path).map_err(|e| {
                ApiError::Internal(format!("cannot read CA bundle {}: {}", path.display(), e))
            })?;
            for cert in Certificate::from_pem_bundle(&pem)? {
                builder = builder.add_root_certificate(cert);
            }
            debug!("Trusting CA bundle at {}", path.display());
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn get_client(&self) -> &Client {
        &self.client
    }
}

/// Provider reply relayed as-is: status, content type and raw body
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// OpenWeatherMap client
pub struct OpenWeatherClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(config: &ProviderConfig) -> ApiResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(config)?,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Current conditions for a city
    pub async fn fetch_current(&self, city: &str, units: UnitSystem) -> ApiResult<UpstreamResponse> {
        self.get(
            "weather",
            &[
                ("q", city.to_string()),
                ("units", units.as_str().to_string()),
            ],
        )
        .await
    }

    /// 3-hourly forecast for a city, fixed to `FORECAST_COUNT` reports
    pub async fn fetch_forecast(&self, city: &str, units: UnitSystem) -> ApiResult<UpstreamResponse> {
        self.get(
            "forecast",
            &[
                ("q", city.to_string()),
                ("units", units.as_str().to_string()),
                ("cnt", FORECAST_COUNT.to_string()),
            ],
        )
        .await
    }

    async fn get(&self, resource: &str, params: &[(&str, String)]) -> ApiResult<UpstreamResponse> {
        let url = format!("{}/{}", self.base_url, resource);

        let resp = self
            .http_client
            .get_client()
            .get(&url)
            .query(params)
            .query(&[("appid", &self.api_key)])
            .send()
            .await?;

        let status =
            StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok());
        let body = resp.bytes().await?;

        if !status.is_success() {
            warn!("{} returned {}", resource, status);
        }

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
