/// Business logic services layer
use crate::clients::{OpenWeatherClient, UpstreamResponse};
use crate::domain::{UnitSystem, WeatherParams};
use crate::errors::{ApiError, ApiResult};
use tracing::info;

pub const CITY_REQUIRED: &str = "City is required";
pub const UNITS_INVALID: &str = "Units must be one of: metric, imperial";

/// Validated form of `WeatherParams`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuery {
    pub city: String,
    pub units: UnitSystem,
}

impl TryFrom<&WeatherParams> for ValidatedQuery {
    type Error = ApiError;

    fn try_from(params: &WeatherParams) -> Result<Self, Self::Error> {
        let city = params
            .city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ApiError::InvalidInput(CITY_REQUIRED.to_string()))?;

        let units = match params.units.as_deref() {
            None => UnitSystem::default(),
            Some(raw) => raw
                .parse()
                .map_err(|_| ApiError::InvalidInput(UNITS_INVALID.to_string()))?,
        };

        Ok(Self {
            city: city.to_string(),
            units,
        })
    }
}

/// Forwards validated lookups to the provider
pub struct WeatherService {
    client: OpenWeatherClient,
}

impl WeatherService {
    pub fn new(client: OpenWeatherClient) -> Self {
        Self { client }
    }

    pub async fn current(&self, params: &WeatherParams) -> ApiResult<UpstreamResponse> {
        let query = ValidatedQuery::try_from(params)?;
        info!("current weather for {:?} ({})", query.city, query.units);
        self.client.fetch_current(&query.city, query.units).await
    }

    pub async fn forecast(&self, params: &WeatherParams) -> ApiResult<UpstreamResponse> {
        let query = ValidatedQuery::try_from(params)?;
        info!("forecast for {:?} ({})", query.city, query.units);
        self.client.fetch_forecast(&query.city, query.units).await
    }
}
