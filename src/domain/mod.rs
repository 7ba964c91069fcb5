/// Domain models for the application
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_CITY: &str = "Nairobi";

/// Number of forecast entries kept for display.
pub const FORECAST_WINDOW: usize = 3;

/// Unit system forwarded to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "C",
            UnitSystem::Imperial => "F",
        }
    }

    /// Provider reports metric wind in metres per second.
    pub fn wind_speed_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "m/s",
            UnitSystem::Imperial => "mph",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown unit system '{0}'")]
pub struct UnknownUnitSystem(pub String);

impl FromStr for UnitSystem {
    type Err = UnknownUnitSystem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(UnknownUnitSystem(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// City plus unit system, the input of every lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
    pub unit_system: UnitSystem,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>, unit_system: UnitSystem) -> Self {
        Self {
            city: city.into(),
            unit_system,
        }
    }

    pub fn has_city(&self) -> bool {
        !self.city.trim().is_empty()
    }
}

impl Default for WeatherQuery {
    fn default() -> Self {
        Self::new(DEFAULT_CITY, UnitSystem::Metric)
    }
}

/// Raw query string of both proxy endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherParams {
    pub city: Option<String>,
    pub units: Option<String>,
}

/// Snapshot of current conditions; every field may be missing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentConditions {
    pub location_name: Option<String>,
    pub temperature: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub humidity_percent: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_degrees: Option<f64>,
    pub condition_text: Option<String>,
    pub condition_main: Option<String>,
    pub icon_code: Option<String>,
    pub observed_at_epoch_seconds: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastEntry {
    pub at_epoch_seconds: Option<i64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub icon_code: Option<String>,
    pub condition_main: Option<String>,
}

// Provider wire format. Only the members the view reads are declared; the
// proxy itself never deserializes into these.

#[derive(Debug, Default, Deserialize)]
pub struct ProviderMain {
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderWeather {
    pub description: Option<String>,
    pub icon: Option<String>,
    pub main: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderWind {
    pub speed: Option<f64>,
    pub deg: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderCurrent {
    pub name: Option<String>,
    pub main: Option<ProviderMain>,
    pub weather: Option<Vec<ProviderWeather>>,
    pub wind: Option<ProviderWind>,
    pub dt: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderForecastEntry {
    pub dt: Option<i64>,
    pub main: Option<ProviderMain>,
    pub weather: Option<Vec<ProviderWeather>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProviderForecast {
    pub list: Option<Vec<ProviderForecastEntry>>,
}

impl From<ProviderCurrent> for CurrentConditions {
    fn from(raw: ProviderCurrent) -> Self {
        let main = raw.main.unwrap_or_default();
        let wind = raw.wind.unwrap_or_default();
        let first = raw.weather.and_then(|w| w.into_iter().next()).unwrap_or_default();

        Self {
            location_name: raw.name,
            temperature: main.temp,
            temp_min: main.temp_min,
            temp_max: main.temp_max,
            humidity_percent: main.humidity,
            wind_speed: wind.speed,
            wind_degrees: wind.deg,
            condition_text: first.description,
            condition_main: first.main,
            icon_code: first.icon,
            observed_at_epoch_seconds: raw.dt,
        }
    }
}

impl From<ProviderForecastEntry> for ForecastEntry {
    fn from(raw: ProviderForecastEntry) -> Self {
        let main = raw.main.unwrap_or_default();
        let first = raw.weather.and_then(|w| w.into_iter().next()).unwrap_or_default();

        Self {
            at_epoch_seconds: raw.dt,
            temp_min: main.temp_min,
            temp_max: main.temp_max,
            icon_code: first.icon,
            condition_main: first.main,
        }
    }
}

impl ProviderForecast {
    pub fn into_entries(self) -> Vec<ForecastEntry> {
        self.list
            .unwrap_or_default()
            .into_iter()
            .map(ForecastEntry::from)
            .collect()
    }
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}
