/// Application configuration module
use anyhow::{anyhow, Context};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Provider credential read by both proxy endpoints.
pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";
/// Second credential name the old deployment read for the current-weather route.
pub const LEGACY_API_KEY_VAR: &str = "WEATHER_API_KEY";

pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub provider: ProviderConfig,
}

/// Everything the outbound provider client needs, handed over at construction.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub ca_bundle_path: Option<PathBuf>,
    pub timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = resolve_api_key(&lookup)?;

        let base_url = lookup("OPENWEATHER_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PROVIDER_BASE_URL.to_string());

        let ca_bundle_path = lookup("CA_BUNDLE_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let timeout_secs = lookup_u64(&lookup, "PROVIDER_TIMEOUT_SECONDS", 10)?;

        Ok(Self {
            bind_addr,
            provider: ProviderConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key,
                ca_bundle_path,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn resolve_api_key<F>(lookup: &F) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let canonical = lookup(API_KEY_VAR).filter(|s| !s.is_empty());
    let legacy = lookup(LEGACY_API_KEY_VAR).filter(|s| !s.is_empty());

    match (canonical, legacy) {
        (Some(key), Some(_)) => {
            warn!(
                "{} is set but ignored; both endpoints use {}",
                LEGACY_API_KEY_VAR, API_KEY_VAR
            );
            Ok(key)
        }
        (Some(key), None) => Ok(key),
        (None, Some(_)) => Err(anyhow!(
            "{} is no longer read; move the provider key to {}",
            LEGACY_API_KEY_VAR,
            API_KEY_VAR
        )),
        (None, None) => Err(anyhow!("{} is required", API_KEY_VAR)),
    }
}

fn lookup_u64<F>(lookup: &F, key: &str, default: u64) -> anyhow::Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a whole number of seconds, got {raw:?}")),
        None => Ok(default),
    }
}
