use crate::{Config, Suggestion, WeatherLookup, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};
use thiserror::Error;

pub mod openweather;

/// Failures below the service's own status reporting. Callers collapse every
/// variant into one user-facing message.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The remote weather + geocoding service.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for `city` (already trimmed, not yet escaped).
    async fn current_weather(&self, city: &str) -> Result<WeatherLookup, ServiceError>;

    /// Up to the configured number of city candidates for `query`.
    async fn suggest_cities(&self, query: &str) -> Result<Vec<Suggestion>, ServiceError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let provider = OpenWeatherProvider::from_config(config)?;
    Ok(Arc::new(provider))
}
