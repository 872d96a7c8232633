use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use tracing::debug;

use crate::{
    Config,
    model::{Suggestion, WeatherLookup, WeatherResult},
};

use super::{ServiceError, WeatherProvider};

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    suggestion_limit: u8,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?.to_owned();

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            suggestion_limit: config.suggestion_limit,
            http,
        })
    }

    async fn get_body(&self, url: &str, query: &[(&str, &str)]) -> Result<String, ServiceError> {
        let res = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        // The HTTP status line is not consulted; the body carries the outcome.
        debug!(status = %res.status(), url, "OpenWeather responded");
        Ok(res.text().await?)
    }
}

/// Reads an optional field, treating a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwMain {
    #[serde(deserialize_with = "lenient")]
    temp: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    humidity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwWeather {
    #[serde(deserialize_with = "lenient")]
    main: Option<String>,
    #[serde(deserialize_with = "lenient")]
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwWind {
    #[serde(deserialize_with = "lenient")]
    speed: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwSys {
    #[serde(deserialize_with = "lenient")]
    country: Option<String>,
}

/// Only `cod` decides the outcome; every display field is optional and
/// tolerates a mistyped value.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwCurrentResponse {
    /// Numeric `200` on success; failures usually arrive as strings like `"404"`.
    cod: serde_json::Value,
    #[serde(deserialize_with = "lenient")]
    name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    sys: Option<OwSys>,
    #[serde(deserialize_with = "lenient")]
    main: Option<OwMain>,
    #[serde(deserialize_with = "lenient")]
    wind: Option<OwWind>,
    #[serde(deserialize_with = "lenient")]
    weather: Option<Vec<OwWeather>>,
    message: Option<serde_json::Value>,
}

impl OwCurrentResponse {
    fn is_success(&self) -> bool {
        self.cod.as_f64() == Some(200.0)
    }

    fn message(&self) -> Option<String> {
        match self.message.as_ref()? {
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null | serde_json::Value::Bool(false) => None,
            other => Some(other.to_string()),
        }
    }

    fn into_lookup(self) -> WeatherLookup {
        if !self.is_success() {
            return WeatherLookup::NotFound { message: self.message() };
        }

        let first = self.weather.and_then(|w| w.into_iter().next()).unwrap_or_default();
        let main = self.main.unwrap_or_default();

        WeatherLookup::Found(WeatherResult {
            city: self.name,
            country: self.sys.and_then(|s| s.country),
            temperature_c: main.temp,
            condition: first.main,
            description: first.description,
            humidity_pct: main.humidity,
            wind_speed_mps: self.wind.and_then(|w| w.speed),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherLookup, ServiceError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        debug!(city, "Fetching current weather");

        let body = self.get_body(&url, &[("q", city), ("units", "metric")]).await?;
        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;

        Ok(parsed.into_lookup())
    }

    async fn suggest_cities(&self, query: &str) -> Result<Vec<Suggestion>, ServiceError> {
        let url = format!("{}/geo/1.0/direct", self.base_url);
        let limit = self.suggestion_limit.to_string();
        debug!(query, "Fetching city suggestions");

        let body = self.get_body(&url, &[("q", query), ("limit", limit.as_str())]).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
