use serde::{Deserialize, Serialize};

/// A geocoding candidate for a typed query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: String,
}

impl Suggestion {
    /// `📍 Springfield, Illinois, US`; the state segment is dropped when absent.
    pub fn label(&self) -> String {
        match self.state.as_deref().filter(|s| !s.is_empty()) {
            Some(state) => format!("📍 {}, {}, {}", self.name, state, self.country),
            None => format!("📍 {}, {}", self.name, self.country),
        }
    }
}

/// Current conditions for one city. Every field may be missing in the
/// service payload and renders as blank.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherResult {
    pub city: Option<String>,
    pub country: Option<String>,
    pub temperature_c: Option<f64>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub humidity_pct: Option<f64>,
    pub wind_speed_mps: Option<f64>,
}

impl WeatherResult {
    /// Temperature rounded half-up for display; the stored value keeps full precision.
    pub fn display_temperature(&self) -> Option<i64> {
        self.temperature_c.map(|t| (t + 0.5).floor() as i64)
    }

    pub fn symbol(&self) -> &'static str {
        condition_symbol(self.condition.as_deref())
    }

    pub fn location_line(&self) -> String {
        format!(
            "📍 {}, {}",
            self.city.as_deref().unwrap_or_default(),
            self.country.as_deref().unwrap_or_default()
        )
    }

    pub fn temperature_line(&self) -> String {
        match self.display_temperature() {
            Some(t) => format!("{t}°C"),
            None => "°C".to_string(),
        }
    }

    pub fn description_line(&self) -> String {
        format!("{} {}", self.description.as_deref().unwrap_or_default(), self.symbol())
    }

    pub fn humidity_line(&self) -> String {
        format!("💧 Humidity: {}%", blank_or(self.humidity_pct))
    }

    pub fn wind_line(&self) -> String {
        format!("🌬 Wind: {} m/s", blank_or(self.wind_speed_mps))
    }
}

fn blank_or<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub const DEFAULT_SYMBOL: &str = "🌤";

/// Decorative symbol for an OpenWeather condition group.
pub fn condition_symbol(category: Option<&str>) -> &'static str {
    match category {
        Some("Clouds") => "☁",
        Some("Clear") => "☀",
        Some("Rain") => "🌧",
        Some("Snow") => "❄",
        Some("Thunderstorm") => "⛈",
        _ => DEFAULT_SYMBOL,
    }
}

/// Outcome of a weather lookup the service answered.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherLookup {
    Found(WeatherResult),
    /// The body carried a non-success `cod`; `message` is the service text, if any.
    NotFound { message: Option<String> },
}

/// Per-flow request state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestState<T> {
    #[default]
    Idle,
    Loading,
    Succeeded(T),
    Failed(String),
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }
}
