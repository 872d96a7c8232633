//! The screen controller: query input, debounced suggestions, weather
//! lookup and the presentation state they feed.
//!
//! All state lives in one [`watch`] channel. Every mutation is a short
//! synchronous closure, so updates are applied one at a time and observers
//! always see a consistent [`ViewState`].

use std::sync::{
    Arc, Weak,
    atomic::{AtomicU64, Ordering},
};

use tokio::{sync::watch, time::Instant};
use tracing::{debug, info, warn};

use crate::{
    Config,
    animation::{AnimatedValues, AnimationEvent, WeatherAnimation, detect_entrance},
    config::StalePolicy,
    debounce::Debouncer,
    model::{RequestState, Suggestion, WeatherLookup, WeatherResult},
    provider::WeatherProvider,
};

/// Shown when the service rejects a city without explaining why.
pub const CITY_NOT_FOUND: &str = "City not found";

/// Shown for any transport or decoding failure of a weather lookup.
pub const NETWORK_ERROR: &str = "Network error";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub query: String,
    /// Whether the text input holds focus (the on-screen keyboard is up).
    pub input_focused: bool,
    pub suggestions: Vec<Suggestion>,
    pub suggestions_loading: bool,
    pub weather: Option<WeatherResult>,
    pub loading: bool,
    /// Empty when there is nothing to show.
    pub error: String,
    pub animation: WeatherAnimation,
}

impl ViewState {
    pub fn weather_request(&self) -> RequestState<&WeatherResult> {
        if self.loading {
            RequestState::Loading
        } else if let Some(weather) = &self.weather {
            RequestState::Succeeded(weather)
        } else if !self.error.is_empty() {
            RequestState::Failed(self.error.clone())
        } else {
            RequestState::Idle
        }
    }

    pub fn suggestions_request(&self) -> RequestState<&[Suggestion]> {
        if self.suggestions_loading {
            RequestState::Loading
        } else if self.suggestions.is_empty() {
            RequestState::Idle
        } else {
            RequestState::Succeeded(&self.suggestions)
        }
    }

    pub fn animated_values(&self, now: Instant) -> AnimatedValues {
        self.animation.sample(now)
    }
}

#[derive(Clone, Debug)]
pub struct WeatherApp {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    provider: Arc<dyn WeatherProvider>,
    state: watch::Sender<ViewState>,
    debouncer: Debouncer,
    stale_policy: StalePolicy,
    suggestion_seq: AtomicU64,
    weather_seq: AtomicU64,
}

impl WeatherApp {
    pub fn new(provider: Arc<dyn WeatherProvider>, config: &Config) -> Self {
        let (state, _) = watch::channel(ViewState::default());

        Self {
            inner: Arc::new(Inner {
                provider,
                state,
                debouncer: Debouncer::new(config.debounce()),
                stale_policy: config.stale_policy,
                suggestion_seq: AtomicU64::new(0),
                weather_seq: AtomicU64::new(0),
            }),
        }
    }

    pub fn snapshot(&self) -> ViewState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that is notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.inner.state.subscribe()
    }

    /// Store the typed text and re-arm the suggestion debounce.
    pub fn on_text_change(&self, text: impl Into<String>) {
        let text = text.into();
        self.update(|s| {
            s.query.clone_from(&text);
            s.input_focused = true;
        });

        let weak = Arc::downgrade(&self.inner);
        self.inner.debouncer.schedule(async move {
            if let Some(app) = upgrade(&weak) {
                app.fetch_suggestions(&text).await;
            }
        });
    }

    /// Look up the current query right away. A pending suggestion fetch is
    /// left armed and may still repopulate the list afterwards.
    pub async fn on_submit(&self) {
        let query = self.inner.state.borrow().query.clone();
        self.fetch_weather(&query).await;
    }

    /// Adopt the suggestion at `index` as the query and look it up.
    /// Returns `false` when there is no such suggestion.
    pub async fn pick_suggestion(&self, index: usize) -> bool {
        let name = self.inner.state.borrow().suggestions.get(index).map(|s| s.name.clone());
        let Some(name) = name else {
            return false;
        };

        self.update(|s| s.query.clone_from(&name));
        self.fetch_weather(&name).await;
        true
    }

    pub async fn fetch_suggestions(&self, query: &str) {
        let query = query.trim();
        let ticket = next_ticket(&self.inner.suggestion_seq);

        if query.is_empty() {
            let drop_in_flight = self.inner.stale_policy == StalePolicy::LastRequestWins;
            self.update(|s| {
                s.suggestions.clear();
                if drop_in_flight {
                    s.suggestions_loading = false;
                }
            });
            return;
        }

        self.update(|s| s.suggestions_loading = true);
        let result = self.inner.provider.suggest_cities(query).await;

        if !self.is_latest(&self.inner.suggestion_seq, ticket) {
            debug!(query, "Dropping stale suggestions");
            return;
        }

        self.update(|s| {
            match result {
                Ok(list) => {
                    debug!(query, count = list.len(), "Suggestions loaded");
                    s.suggestions = list;
                }
                Err(err) => {
                    debug!(query, error = %err, "Suggestion lookup failed");
                    s.suggestions.clear();
                }
            }
            s.suggestions_loading = false;
        });
    }

    pub async fn fetch_weather(&self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            return;
        }
        let ticket = next_ticket(&self.inner.weather_seq);

        self.update(|s| {
            s.input_focused = false;
            s.loading = true;
            s.error.clear();
            s.suggestions.clear();
        });

        let outcome = self.inner.provider.current_weather(city).await;

        if !self.is_latest(&self.inner.weather_seq, ticket) {
            debug!(city, "Dropping stale weather");
            return;
        }

        let now = Instant::now();
        self.update(|s| {
            let previous = s.weather.take();

            match outcome {
                Ok(WeatherLookup::Found(weather)) => {
                    info!(city, "Weather loaded");
                    s.weather = Some(weather);
                    s.error.clear();
                }
                Ok(WeatherLookup::NotFound { message }) => {
                    info!(city, message = message.as_deref(), "City rejected by service");
                    s.error = message.unwrap_or_else(|| CITY_NOT_FOUND.to_string());
                }
                Err(err) => {
                    warn!(city, error = %err, "Weather lookup failed");
                    s.error = NETWORK_ERROR.to_string();
                }
            }

            match detect_entrance(previous.as_ref(), s.weather.as_ref()) {
                Some(AnimationEvent::Started) => s.animation.start(now),
                None if s.weather.is_none() => s.animation.reset(),
                None => {}
            }

            s.loading = false;
        });
    }

    /// Clear the card, the error, the query and the suggestions, and put
    /// the animation back at rest so the next result replays it.
    pub fn reset(&self) {
        self.update(|s| {
            s.weather = None;
            s.error.clear();
            s.query.clear();
            s.suggestions.clear();
            s.animation.reset();
        });
    }

    fn update(&self, f: impl FnOnce(&mut ViewState)) {
        self.inner.state.send_modify(f);
    }

    fn is_latest(&self, seq: &AtomicU64, ticket: u64) -> bool {
        match self.inner.stale_policy {
            StalePolicy::LastResponseWins => true,
            StalePolicy::LastRequestWins => seq.load(Ordering::SeqCst) == ticket,
        }
    }
}

fn next_ticket(seq: &AtomicU64) -> u64 {
    seq.fetch_add(1, Ordering::SeqCst) + 1
}

fn upgrade(inner: &Weak<Inner>) -> Option<WeatherApp> {
    inner.upgrade().map(|inner| WeatherApp { inner })
}
