//! Core library for the AeroWeather city lookup.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client (current weather + city geocoding)
//! - Shared domain models (suggestions, weather results, request state)
//! - The screen controller with debounced suggestions and the card animation timeline
//!
//! It is used by `weather-cli`, but can also drive other front ends.

pub mod animation;
pub mod app;
pub mod config;
pub mod debounce;
pub mod model;
pub mod provider;

pub use app::{CITY_NOT_FOUND, NETWORK_ERROR, ViewState, WeatherApp};
pub use config::{Config, StalePolicy};
pub use model::{RequestState, Suggestion, WeatherLookup, WeatherResult, condition_symbol};
pub use provider::{ServiceError, WeatherProvider, provider_from_config};
