//! Plain-text rendering of the view state.

use std::fmt::Write;

use tokio::time::Instant;
use weather_core::{Suggestion, ViewState, WeatherResult};

pub const TITLE: &str = "🌤 AeroWeather";

pub fn screen(state: &ViewState, now: Instant) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{TITLE}");

    if !state.query.is_empty() {
        let _ = writeln!(out, "🔍 {}", state.query);
    }
    if state.suggestions_loading {
        let _ = writeln!(out, "  … looking up cities");
    }
    out.push_str(&suggestions(&state.suggestions));

    if state.loading {
        let _ = writeln!(out, "… loading weather");
    }
    if !state.error.is_empty() {
        let _ = writeln!(out, "⚠ {}", state.error);
    }
    if let Some(weather) = &state.weather {
        // Terminal frames cannot scale; mark the temperature near its pulse peak.
        let pulse = state.animated_values(now).temp_pulse;
        out.push_str(&card(weather, pulse > 1.05));
    }

    out
}

/// Numbered suggestion list, one per line.
pub fn suggestions(list: &[Suggestion]) -> String {
    list.iter()
        .enumerate()
        .fold(String::new(), |mut out, (i, s)| {
            let _ = writeln!(out, "  {}. {}", i + 1, s.label());
            out
        })
}

pub fn card(weather: &WeatherResult, emphasize_temp: bool) -> String {
    let temp = weather.temperature_line();
    let temp = if emphasize_temp { format!("» {temp} «") } else { temp };

    let lines = [
        weather.location_line(),
        temp,
        weather.description_line(),
        weather.humidity_line(),
        weather.wind_line(),
    ];

    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let border = "─".repeat(width + 2);

    let mut out = format!("┌{border}┐\n");
    for line in &lines {
        let pad = width - line.chars().count();
        let _ = writeln!(out, "│ {line}{} │", " ".repeat(pad));
    }
    let _ = writeln!(out, "└{border}┘");
    out
}
