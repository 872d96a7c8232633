use anyhow::Context;
use clap::{Parser, Subcommand};
use weather_core::{Config, ViewState, WeatherApp, provider_from_config};

use crate::{render, screen};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "AeroWeather: current weather by city")]
pub struct Cli {
    /// Log HTTP requests and state transitions to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "Paris" or "Springfield, US".
        city: String,
    },

    /// List matching city names.
    Suggest {
        /// Partial city name.
        query: String,
    },

    /// Type to get suggestions, submit to look up weather (default).
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(),
            Command::Show { city } => {
                let app = build_app()?;
                app.fetch_weather(&city).await;
                println!("{}", show_outcome(&app.snapshot())?);
                Ok(())
            }
            Command::Suggest { query } => {
                let app = build_app()?;
                app.fetch_suggestions(&query).await;
                let state = app.snapshot();
                if state.suggestions.is_empty() {
                    println!("No matching cities.");
                }
                print!("{}", render::suggestions(&state.suggestions));
                Ok(())
            }
            Command::Interactive => screen::run(build_app()?).await,
        }
    }
}

/// The rendered card, or the lookup's error message as a failure.
fn show_outcome(state: &ViewState) -> anyhow::Result<String> {
    if !state.error.is_empty() {
        anyhow::bail!("{}", state.error);
    }
    Ok(render::screen(state, tokio::time::Instant::now()))
}

fn build_app() -> anyhow::Result<WeatherApp> {
    let config = Config::load()?;
    let provider = provider_from_config(&config)?;
    Ok(WeatherApp::new(provider, &config))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    if key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(key);
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}
