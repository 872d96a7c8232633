//! Line-based lookup screen.
//!
//! Each typed line replaces the query (as if typed into the search box),
//! commands start with `/`. The screen redraws whenever the controller
//! publishes a change other than the query text itself.

use anyhow::Context;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    time::Instant,
};
use weather_core::{ViewState, WeatherApp};

use crate::render;

const HELP: &str = "\
Type a city name to get suggestions.
  <enter> or /go   look up weather for the current text
  /pick N          look up suggestion N
  /clear           clear everything
  /quit            exit";

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Text(String),
    Submit,
    Pick(usize),
    Clear,
    Help,
    Quit,
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Input::Submit;
        }
        let Some(command) = trimmed.strip_prefix('/') else {
            return Input::Text(line.trim_end_matches(['\r', '\n']).to_string());
        };

        let mut parts = command.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("go"), None) => Input::Submit,
            (Some("clear"), None) => Input::Clear,
            (Some("help"), None) => Input::Help,
            (Some("quit" | "q"), None) => Input::Quit,
            (Some("pick"), Some(n)) => match n.parse::<usize>() {
                Ok(n) if n >= 1 => Input::Pick(n - 1),
                _ => Input::Unknown(trimmed.to_string()),
            },
            _ => Input::Unknown(trimmed.to_string()),
        }
    }
}

pub async fn run(app: WeatherApp) -> anyhow::Result<()> {
    println!("{}\n{HELP}", render::TITLE);

    let mut rx = app.subscribe();
    let mut last_drawn = rx.borrow_and_update().clone();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };

                match Input::parse(&line) {
                    Input::Text(text) => app.on_text_change(text),
                    Input::Submit => {
                        let app = app.clone();
                        tokio::spawn(async move { app.on_submit().await });
                    }
                    Input::Pick(index) => {
                        if index >= app.snapshot().suggestions.len() {
                            println!("No suggestion #{}", index + 1);
                            continue;
                        }
                        let app = app.clone();
                        tokio::spawn(async move { app.pick_suggestion(index).await });
                    }
                    Input::Clear => app.reset(),
                    Input::Help => println!("{HELP}"),
                    Input::Quit => break,
                    Input::Unknown(cmd) => println!("Unknown command {cmd}; try /help"),
                }
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                if needs_redraw(&last_drawn, &state) {
                    println!("{}", render::screen(&state, Instant::now()));
                }
                last_drawn = state;
            }
        }
    }

    Ok(())
}

/// The user already sees what they typed, so query-only changes are not redrawn.
fn needs_redraw(previous: &ViewState, next: &ViewState) -> bool {
    previous.suggestions != next.suggestions
        || previous.suggestions_loading != next.suggestions_loading
        || previous.weather != next.weather
        || previous.loading != next.loading
        || previous.error != next.error
        || previous.animation != next.animation
}
