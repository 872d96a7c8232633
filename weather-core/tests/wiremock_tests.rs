//! End-to-end lookups through the OpenWeather client against a mock server.

use weather_core::{Config, WeatherApp, provider_from_config};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const KEY: &str = "TEST_KEY";

fn app_for(base_url: &str) -> WeatherApp {
    let mut config = Config { base_url: base_url.to_string(), ..Config::default() };
    config.set_api_key(KEY.to_string());

    let provider = provider_from_config(&config).expect("provider should build");
    WeatherApp::new(provider, &config)
}

fn paris_body() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 2.3488, "lat": 48.8534 },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "main": { "temp": 18.4, "feels_like": 17.9, "humidity": 60, "pressure": 1016 },
        "wind": { "speed": 3.1, "deg": 250 },
        "sys": { "country": "FR", "sunrise": 1_700_000_000, "sunset": 1_700_030_000 },
        "name": "Paris",
        "cod": 200
    })
}

#[tokio::test]
async fn paris_lookup_populates_card() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Paris"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_body()))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server.uri());
    app.fetch_weather("  Paris ").await;

    let state = app.snapshot();
    let weather = state.weather.expect("weather should be present");
    assert_eq!(weather.city.as_deref(), Some("Paris"));
    assert_eq!(weather.country.as_deref(), Some("FR"));
    assert_eq!(weather.display_temperature(), Some(18));
    assert_eq!(weather.temperature_c, Some(18.4));
    assert_eq!(weather.symbol(), "☀");
    assert_eq!(weather.humidity_pct, Some(60.0));
    assert_eq!(weather.wind_speed_mps, Some(3.1));
    assert!(state.error.is_empty());
    assert!(!state.loading);
    assert!(state.suggestions.is_empty());
    assert!(state.animation.is_running());
}

#[tokio::test]
async fn mistyped_optional_fields_still_show_card() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cod": 200,
            "name": "Paris",
            "main": { "temp": 18.4, "humidity": 60.5 },
            "wind": { "speed": "3" }
        })))
        .mount(&server)
        .await;

    let app = app_for(&server.uri());
    app.fetch_weather("Paris").await;

    let state = app.snapshot();
    assert!(state.error.is_empty(), "unexpected error {:?}", state.error);
    let weather = state.weather.expect("weather should be present");
    assert_eq!(weather.humidity_pct, Some(60.5));
    assert_eq!(weather.wind_speed_mps, None);
    assert_eq!(weather.wind_line(), "🌬 Wind:  m/s");
}

#[tokio::test]
async fn not_found_body_is_read_despite_http_404() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let app = app_for(&server.uri());
    app.fetch_weather("Nowhereland").await;

    let state = app.snapshot();
    assert!(state.weather.is_none());
    assert_eq!(state.error, "city not found");
    assert!(!state.loading);
}

#[tokio::test]
async fn logical_failure_without_message_uses_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "cod": "400" })))
        .mount(&server)
        .await;

    let app = app_for(&server.uri());
    app.fetch_weather("??").await;

    assert_eq!(app.snapshot().error, "City not found");
}

#[tokio::test]
async fn malformed_body_is_a_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
        .mount(&server)
        .await;

    let app = app_for(&server.uri());
    app.fetch_weather("Paris").await;

    let state = app.snapshot();
    assert!(state.weather.is_none());
    assert_eq!(state.error, "Network error");
    assert!(!state.loading);
}

#[tokio::test]
async fn unreachable_service_is_a_network_error() {
    // Nothing listens on port 1.
    let app = app_for("http://127.0.0.1:1");
    app.fetch_weather("Paris").await;

    let state = app.snapshot();
    assert!(state.weather.is_none());
    assert_eq!(state.error, "Network error");
    assert!(!state.loading);
}

#[tokio::test]
async fn suggestions_request_escapes_query_and_limits_to_five() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "São Paulo"))
        .and(query_param("limit", "5"))
        .and(query_param("appid", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "São Paulo", "lat": -23.55, "lon": -46.63, "country": "BR", "state": "São Paulo" },
            { "name": "São Paulo de Olivença", "lat": -3.37, "lon": -68.87, "country": "BR" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let app = app_for(&server.uri());
    app.fetch_suggestions(" São Paulo ").await;

    let state = app.snapshot();
    assert_eq!(state.suggestions.len(), 2);
    assert_eq!(state.suggestions[0].label(), "📍 São Paulo, São Paulo, BR");
    assert_eq!(state.suggestions[1].label(), "📍 São Paulo de Olivença, BR");
    assert!(!state.suggestions_loading);

    let requests = server.received_requests().await.expect("recording enabled");
    let raw_query = requests[0].url.query().unwrap_or_default().to_string();
    assert!(!raw_query.contains(' '), "query must be escaped: {raw_query}");
}

#[tokio::test]
async fn empty_query_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let app = app_for(&server.uri());
    app.fetch_suggestions("   ").await;

    assert!(app.snapshot().suggestions.is_empty());
}

#[tokio::test]
async fn suggestion_failures_are_swallowed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Lon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "London", "country": "GB" }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Lond"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "cod": 401, "message": "Invalid API key" })),
        )
        .mount(&server)
        .await;

    let app = app_for(&server.uri());
    app.fetch_suggestions("Lon").await;
    assert_eq!(app.snapshot().suggestions.len(), 1);

    app.fetch_suggestions("Lond").await;

    let state = app.snapshot();
    assert!(state.suggestions.is_empty());
    assert!(state.error.is_empty());
    assert!(!state.suggestions_loading);
}
