//! Integration tests for the OpenWeather fetcher using wiremock.

use forecast_core::{
    Config, FetchOutcome, ForecastError, ForecastProvider, ForecastQuery, OpenWeatherProvider,
    TransportError, UnitSystem,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn sample_forecast_response() -> serde_json::Value {
    serde_json::json!({
        "cod": "200",
        "cnt": 3,
        "city": { "id": 2988507, "name": "Paris", "country": "FR", "timezone": 7200 },
        "list": [
            {
                "dt": 1717228800,
                "main": { "temp": 17.6, "feels_like": 17.1, "humidity": 71 },
                "weather": [{ "id": 500, "main": "Rain", "description": "light rain" }],
                "dt_txt": "2024-06-01 08:00:00"
            },
            {
                "dt": 1717250400,
                "main": { "temp": 23.2, "feels_like": 22.9, "humidity": 48 },
                "weather": [{ "id": 800, "main": "Clear", "description": "clear sky" }],
                "dt_txt": "2024-06-01 14:00:00"
            },
            {
                "dt": 1717315200,
                "main": { "temp": 15.4, "feels_like": 15.0, "humidity": 80 },
                "weather": [{ "id": 804, "main": "Clouds", "description": "overcast clouds" }],
                "dt_txt": "2024-06-02 08:00:00"
            }
        ]
    })
}

fn provider_for(server: &MockServer, api_key: Option<&str>) -> OpenWeatherProvider {
    let mut config = Config::default().with_base_url(format!("{}/data/2.5/forecast", server.uri()));
    if let Some(key) = api_key {
        config = config.with_api_key(key);
    }
    OpenWeatherProvider::new(config).expect("client should build")
}

#[tokio::test]
async fn fetch_returns_series_on_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "Paris,FR"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, Some("TEST_KEY"));
    let outcome = provider.fetch(&ForecastQuery::new("Paris", "FR")).await.unwrap();

    let FetchOutcome::Available(series) = outcome else {
        panic!("expected available forecast, got {outcome:?}");
    };
    assert_eq!(series.location_name, "Paris");
    assert_eq!(series.country_code, "FR");
    assert_eq!(series.entries.len(), 3);
    assert_eq!(series.entries[0].description, "light rain");
    assert_eq!(series.entries[2].timestamp.timestamp(), 1_717_315_200);
}

#[tokio::test]
async fn fetch_sends_requested_unit_system() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, Some("TEST_KEY"));
    let query = ForecastQuery::new("Paris", "FR").with_units(UnitSystem::Imperial);
    let outcome = provider.fetch(&query).await.unwrap();

    assert!(matches!(outcome, FetchOutcome::Available(_)));
}

#[tokio::test]
async fn missing_api_key_fails_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response()))
        .expect(0)
        .mount(&server)
        .await;

    let provider = provider_for(&server, None);
    let err = provider.fetch(&ForecastQuery::new("Paris", "FR")).await.unwrap_err();

    assert!(matches!(err, ForecastError::MissingApiKey));
}

#[tokio::test]
async fn http_error_status_is_reported_as_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(r#"{"cod":"404","message":"city not found"}"#),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server, Some("TEST_KEY"));
    let outcome = provider.fetch(&ForecastQuery::new("Atlantis", "XX")).await.unwrap();

    match outcome {
        FetchOutcome::Unavailable(TransportError::Status { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("city not found"));
        }
        other => panic!("expected unavailable with status, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_reported_as_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Some("TEST_KEY"));
    let outcome = provider.fetch(&ForecastQuery::new("Paris", "FR")).await.unwrap();

    assert!(matches!(outcome, FetchOutcome::Unavailable(TransportError::Decode(_))));
}

#[tokio::test]
async fn unreachable_server_is_reported_as_unavailable() {
    let server = MockServer::start().await;
    let provider = provider_for(&server, Some("TEST_KEY"));
    drop(server);

    let outcome = provider.fetch(&ForecastQuery::new("Paris", "FR")).await.unwrap();

    assert!(matches!(outcome, FetchOutcome::Unavailable(TransportError::Send(_))));
}
