//! Integration tests for the dashboard API client
//!
//! These tests use wiremock to stand in for the backend and exercise the full
//! request/response cycle of every endpoint, including error envelopes and the
//! device-positioning fallback.

use api_client::location::{DevicePosition, PositionError, PositionOptions, PositionProvider};
use api_client::weather::fetch_local_weather;
use api_client::{
    fetch_astro, fetch_star_chart, fetch_weather, ApiClient, ApiClientConfig, Coordinates, Error,
    LocationResolver, LocationResult, LocationSource,
};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Fixtures

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiClientConfig::new(server.uri())).unwrap()
}

fn london_record() -> serde_json::Value {
    json!({
        "status": "success",
        "country": "United Kingdom",
        "city": "London",
        "zip": "EC1A",
        "latitude": 51.5,
        "longitude": -0.12,
        "timezone": "Europe/London"
    })
}

/// Device that never answers within any sensible timeout
struct StalledDevice;

#[async_trait]
impl PositionProvider for StalledDevice {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<DevicePosition, PositionError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(DevicePosition {
            latitude: 0.0,
            longitude: 0.0,
        })
    }
}

// =============================================================================
// Location
// =============================================================================

#[tokio::test]
async fn test_full_location_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_record()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = LocationResolver::new(client_for(&mock_server));
    let result = resolver.resolve(false).await.unwrap();

    match result {
        LocationResult::Full(location) => {
            assert_eq!(location.city.as_deref(), Some("London"));
            assert_eq!(location.timezone.as_deref(), Some("Europe/London"));
            assert_eq!(location.extra.get("zip"), Some(&json!("EC1A")));
        }
        other => panic!("expected full record, got {:?}", other),
    }
}

#[tokio::test]
async fn test_device_timeout_falls_back_to_network_address() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_record()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = LocationResolver::new(client_for(&mock_server))
        .with_device(Arc::new(StalledDevice))
        .with_options(PositionOptions::default().with_timeout(Duration::from_millis(50)));

    let coords = resolver.coordinates().await.unwrap();

    assert_eq!(coords, Coordinates::new(51.5, -0.12, LocationSource::NetworkAddress));
}

#[tokio::test]
async fn test_missing_device_uses_network_address() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_record()))
        .mount(&mock_server)
        .await;

    let resolver = LocationResolver::new(client_for(&mock_server));
    let coords = resolver.coordinates().await.unwrap();

    assert_eq!(coords.source, LocationSource::NetworkAddress);
}

#[tokio::test]
async fn test_location_error_envelope_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/location"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "geo lookup failed"})),
        )
        .mount(&mock_server)
        .await;

    let resolver = LocationResolver::new(client_for(&mock_server));
    let err = resolver.resolve(false).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Network error while fetching location: Network response was not ok: geo lookup failed"
    );
}

// =============================================================================
// Weather
// =============================================================================

#[tokio::test]
async fn test_weather_at_coordinates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/weather/51.5/-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "London",
            "main": {"temp": 14.2, "feels_like": 13.1, "pressure": 1015}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let coords = Coordinates::new(51.5, -0.12, LocationSource::Device);
    let reading = fetch_weather(&client, &coords).await.unwrap();

    assert_eq!(reading.name, "London");
    assert_eq!(reading.main.temp, 14.2);
    assert_eq!(reading.main.extra.get("pressure"), Some(&json!(1015)));
}

#[tokio::test]
async fn test_local_weather_chains_location() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_record()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/weather/51.5/-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "London",
            "main": {"temp": 9.0, "feels_like": 7.5}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let resolver = LocationResolver::new(client.clone());
    let reading = fetch_local_weather(&client, &resolver).await.unwrap();

    assert_eq!(reading.main.feels_like, 7.5);
}

#[tokio::test]
async fn test_weather_error_without_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/weather/1/2"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let coords = Coordinates::new(1.0, 2.0, LocationSource::Device);
    let err = fetch_weather(&client, &coords).await.unwrap_err();

    assert_eq!(
        err,
        Error::Api {
            status: 502,
            message: "HTTP 502".to_string()
        }
    );
}

#[tokio::test]
async fn test_malformed_weather_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/weather/1/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "nowhere"})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let coords = Coordinates::new(1.0, 2.0, LocationSource::Device);
    let err = fetch_weather(&client, &coords).await.unwrap_err();

    assert!(matches!(err, Error::Malformed(_)));
}

// =============================================================================
// Astro
// =============================================================================

#[tokio::test]
async fn test_astro_strips_sol_and_decorates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/astro/zenith/51.5/-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"ra": 7.58, "dec": 51.5},
            "data": [
                {"name": "Sol", "type": {"name": "Star"}, "position": {}},
                {"name": "HIP 37488", "type": {"name": "Star"},
                 "position": {"constellation": {"name": "Lynx"}}},
                {"name": "HD 65755", "type": {"name": "Star"}, "position": {}},
                {"name": "M 81", "type": {"name": "Galaxy", "subtype": "Spiral"}, "position": {}}
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let coords = Coordinates::new(51.5, -0.12, LocationSource::NetworkAddress);
    let response = fetch_astro(&client, &coords).await.unwrap();

    let links: Vec<&str> = response
        .data
        .iter()
        .map(|object| object.link.as_deref().unwrap())
        .collect();
    assert_eq!(
        links,
        vec![
            "https://hipparcos-tools.cosmos.esa.int/cgi-bin/HIPcatalogueSearch.pl?hipId=37488",
            "https://simbad.u-strasbg.fr/simbad/sim-id?Ident=HD+65755&NbIdent=1&Radius=2&Radius.unit=arcmin&submit=submit+id",
            "https://science.nasa.gov/?search=M 81",
        ]
    );
}

#[tokio::test]
async fn test_astro_error_envelope_uses_error_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/astro/zenith/1/2"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "latitude out of range"})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let coords = Coordinates::new(1.0, 2.0, LocationSource::Device);
    let err = fetch_astro(&client, &coords).await.unwrap_err();

    assert_eq!(err.to_string(), "Network response was not ok: latitude out of range");
}

#[tokio::test]
async fn test_star_chart_requests_zoom() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/astro/zenith/starchart/51.5/-0.12"))
        .and(query_param("zoom", "9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"imageUrl": "https://charts.example/51.5_-0.12.png"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let coords = Coordinates::new(51.5, -0.12, LocationSource::Device);
    let chart = fetch_star_chart(&client, &coords).await.unwrap();

    assert_eq!(chart.image_url, "https://charts.example/51.5_-0.12.png");
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let client = ApiClient::new(
        ApiClientConfig::new("http://127.0.0.1:9").with_timeout(Duration::from_millis(200)),
    )
    .unwrap();
    let coords = Coordinates::new(1.0, 2.0, LocationSource::Device);

    let err = fetch_weather(&client, &coords).await.unwrap_err();

    assert!(matches!(err, Error::Network(_)));
}
