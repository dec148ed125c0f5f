//! Integration tests for the dashboard cards
//!
//! These tests use wiremock as the backend and drive each card through its
//! loading, error and ready states via the shared query client.

use api_client::location::LocationResolver;
use api_client::{ApiClient, ApiClientConfig};
use app_core::card::{CardState, DisplayCard};
use app_core::queries::{LocationQuery, WeatherQuery};
use app_core::{LocationCard, WeatherCard, ZenithCard};
use app_state::QueryClient;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Fixtures

struct Backend {
    client: ApiClient,
    resolver: LocationResolver,
    queries: QueryClient,
}

fn backend(server: &MockServer) -> Backend {
    let client = ApiClient::new(ApiClientConfig::new(server.uri())).unwrap();
    Backend {
        resolver: LocationResolver::new(client.clone()),
        client,
        queries: QueryClient::default(),
    }
}

fn london_record() -> serde_json::Value {
    json!({
        "status": "success",
        "country": "United Kingdom",
        "city": "London",
        "zip": "0123",
        "latitude": 51.5,
        "longitude": -0.12,
        "timezone": "Europe/London"
    })
}

async fn mount_location(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(london_record()))
        .mount(server)
        .await;
}

// =============================================================================
// Weather Card
// =============================================================================

#[tokio::test]
async fn test_weather_card_ready() {
    let server = MockServer::start().await;
    mount_location(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/weather/51.5/-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "London",
            "main": {"temp": 14.2, "feels_like": 13.1, "humidity": 71.66666}
        })))
        .mount(&server)
        .await;

    let b = backend(&server);
    let mut card = WeatherCard::new(b.queries, WeatherQuery::new(b.client, b.resolver));
    assert!(card.render().is_loading());

    card.load().await;

    let view = card.render().data().cloned().unwrap();
    assert_eq!(view.rows.len(), 3);
    assert_eq!(view.rows[0].value, "London");

    assert!(card.toggle_expanded());
    let expanded = card.render().data().cloned().unwrap();
    assert_eq!(expanded.rows.last().unwrap().value, "71.67");
}

#[tokio::test]
async fn test_weather_card_error_notice() {
    let server = MockServer::start().await;
    mount_location(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/weather/51.5/-0.12"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "upstream down"})))
        .expect(1)
        .mount(&server)
        .await;

    let b = backend(&server);
    let mut card = WeatherCard::new(b.queries, WeatherQuery::new(b.client, b.resolver));
    card.load().await;

    assert_eq!(
        card.state().error(),
        Some("Error fetching data: Network response was not ok: upstream down")
    );
}

// =============================================================================
// Location Card
// =============================================================================

#[tokio::test]
async fn test_location_card_recovers_with_one_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/location"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"message": "busy"})))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_location(&server).await;

    let b = backend(&server);
    let mut card = LocationCard::new(b.queries, LocationQuery::new(b.resolver));
    card.load().await;

    let location = card.state().data().unwrap();
    assert_eq!(location.city.as_deref(), Some("London"));
}

#[tokio::test]
async fn test_location_card_error_after_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/location"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "geo down"})))
        .expect(2)
        .mount(&server)
        .await;

    let b = backend(&server);
    let mut card = LocationCard::new(b.queries, LocationQuery::new(b.resolver));
    card.load().await;

    assert_eq!(
        card.render().error(),
        Some(
            "Error fetching data: Network error while fetching location: \
             Network response was not ok: geo down"
        )
    );
}

// =============================================================================
// Zenith Card
// =============================================================================

#[tokio::test]
async fn test_zenith_card_chains_location_into_astro() {
    let server = MockServer::start().await;
    mount_location(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/astro/zenith/51.5/-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"ra": 7.58, "dec": 51.5},
            "data": [
                {"name": "Sol", "type": {"name": "Star"}, "position": {}},
                {"name": "HD 65755", "type": {"name": "Star"},
                 "position": {"constellation": {"name": "Lynx"}}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let b = backend(&server);
    let mut card = ZenithCard::new(b.queries, b.client, LocationQuery::new(b.resolver));
    card.load().await;

    let view = card.render().data().cloned().unwrap();
    assert_eq!(view.rows[0].value, "HD 65755");
    assert!(view.rows[0].link.as_deref().unwrap().contains("Ident=HD+65755"));
    assert_eq!(view.rows[2].value, "Lynx");
    assert_eq!(card.coordinates().map(|c| c.latitude), Some(51.5));
}

#[tokio::test]
async fn test_zenith_card_location_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/location"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "geo down"})))
        .mount(&server)
        .await;

    let b = backend(&server);
    let mut card = ZenithCard::new(b.queries, b.client, LocationQuery::new(b.resolver));
    card.load().await;

    let notice = card.state().error().unwrap();
    assert!(notice.starts_with("Error fetching location data: "));
    assert!(card.coordinates().is_none());
}

#[tokio::test]
async fn test_zenith_card_astro_error() {
    let server = MockServer::start().await;
    mount_location(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/astro/zenith/51.5/-0.12"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "latitude out of range"})),
        )
        .mount(&server)
        .await;

    let b = backend(&server);
    let mut card = ZenithCard::new(b.queries, b.client, LocationQuery::new(b.resolver));
    card.load().await;

    assert_eq!(
        card.state().error(),
        Some("Error fetching astronomical data: Network response was not ok: latitude out of range")
    );
}

#[tokio::test]
async fn test_star_chart_on_demand_is_cached() {
    let server = MockServer::start().await;
    mount_location(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/astro/zenith/51.5/-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/astro/zenith/starchart/51.5/-0.12"))
        .and(query_param("zoom", "9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"imageUrl": "https://charts.example/c.png"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let b = backend(&server);
    let mut card = ZenithCard::new(b.queries, b.client, LocationQuery::new(b.resolver));

    // Nothing to chart before the location is known.
    assert!(card.request_star_chart().await.is_none());

    card.load().await;
    let first = card.request_star_chart().await.cloned();
    let second = card.request_star_chart().await.cloned();

    assert_eq!(first, second);
    match first {
        Some(CardState::Ready(chart)) => assert_eq!(chart.image_url, "https://charts.example/c.png"),
        other => panic!("expected a ready chart, got {:?}", other),
    }
}

// =============================================================================
// Shared Cache
// =============================================================================

#[tokio::test]
async fn test_location_and_zenith_cards_share_location_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/location"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(london_record())
                .set_delay(std::time::Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/astro/zenith/51.5/-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let b = backend(&server);
    let query = LocationQuery::new(b.resolver);
    let mut location = LocationCard::new(b.queries.clone(), query.clone());
    let mut zenith = ZenithCard::new(b.queries, b.client, query);

    tokio::join!(location.load(), zenith.load());

    assert!(location.state().is_ready());
    assert!(zenith.state().is_ready());
}
