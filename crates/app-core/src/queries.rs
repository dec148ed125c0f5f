//! Query definitions for the dashboard cards
//!
//! Each backend call the cards make is wrapped as an [`app_state::Query`] so it
//! goes through the shared [`app_state::QueryClient`]: identical keys share one
//! in-flight request and one cached result.

use api_client::location::LocationResolver;
use api_client::weather::fetch_local_weather;
use api_client::{
    fetch_astro, fetch_star_chart, ApiClient, AstroResponse, Coordinates, Location, StarChart,
    WeatherReading,
};
use app_state::{Query, QueryConfig, QueryError, QueryKey};
use async_trait::async_trait;

/// Scope of the location query
pub const LOCATION_SCOPE: &str = "location";
/// Scope of the weather query
pub const WEATHER_SCOPE: &str = "weather";
/// Scope of the astro and star chart queries
pub const ASTRO_SCOPE: &str = "astro";

fn fetch_failed(err: api_client::Error) -> QueryError {
    QueryError::FetchError(err.to_string())
}

fn coordinate_key(id: &str, coords: &Coordinates) -> QueryKey {
    QueryKey::new(ASTRO_SCOPE, id)
        .with_param("lat", coords.latitude)
        .with_param("lon", coords.longitude)
}

// =============================================================================
// Location
// =============================================================================

/// Full location record; retried once on failure
#[derive(Debug, Clone)]
pub struct LocationQuery {
    resolver: LocationResolver,
}

impl LocationQuery {
    /// Create the query
    pub fn new(resolver: LocationResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Query for LocationQuery {
    type Data = Location;

    async fn fetch(&self) -> app_state::query::Result<Self::Data> {
        self.resolver.location().await.map_err(fetch_failed)
    }

    fn key(&self) -> QueryKey {
        QueryKey::new(LOCATION_SCOPE, "full")
    }

    fn config(&self) -> QueryConfig {
        QueryConfig::default().with_retry(1)
    }
}

// =============================================================================
// Weather
// =============================================================================

/// Weather at a coordinate fix resolved on the spot
#[derive(Debug, Clone)]
pub struct WeatherQuery {
    client: ApiClient,
    resolver: LocationResolver,
}

impl WeatherQuery {
    /// Create the query
    pub fn new(client: ApiClient, resolver: LocationResolver) -> Self {
        Self { client, resolver }
    }
}

#[async_trait]
impl Query for WeatherQuery {
    type Data = WeatherReading;

    async fn fetch(&self) -> app_state::query::Result<Self::Data> {
        fetch_local_weather(&self.client, &self.resolver)
            .await
            .map_err(fetch_failed)
    }

    fn key(&self) -> QueryKey {
        QueryKey::new(WEATHER_SCOPE, "local")
    }
}

// =============================================================================
// Astro
// =============================================================================

/// Zenith objects; disabled until coordinates are known
#[derive(Debug, Clone)]
pub struct AstroQuery {
    client: ApiClient,
    coords: Option<Coordinates>,
}

impl AstroQuery {
    /// Create the query
    pub fn new(client: ApiClient, coords: Option<Coordinates>) -> Self {
        Self { client, coords }
    }
}

#[async_trait]
impl Query for AstroQuery {
    type Data = AstroResponse;

    async fn fetch(&self) -> app_state::query::Result<Self::Data> {
        let coords = self
            .coords
            .ok_or_else(|| QueryError::Disabled(self.key().to_string()))?;
        fetch_astro(&self.client, &coords).await.map_err(fetch_failed)
    }

    fn key(&self) -> QueryKey {
        match &self.coords {
            Some(coords) => coordinate_key("zenith", coords),
            None => QueryKey::new(ASTRO_SCOPE, "zenith"),
        }
    }

    fn enabled(&self) -> bool {
        self.coords.is_some()
    }
}

/// Star chart image for a coordinate pair, cached for the session
#[derive(Debug, Clone)]
pub struct StarChartQuery {
    client: ApiClient,
    coords: Coordinates,
}

impl StarChartQuery {
    /// Create the query
    pub fn new(client: ApiClient, coords: Coordinates) -> Self {
        Self { client, coords }
    }
}

#[async_trait]
impl Query for StarChartQuery {
    type Data = StarChart;

    async fn fetch(&self) -> app_state::query::Result<Self::Data> {
        fetch_star_chart(&self.client, &self.coords)
            .await
            .map_err(fetch_failed)
    }

    fn key(&self) -> QueryKey {
        coordinate_key("starchart", &self.coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::{ApiClientConfig, LocationSource};

    fn offline_client() -> ApiClient {
        ApiClient::new(ApiClientConfig::new("http://127.0.0.1:9")).unwrap()
    }

    #[test]
    fn test_location_query_retries_once() {
        let query = LocationQuery::new(LocationResolver::new(offline_client()));
        assert_eq!(query.config().retry_count, 1);
        assert_eq!(query.key().to_cache_key(), "query:location:full");
    }

    #[test]
    fn test_weather_query_no_retry() {
        let client = offline_client();
        let query = WeatherQuery::new(client.clone(), LocationResolver::new(client));
        assert_eq!(query.config().retry_count, 0);
    }

    #[test]
    fn test_astro_query_gated_on_coordinates() {
        let client = offline_client();
        assert!(!AstroQuery::new(client.clone(), None).enabled());

        let coords = Coordinates::new(51.5, -0.12, LocationSource::NetworkAddress);
        let query = AstroQuery::new(client, Some(coords));
        assert!(query.enabled());
        assert_eq!(query.key().to_string(), "astro:zenith?lat=51.5&lon=-0.12");
    }

    #[test]
    fn test_same_coordinates_same_key_regardless_of_source() {
        let client = offline_client();
        let device = Coordinates::new(1.0, 2.0, LocationSource::Device);
        let network = Coordinates::new(1.0, 2.0, LocationSource::NetworkAddress);

        assert_eq!(
            AstroQuery::new(client.clone(), Some(device)).key(),
            AstroQuery::new(client, Some(network)).key()
        );
    }

    #[test]
    fn test_star_chart_key_distinct_from_astro() {
        let client = offline_client();
        let coords = Coordinates::new(1.0, 2.0, LocationSource::Device);
        assert_ne!(
            StarChartQuery::new(client.clone(), coords).key(),
            AstroQuery::new(client, Some(coords)).key()
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_carries_backend_message() {
        let client = offline_client();
        let coords = Coordinates::new(1.0, 2.0, LocationSource::Device);
        let err = StarChartQuery::new(client, coords).fetch().await.unwrap_err();
        assert!(err.message().starts_with("Network error"));
    }
}
