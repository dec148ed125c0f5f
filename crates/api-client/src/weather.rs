//! Weather readings

use crate::http::{ApiClient, ApiRequest};
use crate::location::LocationResolver;
use crate::types::{Coordinates, WeatherReading};
use crate::Result;
use tracing::debug;

/// Fetch the weather reading at the given coordinates
pub async fn fetch_weather(client: &ApiClient, coords: &Coordinates) -> Result<WeatherReading> {
    let path = format!("/api/v1/weather/{}", coords.path_segment());
    debug!("Fetching weather from {}", path);
    client.get_json(ApiRequest::get(path)).await
}

/// Resolve a coordinate fix, then fetch the weather there
pub async fn fetch_local_weather(
    client: &ApiClient,
    resolver: &LocationResolver,
) -> Result<WeatherReading> {
    let coords = resolver.coordinates().await?;
    fetch_weather(client, &coords).await
}
