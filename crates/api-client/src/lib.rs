//! Dashboard API client
//!
//! This crate provides typed access to the dashboard backend: location lookup
//! (with on-device positioning and a network-address fallback), weather readings,
//! zenith objects and rendered star charts.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod astro;
pub mod http;
pub mod location;
pub mod types;
pub mod weather;

pub use astro::{fetch_astro, fetch_star_chart, reference_link};
pub use http::{ApiClient, ApiClientConfig};
pub use location::{LocationResolver, LocationResult, PositionOptions, PositionProvider};
pub use types::{
    AstroObject, AstroResponse, Coordinates, Location, LocationSource, StarChart, WeatherReading,
};
pub use weather::fetch_weather;

/// Result type for dashboard API operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for dashboard API operations
///
/// Errors are `Clone` so that a single failed request can be handed to every
/// consumer waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The backend could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success status, message taken from the backend's error envelope
    #[error("Network response was not ok: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from server
        message: String,
    },

    /// The response body did not have the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network-address location lookup failed
    #[error("Network error while fetching location: {0}")]
    Location(Box<Error>),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::Malformed(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Malformed(err.to_string())
    }
}
