//! Location resolution
//!
//! A location is produced either from on-device positioning or, when that is
//! missing, fails or times out, from the backend's network-address lookup at
//! `GET /api/v1/location`. Device failures are logged and swallowed; only a
//! failure of the fallback lookup reaches the caller.

use crate::http::{ApiClient, ApiRequest};
use crate::types::{Coordinates, Location, LocationSource};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Path of the network-address location endpoint
pub const LOCATION_PATH: &str = "/api/v1/location";

// =============================================================================
// Device Positioning
// =============================================================================

/// Options passed to the device positioning capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Ask for the most accurate fix available
    pub high_accuracy: bool,
    /// Upper bound on the wait for a fix
    pub timeout: Duration,
    /// Maximum age of a cached fix; zero means a fresh fix is required
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(5),
            maximum_age: Duration::ZERO,
        }
    }
}

impl PositionOptions {
    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A fix reported by the device
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePosition {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

/// Device positioning failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// The user refused access
    #[error("User denied geolocation")]
    PermissionDenied,

    /// No fix could be obtained
    #[error("Position unavailable: {0}")]
    Unavailable(String),

    /// No fix arrived within the configured timeout
    #[error("Timeout expired")]
    Timeout,
}

/// On-device positioning capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PositionProvider: Send + Sync {
    /// Obtain the current position
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> std::result::Result<DevicePosition, PositionError>;
}

// =============================================================================
// Resolver
// =============================================================================

/// Output of [`LocationResolver::resolve`]
#[derive(Debug, Clone, PartialEq)]
pub enum LocationResult {
    /// Coordinates-only projection
    Coordinates(Coordinates),
    /// Full location record
    Full(Location),
}

impl LocationResult {
    /// Coordinates of this result, if usable
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            LocationResult::Coordinates(coords) => Some(*coords),
            LocationResult::Full(location) => location.coordinates(),
        }
    }
}

/// Resolves the caller's location
#[derive(Clone)]
pub struct LocationResolver {
    client: ApiClient,
    device: Option<Arc<dyn PositionProvider>>,
    options: PositionOptions,
}

impl std::fmt::Debug for LocationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationResolver")
            .field("client", &self.client)
            .field("device", &self.device.is_some())
            .field("options", &self.options)
            .finish()
    }
}

impl LocationResolver {
    /// Resolver without device positioning; every lookup goes to the backend
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            device: None,
            options: PositionOptions::default(),
        }
    }

    /// Attach a device positioning capability
    pub fn with_device(mut self, device: Arc<dyn PositionProvider>) -> Self {
        self.device = Some(device);
        self
    }

    /// Override the positioning options
    pub fn with_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve the location
    ///
    /// With `coords_only` the device fix is tried first. The full record only
    /// exists on the backend, so it is always fetched from there.
    pub async fn resolve(&self, coords_only: bool) -> Result<LocationResult> {
        if coords_only {
            if let Some(coords) = self.device_fix().await {
                return Ok(LocationResult::Coordinates(coords));
            }
        }

        let location = self.fetch_network_location().await?;
        if coords_only {
            Ok(LocationResult::Coordinates(Coordinates::new(
                location.latitude,
                location.longitude,
                LocationSource::NetworkAddress,
            )))
        } else {
            Ok(LocationResult::Full(location))
        }
    }

    /// Coordinates-only shortcut
    pub async fn coordinates(&self) -> Result<Coordinates> {
        match self.resolve(true).await? {
            LocationResult::Coordinates(coords) => Ok(coords),
            LocationResult::Full(location) => location
                .coordinates()
                .ok_or_else(|| Error::Malformed("location has no coordinates".to_string())),
        }
    }

    /// Full-record shortcut
    pub async fn location(&self) -> Result<Location> {
        self.fetch_network_location().await
    }

    async fn device_fix(&self) -> Option<Coordinates> {
        let device = self.device.as_ref()?;

        let outcome = tokio::time::timeout(
            self.options.timeout,
            device.current_position(&self.options),
        )
        .await
        .unwrap_or(Err(PositionError::Timeout));

        match outcome {
            Ok(position) => {
                info!(
                    "Using device geolocation: latitude {}, longitude {}",
                    position.latitude, position.longitude
                );
                Some(Coordinates::new(
                    position.latitude,
                    position.longitude,
                    LocationSource::Device,
                ))
            }
            Err(e) => {
                warn!("Device geolocation failed: {}. Falling back to IP-based location.", e);
                None
            }
        }
    }

    async fn fetch_network_location(&self) -> Result<Location> {
        debug!("Fetching location data from {} based on client IP", LOCATION_PATH);

        self.client
            .get_json::<Location>(ApiRequest::get(LOCATION_PATH))
            .await
            .map_err(|e| Error::Location(Box::new(e)))
    }
}
