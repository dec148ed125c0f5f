//! Wire types for the dashboard backend
//!
//! Records keep unknown fields in a flattened `extra` map (in response order), so
//! detail views can list whatever the backend sends.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Where a coordinate fix came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationSource {
    /// On-device positioning
    #[serde(rename = "browser_geolocation")]
    Device,
    /// Backend lookup from the caller's network address
    #[serde(rename = "server_ip_geolocation")]
    NetworkAddress,
}

/// Coordinates-only projection of a location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in degrees
    #[serde(rename = "lon")]
    pub longitude: f64,
    /// Source tag
    pub source: LocationSource,
}

impl Coordinates {
    /// Create a coordinate fix
    pub fn new(latitude: f64, longitude: f64, source: LocationSource) -> Self {
        Self {
            latitude,
            longitude,
            source,
        }
    }

    /// `/{lat}/{lon}` path suffix used by the coordinate-templated endpoints
    pub fn path_segment(&self) -> String {
        format!("{}/{}", self.latitude, self.longitude)
    }
}

/// Full location record returned by `GET /api/v1/location`
///
/// Serializes with the fields in the order the backend sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Location {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// City name
    pub city: Option<String>,
    /// Country name
    pub country: Option<String>,
    /// IANA timezone
    pub timezone: Option<String>,
    /// Any other fields (region, zip, isp, status, ...)
    pub extra: Map<String, Value>,
    /// Field names in response order
    field_order: Vec<String>,
}

#[derive(Deserialize)]
struct LocationRecord {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    timezone: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for Location {
    type Error = serde_json::Error;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let field_order = map.keys().cloned().collect();
        let record: LocationRecord = serde_json::from_value(Value::Object(map))?;
        Ok(Self {
            latitude: record.latitude,
            longitude: record.longitude,
            city: record.city,
            country: record.country,
            timezone: record.timezone,
            extra: record.extra,
            field_order,
        })
    }
}

impl From<Location> for Map<String, Value> {
    fn from(location: Location) -> Self {
        let mut values = Map::new();
        values.insert("latitude".to_string(), Value::from(location.latitude));
        values.insert("longitude".to_string(), Value::from(location.longitude));
        for (key, field) in [
            ("city", location.city),
            ("country", location.country),
            ("timezone", location.timezone),
        ] {
            if let Some(text) = field {
                values.insert(key.to_string(), Value::String(text));
            }
        }
        values.extend(location.extra);

        let mut ordered = Map::new();
        for key in &location.field_order {
            if let Some(value) = values.get(key) {
                ordered.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in values {
            if !ordered.contains_key(&key) {
                ordered.insert(key, value);
            }
        }
        ordered
    }
}

impl Location {
    /// Usable coordinates of this record, if both are finite
    pub fn coordinates(&self) -> Option<Coordinates> {
        (self.latitude.is_finite() && self.longitude.is_finite()).then(|| {
            Coordinates::new(self.latitude, self.longitude, LocationSource::NetworkAddress)
        })
    }

    /// All fields as `(key, value)` pairs, in response order
    pub fn fields(&self) -> Vec<(String, Value)> {
        Map::from(self.clone()).into_iter().collect()
    }
}

/// Weather reading returned by `GET /api/v1/weather/{lat}/{lon}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Place name
    #[serde(default)]
    pub name: String,
    /// Main metrics
    pub main: WeatherMain,
    /// Any other fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Main weather metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherMain {
    /// Temperature (°C)
    pub temp: f64,
    /// Perceived temperature (°C)
    pub feels_like: f64,
    /// Remaining metrics (pressure, humidity, temp_min, ...), in response order
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Zenith response returned by `GET /api/v1/astro/zenith/{lat}/{lon}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstroResponse {
    /// Echo of the sky position that was queried
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<SkyPosition>,
    /// Objects near the zenith, nearest first
    #[serde(default)]
    pub data: Vec<AstroObject>,
}

/// Right ascension / declination pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyPosition {
    /// Right ascension
    pub ra: f64,
    /// Declination
    pub dec: f64,
}

/// A celestial object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstroObject {
    /// Catalogue name, e.g. `HIP 37488`
    pub name: String,
    /// Object type
    #[serde(rename = "type", default)]
    pub kind: ObjectType,
    /// Position information
    #[serde(default)]
    pub position: ObjectPosition,
    /// External reference link, added client-side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Any other fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Object type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectType {
    /// Type name, e.g. `Star`
    #[serde(default)]
    pub name: String,
    /// Optional subtype
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

/// Object position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectPosition {
    /// Constellation containing the object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constellation: Option<Constellation>,
    /// Equatorial coordinates, each entry a single-value object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equatorial: Option<Map<String, Value>>,
    /// Horizontal coordinates, each entry a single-value object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<Map<String, Value>>,
}

/// Constellation reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constellation {
    /// Constellation name
    #[serde(default)]
    pub name: String,
}

/// Rendered star chart reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarChart {
    /// URL of the rendered image
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}
