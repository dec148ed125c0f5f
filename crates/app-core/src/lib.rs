//! Core application logic for the Zenith dashboard
//!
//! This crate contains the display cards (weather, location, zenith), the
//! queries they run through the shared request cache, the formatting helpers
//! for their detail rows and the root [`dashboard::Dashboard`] composition.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod card;
pub mod dashboard;
pub mod labels;
pub mod location_card;
pub mod queries;
pub mod weather_card;
pub mod zenith_card;

pub use card::{CardState, CardView, DetailRow, DisplayCard};
pub use dashboard::{CardSlot, Dashboard, DashboardConfig, DashboardError, DashboardView};
pub use labels::{sig_digits, to_label_case, DisplayValue};
pub use location_card::LocationCard;
pub use weather_card::WeatherCard;
pub use zenith_card::ZenithCard;
