//! Root composition
//!
//! [`Dashboard`] wires one shared [`QueryClient`] under the three cards, wraps
//! them in the carousel and carries the theme provider and page chrome.

use crate::card::{CardState, CardView, DisplayCard};
use crate::location_card::LocationCard;
use crate::queries::{LocationQuery, WeatherQuery};
use crate::weather_card::WeatherCard;
use crate::zenith_card::ZenithCard;
use api_client::location::{LocationResolver, PositionOptions, PositionProvider};
use api_client::{ApiClient, ApiClientConfig};
use app_state::{CacheConfig, QueryClient};
use app_ui::carousel::{Carousel, CarouselConfig, NavControls};
use app_ui::chrome::PageChrome;
use app_ui::theme::{Palette, ThemeName, ThemeState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Errors raised while assembling the dashboard
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The API client could not be built
    #[error("API client error: {0}")]
    Api(#[from] api_client::Error),
}

/// Result type for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Dashboard configuration
#[derive(Clone)]
pub struct DashboardConfig {
    /// Backend client configuration
    pub api: ApiClientConfig,
    /// Device positioning options
    pub position: PositionOptions,
    /// Device positioning capability, if the host has one
    pub device: Option<Arc<dyn PositionProvider>>,
    /// Request cache configuration
    pub cache: CacheConfig,
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Theme
    pub theme: ThemeName,
    /// Base colour of the theme palette
    pub base_color: Option<String>,
    /// Page chrome
    pub chrome: PageChrome,
}

impl std::fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("api", &self.api)
            .field("position", &self.position)
            .field("device", &self.device.is_some())
            .field("cache", &self.cache)
            .field("viewport_width", &self.viewport_width)
            .field("theme", &self.theme)
            .field("base_color", &self.base_color)
            .field("chrome", &self.chrome)
            .finish()
    }
}

impl DashboardConfig {
    /// Configuration for a backend origin
    pub fn new(api_origin: impl Into<String>) -> Self {
        Self {
            api: ApiClientConfig::new(api_origin),
            position: PositionOptions::default(),
            device: None,
            cache: CacheConfig::default(),
            viewport_width: 1280,
            theme: ThemeName::Light,
            base_color: None,
            chrome: PageChrome::default(),
        }
    }

    /// Replace the backend client configuration
    pub fn with_api(mut self, api: ApiClientConfig) -> Self {
        self.api = api;
        self
    }

    /// Attach a device positioning capability
    pub fn with_device(mut self, device: Arc<dyn PositionProvider>) -> Self {
        self.device = Some(device);
        self
    }

    /// Set the device positioning options
    pub fn with_position_options(mut self, options: PositionOptions) -> Self {
        self.position = options;
        self
    }

    /// Set the viewport width
    pub fn with_viewport_width(mut self, width: u32) -> Self {
        self.viewport_width = width;
        self
    }

    /// Set the theme
    pub fn with_theme(mut self, theme: ThemeName) -> Self {
        self.theme = theme;
        self
    }

    /// Set the theme base colour
    pub fn with_base_color(mut self, color: impl Into<String>) -> Self {
        self.base_color = Some(color.into());
        self
    }

    /// Set the page chrome
    pub fn with_chrome(mut self, chrome: PageChrome) -> Self {
        self.chrome = chrome;
        self
    }
}

/// One card as rendered on the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSlot {
    /// Card title
    pub title: String,
    /// Card content
    pub content: CardState<CardView>,
}

/// Rendered page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    /// Page chrome
    pub chrome: PageChrome,
    /// Active palette
    pub palette: Palette,
    /// Carousel navigation buttons
    pub controls: NavControls,
    /// Cards in strip order
    pub cards: Vec<CardSlot>,
}

/// The dashboard page
pub struct Dashboard {
    queries: QueryClient,
    weather: WeatherCard,
    location: LocationCard,
    zenith: ZenithCard,
    carousel: Carousel,
    theme: ThemeState,
    chrome: PageChrome,
}

impl Dashboard {
    /// Assemble the page with every card loading
    pub fn new(config: DashboardConfig) -> Result<Self> {
        let client = ApiClient::new(config.api)?;

        let mut resolver = LocationResolver::new(client.clone()).with_options(config.position);
        if let Some(device) = config.device {
            resolver = resolver.with_device(device);
        }

        let queries = QueryClient::new(config.cache);
        let location_query = LocationQuery::new(resolver.clone());

        let weather = WeatherCard::new(
            queries.clone(),
            WeatherQuery::new(client.clone(), resolver),
        );
        let location = LocationCard::new(queries.clone(), location_query.clone());
        let zenith = ZenithCard::new(queries.clone(), client, location_query);

        let carousel = Carousel::new(
            CarouselConfig::default().with_card_count(3),
            config.viewport_width,
        );

        let mut theme = ThemeState::new(config.theme);
        if let Some(color) = &config.base_color {
            theme.set_base_color(color);
        }

        Ok(Self {
            queries,
            weather,
            location,
            zenith,
            carousel,
            theme,
            chrome: config.chrome,
        })
    }

    /// Load every card concurrently
    ///
    /// A failing card settles in its error state without affecting the others.
    pub async fn load_all(&mut self) {
        let evicted = self.queries.evict_expired();
        if evicted > 0 {
            debug!("Evicted {} expired queries", evicted);
        }
        info!("Loading dashboard cards");
        tokio::join!(
            self.weather.load(),
            self.location.load(),
            self.zenith.load()
        );
    }

    /// Render the page
    pub fn render(&self) -> DashboardView {
        DashboardView {
            chrome: self.chrome.clone(),
            palette: self.theme.current_theme().palette.clone(),
            controls: self.carousel.controls(),
            cards: self
                .cards()
                .into_iter()
                .map(|card| CardSlot {
                    title: card.title().to_string(),
                    content: card.render(),
                })
                .collect(),
        }
    }

    /// Cards in strip order
    pub fn cards(&self) -> [&dyn DisplayCard; 3] {
        [&self.weather, &self.location, &self.zenith]
    }

    /// Weather card
    pub fn weather(&mut self) -> &mut WeatherCard {
        &mut self.weather
    }

    /// Location card
    pub fn location(&mut self) -> &mut LocationCard {
        &mut self.location
    }

    /// Zenith card
    pub fn zenith(&mut self) -> &mut ZenithCard {
        &mut self.zenith
    }

    /// Card carousel
    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    /// Theme provider
    pub fn theme(&mut self) -> &mut ThemeState {
        &mut self.theme
    }

    /// Shared request cache
    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dashboard_all_loading() {
        let dashboard = Dashboard::new(DashboardConfig::new("http://127.0.0.1:9")).unwrap();
        let view = dashboard.render();

        let titles: Vec<&str> = view.cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Local Weather", "Location", "Zenith"]);
        assert!(view.cards.iter().all(|c| c.content.is_loading()));
    }

    #[test]
    fn test_narrow_viewport_hides_controls() {
        let dashboard =
            Dashboard::new(DashboardConfig::new("http://127.0.0.1:9").with_viewport_width(400))
                .unwrap();
        assert_eq!(dashboard.render().controls, NavControls::default());
    }

    #[test]
    fn test_base_color_feeds_palette() {
        let dashboard = Dashboard::new(
            DashboardConfig::new("http://127.0.0.1:9")
                .with_theme(ThemeName::Dark)
                .with_base_color("#336699"),
        )
        .unwrap();
        let palette = dashboard.render().palette;
        assert_eq!(palette.primary, "#336699");
        assert_eq!(
            palette.primary_dark,
            app_ui::theme::adjust_hex_color("#336699", -20.0)
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_settles_every_card_in_error() {
        let mut dashboard = Dashboard::new(
            DashboardConfig::new("http://127.0.0.1:9").with_api(
                ApiClientConfig::new("http://127.0.0.1:9")
                    .with_timeout(std::time::Duration::from_millis(200)),
            ),
        )
        .unwrap();

        tokio::time::pause();
        dashboard.load_all().await;

        for slot in dashboard.render().cards {
            assert!(slot.content.error().is_some(), "{} should have failed", slot.title);
        }
    }
}
