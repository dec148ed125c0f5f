//! Zenith card
//!
//! Chains two queries: the full location record first, then the zenith objects
//! at its coordinates. The astro query stays disabled (and the card loading)
//! until the record carries usable coordinates. A star chart for the same
//! coordinates can be requested on demand.

use crate::card::{CardState, CardView, DetailRow, DisplayCard};
use crate::labels::{display_text, to_label_case};
use crate::queries::{AstroQuery, LocationQuery, StarChartQuery};
use api_client::{ApiClient, AstroObject, AstroResponse, Coordinates, StarChart};
use app_state::{QueryClient, QueryError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Equatorial key shown in hours rather than degrees
const RIGHT_ASCENSION: &str = "rightAscension";

/// Objects overhead at the caller's location
pub struct ZenithCard {
    queries: QueryClient,
    client: ApiClient,
    location: LocationQuery,
    coords: Option<Coordinates>,
    state: CardState<AstroResponse>,
    star_chart: Option<CardState<StarChart>>,
    expanded: bool,
}

impl ZenithCard {
    /// Card title
    pub const TITLE: &'static str = "Zenith";

    /// Create the card in the loading state
    pub fn new(queries: QueryClient, client: ApiClient, location: LocationQuery) -> Self {
        Self {
            queries,
            client,
            location,
            coords: None,
            state: CardState::Loading,
            star_chart: None,
            expanded: false,
        }
    }

    /// Current state
    pub fn state(&self) -> &CardState<AstroResponse> {
        &self.state
    }

    /// Coordinates the astro query ran with, once known
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coords
    }

    /// Star chart state; `None` until one is requested
    pub fn star_chart(&self) -> Option<&CardState<StarChart>> {
        self.star_chart.as_ref()
    }

    /// Fetch the star chart for the card's coordinates
    ///
    /// Returns `None` while the coordinates are still unknown. Charts are cached
    /// by coordinate pair for the session.
    pub async fn request_star_chart(&mut self) -> Option<&CardState<StarChart>> {
        let coords = self.coords?;
        let query = StarChartQuery::new(self.client.clone(), coords);

        self.star_chart = Some(match self.queries.get(&query).await {
            Ok(chart) => {
                info!("Star chart ready: {}", chart.image_url);
                CardState::Ready(chart)
            }
            Err(e) => CardState::Error(format!("Error fetching star chart: {}", e.message())),
        });

        self.star_chart.as_ref()
    }
}

/// Rows for the first zenith object
pub fn zenith_view(response: &AstroResponse, expanded: bool) -> CardView {
    let first = response.data.first();

    let name = first.map(|object| object.name.clone()).unwrap_or_default();
    let mut name_row = DetailRow::new("Name", name);
    if let Some(link) = first.and_then(|object| object.link.clone()) {
        name_row = name_row.with_link(link);
    }

    let mut rows = vec![
        name_row,
        DetailRow::new(
            "Type",
            first.map(|object| object.kind.name.clone()).unwrap_or_default(),
        ),
        DetailRow::new(
            "Constellation",
            first
                .and_then(|object| object.position.constellation.as_ref())
                .map(|constellation| constellation.name.clone())
                .unwrap_or_default(),
        ),
    ];

    if expanded {
        if let Some(object) = first {
            rows.extend(position_rows(object));
        }
    }

    CardView {
        title: ZenithCard::TITLE.to_string(),
        rows,
        expanded,
    }
}

fn position_rows(object: &AstroObject) -> Vec<DetailRow> {
    let mut rows = Vec::new();

    if let Some(equatorial) = &object.position.equatorial {
        rows.extend(coordinate_rows(equatorial, |key| {
            if key == RIGHT_ASCENSION {
                "h"
            } else {
                "°"
            }
        }));
    }
    if let Some(horizontal) = &object.position.horizontal {
        rows.extend(coordinate_rows(horizontal, |_| "°"));
    }

    rows
}

fn coordinate_rows<'a>(
    entries: &'a Map<String, Value>,
    unit: impl Fn(&str) -> &'static str + 'a,
) -> impl Iterator<Item = DetailRow> + 'a {
    entries.iter().map(move |(key, value)| {
        DetailRow::new(
            to_label_case(key),
            format!("{}{}", first_component(value), unit(key)),
        )
    })
}

/// Coordinates arrive as objects of formatted components (`{"string": ..}`);
/// the first component is the one shown
fn first_component(value: &Value) -> String {
    match value {
        Value::Object(components) => components
            .values()
            .next()
            .map(display_text)
            .unwrap_or_default(),
        other => display_text(other),
    }
}

#[async_trait]
impl DisplayCard for ZenithCard {
    fn title(&self) -> &'static str {
        Self::TITLE
    }

    async fn load(&mut self) {
        let location = match self.queries.get(&self.location).await {
            Ok(location) => location,
            Err(e) => {
                self.state =
                    CardState::Error(format!("Error fetching location data: {}", e.message()));
                return;
            }
        };

        self.coords = location.coordinates();
        let query = AstroQuery::new(self.client.clone(), self.coords);

        self.state = match self.queries.get(&query).await {
            Ok(response) => CardState::Ready(response),
            Err(QueryError::Disabled(key)) => {
                debug!("Astro query {} waiting on coordinates", key);
                CardState::Loading
            }
            Err(e) => {
                CardState::Error(format!("Error fetching astronomical data: {}", e.message()))
            }
        };
    }

    fn render(&self) -> CardState<CardView> {
        self.state
            .as_ref()
            .map(|response| zenith_view(response, self.expanded))
    }

    fn toggle_expanded(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    fn is_expanded(&self) -> bool {
        self.expanded
    }
}
