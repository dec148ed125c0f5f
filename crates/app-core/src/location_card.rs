//! Location card

use crate::card::{CardState, CardView, DetailRow, DisplayCard};
use crate::labels::{sig_digits, to_label_case, DEFAULT_SIG_DIGITS};
use crate::queries::LocationQuery;
use api_client::Location;
use app_state::QueryClient;
use async_trait::async_trait;
use tracing::debug;

/// Fields shown in the fixed rows, or not at all
const SKIPPED_FIELDS: [&str; 4] = ["city", "country", "timezone", "status"];

/// The caller's location as the backend sees it
pub struct LocationCard {
    queries: QueryClient,
    query: LocationQuery,
    state: CardState<Location>,
    expanded: bool,
}

impl LocationCard {
    /// Card title
    pub const TITLE: &'static str = "Location";

    /// Create the card in the loading state
    pub fn new(queries: QueryClient, query: LocationQuery) -> Self {
        Self {
            queries,
            query,
            state: CardState::Loading,
            expanded: false,
        }
    }

    /// Current state
    pub fn state(&self) -> &CardState<Location> {
        &self.state
    }
}

/// Rows for a location record
pub fn location_view(location: &Location, expanded: bool) -> CardView {
    let text = |field: &Option<String>| field.clone().unwrap_or_default();

    let mut rows = vec![
        DetailRow::new("Location", text(&location.city)),
        DetailRow::new("Country", text(&location.country)),
        DetailRow::new("Timezone", text(&location.timezone)),
    ];

    if expanded {
        rows.extend(
            location
                .fields()
                .into_iter()
                .filter(|(key, _)| !SKIPPED_FIELDS.contains(&key.as_str()))
                .map(|(key, value)| {
                    DetailRow::new(to_label_case(&key), sig_digits(&value, DEFAULT_SIG_DIGITS))
                }),
        );
    }

    CardView {
        title: LocationCard::TITLE.to_string(),
        rows,
        expanded,
    }
}

#[async_trait]
impl DisplayCard for LocationCard {
    fn title(&self) -> &'static str {
        Self::TITLE
    }

    async fn load(&mut self) {
        self.state = match self.queries.get(&self.query).await {
            Ok(location) => CardState::Ready(location),
            Err(e) => {
                debug!("Location card failed: {}", e);
                CardState::Error(format!("Error fetching data: {}", e.message()))
            }
        };
    }

    fn render(&self) -> CardState<CardView> {
        self.state
            .as_ref()
            .map(|location| location_view(location, self.expanded))
    }

    fn toggle_expanded(&mut self) -> bool {
        self.expanded = !self.expanded;
        self.expanded
    }

    fn is_expanded(&self) -> bool {
        self.expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Location {
        serde_json::from_value(json!({
            "status": "success",
            "country": "United Kingdom",
            "city": "London",
            "zip": "0123",
            "latitude": 51.5074,
            "longitude": -0.1278,
            "timezone": "Europe/London",
            "isp": "Example Broadband"
        }))
        .unwrap()
    }

    #[test]
    fn test_collapsed_rows() {
        let view = location_view(&record(), false);

        let rows: Vec<(&str, &str)> = view
            .rows
            .iter()
            .map(|r| (r.label.as_str(), r.value.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Location", "London"),
                ("Country", "United Kingdom"),
                ("Timezone", "Europe/London"),
            ]
        );
    }

    #[test]
    fn test_expanded_rows_skip_shown_fields() {
        let view = location_view(&record(), true);

        let extra: Vec<(&str, &str)> = view
            .rows
            .iter()
            .skip(3)
            .map(|r| (r.label.as_str(), r.value.as_str()))
            .collect();
        assert_eq!(
            extra,
            vec![
                ("Zip", "0123"),
                ("Latitude", "51.5"),
                ("Longitude", "-0.128"),
                ("Isp", "Example Broadband"),
            ]
        );
    }

    #[test]
    fn test_missing_city_renders_empty() {
        let location: Location =
            serde_json::from_value(json!({"latitude": 1.0, "longitude": 2.0})).unwrap();
        let view = location_view(&location, false);
        assert_eq!(view.rows[0].value, "");
    }
}
