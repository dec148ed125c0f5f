//! Local weather card

use crate::card::{CardState, CardView, DetailRow, DisplayCard};
use crate::labels::{sig_digits, to_label_case};
use crate::queries::WeatherQuery;
use api_client::WeatherReading;
use app_state::QueryClient;
use async_trait::async_trait;
use tracing::debug;

/// Significant digits for the extra weather metrics
pub const WEATHER_SIG_DIGITS: usize = 4;

/// Weather at the caller's position
pub struct WeatherCard {
    queries: QueryClient,
    query: WeatherQuery,
    state: CardState<WeatherReading>,
    expanded: bool,
}

impl WeatherCard {
    /// Card title
    pub const TITLE: &'static str = "Local Weather";

    /// Create the card in the loading state
    pub fn new(queries: QueryClient, query: WeatherQuery) -> Self {
        Self {
            queries,
            query,
            state: CardState::Loading,
            expanded: false,
        }
    }

    /// Current state
    pub fn state(&self) -> &CardState<WeatherReading> {
        &self.state
    }
}

/// Rows for a weather reading
pub fn weather_view(reading: &WeatherReading, expanded: bool) -> CardView {
    let mut rows = vec![
        DetailRow::new("Location", &reading.name),
        DetailRow::new("Temp (C)", reading.main.temp),
        DetailRow::new("Feels Like (C)", reading.main.feels_like),
    ];

    if expanded {
        rows.extend(reading.main.extra.iter().map(|(key, value)| {
            DetailRow::new(to_label_case(key), sig_digits(value, WEATHER_SIG_DIGITS))
        }));
    }

    CardView {
        title: WeatherCard::TITLE.to_string(),
        rows,
        expanded,
    }
}

#[async_trait]
impl DisplayCard for WeatherCard {
    fn title(&self) -> &'static str {
        Self::TITLE
    }

    async fn load(&mut self) {
        self.state = match self.queries.get(&self.query).await {
            Ok(reading) => CardState::Ready(reading),
            Err(e) => {
                debug!("Weather card failed: {}", e);
                CardState::Error(format!("Error fetching data: {}", e.message()))
            }
        };
    }

    fn render(&self) -> CardState<CardView> {
        self.state
            .as_ref()
            .map(|reading| weather_view(reading, self.expanded))
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

    fn reading() -> WeatherReading {
        serde_json::from_value(json!({
            "name": "London",
            "main": {
                "temp": 14.2,
                "feels_like": 13.1,
                "temp_min": 12.777,
                "pressure": 1015,
                "humidity": 71.66666
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_collapsed_rows() {
        let view = weather_view(&reading(), false);

        assert_eq!(view.title, "Local Weather");
        let labels: Vec<&str> = view.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Location", "Temp (C)", "Feels Like (C)"]);
        assert_eq!(view.rows[0].value, "London");
        assert_eq!(view.rows[1].value, "14.2");
    }

    #[test]
    fn test_expanded_rows_in_response_order() {
        let view = weather_view(&reading(), true);

        let rows: Vec<(&str, &str)> = view
            .rows
            .iter()
            .skip(3)
            .map(|r| (r.label.as_str(), r.value.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![("Temp Min", "12.78"), ("Pressure", "1015"), ("Humidity", "71.67")]
        );
    }
}
