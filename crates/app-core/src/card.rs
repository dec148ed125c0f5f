//! Display card state machine
//!
//! Every card starts in [`CardState::Loading`] and moves to either
//! [`CardState::Error`] or [`CardState::Ready`] once its queries settle. A
//! ready card can be expanded to show the rest of its detail rows.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Card lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CardState<T> {
    /// Waiting on a query (or on a query's inputs)
    Loading,
    /// A query failed; the notice is shown inline
    Error(String),
    /// All queries resolved
    Ready(T),
}

impl<T> Default for CardState<T> {
    fn default() -> Self {
        CardState::Loading
    }
}

impl<T> CardState<T> {
    /// Check if the card is still loading
    pub fn is_loading(&self) -> bool {
        matches!(self, CardState::Loading)
    }

    /// Check if the card is ready
    pub fn is_ready(&self) -> bool {
        matches!(self, CardState::Ready(_))
    }

    /// Error notice, if the card failed
    pub fn error(&self) -> Option<&str> {
        match self {
            CardState::Error(notice) => Some(notice),
            _ => None,
        }
    }

    /// Loaded data, if ready
    pub fn data(&self) -> Option<&T> {
        match self {
            CardState::Ready(data) => Some(data),
            _ => None,
        }
    }

    /// Borrow the state
    pub fn as_ref(&self) -> CardState<&T> {
        match self {
            CardState::Loading => CardState::Loading,
            CardState::Error(notice) => CardState::Error(notice.clone()),
            CardState::Ready(data) => CardState::Ready(data),
        }
    }

    /// Map the ready data
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> CardState<U> {
        match self {
            CardState::Loading => CardState::Loading,
            CardState::Error(notice) => CardState::Error(notice),
            CardState::Ready(data) => CardState::Ready(f(data)),
        }
    }
}

/// One labelled line of a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRow {
    /// Row label
    pub label: String,
    /// Display value
    pub value: String,
    /// External link for the value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl DetailRow {
    /// Create a row
    pub fn new(label: impl Into<String>, value: impl ToString) -> Self {
        Self {
            label: label.into(),
            value: value.to_string(),
            link: None,
        }
    }

    /// Attach a link to the value
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Rendered card body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    /// Card title
    pub title: String,
    /// Rows, the extra ones included when expanded
    pub rows: Vec<DetailRow>,
    /// Whether the extra rows are shown
    pub expanded: bool,
}

/// A card on the dashboard
#[async_trait]
pub trait DisplayCard: Send + Sync {
    /// Card title
    fn title(&self) -> &'static str;

    /// Run the card's queries and settle its state
    ///
    /// Failures end up in [`CardState::Error`]; they are never returned.
    async fn load(&mut self);

    /// Current state rendered for display
    fn render(&self) -> CardState<CardView>;

    /// Flip the "show more" toggle; returns the new value
    fn toggle_expanded(&mut self) -> bool;

    /// Whether the "show more" toggle is on
    fn is_expanded(&self) -> bool;
}
