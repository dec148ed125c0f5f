//! Card carousel
//!
//! The carousel lays the dashboard cards out in a strip and decides which
//! navigation buttons are visible. Visibility is derived from the strip's scroll
//! metrics and recomputed on every scroll or resize observation; nothing about it
//! is stored beyond the last metrics seen.
//!
//! Observers registered with [`Carousel::observe`] are told whenever the button
//! visibility or layout mode changes. Registration returns an [`ObserverGuard`];
//! dropping the guard deregisters the observer.

use crate::tokens::{breakpoints, scroll, sizing, spacing};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tracing::trace;
use uuid::Uuid;

// =============================================================================
// Scroll Edge Detection
// =============================================================================

/// Horizontal scroll measurements of the strip
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollMetrics {
    /// Current scroll offset
    pub scroll_left: f32,
    /// Total scrollable width of the content
    pub scroll_width: f32,
    /// Visible width of the strip
    pub client_width: f32,
}

impl ScrollMetrics {
    /// Create scroll metrics
    pub fn new(scroll_left: f32, scroll_width: f32, client_width: f32) -> Self {
        Self {
            scroll_left,
            scroll_width,
            client_width,
        }
    }

    /// Largest reachable scroll offset
    pub fn max_offset(&self) -> f32 {
        (self.scroll_width - self.client_width).max(0.0)
    }
}

/// Which directions the strip can still scroll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScrollEdges {
    /// Content exists to the left of the viewport
    pub can_scroll_left: bool,
    /// Content exists to the right of the viewport
    pub can_scroll_right: bool,
}

impl ScrollEdges {
    /// Derive the edges from scroll metrics
    ///
    /// Offsets within one pixel of the maximum count as the right edge, which
    /// absorbs sub-pixel rounding.
    pub fn detect(metrics: &ScrollMetrics) -> Self {
        Self {
            can_scroll_left: metrics.scroll_left > 0.0,
            can_scroll_right: metrics.scroll_left < metrics.max_offset() - scroll::EDGE_TOLERANCE,
        }
    }
}

// =============================================================================
// Layout
// =============================================================================

/// Strip orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutMode {
    /// Cards side by side, scrolled with the navigation buttons
    Horizontal,
    /// Cards stacked, native vertical scrolling only
    Vertical,
}

impl LayoutMode {
    /// Layout for a viewport width
    pub fn for_viewport(width: u32) -> Self {
        if breakpoints::is_gt_phone(width) {
            LayoutMode::Horizontal
        } else {
            LayoutMode::Vertical
        }
    }
}

/// Navigation button direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScrollDirection {
    /// Towards the first card
    Left,
    /// Towards the last card
    Right,
}

/// Visibility of the two navigation buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NavControls {
    /// Show the left button
    pub show_left: bool,
    /// Show the right button
    pub show_right: bool,
}

/// Carousel geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Number of cards in the strip
    pub card_count: usize,
    /// Card slot width in horizontal mode
    pub card_width: f32,
    /// Card slot height
    pub card_height: f32,
    /// Gap between cards
    pub gap: f32,
    /// Offset change per navigation click
    pub scroll_step: f32,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            card_count: 3,
            card_width: sizing::card::WIDTH,
            card_height: sizing::card::HEIGHT,
            gap: spacing::CARD_GAP,
            scroll_step: scroll::STEP,
        }
    }
}

impl CarouselConfig {
    /// Set the number of cards
    pub fn with_card_count(mut self, count: usize) -> Self {
        self.card_count = count;
        self
    }

    /// Set the scroll step
    pub fn with_scroll_step(mut self, step: f32) -> Self {
        self.scroll_step = step;
        self
    }

    /// Width of the horizontal strip's content
    pub fn content_width(&self) -> f32 {
        match self.card_count {
            0 => 0.0,
            n => n as f32 * self.card_width + (n - 1) as f32 * self.gap,
        }
    }

    /// Card slot width in a layout mode (vertical cards fill the viewport)
    pub fn slot_width(&self, mode: LayoutMode, viewport_width: u32) -> f32 {
        match mode {
            LayoutMode::Horizontal => self.card_width,
            LayoutMode::Vertical => viewport_width as f32,
        }
    }
}

/// Resize observation of the strip element
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResizeObservation {
    /// Width of the whole viewport (selects the layout mode)
    pub viewport_width: u32,
    /// Total scrollable width of the strip content
    pub scroll_width: f32,
    /// Visible width of the strip
    pub client_width: f32,
}

/// What observers are told
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarouselSnapshot {
    /// Current layout mode
    pub layout: LayoutMode,
    /// Last metrics seen
    pub metrics: ScrollMetrics,
    /// Derived scroll edges
    pub edges: ScrollEdges,
    /// Derived button visibility
    pub controls: NavControls,
}

impl CarouselSnapshot {
    fn derive(layout: LayoutMode, metrics: ScrollMetrics) -> Self {
        let edges = ScrollEdges::detect(&metrics);
        let controls = match layout {
            LayoutMode::Horizontal => NavControls {
                show_left: edges.can_scroll_left,
                show_right: edges.can_scroll_right,
            },
            LayoutMode::Vertical => NavControls::default(),
        };

        Self {
            layout,
            metrics,
            edges,
            controls,
        }
    }

    fn visibly_differs(&self, other: &Self) -> bool {
        self.layout != other.layout || self.edges != other.edges
    }
}

// =============================================================================
// Observer Registration
// =============================================================================

type ScrollObserver = Arc<dyn Fn(&CarouselSnapshot) + Send + Sync>;
type ObserverRegistry = Mutex<HashMap<Uuid, ScrollObserver>>;

/// Keeps an observer registered; dropping it deregisters
#[must_use = "dropping the guard deregisters the observer"]
pub struct ObserverGuard {
    id: Uuid,
    registry: Weak<ObserverRegistry>,
}

impl ObserverGuard {
    /// Observer id
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl std::fmt::Debug for ObserverGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverGuard").field("id", &self.id).finish()
    }
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().remove(&self.id);
            trace!("Deregistered carousel observer {}", self.id);
        }
    }
}

// =============================================================================
// Carousel
// =============================================================================

/// Scroll state tracker for the card strip
pub struct Carousel {
    config: CarouselConfig,
    state: Mutex<CarouselSnapshot>,
    observers: Arc<ObserverRegistry>,
}

impl Carousel {
    /// Create a carousel for a viewport width, scrolled to the start
    pub fn new(config: CarouselConfig, viewport_width: u32) -> Self {
        let layout = LayoutMode::for_viewport(viewport_width);
        let metrics = ScrollMetrics::new(
            0.0,
            config.content_width(),
            (viewport_width as f32).min(config.content_width()),
        );

        Self {
            config,
            state: Mutex::new(CarouselSnapshot::derive(layout, metrics)),
            observers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Carousel geometry
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    /// Current state
    pub fn snapshot(&self) -> CarouselSnapshot {
        *self.state.lock()
    }

    /// Current scroll edges
    pub fn edges(&self) -> ScrollEdges {
        self.state.lock().edges
    }

    /// Current button visibility
    pub fn controls(&self) -> NavControls {
        self.state.lock().controls
    }

    /// Current layout mode
    pub fn layout(&self) -> LayoutMode {
        self.state.lock().layout
    }

    /// Record a scroll event
    pub fn on_scroll(&self, scroll_left: f32) -> CarouselSnapshot {
        self.update(|layout, metrics| (layout, ScrollMetrics { scroll_left, ..metrics }))
    }

    /// Record a resize of the strip or its content
    pub fn on_resize(&self, observation: ResizeObservation) -> CarouselSnapshot {
        self.update(|_, metrics| {
            (
                LayoutMode::for_viewport(observation.viewport_width),
                ScrollMetrics::new(
                    metrics.scroll_left,
                    observation.scroll_width,
                    observation.client_width,
                ),
            )
        })
    }

    /// Advance the strip by one step
    ///
    /// Returns the new offset, or `None` in vertical mode where the buttons are
    /// hidden.
    pub fn scroll_by(&self, direction: ScrollDirection) -> Option<f32> {
        let current = self.snapshot();
        if current.layout == LayoutMode::Vertical {
            return None;
        }

        let delta = match direction {
            ScrollDirection::Left => -self.config.scroll_step,
            ScrollDirection::Right => self.config.scroll_step,
        };
        let target = (current.metrics.scroll_left + delta).clamp(0.0, current.metrics.max_offset());

        Some(self.on_scroll(target).metrics.scroll_left)
    }

    /// Register an observer of visibility and layout changes
    pub fn observe<F>(&self, observer: F) -> ObserverGuard
    where
        F: Fn(&CarouselSnapshot) + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        self.observers.lock().insert(id, Arc::new(observer));
        trace!("Registered carousel observer {}", id);

        ObserverGuard {
            id,
            registry: Arc::downgrade(&self.observers),
        }
    }

    /// Number of registered observers
    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    fn update<F>(&self, apply: F) -> CarouselSnapshot
    where
        F: FnOnce(LayoutMode, ScrollMetrics) -> (LayoutMode, ScrollMetrics),
    {
        let (previous, next) = {
            let mut state = self.state.lock();
            let previous = *state;
            let (layout, metrics) = apply(previous.layout, previous.metrics);
            *state = CarouselSnapshot::derive(layout, metrics);
            (previous, *state)
        };

        if next.visibly_differs(&previous) {
            let observers: Vec<ScrollObserver> = self.observers.lock().values().cloned().collect();
            for observer in observers {
                observer(&next);
            }
        }

        next
    }
}

impl std::fmt::Debug for Carousel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Carousel")
            .field("config", &self.config)
            .field("state", &self.snapshot())
            .field("observers", &self.observer_count())
            .finish()
    }
}
