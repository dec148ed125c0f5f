//! User interface model for the Zenith dashboard
//!
//! This crate holds the framework-independent parts of the page: the card
//! carousel with its scroll-edge detection, design tokens, the theme provider
//! and the page chrome around the strip.
//!
//! # Modules
//!
//! - [`carousel`] - Scroll-edge detection, layout mode and observer registration
//! - [`tokens`] - Design tokens (card sizes, spacing, breakpoints, scroll step)
//! - [`theme`] - Theme provider and colour adjustment
//! - [`chrome`] - Top bar, bottom bar and platform banner
//!
//! # Example
//!
//! ```rust
//! use app_ui::carousel::{Carousel, CarouselConfig, ScrollDirection};
//!
//! let carousel = Carousel::new(CarouselConfig::default(), 800);
//! assert!(carousel.controls().show_right);
//!
//! carousel.scroll_by(ScrollDirection::Right);
//! assert!(carousel.controls().show_left);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod carousel;
pub mod chrome;
pub mod theme;
pub mod tokens;

// Re-export commonly used types
pub use carousel::{
    Carousel, CarouselConfig, CarouselSnapshot, LayoutMode, NavControls, ObserverGuard,
    ResizeObservation, ScrollDirection, ScrollEdges, ScrollMetrics,
};

pub use chrome::{BottomBar, PageChrome, PlatformBanner, TopBar};

pub use theme::{adjust_hex_color, generate_theme, Palette, Theme, ThemeName, ThemeState};

pub use tokens::{breakpoints, scroll, sizing, spacing, Breakpoint};
