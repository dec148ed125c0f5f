//! Design tokens for the dashboard
//!
//! Pixel measurements for the card strip, page chrome and layout breakpoints.

use serde::{Deserialize, Serialize};

// =============================================================================
// Spacing Tokens
// =============================================================================

/// Spacing scale in pixels
pub mod spacing {
    /// 5px - Gap between cards in the strip
    pub const CARD_GAP: f32 = 5.0;
    /// 8px - Margin around a card
    pub const CARD_MARGIN: f32 = 8.0;
    /// 16px - Padding inside a card
    pub const CARD_PADDING: f32 = 16.0;
    /// 16px - Vertical margin below the strip
    pub const STRIP_MARGIN: f32 = 16.0;

    /// Get spacing value by name
    pub fn get(name: &str) -> Option<f32> {
        match name {
            "card-gap" => Some(CARD_GAP),
            "card-margin" => Some(CARD_MARGIN),
            "card-padding" => Some(CARD_PADDING),
            "strip-margin" => Some(STRIP_MARGIN),
            _ => None,
        }
    }
}

// =============================================================================
// Sizing Tokens
// =============================================================================

/// Component sizes in pixels
pub mod sizing {
    /// Card slot sizes
    pub mod card {
        /// Slot width in the horizontal strip
        pub const WIDTH: f32 = 300.0;
        /// Slot height
        pub const HEIGHT: f32 = 340.0;
        /// Height of the card body before it scrolls
        pub const BODY_MAX_HEIGHT: f32 = 300.0;
    }

    /// Page chrome sizes
    pub mod chrome {
        /// Height of the top and bottom bars
        pub const BAR_HEIGHT: f32 = 64.0;
        /// Height of the platform banner, in points
        pub const BANNER_HEIGHT_PT: f32 = 36.0;
        /// Padding around the banner logo
        pub const BANNER_PADDING: f32 = 8.0;
    }

    /// Strip height in horizontal mode
    pub const STRIP_HEIGHT: f32 = 500.0;
}

// =============================================================================
// Breakpoints
// =============================================================================

/// Layout breakpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Breakpoint {
    /// Narrow viewport (< 500px), cards stack vertically
    Phone,
    /// Wider viewport (>= 500px), cards scroll horizontally
    GtPhone,
}

/// Breakpoint widths
pub mod breakpoints {
    /// Phone breakpoint (500px)
    pub const PHONE: u32 = 500;

    /// Check if width is greater than phone
    pub fn is_gt_phone(width: u32) -> bool {
        width >= PHONE
    }

    /// Get current breakpoint
    pub fn current(width: u32) -> super::Breakpoint {
        if width >= PHONE {
            super::Breakpoint::GtPhone
        } else {
            super::Breakpoint::Phone
        }
    }
}

// =============================================================================
// Scroll Tokens
// =============================================================================

/// Carousel scrolling
pub mod scroll {
    use super::{sizing, spacing};

    /// Offset change per navigation click; larger than one card plus its gap
    pub const STEP: f32 = 320.0;

    /// Offsets within this distance of the end count as the end
    pub const EDGE_TOLERANCE: f32 = 1.0;

    /// Width of one card plus the gap that follows it
    pub const fn card_pitch() -> f32 {
        sizing::card::WIDTH + spacing::CARD_GAP
    }
}
