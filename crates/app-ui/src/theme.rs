//! Theme provider for the dashboard
//!
//! The palette is generated from a single base colour: lighter and darker
//! variants are derived with [`adjust_hex_color`], the surface colours come from
//! the light or dark scheme.
//!
//! # Usage
//!
//! ```rust
//! use app_ui::theme::{ThemeName, ThemeState};
//!
//! let mut state = ThemeState::new(ThemeName::Light);
//! state.set_base_color("#336699");
//! assert_eq!(state.current_theme().palette.primary, "#336699");
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

// =============================================================================
// Color Utilities
// =============================================================================

/// A color represented as a hex string (e.g., "#ffffff")
pub type Color = String;

/// Base colour used when none is configured
pub const DEFAULT_BASE_COLOR: &str = "#1976d2";

/// Percentage used for the light and dark primary variants
pub const VARIANT_SHIFT_PERCENT: f64 = 20.0;

/// Parse a `#RRGGBB` or `#RGB` color string to RGB components
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if !digits.is_ascii() {
        return None;
    }

    match digits.len() {
        6 => {
            let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
            let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
            let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
            Some((r, g, b))
        }
        3 => {
            let channel = |i: usize| {
                let nibble = u8::from_str_radix(&digits[i..i + 1], 16).ok()?;
                Some(nibble * 17)
            };
            Some((channel(0)?, channel(1)?, channel(2)?))
        }
        _ => None,
    }
}

/// Convert RGB to a lowercase hex string
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Lighten (positive `percent`) or darken (negative) a hex colour
///
/// Every channel moves by `floor(255 * percent / 100)` and is clamped to
/// `0..=255`. Input that is not `#RRGGBB` or `#RGB` is returned unchanged.
pub fn adjust_hex_color(hex: &str, percent: f64) -> String {
    let Some((r, g, b)) = parse_hex_color(hex) else {
        warn!("Invalid hex color format: {}. Returning original.", hex);
        return hex.to_string();
    };

    let delta = (255.0 * (percent / 100.0)).floor() as i32;
    let adjust = |channel: u8| (i32::from(channel) + delta).clamp(0, 255) as u8;

    rgb_to_hex(adjust(r), adjust(g), adjust(b))
}

// =============================================================================
// Theme
// =============================================================================

/// Theme name enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    /// Light theme
    #[default]
    Light,
    /// Dark theme
    Dark,
}

impl ThemeName {
    /// Get the color scheme name
    pub fn color_scheme(&self) -> &'static str {
        match self {
            ThemeName::Light => "light",
            ThemeName::Dark => "dark",
        }
    }
}

impl std::fmt::Display for ThemeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeName::Light => write!(f, "Light"),
            ThemeName::Dark => write!(f, "Dark"),
        }
    }
}

impl std::str::FromStr for ThemeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(ThemeName::Light),
            "dark" => Ok(ThemeName::Dark),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

/// Colour palette
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Base colour (app bars, links, buttons)
    pub primary: Color,
    /// Lighter variant of the base colour
    pub primary_light: Color,
    /// Darker variant of the base colour
    pub primary_dark: Color,
    /// Page background
    pub background: Color,
    /// Card surface
    pub surface: Color,
    /// Body text
    pub text: Color,
    /// Secondary text (detail values)
    pub text_secondary: Color,
    /// Error notices
    pub error: Color,
}

/// Complete theme definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    /// Theme name
    pub name: ThemeName,
    /// Color scheme (light or dark)
    pub color_scheme: String,
    /// Color palette
    pub palette: Palette,
}

impl Theme {
    /// Check if this is a dark theme
    pub fn is_dark(&self) -> bool {
        self.name == ThemeName::Dark
    }
}

/// Generate a theme from a base colour
pub fn generate_theme(name: ThemeName, base_color: &str) -> Theme {
    let primary_light = adjust_hex_color(base_color, VARIANT_SHIFT_PERCENT);
    let primary_dark = adjust_hex_color(base_color, -VARIANT_SHIFT_PERCENT);

    let palette = match name {
        ThemeName::Light => Palette {
            primary: base_color.to_string(),
            primary_light,
            primary_dark,
            background: "#fafafa".to_string(),
            surface: "#ffffff".to_string(),
            text: "#212121".to_string(),
            text_secondary: "#616161".to_string(),
            error: "#d32f2f".to_string(),
        },
        ThemeName::Dark => Palette {
            primary: base_color.to_string(),
            primary_light,
            primary_dark,
            background: "#121212".to_string(),
            surface: "#1e1e1e".to_string(),
            text: "#ffffff".to_string(),
            text_secondary: "#b0b0b0".to_string(),
            error: "#f44336".to_string(),
        },
    };

    Theme {
        name,
        color_scheme: name.color_scheme().to_string(),
        palette,
    }
}

// =============================================================================
// Theme Provider State
// =============================================================================

fn default_base_color() -> String {
    DEFAULT_BASE_COLOR.to_string()
}

/// Theme state shared by everything under the theme provider
///
/// Only the name and base colour are serialized; the theme is regenerated
/// from them on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ThemeSettings")]
pub struct ThemeState {
    /// Current theme name
    pub theme_name: ThemeName,
    /// Base colour the palette is generated from
    pub base_color: Color,
    /// Current theme (regenerated by the setters)
    #[serde(skip)]
    pub theme: Theme,
}

#[derive(Deserialize)]
struct ThemeSettings {
    theme_name: ThemeName,
    #[serde(default = "default_base_color")]
    base_color: Color,
}

impl From<ThemeSettings> for ThemeState {
    fn from(settings: ThemeSettings) -> Self {
        Self {
            theme: generate_theme(settings.theme_name, &settings.base_color),
            theme_name: settings.theme_name,
            base_color: settings.base_color,
        }
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new(ThemeName::Light)
    }
}

impl ThemeState {
    /// Create a new theme state with the given theme and the default base colour
    pub fn new(theme_name: ThemeName) -> Self {
        Self {
            theme_name,
            base_color: default_base_color(),
            theme: generate_theme(theme_name, DEFAULT_BASE_COLOR),
        }
    }

    /// Set the current theme
    pub fn set_theme(&mut self, theme_name: ThemeName) {
        self.theme_name = theme_name;
        self.theme = generate_theme(theme_name, &self.base_color);
    }

    /// Set the base colour and regenerate the palette
    pub fn set_base_color(&mut self, base_color: &str) {
        self.base_color = base_color.to_string();
        self.theme = generate_theme(self.theme_name, &self.base_color);
    }

    /// Get the current theme
    pub fn current_theme(&self) -> &Theme {
        &self.theme
    }
}
