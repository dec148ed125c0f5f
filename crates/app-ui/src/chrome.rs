//! Page chrome: the fixed top and bottom bars and the platform banner

use serde::{Deserialize, Serialize};

/// Banner background colour
pub const BANNER_COLOR: &str = "#FFEDD3";

/// Fixed bar at the top of the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopBar {
    /// Site title
    pub title: String,
}

/// Fixed bar at the bottom of the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BottomBar {
    /// Contact name
    pub contact_name: String,
    /// Contact e-mail address
    pub contact_email: String,
}

impl BottomBar {
    /// `mailto:` link for the contact address
    pub fn mailto(&self) -> String {
        format!("mailto:{}", self.contact_email)
    }

    /// Text shown in the bar, e.g. `Jane Doe (jane@example.com)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.contact_name, self.contact_email)
    }
}

/// Platform banner pinned to the bottom edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformBanner {
    /// Logo image URL
    pub logo_url: String,
    /// Alt text for the logo
    pub logo_alt: String,
    /// Background colour
    #[serde(default = "default_banner_color")]
    pub background: String,
}

fn default_banner_color() -> String {
    BANNER_COLOR.to_string()
}

/// Everything around the card strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageChrome {
    /// Top bar
    pub top_bar: TopBar,
    /// Bottom bar
    pub bottom_bar: BottomBar,
    /// Optional platform banner
    #[serde(default)]
    pub banner: Option<PlatformBanner>,
}

impl Default for PageChrome {
    fn default() -> Self {
        Self {
            top_bar: TopBar {
                title: "Zenith Dashboard".to_string(),
            },
            bottom_bar: BottomBar {
                contact_name: "Dashboard Maintainers".to_string(),
                contact_email: "maintainers@example.com".to_string(),
            },
            banner: None,
        }
    }
}

impl PageChrome {
    /// Set the site title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.top_bar.title = title.into();
        self
    }

    /// Set the contact shown in the bottom bar
    pub fn with_contact(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.bottom_bar = BottomBar {
            contact_name: name.into(),
            contact_email: email.into(),
        };
        self
    }

    /// Show a platform banner with the given logo
    pub fn with_banner(mut self, logo_url: impl Into<String>, logo_alt: impl Into<String>) -> Self {
        self.banner = Some(PlatformBanner {
            logo_url: logo_url.into(),
            logo_alt: logo_alt.into(),
            background: default_banner_color(),
        });
        self
    }
}
