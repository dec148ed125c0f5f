//! Build and dev server configuration
//!
//! Read from an optional TOML file; every field has a default so an empty (or
//! missing) `dashboard.toml` gives the stock development setup.

use crate::error::{DevServerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

/// Directory under the home directory holding the development certificate
pub const CERT_DIR: &str = ".consumer-certs";

/// Build and dev server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevServerConfig {
    /// HTTPS port of the dev server
    #[serde(default = "default_port")]
    pub port: u16,

    /// Address the dev server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Origin every non-static request is proxied to
    #[serde(default = "default_api_origin")]
    pub api_origin: String,

    /// Directory of files copied verbatim into the output
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    /// Output directory, also the static root of the dev server
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Bundle entry point
    #[serde(default = "default_entry")]
    pub entry: PathBuf,

    /// Bundler executable
    #[serde(default = "default_bundler")]
    pub bundler: String,

    /// URL opened in the browser once the server is up
    #[serde(default)]
    pub public_url: Option<String>,

    /// TLS certificate (PEM)
    #[serde(default = "default_cert_path")]
    pub cert_path: PathBuf,

    /// TLS private key (PEM)
    #[serde(default = "default_key_path")]
    pub key_path: PathBuf,

    /// Log filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Open the browser after start-up
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

fn default_port() -> u16 {
    443
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_api_origin() -> String {
    "http://localhost:3333".to_string()
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_entry() -> PathBuf {
    PathBuf::from("src/index.jsx")
}

fn default_bundler() -> String {
    "esbuild".to_string()
}

fn cert_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join(CERT_DIR)
}

fn default_cert_path() -> PathBuf {
    cert_dir().join("consumer.crt")
}

fn default_key_path() -> PathBuf {
    cert_dir().join("consumer.key")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_open_browser() -> bool {
    true
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            api_origin: default_api_origin(),
            public_dir: default_public_dir(),
            out_dir: default_out_dir(),
            entry: default_entry(),
            bundler: default_bundler(),
            public_url: None,
            cert_path: default_cert_path(),
            key_path: default_key_path(),
            log_level: default_log_level(),
            open_browser: default_open_browser(),
        }
    }
}

impl DevServerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DevServerError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content)
            .map_err(|e| DevServerError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Load the given file, or the default file if present, or the defaults
    ///
    /// An explicitly named file must exist.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Path of the bundle written into the output directory
    pub fn bundle_path(&self) -> PathBuf {
        self.out_dir.join("bundle.js")
    }

    /// URL to open in the browser
    pub fn browser_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| format!("https://localhost:{}", self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DevServerConfig::default();
        assert_eq!(config.port, 443);
        assert_eq!(config.api_origin, "http://localhost:3333");
        assert_eq!(config.bundle_path(), PathBuf::from("dist/bundle.js"));
        assert!(config.cert_path.ends_with(".consumer-certs/consumer.crt"));
        assert!(config.key_path.ends_with(".consumer-certs/consumer.key"));
        assert_eq!(config.browser_url(), "https://localhost:443");
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: DevServerConfig = toml::from_str("").unwrap();
        assert_eq!(config, DevServerConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "port = 8443\napi_origin = \"http://127.0.0.1:4000\"\npublic_url = \"https://dash.local:8443\"\nopen_browser = false"
        )
        .unwrap();

        let config = DevServerConfig::load(file.path()).unwrap();

        assert_eq!(config.port, 8443);
        assert_eq!(config.api_origin, "http://127.0.0.1:4000");
        assert_eq!(config.browser_url(), "https://dash.local:8443");
        assert!(!config.open_browser);
        assert_eq!(config.out_dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = DevServerConfig::resolve(Some(Path::new("/nonexistent/dashboard.toml")))
            .unwrap_err();
        assert!(matches!(err, DevServerError::Config(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();

        let err = DevServerConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
