//! HTTP plumbing for the dashboard backend
//!
//! Every backend call is a single JSON `GET` against a path under `/api/v1`.
//! Non-success responses carry a JSON error envelope whose human-readable text is
//! surfaced in [`Error::Api`]. Retries are deliberately absent here; the query
//! layer owns retry policy.

use crate::{Error, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for [`ApiClient`]
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Origin the `/api/v1/...` paths are resolved against
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Custom headers to include in all requests
    pub default_headers: HashMap<String, String>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3333".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("Zenith-Dashboard/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
        }
    }
}

impl ApiClientConfig {
    /// Create a new config with a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }
}

// =============================================================================
// Request / Error Envelope
// =============================================================================

/// A `GET` request against the backend
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Absolute path, e.g. `/api/v1/weather/51.5/-0.12`
    pub path: String,
    /// Query parameters, appended in insertion order
    pub params: Vec<(String, String)>,
}

impl ApiRequest {
    /// Create a request for a path
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }
}

/// JSON error envelope returned by the backend
///
/// The location endpoint reports `{ "message": .. }` while the astro endpoints
/// report `{ "error": .. }`; both are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Error code or text
    #[serde(default)]
    pub error: Option<String>,
    /// Error message
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    /// Human-readable text, preferring `message` over `error`
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|s| !s.is_empty())
    }
}

// =============================================================================
// Client
// =============================================================================

/// HTTP client for the dashboard backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a new client
    pub fn new(config: ApiClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::InvalidInput(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Issue a `GET` and decode the JSON body
    pub async fn get_json<T>(&self, request: ApiRequest) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url_for(&request.path);

        let mut req = self.client.get(&url);
        if !request.params.is_empty() {
            req = req.query(&request.params);
        }
        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        let response = req
            .send()
            .await
            .map_err(|e| Error::Network(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.text().map(str::to_string))
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::Malformed(format!("Failed to parse JSON: {}", e)))
    }

    /// Resolve a path against the configured origin
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Get the client configuration
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }
}
