//! Reverse proxy to the API origin
//!
//! Every request the static file service cannot answer is forwarded verbatim
//! (method, path, query, headers, body) to the configured origin. Connection
//! failures become a single 502 for that request.

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, info};

/// Body of the 502 answered when the origin is unreachable
pub const PROXY_ERROR_MESSAGE: &str = "Proxy error: Could not connect to target service.";

/// Largest request body forwarded
pub const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, Error)]
enum ForwardError {
    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),

    #[error(transparent)]
    Upstream(#[from] reqwest::Error),
}

/// Shared proxy state
#[derive(Debug, Clone)]
pub struct ProxyState {
    client: reqwest::Client,
    origin: String,
}

impl ProxyState {
    /// Create a proxy to `origin` (scheme, host and port)
    pub fn new(origin: impl Into<String>) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| {
                crate::DevServerError::Server(format!("Failed to build proxy client: {}", e))
            })?;

        Ok(Self {
            client,
            origin: origin.into().trim_end_matches('/').to_string(),
        })
    }

    /// Origin requests are forwarded to
    pub fn origin(&self) -> &str {
        &self.origin
    }

    async fn forward(&self, req: Request) -> Result<Response, ForwardError> {
        let (parts, body) = req.into_parts();
        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let url = format!("{}{}", self.origin, path_and_query);

        let body = to_bytes(body, MAX_BODY_BYTES).await?;
        let upstream = self
            .client
            .request(parts.method, &url)
            .headers(forwarded_headers(&parts.headers))
            .body(body)
            .send()
            .await?;

        let status = upstream.status();
        let headers = forwarded_headers(upstream.headers());
        let bytes = upstream.bytes().await?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        response.headers_mut().extend(headers);
        Ok(response)
    }
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    *name == header::HOST
        || *name == header::CONNECTION
        || *name == header::TRANSFER_ENCODING
        || *name == header::CONTENT_LENGTH
}

fn forwarded_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !is_hop_by_hop(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

/// Fallback handler forwarding the request to the API origin
pub async fn proxy_request(State(proxy): State<ProxyState>, req: Request) -> Response {
    let method = req.method().clone();
    let target = req.uri().to_string();
    info!("[DevProxy] Proxying request: {} {} -> {}", method, target, proxy.origin);

    match proxy.forward(req).await {
        Ok(response) => response,
        Err(e) => {
            error!("[DevProxy] Proxy error for {} {}: {}", method, target, e);
            (
                StatusCode::BAD_GATEWAY,
                [(header::CONTENT_TYPE, "text/plain")],
                PROXY_ERROR_MESSAGE,
            )
                .into_response()
        }
    }
}
