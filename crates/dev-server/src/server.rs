//! HTTPS dev server: static files from the output directory, everything else
//! proxied to the API origin

use crate::config::DevServerConfig;
use crate::error::{DevServerError, Result};
use crate::proxy::{proxy_request, ProxyState};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Time in-flight requests get to finish after Ctrl-C
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Build the dev server router
///
/// Files under `static_dir` win; missing files and non-GET/HEAD requests fall
/// through to the proxy.
pub fn router(static_dir: &Path, proxy: ProxyState) -> Router {
    let proxy_routes = Router::new().fallback(proxy_request).with_state(proxy);

    let static_files = ServeDir::new(static_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(proxy_routes);

    Router::new()
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
}

/// Load the TLS certificate and key
///
/// A missing or unreadable pair is fatal for the dev server.
pub async fn load_tls(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig> {
    RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(|e| DevServerError::Certificate {
            cert_path: cert_path.to_path_buf(),
            key_path: key_path.to_path_buf(),
            message: e.to_string(),
        })
}

fn bind_address(config: &DevServerConfig) -> Result<SocketAddr> {
    format!("{}:{}", config.bind_address, config.port)
        .parse()
        .map_err(|e| {
            DevServerError::Config(format!(
                "Invalid bind address '{}:{}': {}",
                config.bind_address, config.port, e
            ))
        })
}

async fn shutdown_signal(handle: Handle<SocketAddr>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        return;
    }
    info!("Shutting down dev server...");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}

async fn open_when_listening(handle: Handle<SocketAddr>, url: String) {
    if handle.listening().await.is_none() {
        return;
    }
    match open::that_detached(&url) {
        Ok(()) => info!("Opened {} in the browser", url),
        Err(e) => warn!("Failed to open browser: {}", e),
    }
}

/// Serve until Ctrl-C
pub async fn serve(config: &DevServerConfig, proxy: ProxyState) -> Result<()> {
    let tls = load_tls(&config.cert_path, &config.key_path).await?;
    let addr = bind_address(config)?;
    let app = router(&config.out_dir, proxy);

    let handle: Handle<SocketAddr> = Handle::new();
    tokio::spawn(shutdown_signal(handle.clone()));
    if config.open_browser {
        tokio::spawn(open_when_listening(handle.clone(), config.browser_url()));
    }

    info!("Dev server running at https://{}", addr);
    info!("Proxying API requests to {}", config.api_origin);

    axum_server::bind_rustls(addr, tls)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(|e| DevServerError::Server(e.to_string()))?;

    info!("Dev server stopped");
    Ok(())
}
