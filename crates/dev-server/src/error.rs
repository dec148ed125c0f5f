//! Error types for the build script and dev server

use std::path::PathBuf;
use thiserror::Error;

/// Result type for dev server operations
pub type Result<T> = std::result::Result<T, DevServerError>;

/// Dev server errors
///
/// Every variant is fatal for the `dashboard-build` process.
#[derive(Debug, Error)]
pub enum DevServerError {
    /// Configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// File-system operation failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// TLS certificate or key could not be loaded
    #[error(
        "Error starting HTTPS server: {message}. Please ensure '{}' and '{}' exist and are readable.",
        cert_path.display(),
        key_path.display()
    )]
    Certificate {
        /// Certificate path
        cert_path: PathBuf,
        /// Private key path
        key_path: PathBuf,
        /// Loader message
        message: String,
    },

    /// Bundler could not be started or exited unsuccessfully
    #[error("Bundler error: {0}")]
    Bundle(String),

    /// Server could not start or stopped with an error
    #[error("Server error: {0}")]
    Server(String),
}

impl DevServerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DevServerError::Io {
            path: path.into(),
            source,
        }
    }
}
