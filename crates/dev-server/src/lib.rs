//! Build script and HTTPS development server for the dashboard front end
//!
//! `dashboard-build` copies `public/` into `dist/` and bundles the entry point.
//! With `--watch` it keeps the bundler running and serves `dist/` over HTTPS,
//! reverse-proxying every other path to the local API.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assets;
pub mod bundle;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod proxy;
pub mod server;

pub use cli::{Args, Mode};
pub use config::DevServerConfig;
pub use error::{DevServerError, Result};
