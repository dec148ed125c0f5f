//! `dashboard-build` entry point

use anyhow::Context;
use dev_server::{pipeline, Args, DevServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();
    let config = DevServerConfig::resolve(args.config.as_deref())
        .context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }

    let mode = args.mode();
    tracing::info!("Running {:?}", mode);

    pipeline::run(mode, &config)
        .await
        .with_context(|| format!("{:?} failed", mode))
}
