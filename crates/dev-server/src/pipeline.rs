//! Build and dev-server runs

use crate::assets::copy_public_files;
use crate::bundle::{BundleOptions, Bundler};
use crate::cli::Mode;
use crate::config::DevServerConfig;
use crate::error::Result;
use crate::proxy::ProxyState;
use crate::server;
use tracing::{info, warn};

fn bundler(config: &DevServerConfig, production: bool) -> Bundler {
    let options =
        BundleOptions::new(&config.entry, config.bundle_path()).with_production(production);
    Bundler::new(&config.bundler, options)
}

/// Copy public files and bundle once
pub async fn build(config: &DevServerConfig, production: bool) -> Result<()> {
    copy_public_files(&config.public_dir, &config.out_dir).await?;
    bundler(config, production).build().await
}

/// Copy public files, start the watcher and serve until Ctrl-C
pub async fn develop(config: &DevServerConfig) -> Result<()> {
    copy_public_files(&config.public_dir, &config.out_dir).await?;

    let watcher = bundler(config, false).watch()?;
    let proxy = ProxyState::new(&config.api_origin)?;
    let served = server::serve(config, proxy).await;

    if let Err(e) = watcher.stop().await {
        warn!("{}", e);
    }
    served
}

/// Run the selected mode
pub async fn run(mode: Mode, config: &DevServerConfig) -> Result<()> {
    match mode {
        Mode::Build { production } => {
            build(config, production).await?;
            info!("Build complete");
            Ok(())
        }
        Mode::DevServer => develop(config).await,
    }
}
