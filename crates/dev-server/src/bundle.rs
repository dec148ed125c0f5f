//! Driving the external bundler
//!
//! The front end is bundled by an esbuild-compatible executable. One-shot
//! builds wait for the process; watch mode keeps a child that is killed when
//! the returned [`Watcher`] is dropped.

use crate::error::{DevServerError, Result};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, info};

/// Bundler invocation options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOptions {
    /// Entry point
    pub entry: PathBuf,
    /// Output bundle
    pub outfile: PathBuf,
    /// Minify and drop source maps
    pub production: bool,
}

impl BundleOptions {
    /// Create options for an entry and output file
    pub fn new(entry: impl Into<PathBuf>, outfile: impl Into<PathBuf>) -> Self {
        Self {
            entry: entry.into(),
            outfile: outfile.into(),
            production: false,
        }
    }

    /// Select a production build
    pub fn with_production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    /// Value `process.env.NODE_ENV` is replaced with
    pub fn node_env(&self) -> &'static str {
        if self.production {
            "production"
        } else {
            "development"
        }
    }

    /// Command-line arguments for a one-shot build
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            self.entry.display().to_string(),
            "--bundle".to_string(),
            format!("--outfile={}", self.outfile.display()),
            "--platform=browser".to_string(),
            "--format=iife".to_string(),
            "--loader:.js=jsx".to_string(),
            "--loader:.jsx=jsx".to_string(),
            format!("--define:process.env.NODE_ENV=\"{}\"", self.node_env()),
            "--jsx=automatic".to_string(),
        ];
        if self.production {
            args.push("--minify".to_string());
        } else {
            args.push("--sourcemap".to_string());
        }
        args
    }

    /// Command-line arguments for watch mode
    pub fn watch_args(&self) -> Vec<String> {
        let mut args = self.args();
        args.push("--watch=forever".to_string());
        args
    }
}

/// Bundler executable plus options
#[derive(Debug, Clone)]
pub struct Bundler {
    program: String,
    options: BundleOptions,
}

/// Running watch-mode bundler, killed on drop
#[derive(Debug)]
pub struct Watcher {
    child: Child,
}

impl Watcher {
    /// OS process id, if still running
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Stop the watcher and wait for it to exit
    pub async fn stop(mut self) -> Result<()> {
        self.child
            .kill()
            .await
            .map_err(|e| DevServerError::Bundle(format!("Failed to stop watcher: {}", e)))
    }
}

impl Bundler {
    /// Create a bundler
    pub fn new(program: impl Into<String>, options: BundleOptions) -> Self {
        Self {
            program: program.into(),
            options,
        }
    }

    /// Options in use
    pub fn options(&self) -> &BundleOptions {
        &self.options
    }

    /// Run a one-shot build
    pub async fn build(&self) -> Result<()> {
        let args = self.options.args();
        debug!("Running {} {}", self.program, args.join(" "));

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| DevServerError::Bundle(format!("Failed to run {}: {}", self.program, e)))?;

        if !status.success() {
            return Err(DevServerError::Bundle(format!(
                "{} exited with {}",
                self.program, status
            )));
        }

        info!(
            "Built {} ({})",
            self.options.outfile.display(),
            self.options.node_env()
        );
        Ok(())
    }

    /// Start the bundler in watch mode
    pub fn watch(&self) -> Result<Watcher> {
        let args = self.options.watch_args();
        debug!("Running {} {}", self.program, args.join(" "));

        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                DevServerError::Bundle(format!("Failed to start {}: {}", self.program, e))
            })?;

        info!("Watching {} for changes", self.options.entry.display());
        Ok(Watcher { child })
    }
}
