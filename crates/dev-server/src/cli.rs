//! Command line of `dashboard-build`

use argh::FromArgs;
use std::path::PathBuf;

/// Bundle the dashboard, or run the HTTPS dev server with --watch
#[derive(Debug, Clone, PartialEq, Eq, FromArgs)]
pub struct Args {
    /// production build: minified, no source maps, never starts the dev server
    #[argh(switch)]
    pub production: bool,

    /// rebuild on change and serve over HTTPS, proxying API calls
    #[argh(switch)]
    pub watch: bool,

    /// configuration file (default: dashboard.toml if present)
    #[argh(option, short = 'c')]
    pub config: Option<PathBuf>,
}

/// What a run does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// One-shot build
    Build {
        /// Minify and drop source maps
        production: bool,
    },
    /// Watch and serve
    DevServer,
}

impl Args {
    /// Mode selected by the flags; `--production` wins over `--watch`
    pub fn mode(&self) -> Mode {
        if self.watch && !self.production {
            Mode::DevServer
        } else {
            Mode::Build {
                production: self.production,
            }
        }
    }
}
