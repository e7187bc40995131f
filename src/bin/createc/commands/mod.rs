//! Command implementations

pub mod build;
pub mod install;
pub mod uninstall;
pub mod version;

use anyhow::{Context, Result};

use createc::util::config::load_config;
use createc::util::shell::{ColorChoice, Palette, Verbosity};
use createc::util::{Config, GlobalContext, Shell};

/// State shared by every command: paths, configuration, and output.
pub struct Session {
    pub gctx: GlobalContext,
    pub config: Config,
    pub shell: Shell,
}

impl Session {
    /// Load configuration and set up the shell.
    ///
    /// An unknown color name in the configuration is fatal.
    pub fn new(verbose: bool, no_color: bool) -> Result<Self> {
        let gctx = GlobalContext::new()?;
        let config = load_config(
            gctx.global_config_path().as_deref(),
            &gctx.project_config_path(),
        )?;

        let palette =
            Palette::from_settings(&config.colors).context("invalid color configuration")?;
        let verbosity = if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        let color = if no_color {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };

        Ok(Session {
            gctx,
            config,
            shell: Shell::new(verbosity, color, palette),
        })
    }
}
