//! Global context for createc operations.
//!
//! Provides centralized access to the working directory and the paths
//! derived from it.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::builder::cache::CACHE_FILE;

/// Project directories for createc
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("com", "createc", "createc"));

/// Global context containing paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Directory holding the global config.toml
    config_dir: Option<PathBuf>,
}

impl GlobalContext {
    /// Create a new GlobalContext for the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext {
            cwd,
            config_dir: PROJECT_DIRS.as_ref().map(|d| d.config_dir().to_path_buf()),
        })
    }

    /// Create a GlobalContext with a specific working directory and no
    /// global configuration.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        GlobalContext {
            cwd,
            config_dir: None,
        }
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Path of the build cache file.
    pub fn cache_path(&self) -> PathBuf {
        self.cwd.join(CACHE_FILE)
    }

    /// Get the global configuration file path.
    pub fn global_config_path(&self) -> Option<PathBuf> {
        self.config_dir.as_ref().map(|d| d.join("config.toml"))
    }

    /// Get the project-local createc directory.
    pub fn project_createc_dir(&self) -> PathBuf {
        self.cwd.join(".createc")
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        self.project_createc_dir().join("config.toml")
    }
}
