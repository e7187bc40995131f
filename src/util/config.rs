//! Configuration file support for createc.
//!
//! createc reads two configuration files, both optional:
//! - Global: `<config dir>/createc/config.toml` - user-wide defaults
//! - Project: `.createc/config.toml` - overrides for one directory
//!
//! Project config takes precedence over global config, key by key.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Compiler used when neither configuration nor `CXX` names one.
pub const DEFAULT_COMPILER: &str = "g++";

/// Shell used for the compiler invocation and hook scripts.
pub const DEFAULT_SHELL: &str = "sh";

/// Command that checks whether a pkg-config module is installed.
pub const DEFAULT_QUERY_COMMAND: &str = "pkg-config --exists";

/// Command that installs a system package.
pub const DEFAULT_INSTALL_COMMAND: &str = "sudo apt-get install -y";

/// Directory `createc install` copies executables into.
pub const DEFAULT_BIN_DIR: &str = "/usr/local/bin";

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown color `{value}` for `colors.{key}`")]
    UnknownColor { key: &'static str, value: String },
}

/// createc configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Toolchain settings
    pub toolchain: ToolchainSettings,

    /// System package handling
    pub packages: PackageSettings,

    /// `createc install` settings
    pub install: InstallSettings,

    /// Colors used for status output
    pub colors: ColorSettings,
}

/// Toolchain settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Compiler driver (e.g., g++, clang++)
    pub compiler: Option<String>,

    /// Shell that evaluates the invocation
    pub shell: Option<String>,
}

impl ToolchainSettings {
    pub fn shell(&self) -> &str {
        self.shell.as_deref().unwrap_or(DEFAULT_SHELL)
    }
}

/// System package commands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageSettings {
    /// Query command; the module name is appended
    pub query: Option<String>,

    /// Install command; the package name is appended
    pub install: Option<String>,
}

impl PackageSettings {
    pub fn query(&self) -> &str {
        self.query.as_deref().unwrap_or(DEFAULT_QUERY_COMMAND)
    }

    pub fn install(&self) -> &str {
        self.install.as_deref().unwrap_or(DEFAULT_INSTALL_COMMAND)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallSettings {
    pub bin_dir: Option<PathBuf>,
}

impl InstallSettings {
    pub fn bin_dir(&self) -> PathBuf {
        self.bin_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BIN_DIR))
    }
}

/// Color names per status role. Unset roles keep their default color.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    pub info: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
    pub progress: Option<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.toolchain.compiler, other.toolchain.compiler);
        take(&mut self.toolchain.shell, other.toolchain.shell);
        take(&mut self.packages.query, other.packages.query);
        take(&mut self.packages.install, other.packages.install);
        take(&mut self.install.bin_dir, other.install.bin_dir);
        take(&mut self.colors.info, other.colors.info);
        take(&mut self.colors.warning, other.colors.warning);
        take(&mut self.colors.error, other.colors.error);
        take(&mut self.colors.success, other.colors.success);
        take(&mut self.colors.progress, other.colors.progress);
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.createc/config.toml)
/// 2. Global config
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global) = global_path.filter(|p| p.exists()) {
        config.merge(Config::load(global)?);
    }

    if project_path.exists() {
        config.merge(Config::load(project_path)?);
    }

    Ok(config)
}
