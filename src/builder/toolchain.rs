//! Compiler driver selection.
//!
//! Toolchain priority:
//! 1. `toolchain.compiler` from configuration
//! 2. The `CXX` environment variable
//! 3. [`DEFAULT_COMPILER`]

use crate::util::config::{ToolchainSettings, DEFAULT_COMPILER};
use crate::util::process::find_executable;

/// The compiler driver and the shell that evaluates its command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Compiler driver, as written in the command line
    pub compiler: String,
    /// Shell used to evaluate the command line
    pub shell: String,
}

impl Toolchain {
    pub fn new(compiler: impl Into<String>, shell: impl Into<String>) -> Self {
        Toolchain {
            compiler: compiler.into(),
            shell: shell.into(),
        }
    }

    /// Select the toolchain from configuration and environment.
    pub fn from_settings(settings: &ToolchainSettings) -> Self {
        let compiler = settings
            .compiler
            .clone()
            .or_else(|| std::env::var("CXX").ok().filter(|c| !c.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_COMPILER.to_string());

        Toolchain::new(compiler, settings.shell())
    }

    /// Whether the compiler driver can be found on PATH.
    ///
    /// Only meaningful for a bare program name; a driver with embedded
    /// arguments or a path is reported as available.
    pub fn is_available(&self) -> bool {
        let program = self.compiler.split_whitespace().next().unwrap_or_default();
        if program.contains(std::path::MAIN_SEPARATOR) || program.contains('/') {
            return std::path::Path::new(program).exists();
        }
        find_executable(program).is_some()
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Toolchain::from_settings(&ToolchainSettings::default())
    }
}
