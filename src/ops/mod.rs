//! High-level operations.
//!
//! This module contains the implementation of createc commands.

pub mod createc_build;
pub mod createc_install;

pub use createc_build::{build, plan_json, BuildMode, BuildOptions, BuildResult};
pub use createc_install::{install, uninstall, InstallError, InstallOptions};
