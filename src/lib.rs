//! createc - manifest-driven builds for single C++ executables
//!
//! This crate reads a `create.json` manifest, validates it, assembles the
//! compiler invocation, and runs it between the manifest's hook scripts,
//! keeping a small build cache for clean rebuilds and installs.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for createc unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a mock command runner, a scripted install
/// prompt, and project fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{ManifestError, ProjectManifest};
pub use util::context::GlobalContext;
