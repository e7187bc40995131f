//! Implementation of `createc install` and `createc uninstall`.
//!
//! Both read the build cache to find the executable of the last build in
//! the current directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::builder::cache::BuildCache;
use crate::util::fs::{copy_file, remove_file_if_exists};

/// Error installing or removing the built executable.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("no build recorded in `{}`; run `createc build` first", cache.display())]
    NoBuildRecorded { cache: PathBuf },

    #[error("executable `{}` does not exist; run `createc build` first", .0.display())]
    ArtifactMissing(PathBuf),

    #[error("`{}` is not installed", .0.display())]
    NotInstalled(PathBuf),
}

/// Options for install and uninstall.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Directory the executable is copied into
    pub bin_dir: PathBuf,
}

/// Locate the executable recorded by the last build.
fn recorded_executable(root: &Path, cache: &BuildCache) -> Result<PathBuf> {
    let record = cache.read()?;
    let executable = record
        .and_then(|r| r.executable)
        .ok_or_else(|| InstallError::NoBuildRecorded {
            cache: cache.path().to_path_buf(),
        })?;

    Ok(root.join(executable))
}

fn installed_path(bin_dir: &Path, executable: &Path) -> Result<PathBuf> {
    let name = executable
        .file_name()
        .with_context(|| format!("`{}` has no file name", executable.display()))?;
    Ok(bin_dir.join(name))
}

/// Copy the last built executable into the bin directory.
///
/// Returns the installed path.
pub fn install(root: &Path, cache: &BuildCache, opts: &InstallOptions) -> Result<PathBuf> {
    let executable = recorded_executable(root, cache)?;
    if !executable.is_file() {
        return Err(InstallError::ArtifactMissing(executable).into());
    }

    let dest = installed_path(&opts.bin_dir, &executable)?;
    copy_file(&executable, &dest)?;
    tracing::debug!("copied {} to {}", executable.display(), dest.display());

    Ok(dest)
}

/// Remove the last built executable from the bin directory.
///
/// Returns the removed path.
pub fn uninstall(root: &Path, cache: &BuildCache, opts: &InstallOptions) -> Result<PathBuf> {
    let executable = recorded_executable(root, cache)?;
    let dest = installed_path(&opts.bin_dir, &executable)?;

    let removed = remove_file_if_exists(&dest)
        .with_context(|| format!("failed to remove {}", dest.display()))?;
    if !removed {
        return Err(InstallError::NotInstalled(dest).into());
    }

    Ok(dest)
}
