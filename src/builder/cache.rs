//! Build cache.
//!
//! A small JSON record in the working directory remembering which
//! executable the last build invocation targeted. A clean build deletes that
//! executable before compiling. The record is written before compilation
//! starts, so it describes the intended artifact even when the build fails.
//!
//! Writes delete the old file and then write the new one. A crash between
//! the two leaves no cache, which the next build treats as a first build.
//! There is no locking; concurrent builds in one directory are unsupported.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::fs::remove_file_if_exists;

/// Name of the cache file.
pub const CACHE_FILE: &str = ".createc-cache.json";

/// Error reading or writing the cache file.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to write build cache `{}`", path.display())]
    Unwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read build cache `{}`", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("build cache `{}` is malformed: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

/// Error preparing a clean build.
#[derive(Debug, Error)]
pub enum CleanBuildError {
    #[error("clean build requested, but no previous executable is recorded")]
    NoPriorArtifact,
}

/// Persisted record of one build invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildCacheRecord {
    pub project: String,

    /// Output directory joined with the executable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executable: Option<String>,

    /// Fingerprint of the compiler invocation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl BuildCacheRecord {
    pub fn new(project: impl Into<String>, executable: impl Into<String>) -> Self {
        BuildCacheRecord {
            project: project.into(),
            executable: Some(executable.into()),
            fingerprint: None,
        }
    }

    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// Whether `other` was built from a different invocation.
    ///
    /// Records without a fingerprint never count as changed.
    pub fn invocation_changed(&self, other: &BuildCacheRecord) -> bool {
        match (&self.fingerprint, &other.fingerprint) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        }
    }
}

/// The cache file.
#[derive(Debug, Clone)]
pub struct BuildCache {
    path: PathBuf,
}

impl BuildCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        BuildCache { path: path.into() }
    }

    /// The cache file inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        BuildCache::new(dir.join(CACHE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record. `None` means no build has run here yet.
    pub fn read(&self) -> Result<Option<BuildCacheRecord>, CacheError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CacheError::Unreadable {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| CacheError::Malformed {
                path: self.path.clone(),
                reason: e.to_string(),
            })
    }

    /// Replace the record: delete the existing file, then write a new one.
    pub fn write(&self, record: &BuildCacheRecord) -> Result<(), CacheError> {
        let unwritable = |source| CacheError::Unwritable {
            path: self.path.clone(),
            source,
        };

        remove_file_if_exists(&self.path).map_err(unwritable)?;

        let content = serde_json::to_string_pretty(record)
            .map_err(|e| unwritable(std::io::Error::other(e)))?;
        std::fs::write(&self.path, content).map_err(unwritable)?;

        tracing::debug!("wrote build cache {}", self.path.display());
        Ok(())
    }
}

/// Delete the executable recorded by the previous build.
///
/// Relative paths are taken from `base`, the directory the build runs in.
/// Removal is best-effort: a file that is already gone or cannot be removed
/// is only logged. Returns the path that was targeted.
pub fn remove_previous_artifact(
    base: &Path,
    previous: Option<&BuildCacheRecord>,
) -> Result<PathBuf, CleanBuildError> {
    let executable = previous
        .and_then(|record| record.executable.as_deref())
        .ok_or(CleanBuildError::NoPriorArtifact)?;

    let path = base.join(executable);
    match remove_file_if_exists(&path) {
        Ok(true) => tracing::debug!("removed {}", path.display()),
        Ok(false) => tracing::debug!("{} was already gone", path.display()),
        Err(e) => tracing::debug!("could not remove {}: {}", path.display(), e),
    }

    Ok(path)
}
