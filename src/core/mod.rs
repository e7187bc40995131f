//! Core data structures for createc.
//!
//! The project manifest and its validation rules live here; everything in
//! `builder` consumes a validated [`ProjectManifest`].

pub mod manifest;

pub use manifest::{
    resolve_manifest_path, ManifestError, ProjectManifest, Scripts, MANIFEST_FILE,
    SUPPORTED_STANDARDS,
};
