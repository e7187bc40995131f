//! Test fixtures for common test scenarios.
//!
//! This module provides project directories and manifest generators for
//! tests that need real files on disk.

use std::path::{Path, PathBuf};

use crate::core::MANIFEST_FILE;

/// A temporary project directory containing a `create.json`.
///
/// Dropping the fixture removes the directory.
pub struct ProjectFixture {
    dir: tempfile::TempDir,
}

impl ProjectFixture {
    /// Create a project with the given manifest text.
    pub fn new(manifest: &str) -> Self {
        let dir = tempfile::TempDir::new().expect("failed to create temp dir");
        std::fs::write(dir.path().join(MANIFEST_FILE), manifest)
            .expect("failed to write manifest");
        ProjectFixture { dir }
    }

    /// Create a project building `name` from a single `main.cpp`.
    pub fn minimal(name: &str) -> Self {
        let fixture = ProjectFixture::new(&minimal_manifest(name));
        fixture.add_file("main.cpp", minimal_main_cpp());
        fixture
    }

    /// Project root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the manifest file.
    pub fn manifest_path(&self) -> PathBuf {
        self.root().join(MANIFEST_FILE)
    }

    /// Write a file relative to the project root.
    pub fn add_file(&self, rel: impl AsRef<Path>, content: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(&path, content).expect("failed to write file");
        path
    }

    /// Write a shell script exiting with `code`.
    pub fn add_script(&self, rel: impl AsRef<Path>, code: i32) -> PathBuf {
        self.add_file(rel, &exit_script(code))
    }
}

/// Manifest with only the required fields.
pub fn minimal_manifest(name: &str) -> String {
    format!(
        r#"{{
    "project": "{}",
    "sources": ["main.cpp"]
}}"#,
        name
    )
}

/// Manifest using every optional field with its short key.
pub fn full_manifest(name: &str) -> String {
    format!(
        r#"{{
    "project": "{name}",
    "executable": "{name}-bin",
    "output": "build",
    "sources": ["main.cpp", "util.cpp"],
    "optlvl": 2,
    "cppstd": 17,
    "libraries": ["m", "gtk3"],
    "options": "-Wall",
    "verbose": false,
    "debug": true,
    "clean": false,
    "includes": ["include"],
    "libdirs": ["lib"],
    "scripts": {{
        "before": ["scripts/pre.sh"],
        "after": ["scripts/post.sh"]
    }}
}}"#
    )
}

/// Minimal C++ program.
pub fn minimal_main_cpp() -> &'static str {
    r#"int main() {
    return 0;
}
"#
}

/// A POSIX shell script that exits with `code`.
pub fn exit_script(code: i32) -> String {
    format!("#!/bin/sh\nexit {}\n", code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProjectManifest;

    #[test]
    fn test_fixture_manifests_parse() {
        let minimal = ProjectFixture::minimal("app");
        let manifest = ProjectManifest::load(&minimal.manifest_path()).unwrap();
        assert_eq!(manifest.project, "app");

        let full = ProjectFixture::new(&full_manifest("tool"));
        let manifest = ProjectManifest::load(&full.manifest_path()).unwrap();
        assert_eq!(manifest.executable_name(), "tool-bin");
        assert_eq!(manifest.before_scripts(), ["scripts/pre.sh".to_string()]);
    }
}
