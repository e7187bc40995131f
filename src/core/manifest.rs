//! `create.json` manifest parsing and validation.
//!
//! The manifest is a JSON object describing one executable. `project` and
//! `sources` are required; every other field is optional and is checked by
//! walking [`OPTIONAL_FIELDS`] once, in order, stopping at the first invalid
//! value. Nothing is auto-corrected.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use serde_json::{Map, Value};
use thiserror::Error;

/// File name appended when the build path names a directory.
pub const MANIFEST_FILE: &str = "create.json";

/// Accepted values for the language standard.
pub const SUPPORTED_STANDARDS: [u32; 5] = [11, 14, 17, 20, 23];

/// Language standard used when the manifest does not set one.
pub const DEFAULT_STANDARD: u32 = 11;

/// Highest accepted optimization level.
pub const MAX_OPTIMIZATION_LEVEL: u8 = 3;

/// Error while loading or validating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not open manifest `{}`", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest `{}` is malformed: {reason}", path.display())]
    MalformedDocument { path: PathBuf, reason: String },

    #[error("required field `{0}` is not specified")]
    MissingField(&'static str),

    #[error("invalid value for `{field}`: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Scripts run around the compiler invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scripts {
    /// Run in order before compiling
    pub before: Vec<String>,
    /// Run in order after a successful compile
    pub after: Vec<String>,
}

/// A validated project manifest.
///
/// Optional fields keep their `Option` so that callers can tell an explicit
/// value from a default; the accessor methods apply the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectManifest {
    pub project: String,
    pub sources: Vec<String>,
    pub executable_name: Option<String>,
    /// Always ends with a path separator once validated
    pub output_directory: Option<String>,
    pub optimization_level: Option<u8>,
    pub language_standard: Option<u32>,
    pub libraries: Option<Vec<String>>,
    pub compiler_options: Option<String>,
    pub verbose: Option<bool>,
    pub debug_mode: Option<bool>,
    pub clean_build: Option<bool>,
    pub scripts: Option<Scripts>,
    pub includes: Option<Vec<String>>,
    pub libdirs: Option<Vec<String>>,
}

/// One optional manifest field: the keys it may appear under and the
/// validator that stores it.
struct FieldSpec {
    keys: &'static [&'static str],
    apply: fn(&'static str, &Value, &mut ProjectManifest) -> Result<(), ManifestError>,
}

/// Optional fields in validation order.
const OPTIONAL_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        keys: &["output", "outputDirectory"],
        apply: apply_output_directory,
    },
    FieldSpec {
        keys: &["clean", "cleanBuild"],
        apply: |key, value, m| {
            m.clean_build = Some(expect_bool(key, value)?);
            Ok(())
        },
    },
    FieldSpec {
        keys: &["options", "compilerOptions"],
        apply: |key, value, m| {
            m.compiler_options = Some(expect_string(key, value)?.to_string());
            Ok(())
        },
    },
    FieldSpec {
        keys: &["optlvl", "optimizationLevel"],
        apply: apply_optimization_level,
    },
    FieldSpec {
        keys: &["libraries"],
        apply: |key, value, m| {
            m.libraries = Some(expect_string_list(key, value)?);
            Ok(())
        },
    },
    FieldSpec {
        keys: &["cppstd", "languageStandard"],
        apply: apply_language_standard,
    },
    FieldSpec {
        keys: &["scripts"],
        apply: apply_scripts,
    },
    FieldSpec {
        keys: &["executable", "executableName"],
        apply: |key, value, m| {
            m.executable_name = Some(expect_non_empty_string(key, value)?.to_string());
            Ok(())
        },
    },
    FieldSpec {
        keys: &["verbose"],
        apply: |key, value, m| {
            m.verbose = Some(expect_bool(key, value)?);
            Ok(())
        },
    },
    FieldSpec {
        keys: &["debug", "debugMode"],
        apply: |key, value, m| {
            m.debug_mode = Some(expect_bool(key, value)?);
            Ok(())
        },
    },
    FieldSpec {
        keys: &["includes"],
        apply: |key, value, m| {
            m.includes = Some(expect_string_list(key, value)?);
            Ok(())
        },
    },
    FieldSpec {
        keys: &["libdirs"],
        apply: |key, value, m| {
            m.libdirs = Some(expect_string_list(key, value)?);
            Ok(())
        },
    },
];

impl ProjectManifest {
    /// Create a manifest with only the required fields set.
    pub fn new(project: impl Into<String>, sources: Vec<String>) -> Self {
        ProjectManifest {
            project: project.into(),
            sources,
            executable_name: None,
            output_directory: None,
            optimization_level: None,
            language_standard: None,
            libraries: None,
            compiler_options: None,
            verbose: None,
            debug_mode: None,
            clean_build: None,
            scripts: None,
            includes: None,
            libdirs: None,
        }
    }

    /// Load and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::NotFound {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&contents, path)
    }

    /// Parse and validate manifest contents. `path` is only used in errors.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ManifestError> {
        let document: Value =
            serde_json::from_str(contents).map_err(|e| ManifestError::MalformedDocument {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let Value::Object(fields) = document else {
            return Err(ManifestError::MalformedDocument {
                path: path.to_path_buf(),
                reason: "top level is not an object".to_string(),
            });
        };

        Self::from_fields(&fields)
    }

    fn from_fields(fields: &Map<String, Value>) -> Result<Self, ManifestError> {
        let project = fields
            .get("project")
            .ok_or(ManifestError::MissingField("project"))?;
        let project = expect_non_empty_string("project", project)?.to_string();

        let sources = fields
            .get("sources")
            .ok_or(ManifestError::MissingField("sources"))?;
        let sources = expect_string_list("sources", sources)?;
        if sources.is_empty() {
            return Err(invalid("sources", &Value::Array(Vec::new())));
        }

        let mut manifest = ProjectManifest::new(project, sources);

        for field in OPTIONAL_FIELDS {
            let found = field
                .keys
                .iter()
                .find_map(|key| fields.get(*key).map(|value| (*key, value)));

            if let Some((key, value)) = found {
                (field.apply)(key, value, &mut manifest)?;
            }
        }

        for key in fields.keys() {
            let known = key == "project"
                || key == "sources"
                || OPTIONAL_FIELDS.iter().any(|f| f.keys.contains(&key.as_str()));
            if !known {
                tracing::debug!("ignoring unknown manifest field `{}`", key);
            }
        }

        Ok(manifest)
    }

    /// Name of the produced executable.
    pub fn executable_name(&self) -> &str {
        self.executable_name.as_deref().unwrap_or(&self.project)
    }

    /// Output directory, ending with a path separator.
    pub fn output_directory(&self) -> String {
        self.output_directory
            .clone()
            .unwrap_or_else(|| format!(".{}", MAIN_SEPARATOR))
    }

    /// Full path of the produced executable.
    pub fn executable_path(&self) -> String {
        format!("{}{}", self.output_directory(), self.executable_name())
    }

    /// Optimization level; 0 means no flag is emitted.
    pub fn optimization_level(&self) -> u8 {
        self.optimization_level.unwrap_or(0)
    }

    pub fn language_standard(&self) -> u32 {
        self.language_standard.unwrap_or(DEFAULT_STANDARD)
    }

    pub fn libraries(&self) -> &[String] {
        self.libraries.as_deref().unwrap_or_default()
    }

    pub fn compiler_options(&self) -> Option<&str> {
        self.compiler_options.as_deref()
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose.unwrap_or(false)
    }

    pub fn is_debug(&self) -> bool {
        self.debug_mode.unwrap_or(false)
    }

    pub fn is_clean_build(&self) -> bool {
        self.clean_build.unwrap_or(false)
    }

    pub fn before_scripts(&self) -> &[String] {
        self.scripts.as_ref().map(|s| s.before.as_slice()).unwrap_or_default()
    }

    pub fn after_scripts(&self) -> &[String] {
        self.scripts.as_ref().map(|s| s.after.as_slice()).unwrap_or_default()
    }

    pub fn includes(&self) -> &[String] {
        self.includes.as_deref().unwrap_or_default()
    }

    pub fn libdirs(&self) -> &[String] {
        self.libdirs.as_deref().unwrap_or_default()
    }

    /// One line per optional field present in the manifest, describing the
    /// value that will be used. Follows validation order.
    pub fn describe_settings(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(dir) = &self.output_directory {
            lines.push(format!("Output directory set to `{}`.", dir));
        }
        if let Some(clean) = self.clean_build {
            lines.push(format!("Clean build {}.", if clean { "enabled" } else { "disabled" }));
        }
        if let Some(options) = &self.compiler_options {
            lines.push(format!("Added compiler options `{}`.", options));
        }
        match self.optimization_level {
            Some(0) => lines.push("Optimization disabled.".to_string()),
            Some(level) => lines.push(format!("Set optimization level to {}.", level)),
            None => {}
        }
        for lib in self.libraries() {
            lines.push(format!("Added library `{}` to executable.", lib));
        }
        if let Some(std) = self.language_standard {
            lines.push(format!("Set C++ standard to {}.", std));
        }
        if let Some(scripts) = &self.scripts {
            if scripts.before.is_empty() && scripts.after.is_empty() {
                lines.push("No build scripts added.".to_string());
            }
            for script in &scripts.before {
                lines.push(format!("Added pre-build script `{}`.", script));
            }
            for script in &scripts.after {
                lines.push(format!("Added post-build script `{}`.", script));
            }
        }
        if let Some(name) = &self.executable_name {
            lines.push(format!("Executable name set to `{}`.", name));
        }
        if let Some(verbose) = self.verbose {
            lines.push(format!(
                "Verbose compiler output {}.",
                if verbose { "enabled" } else { "disabled" }
            ));
        }
        if let Some(debug) = self.debug_mode {
            lines.push(format!(
                "Debug information {}.",
                if debug { "enabled" } else { "disabled" }
            ));
        }
        for dir in self.includes() {
            lines.push(format!("Added include directory `{}`.", dir));
        }
        for dir in self.libdirs() {
            lines.push(format!("Added library directory `{}`.", dir));
        }

        lines
    }
}

/// Resolve the manifest path given on the command line.
///
/// Directories (including `.` and `..`) get [`MANIFEST_FILE`] appended.
pub fn resolve_manifest_path(path: &Path) -> PathBuf {
    let names_dir = path == Path::new(".") || path == Path::new("..") || path.is_dir();
    if names_dir {
        path.join(MANIFEST_FILE)
    } else {
        path.to_path_buf()
    }
}

fn apply_output_directory(
    key: &'static str,
    value: &Value,
    m: &mut ProjectManifest,
) -> Result<(), ManifestError> {
    let mut dir = expect_non_empty_string(key, value)?.to_string();
    if !dir.ends_with('/') && !dir.ends_with(MAIN_SEPARATOR) {
        dir.push(MAIN_SEPARATOR);
    }
    m.output_directory = Some(dir);
    Ok(())
}

fn apply_optimization_level(
    key: &'static str,
    value: &Value,
    m: &mut ProjectManifest,
) -> Result<(), ManifestError> {
    let level = value
        .as_u64()
        .filter(|l| *l <= u64::from(MAX_OPTIMIZATION_LEVEL))
        .ok_or_else(|| invalid(key, value))?;

    m.optimization_level = Some(level as u8);
    Ok(())
}

fn apply_language_standard(
    key: &'static str,
    value: &Value,
    m: &mut ProjectManifest,
) -> Result<(), ManifestError> {
    let standard = value
        .as_u64()
        .and_then(|s| u32::try_from(s).ok())
        .filter(|s| SUPPORTED_STANDARDS.contains(s))
        .ok_or_else(|| invalid(key, value))?;

    m.language_standard = Some(standard);
    Ok(())
}

fn apply_scripts(
    key: &'static str,
    value: &Value,
    m: &mut ProjectManifest,
) -> Result<(), ManifestError> {
    let Value::Object(table) = value else {
        return Err(invalid(key, value));
    };

    let mut scripts = Scripts::default();
    if let Some(before) = table.get("before") {
        scripts.before = expect_string_list("scripts.before", before)?;
    }
    if let Some(after) = table.get("after") {
        scripts.after = expect_string_list("scripts.after", after)?;
    }

    m.scripts = Some(scripts);
    Ok(())
}

fn expect_bool(key: &'static str, value: &Value) -> Result<bool, ManifestError> {
    value.as_bool().ok_or_else(|| invalid(key, value))
}

fn expect_string<'a>(key: &'static str, value: &'a Value) -> Result<&'a str, ManifestError> {
    value.as_str().ok_or_else(|| invalid(key, value))
}

fn expect_non_empty_string<'a>(
    key: &'static str,
    value: &'a Value,
) -> Result<&'a str, ManifestError> {
    expect_string(key, value).and_then(|s| {
        if s.trim().is_empty() {
            Err(invalid(key, value))
        } else {
            Ok(s)
        }
    })
}

fn expect_string_list(key: &'static str, value: &Value) -> Result<Vec<String>, ManifestError> {
    let items = value.as_array().ok_or_else(|| invalid(key, value))?;

    items
        .iter()
        .map(|item| expect_non_empty_string(key, item).map(str::to_string))
        .collect()
}

fn invalid(field: &'static str, value: &Value) -> ManifestError {
    ManifestError::InvalidValue {
        field,
        value: value.to_string(),
    }
}
