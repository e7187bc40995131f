//! Toolchain invocation assembly.
//!
//! The invocation is a flat list of fragments. Literal fragments are single
//! arguments and get quoted when rendered; shell fragments are passed to the
//! shell untouched, so `$(pkg-config ...)` and user compiler options are
//! only evaluated when the command line runs.

use std::borrow::Cow;

use serde::Serialize;

use crate::builder::resolver::LibraryResolution;
use crate::builder::toolchain::Toolchain;
use crate::core::ProjectManifest;
use crate::util::hash::Fingerprint;
use crate::util::process::shell_quote;

/// One piece of the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Fragment {
    /// A single argument, quoted as needed
    Literal(String),
    /// Shell syntax, emitted verbatim
    Shell(String),
}

impl Fragment {
    pub fn literal(arg: impl Into<String>) -> Self {
        Fragment::Literal(arg.into())
    }

    pub fn shell(text: impl Into<String>) -> Self {
        Fragment::Shell(text.into())
    }

    /// Render the fragment as command-line text.
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Fragment::Literal(arg) => Cow::Owned(shell_quote(arg)),
            Fragment::Shell(text) => Cow::Borrowed(text),
        }
    }
}

/// A complete compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainInvocation {
    /// Compiler driver
    pub program: String,
    /// Arguments in emission order
    pub fragments: Vec<Fragment>,
}

impl ToolchainInvocation {
    /// Render the single command line handed to the shell.
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for fragment in &self.fragments {
            let rendered = fragment.render();
            if rendered.is_empty() {
                continue;
            }
            line.push(' ');
            line.push_str(&rendered);
        }
        line
    }

    /// Literal arguments only, in order.
    pub fn literal_args(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().filter_map(|f| match f {
            Fragment::Literal(arg) => Some(arg.as_str()),
            Fragment::Shell(_) => None,
        })
    }

    /// Stable fingerprint of the invocation, used for change detection.
    pub fn fingerprint(&self) -> String {
        let mut fp = Fingerprint::new();
        fp.update_str(&self.program);
        for fragment in &self.fragments {
            match fragment {
                Fragment::Literal(arg) => fp.update_tagged(0, arg),
                Fragment::Shell(text) => fp.update_tagged(1, text),
            };
        }
        fp.finish_short()
    }
}

/// Assemble the compiler invocation for a validated manifest.
///
/// `resolutions` holds one entry per manifest library, in manifest order.
/// Emission order: output path, language standard, sources, verbose, debug,
/// optimization, libraries, include dirs, library dirs, compiler options.
/// Nothing is deduplicated or reordered.
pub fn compile_plan(
    manifest: &ProjectManifest,
    resolutions: &[LibraryResolution],
    toolchain: &Toolchain,
) -> ToolchainInvocation {
    let mut fragments = vec![
        Fragment::literal("-o"),
        Fragment::literal(manifest.executable_path()),
        Fragment::literal(format!("-std=c++{}", manifest.language_standard())),
    ];

    fragments.extend(manifest.sources.iter().map(Fragment::literal));

    if manifest.is_verbose() {
        fragments.push(Fragment::literal("-v"));
    }

    if manifest.is_debug() {
        fragments.push(Fragment::literal("-g"));
    }

    let level = manifest.optimization_level();
    if level > 0 {
        fragments.push(Fragment::literal(format!("-O{}", level)));
    }

    for resolution in resolutions {
        fragments.extend(resolution.fragments());
    }

    for dir in manifest.includes() {
        fragments.push(Fragment::literal(format!("-I{}", dir)));
    }

    for dir in manifest.libdirs() {
        fragments.push(Fragment::literal(format!("-L{}", dir)));
    }

    if let Some(options) = manifest.compiler_options() {
        fragments.push(Fragment::shell(options));
    }

    ToolchainInvocation {
        program: toolchain.compiler.clone(),
        fragments,
    }
}
