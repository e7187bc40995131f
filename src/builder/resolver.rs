//! Library resolution.
//!
//! A library name either names a GUI toolkit from [`TOOLKITS`], whose flags
//! come from `pkg-config` when the command line runs, or is passed to the
//! linker as `-l<name>`. Toolkits are checked for installation first, and a
//! missing one triggers the install prompt.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;

use crate::builder::plan::Fragment;
use crate::util::process::CommandRunner;
use crate::util::shell::{Shell, Status};

/// A toolkit known by logical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolkit {
    /// Name used in the manifest
    pub name: &'static str,
    /// pkg-config module
    pub module: &'static str,
    /// System package providing the module
    pub system_package: &'static str,
    /// Flags emitted after the pkg-config fragment
    pub extra_flags: &'static [&'static str],
}

impl Toolkit {
    /// The pkg-config command producing this toolkit's flags.
    pub fn flags_command(&self) -> String {
        format!("pkg-config --cflags --libs {}", self.module)
    }
}

/// Toolkits with dedicated handling.
pub const TOOLKITS: &[Toolkit] = &[
    Toolkit {
        name: "gtkmm",
        module: "gtkmm-3.0",
        system_package: "libgtkmm-3.0-dev",
        extra_flags: &[],
    },
    Toolkit {
        name: "gtk3",
        module: "gtk+-3.0",
        system_package: "libgtk-3-dev",
        extra_flags: &[],
    },
    Toolkit {
        name: "qt5widgets",
        module: "Qt5Widgets",
        system_package: "qtbase5-dev",
        extra_flags: &["-fPIC"],
    },
    Toolkit {
        name: "qt5core",
        module: "Qt5Core",
        system_package: "qtbase5-dev",
        extra_flags: &["-fPIC"],
    },
    Toolkit {
        name: "qt5gui",
        module: "Qt5Gui",
        system_package: "qtbase5-dev",
        extra_flags: &["-fPIC"],
    },
];

/// How a requested library is linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LibraryResolution {
    /// A toolkit whose flags come from pkg-config
    Toolkit { toolkit: &'static Toolkit },
    /// A plain `-l<name>` library
    Generic { name: String },
}

impl LibraryResolution {
    /// Command-line fragments for this library.
    pub fn fragments(&self) -> Vec<Fragment> {
        match self {
            LibraryResolution::Toolkit { toolkit } => {
                let mut fragments =
                    vec![Fragment::shell(format!("$({})", toolkit.flags_command()))];
                fragments.extend(toolkit.extra_flags.iter().map(|f| Fragment::literal(*f)));
                fragments
            }
            LibraryResolution::Generic { name } => vec![Fragment::literal(format!("-l{}", name))],
        }
    }

    /// The toolkit, if this library needs an installation check.
    pub fn toolkit(&self) -> Option<&'static Toolkit> {
        match self {
            LibraryResolution::Toolkit { toolkit } => Some(*toolkit),
            LibraryResolution::Generic { .. } => None,
        }
    }
}

/// Resolve a library name from the manifest.
pub fn resolve_library(name: &str) -> LibraryResolution {
    match TOOLKITS.iter().find(|t| t.name == name) {
        Some(toolkit) => LibraryResolution::Toolkit { toolkit },
        None => LibraryResolution::Generic {
            name: name.to_string(),
        },
    }
}

/// Error from the install prompt.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("invalid choice `{0}`; expected `y` or `n`")]
    InvalidChoice(String),
}

/// Source of answers to yes/no questions.
pub trait Prompt {
    /// Ask `question` and return the raw answer.
    fn ask(&mut self, question: &str) -> Result<String>;
}

/// Prompt reading answers from standard input.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> Result<String> {
        eprint!("{} [y/n] ", question);
        io::stderr().flush().ok();

        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("failed to read answer from stdin")?;
        Ok(answer)
    }
}

/// Interpret a single-character yes/no answer.
pub fn parse_choice(answer: &str) -> Result<bool, PromptError> {
    match answer.trim() {
        "y" | "Y" => Ok(true),
        "n" | "N" => Ok(false),
        other => Err(PromptError::InvalidChoice(other.to_string())),
    }
}

/// What happened when a library was checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Generic library; nothing to check
    NotChecked,
    AlreadyInstalled,
    /// The installer was run (its result is not checked)
    Installed,
    /// The user declined installation
    Declined,
}

/// Make sure a toolkit library is installed, asking the user when it is not.
///
/// Declining is not an error: the compiler invocation still carries the
/// toolkit flags and will fail on its own if the package is really missing.
pub fn ensure_installed(
    resolution: &LibraryResolution,
    runner: &mut dyn CommandRunner,
    prompt: &mut dyn Prompt,
    shell: &Shell,
) -> Result<InstallOutcome> {
    let Some(toolkit) = resolution.toolkit() else {
        return Ok(InstallOutcome::NotChecked);
    };

    if runner.package_installed(toolkit.module)? {
        tracing::debug!("`{}` is installed", toolkit.module);
        return Ok(InstallOutcome::AlreadyInstalled);
    }

    shell.warn(format!(
        "`{}` requires package `{}`, which is not installed",
        toolkit.name, toolkit.system_package
    ));

    let answer = prompt.ask(&format!("Install `{}` now?", toolkit.system_package))?;
    if !parse_choice(&answer)? {
        shell.status(
            Status::Skipped,
            format!("installation of `{}`", toolkit.system_package),
        );
        return Ok(InstallOutcome::Declined);
    }

    shell.status(Status::Installing, toolkit.system_package);
    if let Err(e) = runner.install_package(toolkit.system_package) {
        tracing::warn!("installer for `{}` failed to run: {:#}", toolkit.system_package, e);
    }

    Ok(InstallOutcome::Installed)
}
