//! Subprocess execution utilities.
//!
//! Every external program createc talks to (package query, package install,
//! hook scripts, the compiler) goes through [`CommandRunner`], so that build
//! logic can be exercised without spawning anything.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};

use anyhow::{Context, Result};

use crate::builder::toolchain::Toolchain;
use crate::util::config::PackageSettings;

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// Execute the command with captured output and wait for completion.
    pub fn exec(&self) -> Result<Output> {
        let mut cmd = self.build_command();
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        cmd.output()
            .with_context(|| format!("failed to execute `{}`", self.display_command()))
    }

    /// Execute with inherited stdio and return the exit status.
    pub fn status(&self) -> Result<ExitStatus> {
        let mut cmd = self.build_command();
        cmd.status()
            .with_context(|| format!("failed to execute `{}`", self.display_command()))
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// How an external process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessExit {
    code: Option<i32>,
}

impl ProcessExit {
    /// A process that exited with `code`.
    pub fn code(code: i32) -> Self {
        ProcessExit { code: Some(code) }
    }

    /// A process killed by a signal.
    pub fn signaled() -> Self {
        ProcessExit { code: None }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.code
    }
}

impl From<ExitStatus> for ProcessExit {
    fn from(status: ExitStatus) -> Self {
        ProcessExit {
            code: status.code(),
        }
    }
}

impl fmt::Display for ProcessExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "termination by signal"),
        }
    }
}

/// The external commands a build needs.
///
/// Each call blocks until the process has exited.
pub trait CommandRunner {
    /// Whether the pkg-config `module` is installed.
    fn package_installed(&mut self, module: &str) -> Result<bool>;

    /// Install a system package. The outcome of the installer is not checked.
    fn install_package(&mut self, package: &str) -> Result<()>;

    /// Run a hook script.
    fn run_script(&mut self, script: &Path) -> Result<ProcessExit>;

    /// Run a full command line through the shell.
    fn run_command_line(&mut self, command_line: &str) -> Result<ProcessExit>;
}

/// [`CommandRunner`] that spawns real processes.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    shell: String,
    query: String,
    install: String,
}

impl SystemRunner {
    pub fn new(
        shell: impl Into<String>,
        query: impl Into<String>,
        install: impl Into<String>,
    ) -> Self {
        SystemRunner {
            shell: shell.into(),
            query: query.into(),
            install: install.into(),
        }
    }

    /// Create a runner evaluating commands with the toolchain's shell.
    pub fn for_toolchain(toolchain: &Toolchain, packages: &PackageSettings) -> Self {
        SystemRunner::new(&toolchain.shell, packages.query(), packages.install())
    }

    fn shell_command(&self, command_line: &str) -> ProcessBuilder {
        ProcessBuilder::new(&self.shell).arg("-c").arg(command_line)
    }
}

impl CommandRunner for SystemRunner {
    fn package_installed(&mut self, module: &str) -> Result<bool> {
        let command_line = format!("{} {}", self.query, shell_quote(module));
        tracing::debug!("querying package: {}", command_line);

        let output = self.shell_command(&command_line).exec()?;
        Ok(output.status.success())
    }

    fn install_package(&mut self, package: &str) -> Result<()> {
        let command_line = format!("{} {}", self.install, shell_quote(package));
        tracing::debug!("installing package: {}", command_line);

        let status = self.shell_command(&command_line).status()?;
        if !status.success() {
            tracing::debug!("`{}` ended with {}", command_line, ProcessExit::from(status));
        }
        Ok(())
    }

    fn run_script(&mut self, script: &Path) -> Result<ProcessExit> {
        let pb = ProcessBuilder::new(&self.shell).arg(script);
        tracing::debug!("running `{}`", pb.display_command());

        Ok(pb.status()?.into())
    }

    fn run_command_line(&mut self, command_line: &str) -> Result<ProcessExit> {
        tracing::debug!("running `{}`", command_line);
        Ok(self.shell_command(command_line).status()?.into())
    }
}

/// Quote `arg` for a POSIX shell, leaving plain words untouched.
pub fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=+:,@%^".contains(c));

    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
