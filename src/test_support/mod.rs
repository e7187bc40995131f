//! Test utilities and mocks for createc unit tests.
//!
//! [`MockRunner`] stands in for every external process a build spawns, and
//! [`ScriptedPrompt`] answers install questions from a fixed list.
//!
//! # Example
//!
//! ```rust,ignore
//! use createc::test_support::{MockRunner, RunnerCall, ScriptedPrompt};
//!
//! #[test]
//! fn test_example() {
//!     let mut runner = MockRunner::new().with_installed("gtk+-3.0");
//!     let mut prompt = ScriptedPrompt::new(["y"]);
//!
//!     // Drive the build with the mocks...
//!     assert_eq!(runner.calls()[0], RunnerCall::Query("gtk+-3.0".into()));
//! }
//! ```

pub mod fixtures;

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::builder::resolver::Prompt;
use crate::util::process::{CommandRunner, ProcessExit};

// Re-export fixtures for convenience
pub use fixtures::*;

/// One call recorded by [`MockRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerCall {
    /// Package query for a pkg-config module
    Query(String),
    /// Package install
    Install(String),
    /// Hook script
    Script(PathBuf),
    /// Compiler command line
    Compile(String),
}

/// Mock [`CommandRunner`] that records calls instead of spawning processes.
///
/// Every process succeeds unless configured otherwise, and no package is
/// installed unless added with [`MockRunner::with_installed`].
#[derive(Debug, Default)]
pub struct MockRunner {
    installed: HashSet<String>,
    script_exits: HashMap<PathBuf, i32>,
    compile_exit: i32,
    fail_install: bool,
    watched: Option<PathBuf>,
    watched_at_compile: Option<bool>,
    calls: Vec<RunnerCall>,
}

impl MockRunner {
    /// Create a new mock runner.
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// Report `module` as installed.
    pub fn with_installed(mut self, module: &str) -> Self {
        self.installed.insert(module.to_string());
        self
    }

    /// Make `script` exit with `code`.
    pub fn with_script_exit(mut self, script: impl Into<PathBuf>, code: i32) -> Self {
        self.script_exits.insert(script.into(), code);
        self
    }

    /// Make the compiler exit with `code`.
    pub fn with_compile_exit(mut self, code: i32) -> Self {
        self.compile_exit = code;
        self
    }

    /// Make the package installer fail to start.
    pub fn with_failing_install(mut self) -> Self {
        self.fail_install = true;
        self
    }

    /// Record whether `path` exists at the moment the compiler runs.
    pub fn watching(mut self, path: impl Into<PathBuf>) -> Self {
        self.watched = Some(path.into());
        self
    }

    /// Whether the watched path existed when the compiler ran.
    ///
    /// `None` if the compiler never ran or nothing is watched.
    pub fn watched_at_compile(&self) -> Option<bool> {
        self.watched_at_compile
    }

    /// Get all calls in order.
    pub fn calls(&self) -> &[RunnerCall] {
        &self.calls
    }

    /// Whether the compiler was invoked.
    pub fn compiled(&self) -> bool {
        self.calls
            .iter()
            .any(|c| matches!(c, RunnerCall::Compile(_)))
    }
}

impl CommandRunner for MockRunner {
    fn package_installed(&mut self, module: &str) -> Result<bool> {
        self.calls.push(RunnerCall::Query(module.to_string()));
        Ok(self.installed.contains(module))
    }

    fn install_package(&mut self, package: &str) -> Result<()> {
        self.calls.push(RunnerCall::Install(package.to_string()));
        if self.fail_install {
            bail!("installer not found");
        }
        Ok(())
    }

    fn run_script(&mut self, script: &Path) -> Result<ProcessExit> {
        self.calls.push(RunnerCall::Script(script.to_path_buf()));
        let code = self.script_exits.get(script).copied().unwrap_or(0);
        Ok(ProcessExit::code(code))
    }

    fn run_command_line(&mut self, command_line: &str) -> Result<ProcessExit> {
        self.calls.push(RunnerCall::Compile(command_line.to_string()));
        if let Some(ref path) = self.watched {
            self.watched_at_compile = Some(path.exists());
        }
        Ok(ProcessExit::code(self.compile_exit))
    }
}

/// Mock [`Prompt`] answering from a fixed list.
///
/// Asking more questions than there are answers is an error.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    asked: usize,
}

impl ScriptedPrompt {
    pub fn new<I>(answers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        ScriptedPrompt {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: 0,
        }
    }

    /// Number of questions asked so far.
    pub fn asked(&self) -> usize {
        self.asked
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> Result<String> {
        self.asked += 1;
        match self.answers.pop_front() {
            Some(answer) => Ok(answer),
            None => bail!("unexpected question: {}", question),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_records_calls() {
        let mut runner = MockRunner::new()
            .with_installed("gtk+-3.0")
            .with_script_exit("fail.sh", 7);

        assert!(runner.package_installed("gtk+-3.0").unwrap());
        assert!(!runner.package_installed("Qt5Core").unwrap());
        assert_eq!(
            runner.run_script(Path::new("fail.sh")).unwrap().exit_code(),
            Some(7)
        );
        assert!(runner.run_script(Path::new("ok.sh")).unwrap().success());
        assert!(!runner.compiled());

        assert_eq!(runner.calls().len(), 4);
    }

    #[test]
    fn test_scripted_prompt() {
        let mut prompt = ScriptedPrompt::new(["y", "n"]);

        assert_eq!(prompt.ask("first?").unwrap(), "y");
        assert_eq!(prompt.ask("second?").unwrap(), "n");
        assert!(prompt.ask("third?").is_err());
        assert_eq!(prompt.asked(), 3);
    }
}
