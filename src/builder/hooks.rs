//! Before/after build scripts.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::util::process::{CommandRunner, ProcessExit};
use crate::util::shell::{Shell, Status};

/// A hook script that did not succeed.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("script `{}` failed with {code}", script.display())]
    NonZeroExit { script: PathBuf, code: ProcessExit },
}

/// When a group of scripts runs relative to compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    Before,
    After,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::Before => write!(f, "before"),
            HookPhase::After => write!(f, "after"),
        }
    }
}

/// Runs hook scripts strictly in order, stopping at the first failure.
pub struct HookRunner<'a> {
    runner: &'a mut dyn CommandRunner,
    shell: &'a Shell,
}

impl<'a> HookRunner<'a> {
    pub fn new(runner: &'a mut dyn CommandRunner, shell: &'a Shell) -> Self {
        HookRunner { runner, shell }
    }

    /// Run every script of `phase`. Returns how many ran successfully.
    pub fn run(&mut self, phase: HookPhase, scripts: &[String]) -> Result<usize> {
        for (ran, script) in scripts.iter().enumerate() {
            let path = Path::new(script);
            self.shell
                .status(Status::Running, format!("{} script `{}`", phase, script));

            let exit = self
                .runner
                .run_script(path)
                .with_context(|| format!("failed to start {} script `{}`", phase, script))?;

            if !exit.success() {
                tracing::debug!("{} script `{}` stopped after {} script(s)", phase, script, ran);
                return Err(ScriptError::NonZeroExit {
                    script: path.to_path_buf(),
                    code: exit,
                }
                .into());
            }
        }

        Ok(scripts.len())
    }
}
