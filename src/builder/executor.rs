//! Build execution.
//!
//! Runs before-scripts, the compiler, then after-scripts. The sequence is
//! linear: `Idle → RunningBeforeScripts → Compiling → RunningAfterScripts →
//! Done`, and any failure moves to `Aborted` without running later steps.

use anyhow::Result;
use thiserror::Error;

use crate::builder::hooks::{HookPhase, HookRunner};
use crate::builder::plan::ToolchainInvocation;
use crate::util::process::{CommandRunner, ProcessExit};
use crate::util::shell::{Shell, Status};

/// The compiler did not succeed.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("building completed with errors ({0})")]
    CompilationFailed(ProcessExit),
}

/// Where a build is in its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Idle,
    RunningBeforeScripts,
    Compiling,
    RunningAfterScripts,
    Done,
    Aborted,
}

/// Sequences hook scripts around the compiler invocation.
pub struct BuildExecutor<'a> {
    runner: &'a mut dyn CommandRunner,
    shell: &'a Shell,
    state: BuildState,
}

impl<'a> BuildExecutor<'a> {
    pub fn new(runner: &'a mut dyn CommandRunner, shell: &'a Shell) -> Self {
        BuildExecutor {
            runner,
            shell,
            state: BuildState::Idle,
        }
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Run the whole sequence.
    pub fn execute(
        &mut self,
        invocation: &ToolchainInvocation,
        before: &[String],
        after: &[String],
    ) -> Result<()> {
        let result = self.run_steps(invocation, before, after);
        self.state = match result {
            Ok(()) => BuildState::Done,
            Err(_) => BuildState::Aborted,
        };
        result
    }

    fn run_steps(
        &mut self,
        invocation: &ToolchainInvocation,
        before: &[String],
        after: &[String],
    ) -> Result<()> {
        self.state = BuildState::RunningBeforeScripts;
        HookRunner::new(&mut *self.runner, self.shell).run(HookPhase::Before, before)?;

        self.state = BuildState::Compiling;
        let command_line = invocation.command_line();
        self.shell.verbose(Status::Running, &command_line);
        tracing::debug!("compiling: {}", command_line);

        let exit = self.runner.run_command_line(&command_line)?;
        if !exit.success() {
            return Err(BuildError::CompilationFailed(exit).into());
        }

        self.state = BuildState::RunningAfterScripts;
        HookRunner::new(&mut *self.runner, self.shell).run(HookPhase::After, after)?;

        Ok(())
    }
}
