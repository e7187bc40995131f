//! Build planning and execution.
//!
//! This module turns a validated manifest into a compiler invocation, keeps
//! the build cache, resolves toolkit libraries, and runs the invocation with
//! its hook scripts.

pub mod cache;
pub mod context;
pub mod executor;
pub mod hooks;
pub mod plan;
pub mod resolver;
pub mod toolchain;

pub use cache::{BuildCache, BuildCacheRecord, CacheError, CleanBuildError};
pub use context::BuildContext;
pub use executor::{BuildError, BuildExecutor, BuildState};
pub use hooks::{HookPhase, HookRunner, ScriptError};
pub use plan::{compile_plan, Fragment, ToolchainInvocation};
pub use resolver::{resolve_library, LibraryResolution, Prompt, PromptError, StdinPrompt};
pub use toolchain::Toolchain;
