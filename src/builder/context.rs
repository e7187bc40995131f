//! Build context - toolchain, cache, and the external-process seams.

use std::fmt;
use std::path::PathBuf;

use crate::builder::cache::BuildCache;
use crate::builder::resolver::Prompt;
use crate::builder::toolchain::Toolchain;
use crate::util::context::GlobalContext;
use crate::util::process::CommandRunner;
use crate::util::shell::Shell;

/// Everything a build needs besides the manifest.
pub struct BuildContext<'a> {
    /// Directory the build runs in; manifest paths are relative to it
    pub root: PathBuf,

    /// Compiler driver and shell
    pub toolchain: Toolchain,

    /// Build cache in the invocation directory
    pub cache: BuildCache,

    /// Runs package queries, installs, scripts, and the compiler
    pub runner: &'a mut dyn CommandRunner,

    /// Answers install questions
    pub prompt: &'a mut dyn Prompt,

    /// User-facing output
    pub shell: &'a Shell,
}

impl fmt::Debug for BuildContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("root", &self.root)
            .field("toolchain", &self.toolchain)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<'a> BuildContext<'a> {
    /// Create a build context for the current directory.
    ///
    /// `runner` should evaluate command lines with `toolchain.shell`.
    pub fn new(
        gctx: &GlobalContext,
        toolchain: Toolchain,
        runner: &'a mut dyn CommandRunner,
        prompt: &'a mut dyn Prompt,
        shell: &'a Shell,
    ) -> Self {
        BuildContext {
            root: gctx.cwd().to_path_buf(),
            toolchain,
            cache: BuildCache::new(gctx.cache_path()),
            runner,
            prompt,
            shell,
        }
    }
}
