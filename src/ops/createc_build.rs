//! Implementation of `createc build`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::cache::{remove_previous_artifact, BuildCacheRecord};
use crate::builder::executor::{BuildExecutor, BuildState};
use crate::builder::plan::{compile_plan, ToolchainInvocation};
use crate::builder::resolver::{ensure_installed, resolve_library, InstallOutcome};
use crate::builder::BuildContext;
use crate::core::{resolve_manifest_path, ProjectManifest};
use crate::util::shell::Status;

/// How far a build goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Run the whole build
    #[default]
    Build,
    /// Stop after assembling the invocation
    Plan,
}

/// Options for the build command.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Manifest file or the directory containing it
    pub path: PathBuf,

    pub mode: BuildMode,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            path: PathBuf::from("."),
            mode: BuildMode::Build,
        }
    }
}

/// Result of a build.
#[derive(Debug)]
pub struct BuildResult {
    /// The validated manifest
    pub manifest: ProjectManifest,

    /// The compiler invocation
    pub invocation: ToolchainInvocation,

    /// Executable path, as recorded in the cache
    pub executable: String,

    /// Outcome of each toolkit installation check, in manifest order
    pub installs: Vec<(String, InstallOutcome)>,

    /// Where the build ended
    pub state: BuildState,
}

/// Build the project described by the manifest at `opts.path`.
///
/// In [`BuildMode::Plan`] the manifest is validated and the invocation
/// assembled, but nothing is written and no process is spawned.
pub fn build(ctx: &mut BuildContext<'_>, opts: &BuildOptions) -> Result<BuildResult> {
    let manifest_path = resolve_manifest_path(&ctx.root.join(&opts.path));
    let manifest = ProjectManifest::load(&manifest_path)?;
    tracing::debug!("loaded manifest {}", manifest_path.display());

    let resolutions: Vec<_> = manifest
        .libraries()
        .iter()
        .map(|name| resolve_library(name))
        .collect();
    let invocation = compile_plan(&manifest, &resolutions, &ctx.toolchain);
    let executable = manifest.executable_path();

    if opts.mode == BuildMode::Plan {
        return Ok(BuildResult {
            manifest,
            invocation,
            executable,
            installs: Vec::new(),
            state: BuildState::Idle,
        });
    }

    ctx.shell.status(
        Status::Building,
        format!("{} ({})", manifest.project, manifest_path.display()),
    );
    for line in manifest.describe_settings() {
        ctx.shell.note(line);
    }

    if !ctx.toolchain.is_available() {
        tracing::warn!("compiler `{}` not found on PATH", ctx.toolchain.compiler);
    }

    let previous = update_cache(ctx, &manifest, &invocation);

    if manifest.is_clean_build() {
        let removed = remove_previous_artifact(&ctx.root, previous.as_ref())?;
        ctx.shell
            .status(Status::Removed, display_relative(&removed, &ctx.root));
    }

    let mut installs: Vec<(String, InstallOutcome)> = Vec::new();
    for resolution in &resolutions {
        let Some(toolkit) = resolution.toolkit() else {
            continue;
        };
        if installs.iter().any(|(name, _)| name == toolkit.name) {
            continue;
        }
        let outcome =
            ensure_installed(resolution, &mut *ctx.runner, &mut *ctx.prompt, ctx.shell)?;
        installs.push((toolkit.name.to_string(), outcome));
    }

    let mut executor = BuildExecutor::new(&mut *ctx.runner, ctx.shell);
    executor.execute(
        &invocation,
        manifest.before_scripts(),
        manifest.after_scripts(),
    )?;
    let state = executor.state();

    ctx.shell.status(
        Status::Finished,
        format!("`{}` -> {}", manifest.project, executable),
    );

    Ok(BuildResult {
        manifest,
        invocation,
        executable,
        installs,
        state,
    })
}

/// Read the previous cache record and replace it with the current one.
///
/// Cache problems never fail the build here; an unreadable record counts as
/// no record. Returns the previous record.
fn update_cache(
    ctx: &BuildContext<'_>,
    manifest: &ProjectManifest,
    invocation: &ToolchainInvocation,
) -> Option<BuildCacheRecord> {
    let previous = match ctx.cache.read() {
        Ok(previous) => previous,
        Err(e) => {
            ctx.shell.warn(format!("{:#}", anyhow::Error::new(e)));
            None
        }
    };

    let current = BuildCacheRecord::new(&manifest.project, manifest.executable_path())
        .with_fingerprint(invocation.fingerprint());

    if let Some(ref previous) = previous {
        if previous.invocation_changed(&current) {
            tracing::debug!("build configuration changed since the last build");
        }
    }

    if let Err(e) = ctx.cache.write(&current) {
        ctx.shell.warn(format!("{:#}", anyhow::Error::new(e)));
    }

    previous
}

fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Render the plan of a build for `--plan` output.
pub fn plan_json(invocation: &ToolchainInvocation) -> Result<String> {
    serde_json::to_string_pretty(invocation).context("failed to serialize build plan")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::cache::{BuildCache, CleanBuildError};
    use crate::builder::executor::BuildError;
    use crate::builder::hooks::ScriptError;
    use crate::builder::toolchain::Toolchain;
    use crate::core::ManifestError;
    use crate::test_support::{
        full_manifest, MockRunner, ProjectFixture, RunnerCall, ScriptedPrompt,
    };
    use crate::util::shell::Shell;

    fn context<'a>(
        root: &Path,
        runner: &'a mut MockRunner,
        prompt: &'a mut ScriptedPrompt,
        shell: &'a Shell,
    ) -> BuildContext<'a> {
        BuildContext {
            root: root.to_path_buf(),
            toolchain: Toolchain::new("g++", "sh"),
            cache: BuildCache::in_dir(root),
            runner,
            prompt,
            shell,
        }
    }

    fn run(
        fixture: &ProjectFixture,
        runner: &mut MockRunner,
        prompt: &mut ScriptedPrompt,
        mode: BuildMode,
    ) -> Result<BuildResult> {
        let shell = Shell::quiet();
        let mut ctx = context(fixture.root(), runner, prompt, &shell);
        build(
            &mut ctx,
            &BuildOptions {
                path: PathBuf::from("."),
                mode,
            },
        )
    }

    fn no_answers() -> ScriptedPrompt {
        ScriptedPrompt::new(Vec::<String>::new())
    }

    fn cache_of(fixture: &ProjectFixture) -> Option<BuildCacheRecord> {
        BuildCache::in_dir(fixture.root()).read().unwrap()
    }

    #[cfg(unix)]
    #[test]
    fn test_reference_build() {
        let fixture = ProjectFixture::new(
            r#"{"project": "app", "sources": ["a.c", "b.c"], "optlvl": 2, "cppstd": 17}"#,
        );
        let mut runner = MockRunner::new();

        let result = run(&fixture, &mut runner, &mut no_answers(), BuildMode::Build).unwrap();

        assert_eq!(result.state, BuildState::Done);
        assert_eq!(
            runner.calls(),
            &[RunnerCall::Compile(
                "g++ -o ./app -std=c++17 a.c b.c -O2".to_string()
            )]
        );

        let record = cache_of(&fixture).unwrap();
        assert_eq!(record.project, "app");
        assert_eq!(record.executable.as_deref(), Some("./app"));
        assert_eq!(record.fingerprint, Some(result.invocation.fingerprint()));
    }

    #[test]
    fn test_plan_mode_has_no_side_effects() {
        let fixture = ProjectFixture::new(&full_manifest("tool"));
        let mut runner = MockRunner::new();

        let result = run(&fixture, &mut runner, &mut no_answers(), BuildMode::Plan).unwrap();

        assert_eq!(result.state, BuildState::Idle);
        assert_eq!(result.executable, "build/tool-bin");
        assert!(runner.calls().is_empty());
        assert!(cache_of(&fixture).is_none());

        let json = plan_json(&result.invocation).unwrap();
        assert!(json.contains("pkg-config --cflags --libs gtk+-3.0"));
    }

    #[test]
    fn test_missing_manifest() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut runner = MockRunner::new();
        let mut prompt = no_answers();
        let shell = Shell::quiet();
        let mut ctx = context(tmp.path(), &mut runner, &mut prompt, &shell);

        let err = build(&mut ctx, &BuildOptions::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ManifestError>(),
            Some(ManifestError::NotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_standard_has_no_side_effects() {
        let fixture =
            ProjectFixture::new(r#"{"project": "app", "sources": ["a.c"], "cppstd": 15}"#);
        let mut runner = MockRunner::new();

        let err = run(&fixture, &mut runner, &mut no_answers(), BuildMode::Build).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ManifestError>(),
            Some(ManifestError::InvalidValue { field: "cppstd", value }) if value == "15"
        ));
        assert!(runner.calls().is_empty());
        assert!(cache_of(&fixture).is_none());
    }

    #[test]
    fn test_clean_build_without_cache() {
        let fixture =
            ProjectFixture::new(r#"{"project": "app", "sources": ["a.c"], "clean": true}"#);
        let mut runner = MockRunner::new();

        let err = run(&fixture, &mut runner, &mut no_answers(), BuildMode::Build).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CleanBuildError>(),
            Some(CleanBuildError::NoPriorArtifact)
        ));
        assert!(!runner.compiled());
    }

    #[test]
    fn test_clean_build_removes_previous_executable_first() {
        let fixture = ProjectFixture::new(
            r#"{"project": "app", "sources": ["a.c"], "executable": "new", "clean": true}"#,
        );
        let old = fixture.add_file("old", "binary");
        BuildCache::in_dir(fixture.root())
            .write(&BuildCacheRecord::new("app", "./old"))
            .unwrap();

        let mut runner = MockRunner::new().watching(&old);
        run(&fixture, &mut runner, &mut no_answers(), BuildMode::Build).unwrap();

        assert!(!old.exists());
        assert_eq!(runner.watched_at_compile(), Some(false));
        assert_eq!(
            cache_of(&fixture).unwrap().executable.as_deref(),
            Some("./new")
        );
    }

    #[test]
    fn test_malformed_cache_is_replaced() {
        let fixture = ProjectFixture::minimal("app");
        fixture.add_file(crate::builder::cache::CACHE_FILE, "{ not json");
        let mut runner = MockRunner::new();

        run(&fixture, &mut runner, &mut no_answers(), BuildMode::Build).unwrap();

        assert_eq!(cache_of(&fixture).unwrap().project, "app");
    }

    #[test]
    fn test_unwritable_cache_does_not_abort() {
        let fixture = ProjectFixture::minimal("app");
        std::fs::create_dir(fixture.root().join(crate::builder::cache::CACHE_FILE)).unwrap();
        let mut runner = MockRunner::new();

        let result = run(&fixture, &mut runner, &mut no_answers(), BuildMode::Build).unwrap();

        assert_eq!(result.state, BuildState::Done);
        assert!(runner.compiled());
        assert!(fixture.root().join(crate::builder::cache::CACHE_FILE).is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_accepted_toolkit_installs_then_compiles() {
        let fixture = ProjectFixture::new(
            r#"{"project": "app", "sources": ["a.c"], "libraries": ["gtk3"]}"#,
        );
        let mut runner = MockRunner::new().with_failing_install();
        let mut prompt = ScriptedPrompt::new(["y"]);

        let result = run(&fixture, &mut runner, &mut prompt, BuildMode::Build).unwrap();

        assert_eq!(result.state, BuildState::Done);
        assert_eq!(
            result.installs,
            vec![("gtk3".to_string(), InstallOutcome::Installed)]
        );
        assert_eq!(
            runner.calls(),
            &[
                RunnerCall::Query("gtk+-3.0".to_string()),
                RunnerCall::Install("libgtk-3-dev".to_string()),
                RunnerCall::Compile(
                    "g++ -o ./app -std=c++11 a.c $(pkg-config --cflags --libs gtk+-3.0)"
                        .to_string()
                ),
            ]
        );
        assert_eq!(prompt.asked(), 1);
    }

    #[test]
    fn test_declined_toolkit_still_compiles() {
        let fixture = ProjectFixture::new(
            r#"{"project": "app", "sources": ["a.c"], "libraries": ["gtk3"]}"#,
        );
        let mut runner = MockRunner::new();
        let mut prompt = ScriptedPrompt::new(["n"]);

        let result = run(&fixture, &mut runner, &mut prompt, BuildMode::Build).unwrap();

        assert_eq!(
            result.installs,
            vec![("gtk3".to_string(), InstallOutcome::Declined)]
        );
        let compiled = runner
            .calls()
            .iter()
            .find_map(|c| match c {
                RunnerCall::Compile(line) => Some(line.clone()),
                _ => None,
            })
            .unwrap();
        assert!(compiled.contains("$(pkg-config --cflags --libs gtk+-3.0)"));
    }

    #[test]
    fn test_duplicate_toolkit_checked_once() {
        let fixture = ProjectFixture::new(
            r#"{"project": "app", "sources": ["a.c"], "libraries": ["qt5core", "qt5core"]}"#,
        );
        let mut runner = MockRunner::new().with_installed("Qt5Core");

        let result = run(&fixture, &mut runner, &mut no_answers(), BuildMode::Build).unwrap();

        assert_eq!(result.installs.len(), 1);
        let queries = runner
            .calls()
            .iter()
            .filter(|c| matches!(c, RunnerCall::Query(_)))
            .count();
        assert_eq!(queries, 1);
    }

    #[test]
    fn test_before_script_failure_aborts() {
        let fixture = ProjectFixture::new(
            r#"{"project": "app", "sources": ["a.c"], "scripts": {"before": ["pre.sh"]}}"#,
        );
        let mut runner = MockRunner::new().with_script_exit("pre.sh", 1);

        let err = run(&fixture, &mut runner, &mut no_answers(), BuildMode::Build).unwrap_err();

        assert!(err.downcast_ref::<ScriptError>().is_some());
        assert!(!runner.compiled());
        // The cache is still updated before the scripts run.
        assert!(cache_of(&fixture).is_some());
    }

    #[test]
    fn test_compile_failure() {
        let fixture = ProjectFixture::new(
            r#"{"project": "app", "sources": ["a.c"], "scripts": {"after": ["post.sh"]}}"#,
        );
        let mut runner = MockRunner::new().with_compile_exit(1);

        let err = run(&fixture, &mut runner, &mut no_answers(), BuildMode::Build).unwrap_err();

        assert!(err.downcast_ref::<BuildError>().is_some());
        assert!(!runner
            .calls()
            .iter()
            .any(|c| matches!(c, RunnerCall::Script(_))));
    }
}
