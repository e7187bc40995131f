//! `createc build` command

use anyhow::Result;

use super::Session;
use crate::cli::BuildArgs;
use createc::builder::{BuildContext, StdinPrompt, Toolchain};
use createc::ops::{build, plan_json, BuildMode, BuildOptions};
use createc::util::SystemRunner;

pub fn execute(args: BuildArgs, session: &Session) -> Result<()> {
    let toolchain = Toolchain::from_settings(&session.config.toolchain);
    let mut runner = SystemRunner::for_toolchain(&toolchain, &session.config.packages);
    let mut prompt = StdinPrompt;
    let mut ctx = BuildContext::new(
        &session.gctx,
        toolchain,
        &mut runner,
        &mut prompt,
        &session.shell,
    );

    let mode = if args.plan || args.dry_run {
        BuildMode::Plan
    } else {
        BuildMode::Build
    };

    let opts = BuildOptions {
        path: args.path,
        mode,
    };

    let result = build(&mut ctx, &opts)?;

    if args.plan {
        println!("{}", plan_json(&result.invocation)?);
    } else if args.dry_run {
        println!("{}", result.invocation.command_line());
    }

    Ok(())
}
