//! `createc install` command

use anyhow::Result;

use super::Session;
use crate::cli::InstallArgs;
use createc::builder::BuildCache;
use createc::ops::{install, InstallOptions};
use createc::util::shell::Status;

pub fn execute(args: InstallArgs, session: &Session) -> Result<()> {
    let opts = InstallOptions {
        bin_dir: args
            .bin_dir
            .unwrap_or_else(|| session.config.install.bin_dir()),
    };
    let cache = BuildCache::new(session.gctx.cache_path());

    let installed = install(session.gctx.cwd(), &cache, &opts)?;
    session
        .shell
        .status(Status::Installed, installed.display());

    Ok(())
}
