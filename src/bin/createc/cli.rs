//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// createc - build a C++ executable from a create.json manifest
#[derive(Parser)]
#[command(name = "createc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the project described by a manifest
    Build(BuildArgs),

    /// Copy the last built executable into the bin directory
    Install(InstallArgs),

    /// Remove the last built executable from the bin directory
    Uninstall(InstallArgs),

    /// Print version information
    Version,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Manifest file, or the directory containing create.json
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Print the compiler invocation as JSON (no build)
    #[arg(long, conflicts_with = "dry_run")]
    pub plan: bool,

    /// Print the compiler command line (no build)
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct InstallArgs {
    /// Install directory (defaults to install.bin_dir from config)
    #[arg(long, env = "CREATEC_BIN_DIR")]
    pub bin_dir: Option<PathBuf>,
}
