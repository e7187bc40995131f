//! createc CLI - manifest-driven C++ builds

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::Session;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("createc=debug")
    } else {
        EnvFilter::new("createc=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    if let Commands::Version = cli.command {
        return commands::version::execute();
    }

    let session = Session::new(cli.verbose, cli.no_color)?;

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &session),
        Commands::Install(args) => commands::install::execute(args, &session),
        Commands::Uninstall(args) => commands::uninstall::execute(args, &session),
        Commands::Version => commands::version::execute(),
    }
}
