//! kbm CLI - Help Center knowledge-base mirror.
//!
//! Provides commands for:
//! - `run`: Back up a source instance, restore onto a target, or both
//! - `init`: Write a default configuration file

mod commands;
mod error;
mod output;
mod progress;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{InitArgs, RunArgs};
use output::Output;

/// kbm - Help Center knowledge-base mirror.
#[derive(Parser)]
#[command(name = "kbm", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Back up, restore, or both.
    Run(RunArgs),
    /// Write a default config.json.
    Init(InitArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Run(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Run(args) => args.execute(&output),
        Commands::Init(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
