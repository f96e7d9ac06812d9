//! # vspec CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vspec_cli::check::{run_check, CheckArgs};
use vspec_cli::conform::{run_conform, ConformArgs};
use vspec_cli::describe::{run_describe, DescribeArgs};
use vspec_cli::run_flushed;

/// vspec: check data against declarative specs.
///
/// Loads named specs from a YAML or JSON catalog, then validates or
/// destructures data files against them.
#[derive(Parser, Debug)]
#[command(name = "vspec", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a data file against a spec and list every problem.
    Check(CheckArgs),

    /// Print the conformed form of a data file as JSON.
    Conform(ConformArgs),

    /// Print the structural form of catalog specs.
    Describe(DescribeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "vspec CLI starting");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = match cli.command {
        Commands::Check(args) => run_flushed(&mut out, |out| run_check(&args, out)),
        Commands::Conform(args) => run_flushed(&mut out, |out| run_conform(&args, out)),
        Commands::Describe(args) => run_flushed(&mut out, |out| run_describe(&args, out)),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
