//! # Check Subcommand
//!
//! Validates a data file against a named spec from a catalog and reports
//! every problem found.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

/// Arguments for the `vspec check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Spec catalog (.yaml, .yml, or .json).
    #[arg(long)]
    pub catalog: PathBuf,

    /// Name of the spec to check against, e.g. :app/person.
    #[arg(long)]
    pub spec: String,

    /// Report problems as a JSON array.
    #[arg(long)]
    pub json: bool,

    /// Data file to check (.json, .yaml, .yml), or - for standard input.
    #[arg(value_name = "DATA")]
    pub data: PathBuf,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 if the data conforms, 1 if it does not.
pub fn run_check(args: &CheckArgs, out: &mut dyn Write) -> Result<u8> {
    let registry = crate::load_registry(&args.catalog)?;
    let name = crate::parse_spec_name(&args.spec)?;
    let data = crate::load_data(&args.data)?;

    let problems = registry
        .explain(&name, &data)
        .with_context(|| format!("cannot evaluate spec {name}"))?;
    tracing::info!(spec = %name, problems = problems.len(), "checked data");

    if problems.is_empty() {
        if args.json {
            writeln!(out, "[]")?;
        } else {
            writeln!(out, "valid")?;
        }
        return Ok(0);
    }
    crate::write_problems(out, &problems, args.json)?;
    Ok(1)
}
