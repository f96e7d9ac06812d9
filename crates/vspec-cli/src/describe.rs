//! # Describe Subcommand
//!
//! Prints the structural form of one spec, or of every spec in a catalog.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

/// Arguments for the `vspec describe` subcommand.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Spec catalog (.yaml, .yml, or .json).
    #[arg(long)]
    pub catalog: PathBuf,

    /// Spec to describe. All catalog specs are described when omitted.
    #[arg(value_name = "NAME")]
    pub name: Option<String>,
}

/// Execute the describe subcommand.
///
/// Prints one `name form` line per spec, sorted by name.
pub fn run_describe(args: &DescribeArgs, out: &mut dyn Write) -> Result<u8> {
    let registry = crate::load_registry(&args.catalog)?;
    let names = match &args.name {
        Some(text) => vec![crate::parse_spec_name(text)?],
        None => registry.names(),
    };
    for name in names {
        let form = registry
            .describe(&name)
            .with_context(|| format!("cannot describe {name}"))?;
        writeln!(out, "{name} {form}")?;
    }
    Ok(0)
}
