//! # Conform Subcommand
//!
//! Prints the conformed (destructured) form of a data file as JSON, or the
//! problems preventing it from conforming.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use vspec_engine::Conformed;

/// Arguments for the `vspec conform` subcommand.
#[derive(Args, Debug)]
pub struct ConformArgs {
    /// Spec catalog (.yaml, .yml, or .json).
    #[arg(long)]
    pub catalog: PathBuf,

    /// Name of the spec to conform to, e.g. :recipe/ingredient.
    #[arg(long)]
    pub spec: String,

    /// Report problems as a JSON array instead of text lines.
    #[arg(long)]
    pub json: bool,

    /// Data file to conform (.json, .yaml, .yml), or - for standard input.
    #[arg(value_name = "DATA")]
    pub data: PathBuf,
}

/// Execute the conform subcommand.
///
/// Returns exit code: 0 with the conformed value printed, 1 if the data
/// does not conform.
pub fn run_conform(args: &ConformArgs, out: &mut dyn Write) -> Result<u8> {
    let registry = crate::load_registry(&args.catalog)?;
    let name = crate::parse_spec_name(&args.spec)?;
    let data = crate::load_data(&args.data)?;

    let conformed = registry
        .conform(&name, &data)
        .with_context(|| format!("cannot evaluate spec {name}"))?;
    match conformed {
        Conformed::Valid(value) => {
            let json = value
                .to_json()
                .context("conformed value has no JSON form")?;
            serde_json::to_writer_pretty(&mut *out, &json)?;
            writeln!(out)?;
            Ok(0)
        }
        Conformed::Invalid => {
            let problems = registry.explain(&name, &data)?;
            tracing::info!(spec = %name, problems = problems.len(), "data did not conform");
            crate::write_problems(out, &problems, args.json)?;
            Ok(1)
        }
    }
}
