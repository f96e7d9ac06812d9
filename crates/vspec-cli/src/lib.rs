//! # vspec-cli: Command-Line Interface
//!
//! Provides the `vspec` binary: load a spec catalog, then check or conform
//! a data file against one of its specs, or print spec forms.
//!
//! ```bash
//! vspec check   --catalog specs.yaml --spec :app/person alice.json
//! vspec conform --catalog specs.yaml --spec :recipe/ingredient line.yaml
//! vspec describe --catalog specs.yaml :app/person
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: the data conformed, or the command succeeded.
//! - `1`: the data did not conform.
//! - `2`: operational error: unreadable file, bad catalog, unknown spec.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers here take parsed args and
//!   an output sink so they can be driven from tests.
//! - Handlers delegate to `vspec-catalog` and `vspec-engine`; no spec
//!   semantics are implemented here.

pub mod check;
pub mod conform;
pub mod describe;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use vspec_core::{Keyword, Value};
use vspec_engine::{Problem, Registry};

/// Load a catalog into a fresh registry.
pub fn load_registry(catalog: &Path) -> Result<Registry> {
    let registry = Registry::new();
    vspec_catalog::load_catalog(catalog, &registry)
        .with_context(|| format!("failed to load catalog {}", catalog.display()))?;
    Ok(registry)
}

/// Parse a spec name given on the command line.
pub fn parse_spec_name(text: &str) -> Result<Keyword> {
    Keyword::parse(text).with_context(|| format!("invalid spec name '{text}'"))
}

/// Read a data file as a value.
///
/// `.json` files are parsed as JSON; everything else, including `-` for
/// standard input, as YAML (which accepts JSON too).
pub fn load_data(path: &Path) -> Result<Value> {
    let text = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("failed to read standard input")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read data file {}", path.display()))?
    };

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        let json: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("invalid JSON in {}", path.display()))?;
        Ok(Value::from_json(&json))
    } else {
        let yaml: serde_yaml::Value = serde_yaml::from_str(&text)
            .with_context(|| format!("invalid YAML in {}", path.display()))?;
        Value::from_yaml(&yaml).with_context(|| format!("unsupported data in {}", path.display()))
    }
}

/// Write problems as text lines or as a JSON array.
pub fn write_problems(out: &mut dyn Write, problems: &[Problem], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, problems).context("failed to encode problems")?;
        writeln!(out)?;
    } else {
        for problem in problems {
            writeln!(out, "{problem}")?;
        }
    }
    Ok(())
}

/// Run a handler against `out`, then flush it.
///
/// A failed flush (a closed pipe, a full disk) is reported like any other
/// operational error, overriding the handler's exit code.
pub fn run_flushed(
    out: &mut dyn Write,
    handler: impl FnOnce(&mut dyn Write) -> Result<u8>,
) -> Result<u8> {
    let code = handler(&mut *out)?;
    out.flush().context("failed to write output")?;
    Ok(code)
}
