//! # Catalog Documents
//!
//! A catalog is a YAML or JSON document with a top-level `specs` map from
//! qualified spec name to expression:
//!
//! ```yaml
//! specs:
//!   ":app/email": string?
//!   ":app/person":
//!     keys: { req: [":app/email"], opt: [":app/age"] }
//! ```
//!
//! JSON catalogs are read as the YAML flow subset, so object key order is
//! kept for `or`, `cat`, and `alt` in both formats.
//!
//! Loading is all-or-nothing: every entry is parsed before any is
//! registered, so a catalog with one bad entry leaves the registry
//! untouched.

use std::path::Path;

use serde_yaml::Value as Yaml;
use vspec_core::Keyword;
use vspec_engine::{Registry, Spec};

use crate::error::CatalogError;
use crate::expr::ExprParser;

/// File extensions accepted by [`load_catalog`].
pub const CATALOG_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Parse catalog text and register every entry.
///
/// Returns the registered names in document order.
pub fn parse_catalog_str(text: &str, registry: &Registry) -> Result<Vec<Keyword>, CatalogError> {
    let document: Yaml = serde_yaml::from_str(text).map_err(|e| CatalogError::Parse {
        reason: format!("invalid YAML: {e}"),
    })?;
    let entries = parse_entries(&document)?;
    let names: Vec<Keyword> = entries.iter().map(|(name, _)| name.clone()).collect();
    // Parsed entries come from the checked constructors, so registration
    // cannot fail part-way through.
    for (name, spec) in entries {
        let entry = name.to_string();
        registry
            .register(name, spec)
            .map_err(|source| CatalogError::Spec { entry, source })?;
    }
    tracing::info!(count = names.len(), "loaded spec catalog");
    Ok(names)
}

/// Read a catalog file and register every entry.
///
/// The format is chosen by extension, see [`CATALOG_EXTENSIONS`].
pub fn load_catalog(path: &Path, registry: &Registry) -> Result<Vec<Keyword>, CatalogError> {
    let load_error = |reason: String| CatalogError::DocumentLoad {
        path: path.display().to_string(),
        reason,
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    if !CATALOG_EXTENSIONS.contains(&extension.as_str()) {
        return Err(load_error(format!(
            "unsupported catalog extension '{extension}' (expected one of {})",
            CATALOG_EXTENSIONS.join(", ")
        )));
    }

    let text = std::fs::read_to_string(path)
        .map_err(|e| load_error(format!("cannot read file: {e}")))?;
    tracing::debug!(path = %path.display(), "reading spec catalog");

    parse_catalog_str(&text, registry).map_err(|e| match e {
        CatalogError::Parse { reason } => load_error(reason),
        other => other,
    })
}

fn parse_entries(document: &Yaml) -> Result<Vec<(Keyword, Spec)>, CatalogError> {
    let specs = document
        .as_mapping()
        .and_then(|root| root.get("specs"))
        .ok_or_else(|| CatalogError::Parse {
            reason: "catalog must be a map with a top-level 'specs' key".to_string(),
        })?;
    let Some(specs) = specs.as_mapping() else {
        return Err(CatalogError::Parse {
            reason: "'specs' must map spec names to expressions".to_string(),
        });
    };

    let mut entries = Vec::with_capacity(specs.len());
    for (name, expr) in specs {
        let Some(text) = name.as_str() else {
            return Err(CatalogError::Parse {
                reason: format!("spec names must be strings, got {name:?}"),
            });
        };
        let name = Keyword::parse(text).map_err(|e| CatalogError::InvalidExpression {
            entry: text.to_string(),
            reason: e.to_string(),
        })?;
        if !name.is_qualified() {
            return Err(CatalogError::InvalidExpression {
                entry: text.to_string(),
                reason: "spec names must be qualified keywords such as :app/email".to_string(),
            });
        }
        let spec = ExprParser::new(text).parse(expr)?;
        tracing::trace!(name = %name, "parsed catalog entry");
        entries.push((name, spec));
    }
    Ok(entries)
}
