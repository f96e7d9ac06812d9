//! Catalog loading errors.

use thiserror::Error;
use vspec_core::SpecError;

/// Error while loading a spec catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file could not be read, or has an unsupported extension.
    #[error("catalog load error for '{path}': {reason}")]
    DocumentLoad {
        /// Path to the catalog file.
        path: String,
        /// Reason the file could not be loaded.
        reason: String,
    },

    /// The catalog text is not a well-formed document of the expected shape.
    #[error("catalog parse error: {reason}")]
    Parse {
        /// Reason the document was rejected.
        reason: String,
    },

    /// A spec entry's expression does not follow the catalog grammar.
    #[error("invalid expression for spec '{entry}': {reason}")]
    InvalidExpression {
        /// Name of the catalog entry containing the expression.
        entry: String,
        /// What is wrong with the expression.
        reason: String,
    },

    /// A spec entry is grammatical but describes a malformed spec.
    #[error("spec '{entry}' is malformed: {source}")]
    Spec {
        /// Name of the catalog entry.
        entry: String,
        /// The underlying construction error.
        #[source]
        source: SpecError,
    },
}
