//! # Error Types
//!
//! `SpecError` is the single error type shared by the value model, the
//! registry, and the conformance engine. All variants describe programmer or
//! configuration defects. A value that does not conform to a spec is never
//! an error; it is reported as `Conformed::Invalid` plus problems.

use thiserror::Error;

use crate::keyword::Keyword;

/// Failure classes that abort a spec operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// A reference named a spec that is not registered at evaluation time.
    #[error("unable to resolve spec: {name}")]
    UnresolvedName {
        /// The name that failed to resolve.
        name: Keyword,
    },

    /// A spec was structurally invalid when constructed or evaluated.
    #[error("malformed spec: {reason}")]
    MalformedSpec {
        /// What is wrong with the spec.
        reason: String,
    },

    /// A string could not be parsed as a keyword.
    #[error("invalid keyword {input:?}: {reason}")]
    InvalidName {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A JSON/YAML document could not be converted to or from a value.
    #[error("value conversion failed: {reason}")]
    Conversion {
        /// Why the conversion failed.
        reason: String,
    },
}

impl SpecError {
    /// Shorthand for [`SpecError::MalformedSpec`].
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedSpec {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`SpecError::UnresolvedName`].
    pub fn unresolved(name: &Keyword) -> Self {
        Self::UnresolvedName { name: name.clone() }
    }

    /// Whether the error was caused by a missing registry entry.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::UnresolvedName { .. })
    }
}
