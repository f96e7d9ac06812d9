//! # Keywords
//!
//! A keyword is a possibly namespaced symbolic name, written `:ns/name` or
//! `:name`. Keywords serve three roles:
//!
//! - registry names (qualified names such as `:app/email`),
//! - tags that label `or`/`alt` branches and `cat` fields,
//! - attribute keys inside map data.
//!
//! Keeping one type for all three is what lets a `keys` spec use the
//! attribute name found in data directly as the registry lookup key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SpecError;

/// A namespaced or bare symbolic name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Keyword {
    namespace: Option<String>,
    name: String,
}

impl Keyword {
    /// Build a keyword from trusted text such as `"app/email"` or `":unit"`.
    ///
    /// A leading `:` is stripped and the first `/` separates the namespace.
    /// No validation is performed; use [`Keyword::parse`] for untrusted input.
    pub fn new(text: &str) -> Self {
        let text = text.strip_prefix(':').unwrap_or(text);
        match text.split_once('/') {
            Some((ns, name)) if !ns.is_empty() && !name.is_empty() => {
                Self::qualified(ns, name)
            }
            _ => Self {
                namespace: None,
                name: text.to_string(),
            },
        }
    }

    /// Build a namespaced keyword.
    pub fn qualified(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    /// Parse a keyword, rejecting empty segments and whitespace.
    ///
    /// Accepts `:ns/name`, `:name`, `ns/name`, and `name`.
    pub fn parse(input: &str) -> Result<Self, SpecError> {
        let invalid = |reason: &str| SpecError::InvalidName {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let text = input.strip_prefix(':').unwrap_or(input);
        if text.is_empty() {
            return Err(invalid("empty name"));
        }
        if text.chars().any(|c| c.is_whitespace() || c == ':') {
            return Err(invalid("names may not contain whitespace or ':'"));
        }

        match text.split_once('/') {
            None => Ok(Self {
                namespace: None,
                name: text.to_string(),
            }),
            Some((ns, name)) => {
                if ns.is_empty() {
                    return Err(invalid("empty namespace"));
                }
                if name.is_empty() {
                    return Err(invalid("empty name after namespace"));
                }
                if name.contains('/') {
                    return Err(invalid("more than one '/' separator"));
                }
                Ok(Self::qualified(ns, name))
            }
        }
    }

    /// The namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The local name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the keyword carries a namespace.
    pub fn is_qualified(&self) -> bool {
        self.namespace.is_some()
    }

    /// The same local name without a namespace.
    pub fn unqualified(&self) -> Keyword {
        Self {
            namespace: None,
            name: self.name.clone(),
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, ":{ns}/{}", self.name),
            None => write!(f, ":{}", self.name),
        }
    }
}

impl FromStr for Keyword {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Keyword {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Keyword {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
