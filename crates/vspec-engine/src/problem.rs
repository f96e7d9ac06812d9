//! # Conform Results and Diagnostics
//!
//! `Conformed` is the outcome of `conform`: either the destructured value or
//! the `Invalid` sentinel. `Problem` is one structured diagnostic produced by
//! `explain`.
//!
//! Each problem carries two paths, both outermost first:
//!
//! - `path`: the spec path: `or`/`cat`/`alt` tags and `keys` attribute
//!   names traversed to reach the failing spec,
//! - `in_path`: the data path: map keys and sequence indices traversed to
//!   reach the offending value.

use std::fmt;

use serde::Serialize;
use vspec_core::{Keyword, Value};

use crate::form::Form;

/// The result of conforming a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conformed {
    /// The value conformed; the payload is its destructured form.
    Valid(Value),
    /// The value did not conform.
    Invalid,
}

impl Conformed {
    /// Whether the value conformed.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Whether the value did not conform.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    /// The conformed value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Invalid => None,
        }
    }

    /// Consume and return the conformed value, if any.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Invalid => None,
        }
    }
}

/// One step into a data structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DataKey {
    /// Position in a sequence.
    Index(usize),
    /// Key in a map.
    Key(Value),
}

impl fmt::Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(k) => write!(f, "{k}"),
        }
    }
}

/// A single reason a value failed to conform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    /// Tags and attribute names leading to the failing spec.
    pub path: Vec<Keyword>,
    /// Keys and indices leading to the offending value.
    pub in_path: Vec<DataKey>,
    /// The offending value.
    pub value: Value,
    /// The spec that rejected the value.
    pub form: Form,
    /// Structural reason, e.g. `Insufficient input`, when the form alone is
    /// not the explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Registered names resolved on the way to the failure, outermost first.
    pub via: Vec<Keyword>,
}

/// Reason recorded when a sequence ends before a pattern is satisfied.
pub const INSUFFICIENT_INPUT: &str = "Insufficient input";

/// Reason recorded when elements remain after a sequence pattern completes.
pub const EXTRA_INPUT: &str = "Extra input";

impl Problem {
    /// A problem at the current location.
    pub fn new(form: Form, value: Value) -> Self {
        Self {
            path: Vec::new(),
            in_path: Vec::new(),
            value,
            form,
            reason: None,
            via: Vec::new(),
        }
    }

    /// Attach a structural reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attach a data-path step.
    pub fn at(mut self, key: DataKey) -> Self {
        self.in_path.insert(0, key);
        self
    }

    /// Whether the problem carries the given reason.
    pub fn has_reason(&self, reason: &str) -> bool {
        self.reason.as_deref() == Some(reason)
    }
}

/// Prefix every problem's spec path with a tag or attribute name.
pub(crate) fn under_tag(mut problems: Vec<Problem>, tag: &Keyword) -> Vec<Problem> {
    for p in &mut problems {
        p.path.insert(0, tag.clone());
    }
    problems
}

/// Prefix every problem's data path with a step.
pub(crate) fn under_key(mut problems: Vec<Problem>, key: DataKey) -> Vec<Problem> {
    for p in &mut problems {
        p.in_path.insert(0, key.clone());
    }
    problems
}

/// Prefix every problem's resolution chain with a registered name.
pub(crate) fn via(mut problems: Vec<Problem>, name: &Keyword) -> Vec<Problem> {
    for p in &mut problems {
        p.via.insert(0, name.clone());
    }
    problems
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            Some(reason) => write!(f, "{} - failed: {reason}", self.value)?,
            None => write!(f, "{} - failed: {}", self.value, self.form)?,
        }
        if !self.in_path.is_empty() {
            f.write_str(" in: [")?;
            for (i, step) in self.in_path.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{step}")?;
            }
            f.write_str("]")?;
        }
        if !self.path.is_empty() {
            f.write_str(" at: [")?;
            for (i, tag) in self.path.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{tag}")?;
            }
            f.write_str("]")?;
        }
        if let Some(spec) = self.via.last() {
            write!(f, " spec: {spec}")?;
        }
        if self.reason.is_some() {
            write!(f, " predicate: {}", self.form)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_paths_and_spec() {
        let mut p = Problem::new(Form::sym("string?"), Value::int(42))
            .at(DataKey::Key(Value::kw("app/email")));
        p.path.push(Keyword::new("app/email"));
        p.via.push(Keyword::new("app/person"));
        p.via.push(Keyword::new("app/email"));
        assert_eq!(
            p.to_string(),
            "42 - failed: string? in: [:app/email] at: [:app/email] spec: :app/email"
        );
    }

    #[test]
    fn display_reason_shows_predicate() {
        let p = Problem::new(Form::sym("int?"), Value::seq([]))
            .with_reason(INSUFFICIENT_INPUT)
            .at(DataKey::Index(1));
        assert_eq!(
            p.to_string(),
            "[] - failed: Insufficient input in: [1] predicate: int?"
        );
        assert!(p.has_reason(INSUFFICIENT_INPUT));
    }

    #[test]
    fn prefixes_apply_outermost_first() {
        let problems = vec![Problem::new(Form::sym("int?"), Value::nil()).at(DataKey::Index(2))];
        let problems = under_key(problems, DataKey::Index(0));
        let problems = under_tag(problems, &Keyword::new("inner"));
        let problems = under_tag(problems, &Keyword::new("outer"));
        assert_eq!(problems[0].in_path, vec![DataKey::Index(0), DataKey::Index(2)]);
        assert_eq!(
            problems[0].path,
            vec![Keyword::new("outer"), Keyword::new("inner")]
        );
    }

    #[test]
    fn conformed_accessors() {
        let ok = Conformed::Valid(Value::int(1));
        assert!(ok.is_valid());
        assert_eq!(ok.value(), Some(&Value::int(1)));
        assert_eq!(ok.into_value(), Some(Value::int(1)));
        assert!(Conformed::Invalid.is_invalid());
        assert_eq!(Conformed::Invalid.into_value(), None);
    }

    #[test]
    fn serializes_structured() {
        let p = Problem::new(Form::sym("int?"), Value::kw("a")).at(DataKey::Index(0));
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["form"], "int?");
        assert_eq!(json["value"], ":a");
        assert_eq!(json["in_path"][0], 0);
        assert!(json.get("reason").is_none());
    }
}
