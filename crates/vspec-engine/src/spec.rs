//! # Spec Model
//!
//! `Spec` is the declarative description of acceptable values. It is one
//! closed enum: every operation (conform, explain, describe) is a single
//! exhaustive `match` over it, so adding a node kind forces every operation
//! to handle it at compile time.
//!
//! ## Node Kinds
//!
//! | Kind | Matches |
//! |------|---------|
//! | `Pred` | one value for which the predicate returns true |
//! | `Member` | one value contained in the set |
//! | `Ref` | whatever the registered spec of that name matches, resolved lazily |
//! | `And` | all components, threading conformed output left to right |
//! | `Or` | the first matching tagged alternative |
//! | `Keys` | a map, checking every registered attribute present |
//! | `Cat`, `Alt`, `Repeat`, `RegexAnd` | sequence regex operators |
//! | `Nested` | one element that is itself matched as a whole sequence |
//!
//! ## Construction
//!
//! Constructors that can produce structurally invalid specs return
//! `Result<Spec, SpecError>` and reject the defect eagerly with
//! `SpecError::MalformedSpec`: repeat bounds out of order, duplicate tags,
//! empty alternations, and attribute names listed twice in one `keys`.
//! [`Spec::validate`] repeats those checks for specs assembled from the
//! variants directly; registration and inline evaluation call it.

use std::collections::{BTreeSet, HashSet};

use vspec_core::{Keyword, SpecError, Value};

use crate::pred::{self, Predicate};

/// A declarative description of acceptable values.
#[derive(Debug, Clone)]
pub enum Spec {
    /// Leaf: an opaque boolean test.
    Pred(Predicate),
    /// Leaf: membership in a literal set; conforms to the value itself.
    Member(BTreeSet<Value>),
    /// Indirection resolved against the registry at evaluation time.
    Ref(Keyword),
    /// All components must match; conformed output is threaded through.
    And(Vec<Spec>),
    /// First matching alternative wins; conforms to `[tag value]`.
    Or(Vec<(Keyword, Spec)>),
    /// Map spec; attribute specs live in the registry.
    Keys(KeysSpec),
    /// Sequence concatenation; conforms to a map of tag to sub-result.
    Cat(Vec<(Keyword, Spec)>),
    /// Sequence alternation; conforms to `[tag value]`.
    Alt(Vec<(Keyword, Spec)>),
    /// Greedy bounded repetition of a sequence pattern.
    Repeat {
        /// Minimum number of repetitions.
        min: usize,
        /// Maximum number of repetitions; `None` is unbounded.
        max: Option<usize>,
        /// The repeated pattern.
        inner: Box<Spec>,
    },
    /// A sequence pattern whose conformed result must also satisfy `extras`.
    RegexAnd {
        /// The sequence pattern.
        inner: Box<Spec>,
        /// Specs applied, threaded, to the conformed result.
        extras: Vec<Spec>,
    },
    /// Matches one element as a complete sub-sequence instead of splicing.
    Nested(Box<Spec>),
}

/// Attribute lists of a `keys` spec.
///
/// Only names are stored. The value spec for an attribute is whatever is
/// registered under that name when the map is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeysSpec {
    /// Qualified attributes that must be present under their own name.
    pub required: Vec<Keyword>,
    /// Qualified attributes that may be present.
    pub optional: Vec<Keyword>,
    /// Qualified attributes that must be present under their bare local name.
    pub required_unqualified: Vec<Keyword>,
    /// Qualified attributes that may be present under their bare local name.
    pub optional_unqualified: Vec<Keyword>,
}

impl KeysSpec {
    /// An empty attribute list: any map, checking whatever registered keys it has.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required attribute.
    pub fn req(mut self, name: Keyword) -> Self {
        self.required.push(name);
        self
    }

    /// Add an optional attribute.
    pub fn opt(mut self, name: Keyword) -> Self {
        self.optional.push(name);
        self
    }

    /// Add a required attribute keyed by its local name in data.
    pub fn req_un(mut self, name: Keyword) -> Self {
        self.required_unqualified.push(name);
        self
    }

    /// Add an optional attribute keyed by its local name in data.
    pub fn opt_un(mut self, name: Keyword) -> Self {
        self.optional_unqualified.push(name);
        self
    }

    /// The qualified spec name that governs a data key listed as unqualified.
    pub fn unqualified_target(&self, key: &Keyword) -> Option<&Keyword> {
        if key.is_qualified() {
            return None;
        }
        self.required_unqualified
            .iter()
            .chain(&self.optional_unqualified)
            .find(|name| name.name() == key.name())
    }

    fn check(&self) -> Result<(), SpecError> {
        let mut seen = HashSet::new();
        let all = self
            .required
            .iter()
            .chain(&self.optional)
            .chain(&self.required_unqualified)
            .chain(&self.optional_unqualified);
        for name in all {
            if !seen.insert(name) {
                return Err(SpecError::malformed(format!(
                    "keys lists {name} more than once"
                )));
            }
        }

        let mut local_names = HashSet::new();
        for name in self
            .required_unqualified
            .iter()
            .chain(&self.optional_unqualified)
        {
            if !name.is_qualified() {
                return Err(SpecError::malformed(format!(
                    "unqualified keys entry {name} must name a qualified spec"
                )));
            }
            if !local_names.insert(name.name()) {
                return Err(SpecError::malformed(format!(
                    "unqualified keys entries collide on local name :{}",
                    name.name()
                )));
            }
        }
        Ok(())
    }
}

fn check_tags(kind: &str, tagged: &[(Keyword, Spec)], allow_empty: bool) -> Result<(), SpecError> {
    if !allow_empty && tagged.is_empty() {
        return Err(SpecError::malformed(format!(
            "{kind} requires at least one alternative"
        )));
    }
    let mut seen = HashSet::new();
    for (tag, _) in tagged {
        if !seen.insert(tag) {
            return Err(SpecError::malformed(format!(
                "{kind} uses tag {tag} more than once"
            )));
        }
    }
    Ok(())
}

fn check_bounds(min: usize, max: Option<usize>) -> Result<(), SpecError> {
    match max {
        Some(max) if max < min => Err(SpecError::malformed(format!(
            "repeat max {max} is below min {min}"
        ))),
        _ => Ok(()),
    }
}

impl Spec {
    /// A predicate leaf.
    pub fn pred(predicate: Predicate) -> Self {
        Self::Pred(predicate)
    }

    /// A predicate leaf from a closure.
    pub fn pred_fn(
        name: impl Into<String>,
        test: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::Pred(Predicate::new(name, test))
    }

    /// A builtin predicate leaf, see [`pred::BUILTIN_NAMES`].
    pub fn builtin(name: &str) -> Result<Self, SpecError> {
        pred::builtin(name)
            .map(Self::Pred)
            .ok_or_else(|| SpecError::malformed(format!("unknown builtin predicate {name}")))
    }

    /// A membership leaf.
    pub fn member(values: impl IntoIterator<Item = Value>) -> Self {
        Self::Member(values.into_iter().collect())
    }

    /// A lazy reference to a registered spec.
    pub fn reference(name: Keyword) -> Self {
        Self::Ref(name)
    }

    /// Conjunction with threaded conform.
    pub fn and(components: Vec<Spec>) -> Self {
        Self::And(components)
    }

    /// Tagged disjunction, tried in order.
    pub fn or(branches: Vec<(Keyword, Spec)>) -> Result<Self, SpecError> {
        check_tags("or", &branches, false)?;
        Ok(Self::Or(branches))
    }

    /// Map spec over registered attributes.
    pub fn keys(keys: KeysSpec) -> Result<Self, SpecError> {
        keys.check()?;
        Ok(Self::Keys(keys))
    }

    /// Sequence concatenation of tagged patterns.
    pub fn cat(fields: Vec<(Keyword, Spec)>) -> Result<Self, SpecError> {
        check_tags("cat", &fields, true)?;
        Ok(Self::Cat(fields))
    }

    /// Sequence alternation of tagged patterns.
    pub fn alt(branches: Vec<(Keyword, Spec)>) -> Result<Self, SpecError> {
        check_tags("alt", &branches, false)?;
        Ok(Self::Alt(branches))
    }

    /// Bounded repetition; `max: None` is unbounded.
    pub fn repeat(min: usize, max: Option<usize>, inner: Spec) -> Result<Self, SpecError> {
        check_bounds(min, max)?;
        Ok(Self::Repeat {
            min,
            max,
            inner: Box::new(inner),
        })
    }

    /// Zero or more repetitions.
    pub fn zero_or_more(inner: Spec) -> Self {
        Self::Repeat {
            min: 0,
            max: None,
            inner: Box::new(inner),
        }
    }

    /// One or more repetitions.
    pub fn one_or_more(inner: Spec) -> Self {
        Self::Repeat {
            min: 1,
            max: None,
            inner: Box::new(inner),
        }
    }

    /// Zero or one occurrence.
    pub fn optional(inner: Spec) -> Self {
        Self::Repeat {
            min: 0,
            max: Some(1),
            inner: Box::new(inner),
        }
    }

    /// A sequence pattern with extra specs over its conformed result.
    pub fn regex_and(inner: Spec, extras: Vec<Spec>) -> Self {
        Self::RegexAnd {
            inner: Box::new(inner),
            extras,
        }
    }

    /// Match one element of the enclosing sequence as a whole sequence.
    pub fn nested(inner: Spec) -> Self {
        Self::Nested(Box::new(inner))
    }

    /// Re-run the construction checks over this spec and every child.
    ///
    /// Variants are public, so a spec built without the checked
    /// constructors is only caught here. Referenced names are not followed.
    pub fn validate(&self) -> Result<(), SpecError> {
        match self {
            Self::Pred(_) | Self::Member(_) | Self::Ref(_) => Ok(()),
            Self::And(components) => components.iter().try_for_each(Spec::validate),
            Self::Or(branches) => {
                check_tags("or", branches, false)?;
                branches.iter().try_for_each(|(_, spec)| spec.validate())
            }
            Self::Keys(keys) => keys.check(),
            Self::Cat(fields) => {
                check_tags("cat", fields, true)?;
                fields.iter().try_for_each(|(_, spec)| spec.validate())
            }
            Self::Alt(branches) => {
                check_tags("alt", branches, false)?;
                branches.iter().try_for_each(|(_, spec)| spec.validate())
            }
            Self::Repeat { min, max, inner } => {
                check_bounds(*min, *max)?;
                inner.validate()
            }
            Self::RegexAnd { inner, extras } => {
                inner.validate()?;
                extras.iter().try_for_each(Spec::validate)
            }
            Self::Nested(inner) => inner.validate(),
        }
    }

    /// Whether this node splices into an enclosing sequence pattern.
    ///
    /// `Nested` is not a regex node; it consumes exactly one element.
    pub fn is_regex(&self) -> bool {
        matches!(
            self,
            Self::Cat(_) | Self::Alt(_) | Self::Repeat { .. } | Self::RegexAnd { .. }
        )
    }

    /// Whether a zero-count match of this repeat conforms to nil instead of `[]`.
    pub(crate) fn is_optional_shape(&self) -> bool {
        matches!(self, Self::Repeat { max: Some(1), .. })
    }
}
