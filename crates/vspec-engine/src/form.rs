//! # Structural Forms
//!
//! `describe` renders a spec tree as an s-expression `Form`, independent of
//! any value. Forms are also what diagnostics carry to name the spec that
//! failed.
//!
//! ```text
//! (cat :quantity number? :unit keyword?)
//! (or :integer int? :string string?)
//! (keys :req [:app/email] :opt [:app/age])
//! #{2 4 6 8}
//! ```

use std::fmt;

use serde::{Serialize, Serializer};
use vspec_core::{Keyword, Value};

use crate::spec::{KeysSpec, Spec};

/// An s-expression rendering of a spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Form {
    /// A bare symbol such as `int?` or `cat`.
    Sym(String),
    /// A keyword such as a tag or a referenced name.
    Kw(Keyword),
    /// A literal value.
    Lit(Value),
    /// A parenthesized list.
    List(Vec<Form>),
    /// A bracketed vector.
    Vector(Vec<Form>),
    /// A literal set, rendered `#{...}`.
    Set(Vec<Value>),
}

impl Form {
    /// A symbol form.
    pub fn sym(name: impl Into<String>) -> Self {
        Self::Sym(name.into())
    }

    /// A list form headed by the symbol `head`.
    pub fn call(head: &str, args: impl IntoIterator<Item = Form>) -> Self {
        let mut items = vec![Self::sym(head)];
        items.extend(args);
        Self::List(items)
    }

    /// Render a spec tree.
    pub fn of(spec: &Spec) -> Form {
        match spec {
            Spec::Pred(p) => Form::sym(p.name()),
            Spec::Member(set) => Form::Set(set.iter().cloned().collect()),
            Spec::Ref(name) => Form::Kw(name.clone()),
            Spec::And(components) => Form::call("and", components.iter().map(Form::of)),
            Spec::Or(branches) => Form::call("or", tagged(branches)),
            Spec::Keys(keys) => keys_form(keys),
            Spec::Cat(fields) => Form::call("cat", tagged(fields)),
            Spec::Alt(branches) => Form::call("alt", tagged(branches)),
            Spec::Repeat { min, max, inner } => {
                let inner = Form::of(inner);
                match (min, max) {
                    (0, None) => Form::call("*", [inner]),
                    (1, None) => Form::call("+", [inner]),
                    (0, Some(1)) => Form::call("?", [inner]),
                    (min, max) => Form::call(
                        "rep",
                        [
                            count(*min),
                            max.map_or_else(|| Form::Lit(Value::nil()), count),
                            inner,
                        ],
                    ),
                }
            }
            Spec::RegexAnd { inner, extras } => Form::call(
                "&",
                std::iter::once(Form::of(inner)).chain(extras.iter().map(Form::of)),
            ),
            Spec::Nested(inner) => Form::call("spec", [Form::of(inner)]),
        }
    }

    /// The form `(contains? % key)` used for missing map attributes.
    pub(crate) fn contains_key(key: &Keyword) -> Form {
        Form::call("contains?", [Form::sym("%"), Form::Kw(key.clone())])
    }
}

fn tagged(pairs: &[(Keyword, Spec)]) -> Vec<Form> {
    pairs
        .iter()
        .flat_map(|(tag, spec)| [Form::Kw(tag.clone()), Form::of(spec)])
        .collect()
}

/// A repeat bound as an integer literal, or a bare symbol past `i64::MAX`.
fn count(n: usize) -> Form {
    match i64::try_from(n) {
        Ok(n) => Form::Lit(Value::int(n)),
        Err(_) => Form::sym(n.to_string()),
    }
}

fn keys_form(keys: &KeysSpec) -> Form {
    let sections = [
        (":req", &keys.required),
        (":opt", &keys.optional),
        (":req-un", &keys.required_unqualified),
        (":opt-un", &keys.optional_unqualified),
    ];
    let mut args = Vec::new();
    for (label, names) in sections {
        if names.is_empty() {
            continue;
        }
        args.push(Form::Kw(Keyword::new(label)));
        args.push(Form::Vector(names.iter().cloned().map(Form::Kw).collect()));
    }
    Form::call("keys", args)
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sym(s) => f.write_str(s),
            Self::Kw(k) => write!(f, "{k}"),
            Self::Lit(v) => write!(f, "{v}"),
            Self::List(items) => {
                f.write_str("(")?;
                write_joined(f, items)?;
                f.write_str(")")
            }
            Self::Vector(items) => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Self::Set(values) => {
                f.write_str("#{")?;
                write_joined(f, values)?;
                f.write_str("}")
            }
        }
    }
}

impl Serialize for Form {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
