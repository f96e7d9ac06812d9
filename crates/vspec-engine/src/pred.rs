//! # Predicates
//!
//! The leaf capability of the spec model: a named test that maps a single
//! value to a boolean. Callers supply arbitrary closures; the engine also
//! ships a library of common predicates addressable by name so that spec
//! catalogs can refer to them declaratively.

use std::fmt;
use std::sync::Arc;

use vspec_core::{Atom, Value};

type TestFn = dyn Fn(&Value) -> bool + Send + Sync;

/// A named, opaque boolean test over one value.
///
/// The name is what `describe` and diagnostics render; two predicates with
/// the same name are not required to behave the same.
#[derive(Clone)]
pub struct Predicate {
    name: String,
    test: Arc<TestFn>,
}

impl Predicate {
    /// Wrap a closure as a predicate.
    pub fn new(
        name: impl Into<String>,
        test: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            test: Arc::new(test),
        }
    }

    /// The predicate's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the predicate.
    pub fn test(&self, value: &Value) -> bool {
        (self.test)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.name).finish()
    }
}

// ─── Builtin library ─────────────────────────────────────────────────

/// Names of every builtin predicate, in documentation order.
pub const BUILTIN_NAMES: &[&str] = &[
    "any?",
    "nil?",
    "some?",
    "boolean?",
    "int?",
    "pos-int?",
    "nat-int?",
    "neg-int?",
    "float?",
    "number?",
    "string?",
    "keyword?",
    "qualified-keyword?",
    "symbol?",
    "map?",
    "seq?",
    "odd?",
    "even?",
    "zero?",
    "pos?",
    "neg?",
    "empty?",
    "even-count?",
];

fn builtin_test(name: &str) -> Option<fn(&Value) -> bool> {
    let test: fn(&Value) -> bool = match name {
        "any?" => |_| true,
        "nil?" => |v| v.is_nil(),
        "some?" => |v| !v.is_nil(),
        "boolean?" => |v| matches!(v, Value::Atom(Atom::Bool(_))),
        "int?" => |v| v.as_int().is_some(),
        "pos-int?" => |v| v.as_int().is_some_and(|i| i > 0),
        "nat-int?" => |v| v.as_int().is_some_and(|i| i >= 0),
        "neg-int?" => |v| v.as_int().is_some_and(|i| i < 0),
        "float?" => |v| matches!(v, Value::Atom(Atom::Float(_))),
        "number?" => |v| v.as_f64().is_some(),
        "string?" => |v| v.as_str().is_some(),
        "keyword?" => |v| v.as_keyword().is_some(),
        "qualified-keyword?" => |v| v.as_keyword().is_some_and(|k| k.is_qualified()),
        "symbol?" => |v| matches!(v, Value::Atom(Atom::Symbol(_))),
        "map?" => |v| v.as_map().is_some(),
        "seq?" => |v| v.as_seq().is_some(),
        "odd?" => |v| v.as_int().is_some_and(|i| i % 2 != 0),
        "even?" => |v| v.as_int().is_some_and(|i| i % 2 == 0),
        "zero?" => |v| v.as_f64().is_some_and(|x| x == 0.0),
        "pos?" => |v| v.as_f64().is_some_and(|x| x > 0.0),
        "neg?" => |v| v.as_f64().is_some_and(|x| x < 0.0),
        "empty?" => |v| match v {
            Value::Seq(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
            Value::Atom(Atom::Str(s)) => s.is_empty(),
            Value::Atom(Atom::Nil) => true,
            _ => false,
        },
        "even-count?" => |v| match v {
            Value::Seq(items) => items.len() % 2 == 0,
            Value::Map(map) => map.len() % 2 == 0,
            _ => false,
        },
        _ => return None,
    };
    Some(test)
}

/// Look up a builtin predicate by name.
pub fn builtin(name: &str) -> Option<Predicate> {
    builtin_test(name).map(|test| Predicate::new(name, test))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(name: &str, value: Value) -> bool {
        builtin(name)
            .unwrap_or_else(|| panic!("missing builtin {name}"))
            .test(&value)
    }

    #[test]
    fn every_listed_name_resolves() {
        for name in BUILTIN_NAMES {
            let pred = builtin(name).unwrap_or_else(|| panic!("missing builtin {name}"));
            assert_eq!(pred.name(), *name);
        }
        assert!(builtin("no-such?").is_none());
    }

    #[test]
    fn parity_is_false_for_non_integers() {
        assert!(check("odd?", Value::int(3)));
        assert!(check("even?", Value::int(-4)));
        assert!(!check("odd?", Value::float(3.0)));
        assert!(!check("even?", Value::kw("a")));
    }

    #[test]
    fn numeric_predicates() {
        assert!(check("number?", Value::int(1)));
        assert!(check("number?", Value::float(1.5)));
        assert!(!check("number?", Value::str("1")));
        assert!(check("pos-int?", Value::int(1)));
        assert!(!check("pos-int?", Value::int(0)));
        assert!(check("nat-int?", Value::int(0)));
        assert!(check("zero?", Value::float(0.0)));
        assert!(check("neg?", Value::int(-2)));
    }

    #[test]
    fn keyword_predicates() {
        assert!(check("keyword?", Value::kw("teaspoon")));
        assert!(!check("qualified-keyword?", Value::kw("teaspoon")));
        assert!(check("qualified-keyword?", Value::kw("app/email")));
    }

    #[test]
    fn collection_predicates() {
        assert!(check("empty?", Value::seq([])));
        assert!(!check("empty?", Value::seq([Value::nil()])));
        assert!(check("even-count?", Value::seq([Value::int(1), Value::int(2)])));
        assert!(!check("even-count?", Value::seq([Value::int(1)])));
        assert!(check("map?", Value::map([])));
        assert!(check("seq?", Value::seq([])));
    }

    #[test]
    fn closures_capture_state() {
        let limit = 10;
        let small = Predicate::new("small?", move |v| v.as_int().is_some_and(|i| i < limit));
        assert!(small.test(&Value::int(3)));
        assert!(!small.test(&Value::int(30)));
        assert_eq!(format!("{small:?}"), "Predicate(\"small?\")");
    }
}
