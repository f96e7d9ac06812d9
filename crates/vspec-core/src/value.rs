//! # Value Model
//!
//! The discriminated value tree every spec operates over: scalar atoms,
//! ordered sequences, and keyed maps. Values are immutable once built; the
//! conformance engine reads them and produces new conformed values.
//!
//! ## Equality and Ordering
//!
//! Every value is `Eq + Ord + Hash`:
//!
//! - atoms of different kinds order by kind (`nil < bool < int < float <
//!   string < keyword < symbol`), so `2` and `2.0` are distinct values,
//! - floats compare with [`f64::total_cmp`] and hash by bit pattern,
//! - maps compare as sets of entries, independent of insertion order.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::keyword::Keyword;

// ─── Atoms ───────────────────────────────────────────────────────────

/// A scalar value.
#[derive(Debug, Clone)]
pub enum Atom {
    /// Absence of a value.
    Nil,
    /// Boolean.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// UTF-8 string.
    Str(String),
    /// Keyword such as `:unit` or `:app/email`.
    Keyword(Keyword),
    /// Bare symbol such as `x`.
    Symbol(String),
}

impl Atom {
    fn rank(&self) -> u8 {
        match self {
            Self::Nil => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::Float(_) => 3,
            Self::Str(_) => 4,
            Self::Keyword(_) => 5,
            Self::Symbol(_) => 6,
        }
    }

    /// Name of the atom kind, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Keyword(_) => "keyword",
            Self::Symbol(_) => "symbol",
        }
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Atom {}

impl PartialOrd for Atom {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Atom {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Nil, Self::Nil) => Ordering::Equal,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::Str(a), Self::Str(b)) => a.cmp(b),
            (Self::Keyword(a), Self::Keyword(b)) => a.cmp(b),
            (Self::Symbol(a), Self::Symbol(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Nil => {}
            Self::Bool(b) => b.hash(state),
            Self::Int(i) => i.hash(state),
            Self::Float(f) => f.to_bits().hash(state),
            Self::Str(s) | Self::Symbol(s) => s.hash(state),
            Self::Keyword(k) => k.hash(state),
        }
    }
}

// ─── Maps ────────────────────────────────────────────────────────────

/// An insertion-ordered map with unique keys.
///
/// Inserting an existing key replaces its value in place. Lookups are
/// linear; data maps in spec validation are small.
#[derive(Debug, Clone, Default)]
pub struct ValueMap {
    entries: Vec<(Value, Value)>,
}

impl ValueMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the previous value for the key.
    pub fn insert(&mut self, key: Value, value: Value) -> Option<Value> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Look up the value for a key.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Look up the value stored under a keyword key.
    pub fn get_keyword(&self, key: &Keyword) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_keyword() == Some(key))
            .map(|(_, v)| v)
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &Value) -> bool {
        self.get(key).is_some()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    fn sorted_entries(&self) -> Vec<&(Value, Value)> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort();
        sorted
    }
}

impl PartialEq for ValueMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k) == Some(v))
    }
}

impl Eq for ValueMap {}

impl PartialOrd for ValueMap {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ValueMap {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sorted_entries().cmp(&other.sorted_entries())
    }
}

impl Hash for ValueMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted_entries().hash(state);
    }
}

impl FromIterator<(Value, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut map = ValueMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for ValueMap {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ─── Values ──────────────────────────────────────────────────────────

/// A value tree: an atom, an ordered sequence, or a keyed map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    /// A scalar.
    Atom(Atom),
    /// An ordered sequence of values.
    Seq(Vec<Value>),
    /// A keyed mapping with unique keys.
    Map(ValueMap),
}

impl Value {
    /// The nil value.
    pub fn nil() -> Self {
        Self::Atom(Atom::Nil)
    }

    /// A boolean value.
    pub fn bool(b: bool) -> Self {
        Self::Atom(Atom::Bool(b))
    }

    /// An integer value.
    pub fn int(i: i64) -> Self {
        Self::Atom(Atom::Int(i))
    }

    /// A float value.
    pub fn float(f: f64) -> Self {
        Self::Atom(Atom::Float(f))
    }

    /// A string value.
    pub fn str(s: impl Into<String>) -> Self {
        Self::Atom(Atom::Str(s.into()))
    }

    /// A keyword value from trusted text, see [`Keyword::new`].
    pub fn kw(text: &str) -> Self {
        Self::Atom(Atom::Keyword(Keyword::new(text)))
    }

    /// A symbol value.
    pub fn symbol(s: impl Into<String>) -> Self {
        Self::Atom(Atom::Symbol(s.into()))
    }

    /// A sequence value.
    pub fn seq(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Seq(items.into_iter().collect())
    }

    /// A map value; later duplicates of a key replace earlier ones.
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Self::Map(entries.into_iter().collect())
    }

    /// Whether the value is nil.
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Atom(Atom::Nil))
    }

    /// The atom, if this is a scalar.
    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Self::Atom(a) => Some(a),
            _ => None,
        }
    }

    /// The integer, if this is an int atom.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Atom(Atom::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// The numeric value as a float, for int and float atoms.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Atom(Atom::Int(i)) => Some(*i as f64),
            Self::Atom(Atom::Float(f)) => Some(*f),
            _ => None,
        }
    }

    /// The string, if this is a string atom.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Atom(Atom::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// The keyword, if this is a keyword atom.
    pub fn as_keyword(&self) -> Option<&Keyword> {
        match self {
            Self::Atom(Atom::Keyword(k)) => Some(k),
            _ => None,
        }
    }

    /// The elements, if this is a sequence.
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Self::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// The entries, if this is a map.
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Name of the value kind, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Atom(a) => a.type_name(),
            Self::Seq(_) => "sequence",
            Self::Map(_) => "map",
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::str(s)
    }
}

impl From<Keyword> for Value {
    fn from(k: Keyword) -> Self {
        Self::Atom(Atom::Keyword(k))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Seq(items)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Self::Map(map)
    }
}

// ─── Rendering ───────────────────────────────────────────────────────

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Keyword(k) => write!(f, "{k}"),
            Self::Symbol(s) => f.write_str(s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(a) => write!(f, "{a}"),
            Self::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k} {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for Atom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Nil => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::Str(s) | Self::Symbol(s) => serializer.serialize_str(s),
            Self::Keyword(k) => k.serialize(serializer),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Atom(a) => a.serialize(serializer),
            Self::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}
