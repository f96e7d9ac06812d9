//! # Document Conversion
//!
//! Converts parsed JSON and YAML documents into [`Value`] trees and back.
//! This is the boundary where data files enter the engine; nothing here
//! parses text itself, it only maps the `serde_json` / `serde_yaml` trees.
//!
//! ## Keyword Convention
//!
//! JSON and YAML have no keyword type. A string that starts with `:` and
//! parses as a keyword becomes a keyword atom; every other string stays a
//! string. Map keys follow the same rule, so `{":app/email": "a@b"}` yields
//! a map keyed by the keyword `:app/email`.

use crate::error::SpecError;
use crate::keyword::Keyword;
use crate::value::{Atom, Value, ValueMap};

fn string_atom(s: &str) -> Value {
    if s.starts_with(':') {
        if let Ok(kw) = Keyword::parse(s) {
            return Value::from(kw);
        }
    }
    Value::str(s)
}

impl Value {
    /// Convert a JSON document into a value.
    ///
    /// Integers that fit `i64` become ints; every other number becomes a
    /// float.
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::nil(),
            serde_json::Value::Bool(b) => Value::bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::int(i),
                None => Value::float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => string_atom(s),
            serde_json::Value::Array(items) => Value::Seq(items.iter().map(Value::from_json).collect()),
            serde_json::Value::Object(obj) => Value::Map(
                obj.iter()
                    .map(|(k, v)| (string_atom(k), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Convert a YAML document into a value.
    ///
    /// YAML tags are ignored. Unlike JSON, YAML map keys may be any value and
    /// are converted recursively.
    pub fn from_yaml(yaml: &serde_yaml::Value) -> Result<Value, SpecError> {
        match yaml {
            serde_yaml::Value::Null => Ok(Value::nil()),
            serde_yaml::Value::Bool(b) => Ok(Value::bool(*b)),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::float(f))
                } else {
                    Err(SpecError::Conversion {
                        reason: format!("unsupported YAML number: {n:?}"),
                    })
                }
            }
            serde_yaml::Value::String(s) => Ok(string_atom(s)),
            serde_yaml::Value::Sequence(seq) => {
                let items: Result<Vec<Value>, SpecError> = seq.iter().map(Value::from_yaml).collect();
                Ok(Value::Seq(items?))
            }
            serde_yaml::Value::Mapping(mapping) => {
                let mut map = ValueMap::new();
                for (k, v) in mapping {
                    map.insert(Value::from_yaml(k)?, Value::from_yaml(v)?);
                }
                Ok(Value::Map(map))
            }
            serde_yaml::Value::Tagged(tagged) => Value::from_yaml(&tagged.value),
        }
    }

    /// Render the value as JSON.
    ///
    /// Keywords become `":ns/name"` strings and symbols become plain strings.
    /// Map keys must be strings, keywords, symbols, or numbers.
    pub fn to_json(&self) -> Result<serde_json::Value, SpecError> {
        match self {
            Value::Atom(Atom::Float(f)) if !f.is_finite() => Err(SpecError::Conversion {
                reason: format!("non-finite float {f} has no JSON form"),
            }),
            Value::Atom(_) => serde_json::to_value(self).map_err(|e| SpecError::Conversion {
                reason: e.to_string(),
            }),
            Value::Seq(items) => {
                let items: Result<Vec<_>, _> = items.iter().map(Value::to_json).collect();
                Ok(serde_json::Value::Array(items?))
            }
            Value::Map(map) => {
                let mut obj = serde_json::Map::new();
                for (k, v) in map.iter() {
                    let key = match k {
                        Value::Atom(Atom::Str(s)) | Value::Atom(Atom::Symbol(s)) => s.clone(),
                        Value::Atom(Atom::Keyword(kw)) => kw.to_string(),
                        Value::Atom(Atom::Int(i)) => i.to_string(),
                        other => {
                            return Err(SpecError::Conversion {
                                reason: format!(
                                    "map key {other} of type {} has no JSON form",
                                    other.type_name()
                                ),
                            })
                        }
                    };
                    obj.insert(key, v.to_json()?);
                }
                Ok(serde_json::Value::Object(obj))
            }
        }
    }
}
