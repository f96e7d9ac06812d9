//! # Spec Expressions
//!
//! Parses one catalog expression (a parsed YAML node) into a [`Spec`].
//!
//! ```yaml
//! int?                              # builtin predicate
//! ":app/email"                      # reference to a registered spec
//! { in: [2, 4, 6, 8] }              # membership
//! { and: [int?, even?] }
//! { or: { ":i": int?, ":s": string? } }
//! { keys: { req: [":app/email"], opt_un: [":app/age"] } }
//! { cat: { ":odds": { "+": odd? }, ":even": { "?": even? } } }
//! { alt: { ... } }
//! { "*": int? }   { "+": int? }   { "?": int? }
//! { rep: { min: 2, max: 4, spec: int? } }
//! { "&": [ { "*": any? }, even-count? ] }
//! { spec: { cat: { ... } } }
//! ```
//!
//! Tagged combinators keep the document's key order, which is the order
//! alternatives are tried and `cat` parts are matched.

use serde_yaml::{Mapping, Value as Yaml};
use vspec_core::{Keyword, SpecError, Value};
use vspec_engine::{KeysSpec, Spec};

use crate::error::CatalogError;

/// Parses expressions belonging to one catalog entry.
pub(crate) struct ExprParser<'a> {
    entry: &'a str,
}

impl<'a> ExprParser<'a> {
    pub(crate) fn new(entry: &'a str) -> Self {
        Self { entry }
    }

    fn invalid(&self, reason: impl Into<String>) -> CatalogError {
        CatalogError::InvalidExpression {
            entry: self.entry.to_string(),
            reason: reason.into(),
        }
    }

    fn malformed(&self, source: SpecError) -> CatalogError {
        CatalogError::Spec {
            entry: self.entry.to_string(),
            source,
        }
    }

    pub(crate) fn parse(&self, expr: &Yaml) -> Result<Spec, CatalogError> {
        match expr {
            Yaml::String(text) if text.starts_with(':') => Ok(Spec::reference(self.keyword(text)?)),
            Yaml::String(name) => Spec::builtin(name)
                .map_err(|_| self.invalid(format!("unknown predicate '{name}'"))),
            Yaml::Mapping(mapping) => self.combinator(mapping),
            Yaml::Tagged(tagged) => self.parse(&tagged.value),
            other => Err(self.invalid(format!(
                "expected a predicate name, a :keyword reference, or a single-key map, got {}",
                kind(other)
            ))),
        }
    }

    fn combinator(&self, mapping: &Mapping) -> Result<Spec, CatalogError> {
        let mut entries = mapping.iter();
        let (op, arg) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(self.invalid(format!(
                    "combinator maps must have exactly one key, got {}",
                    mapping.len()
                )))
            }
        };
        let Some(op) = op.as_str() else {
            return Err(self.invalid(format!("combinator name must be a string, got {}", kind(op))));
        };

        match op {
            "in" => {
                let values = self
                    .list(op, arg)?
                    .iter()
                    .map(|v| Value::from_yaml(v).map_err(|e| self.malformed(e)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Spec::member(values))
            }
            "and" => Ok(Spec::and(self.parse_all(self.list(op, arg)?)?)),
            "or" => Spec::or(self.tagged(op, arg)?).map_err(|e| self.malformed(e)),
            "cat" => Spec::cat(self.tagged(op, arg)?).map_err(|e| self.malformed(e)),
            "alt" => Spec::alt(self.tagged(op, arg)?).map_err(|e| self.malformed(e)),
            "keys" => self.keys(arg),
            "*" => Ok(Spec::zero_or_more(self.parse(arg)?)),
            "+" => Ok(Spec::one_or_more(self.parse(arg)?)),
            "?" => Ok(Spec::optional(self.parse(arg)?)),
            "rep" => self.rep(arg),
            "&" => {
                let mut parts = self.parse_all(self.list(op, arg)?)?.into_iter();
                let inner = parts
                    .next()
                    .ok_or_else(|| self.invalid("'&' needs a sequence pattern"))?;
                Ok(Spec::regex_and(inner, parts.collect()))
            }
            "spec" => Ok(Spec::nested(self.parse(arg)?)),
            other => Err(self.invalid(format!("unknown combinator '{other}'"))),
        }
    }

    fn parse_all(&self, exprs: &[Yaml]) -> Result<Vec<Spec>, CatalogError> {
        exprs.iter().map(|e| self.parse(e)).collect()
    }

    fn list<'y>(&self, op: &str, arg: &'y Yaml) -> Result<&'y [Yaml], CatalogError> {
        arg.as_sequence()
            .map(Vec::as_slice)
            .ok_or_else(|| self.invalid(format!("'{op}' expects a list, got {}", kind(arg))))
    }

    fn tagged(&self, op: &str, arg: &Yaml) -> Result<Vec<(Keyword, Spec)>, CatalogError> {
        let Some(mapping) = arg.as_mapping() else {
            return Err(self.invalid(format!("'{op}' expects a map of tag to expression, got {}", kind(arg))));
        };
        mapping
            .iter()
            .map(|(tag, expr)| {
                let tag = tag
                    .as_str()
                    .ok_or_else(|| self.invalid(format!("'{op}' tags must be strings")))?;
                Ok((self.keyword(tag)?, self.parse(expr)?))
            })
            .collect()
    }

    fn keys(&self, arg: &Yaml) -> Result<Spec, CatalogError> {
        let Some(mapping) = arg.as_mapping() else {
            return Err(self.invalid(format!("'keys' expects a map, got {}", kind(arg))));
        };
        let mut keys = KeysSpec::new();
        for (section, names) in mapping {
            let section = section.as_str().unwrap_or_default();
            let names = self
                .list(section, names)?
                .iter()
                .map(|n| {
                    n.as_str()
                        .ok_or_else(|| self.invalid("'keys' entries must be keyword strings"))
                        .and_then(|s| self.keyword(s))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let target = match section {
                "req" => &mut keys.required,
                "opt" => &mut keys.optional,
                "req_un" => &mut keys.required_unqualified,
                "opt_un" => &mut keys.optional_unqualified,
                other => {
                    return Err(self.invalid(format!(
                        "unknown 'keys' section '{other}' (expected req, opt, req_un, opt_un)"
                    )))
                }
            };
            target.extend(names);
        }
        Spec::keys(keys).map_err(|e| self.malformed(e))
    }

    fn rep(&self, arg: &Yaml) -> Result<Spec, CatalogError> {
        let Some(mapping) = arg.as_mapping() else {
            return Err(self.invalid(format!("'rep' expects a map, got {}", kind(arg))));
        };
        let bound = |field: &str| -> Result<Option<usize>, CatalogError> {
            match mapping.get(field) {
                None | Some(Yaml::Null) => Ok(None),
                Some(n) => n
                    .as_u64()
                    .and_then(|n| usize::try_from(n).ok())
                    .map(Some)
                    .ok_or_else(|| {
                        self.invalid(format!("'rep' {field} must be a non-negative integer"))
                    }),
            }
        };
        let min = bound("min")?.unwrap_or(0);
        let max = bound("max")?;
        let inner = mapping
            .get("spec")
            .ok_or_else(|| self.invalid("'rep' needs a 'spec'"))?;
        Spec::repeat(min, max, self.parse(inner)?).map_err(|e| self.malformed(e))
    }

    fn keyword(&self, text: &str) -> Result<Keyword, CatalogError> {
        Keyword::parse(text).map_err(|e| self.invalid(e.to_string()))
    }
}

fn kind(yaml: &Yaml) -> &'static str {
    match yaml {
        Yaml::Null => "null",
        Yaml::Bool(_) => "a boolean",
        Yaml::Number(_) => "a number",
        Yaml::String(_) => "a string",
        Yaml::Sequence(_) => "a list",
        Yaml::Mapping(_) => "a map",
        Yaml::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vspec_engine::{Form, Registry};

    fn parse(text: &str) -> Result<Spec, CatalogError> {
        let yaml: Yaml = serde_yaml::from_str(text).unwrap();
        ExprParser::new(":test/entry").parse(&yaml)
    }

    fn form(text: &str) -> String {
        Form::of(&parse(text).unwrap()).to_string()
    }

    #[test]
    fn parses_leaves() {
        assert_eq!(form("int?"), "int?");
        assert_eq!(form("':app/email'"), ":app/email");
        assert_eq!(form("{ in: [8, 2, 6, 4] }"), "#{2 4 6 8}");
        assert_eq!(form("{ in: [':a', 'b'] }"), "#{\"b\" :a}");
    }

    #[test]
    fn preserves_tag_order() {
        assert_eq!(
            form("{ cat: { ':quantity': number?, ':unit': keyword? } }"),
            "(cat :quantity number? :unit keyword?)"
        );
        assert_eq!(
            form("{ or: { ':s': string?, ':i': int? } }"),
            "(or :s string? :i int?)"
        );
    }

    #[test]
    fn parses_regex_operators() {
        assert_eq!(form("{ '*': int? }"), "(* int?)");
        assert_eq!(form("{ '+': odd? }"), "(+ odd?)");
        assert_eq!(form("{ '?': even? }"), "(? even?)");
        assert_eq!(form("{ rep: { min: 2, max: 3, spec: int? } }"), "(rep 2 3 int?)");
        assert_eq!(form("{ rep: { min: 1, spec: int? } }"), "(+ int?)");
        assert_eq!(form("{ rep: { min: 0, max: 0, spec: int? } }"), "(rep 0 0 int?)");
        assert_eq!(
            form("{ '&': [ { '*': any? }, even-count? ] }"),
            "(& (* any?) even-count?)"
        );
        assert_eq!(
            form("{ spec: { alt: { ':n': int?, ':s': string? } } }"),
            "(spec (alt :n int? :s string?))"
        );
    }

    #[test]
    fn parses_keys_sections() {
        assert_eq!(
            form("{ keys: { req: [':app/email'], opt_un: [':app/age'] } }"),
            "(keys :req [:app/email] :opt-un [:app/age])"
        );
    }

    #[test]
    fn unknown_predicate_names_the_entry() {
        let err = parse("integer?").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidExpression { .. }));
        let message = err.to_string();
        assert!(message.contains(":test/entry"));
        assert!(message.contains("integer?"));
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(parse("42").is_err());
        assert!(parse("{ and: int? }").is_err());
        assert!(parse("{ '*': int?, '+': int? }").is_err());
        assert!(parse("{ wat: int? }").is_err());
        assert!(parse("{ keys: { required: [] } }").is_err());
        assert!(parse("{ '&': [] }").is_err());
        assert!(parse("{ rep: { min: -1, spec: int? } }").is_err());
    }

    #[test]
    fn construction_errors_are_wrapped() {
        let err = parse("{ rep: { min: 3, max: 2, spec: int? } }").unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Spec {
                source: SpecError::MalformedSpec { .. },
                ..
            }
        ));
        assert!(matches!(
            parse("{ alt: {} }").unwrap_err(),
            CatalogError::Spec { .. }
        ));
    }

    #[test]
    fn parsed_spec_evaluates() {
        let registry = Registry::new();
        let spec = parse("{ cat: { ':odds': { '+': odd? }, ':even': { '?': even? } } }").unwrap();
        let value = Value::seq([1, 3, 5, 100].map(Value::int));
        assert!(registry.valid(&spec, &value).unwrap());
    }
}
