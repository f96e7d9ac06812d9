//! # Map Specs
//!
//! A `keys` spec checks two things about a map: that every required
//! attribute is present, and that every keyword key naming a registered
//! spec holds a value conforming to it. The second check covers keys the
//! `keys` spec never lists, so an attribute is validated the same way
//! wherever it appears. Keys without a registered spec pass through.

use vspec_core::{Keyword, SpecError, Value, ValueMap};

use crate::conform::{Evaluator, Outcome};
use crate::form::Form;
use crate::problem::{self, DataKey, Problem};
use crate::spec::{KeysSpec, Spec};

pub(crate) fn conform_map(
    ev: &Evaluator<'_>,
    keys: &KeysSpec,
    value: &Value,
) -> Result<Outcome, SpecError> {
    let Some(map) = value.as_map() else {
        return Ok(Err(vec![Problem::new(Form::sym("map?"), value.clone())]));
    };

    let mut problems: Vec<Problem> = keys
        .required
        .iter()
        .cloned()
        .chain(keys.required_unqualified.iter().map(Keyword::unqualified))
        .filter(|key| map.get_keyword(key).is_none())
        .map(|key| {
            Problem::new(Form::contains_key(&key), value.clone())
                .with_reason(format!("missing required key {key}"))
        })
        .collect();

    let mut conformed = ValueMap::new();
    for (key, item) in map.iter() {
        let checked = key
            .as_keyword()
            .and_then(|k| Some((k, attribute_spec(ev, keys, k)?)));
        let Some((attr, target)) = checked else {
            conformed.insert(key.clone(), item.clone());
            continue;
        };
        // Attribute values are sub-values; the resolution count restarts.
        match ev.eval(&Spec::Ref(target), item, 0)? {
            Ok(v) => {
                conformed.insert(key.clone(), v);
            }
            Err(attr_problems) => {
                let attr_problems = problem::under_key(attr_problems, DataKey::Key(key.clone()));
                problems.extend(problem::under_tag(attr_problems, attr));
            }
        }
    }

    if problems.is_empty() {
        Ok(Ok(Value::Map(conformed)))
    } else {
        Ok(Err(problems))
    }
}

/// The registered spec governing a keyword key, if any.
fn attribute_spec(ev: &Evaluator<'_>, keys: &KeysSpec, key: &Keyword) -> Option<Keyword> {
    let name = keys.unqualified_target(key).unwrap_or(key);
    ev.registry().contains(name).then(|| name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    fn kw(s: &str) -> Keyword {
        Keyword::new(s)
    }

    fn email_registry() -> Registry {
        let registry = Registry::new();
        registry.register(kw("app/email"), Spec::builtin("string?").unwrap()).unwrap();
        registry.register(kw("app/age"), Spec::builtin("nat-int?").unwrap()).unwrap();
        registry
    }

    fn run(registry: &Registry, spec: &Spec, value: Value) -> Outcome {
        Evaluator::new(registry).eval(spec, &value, 0).unwrap()
    }

    #[test]
    fn missing_required_key_is_named() {
        let registry = email_registry();
        let spec = Spec::keys(KeysSpec::new().req(kw("app/email"))).unwrap();
        let problems = run(&registry, &spec, Value::map([])).unwrap_err();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].form.to_string(), "(contains? % :app/email)");
        assert_eq!(
            problems[0].reason.as_deref(),
            Some("missing required key :app/email")
        );
    }

    #[test]
    fn bad_attribute_value_is_located() {
        let registry = email_registry();
        let spec = Spec::keys(KeysSpec::new().req(kw("app/email"))).unwrap();
        let problems = run(
            &registry,
            &spec,
            Value::map([(Value::kw("app/email"), Value::int(42))]),
        )
        .unwrap_err();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].path, vec![kw("app/email")]);
        assert_eq!(problems[0].in_path, vec![DataKey::Key(Value::kw("app/email"))]);
        assert_eq!(problems[0].via, vec![kw("app/email")]);
        assert_eq!(problems[0].form.to_string(), "string?");
    }

    #[test]
    fn unlisted_registered_keys_are_still_checked() {
        let registry = email_registry();
        let spec = Spec::keys(KeysSpec::new().req(kw("app/email"))).unwrap();
        let value = Value::map([
            (Value::kw("app/email"), Value::str("a@b.c")),
            (Value::kw("app/age"), Value::int(-1)),
        ]);
        let problems = run(&registry, &spec, value).unwrap_err();
        assert_eq!(problems[0].path, vec![kw("app/age")]);
    }

    #[test]
    fn unknown_keys_pass_through() {
        let registry = email_registry();
        let spec = Spec::keys(KeysSpec::new().req(kw("app/email"))).unwrap();
        let value = Value::map([
            (Value::kw("app/email"), Value::str("a@b.c")),
            (Value::kw("other/x"), Value::int(1)),
            (Value::str("plain"), Value::nil()),
        ]);
        assert_eq!(run(&registry, &spec, value.clone()), Ok(value));
    }

    #[test]
    fn unqualified_keys_use_local_names() {
        let registry = email_registry();
        let spec = Spec::keys(
            KeysSpec::new()
                .req_un(kw("app/email"))
                .opt_un(kw("app/age")),
        )
        .unwrap();
        let ok = Value::map([(Value::kw("email"), Value::str("a@b.c"))]);
        assert!(run(&registry, &spec, ok).is_ok());

        let missing = run(&registry, &spec, Value::map([])).unwrap_err();
        assert_eq!(missing[0].form.to_string(), "(contains? % :email)");

        let bad = Value::map([
            (Value::kw("email"), Value::str("a@b.c")),
            (Value::kw("age"), Value::str("old")),
        ]);
        let problems = run(&registry, &spec, bad).unwrap_err();
        assert_eq!(problems[0].path, vec![kw("age")]);
        assert_eq!(problems[0].via, vec![kw("app/age")]);
    }

    #[test]
    fn values_are_replaced_by_conformed_forms() {
        let registry = Registry::new();
        registry
            .register(
                kw("app/id"),
                Spec::or(vec![
                    (kw("num"), Spec::builtin("int?").unwrap()),
                    (kw("name"), Spec::builtin("string?").unwrap()),
                ])
                .unwrap(),
            )
            .unwrap();
        let spec = Spec::keys(KeysSpec::new().req(kw("app/id"))).unwrap();
        let conformed = run(
            &registry,
            &spec,
            Value::map([(Value::kw("app/id"), Value::int(9))]),
        )
        .unwrap();
        assert_eq!(
            conformed.as_map().and_then(|m| m.get_keyword(&kw("app/id"))),
            Some(&Value::seq([Value::kw("num"), Value::int(9)]))
        );
    }

    #[test]
    fn non_map_fails_map_check() {
        let registry = Registry::new();
        let spec = Spec::keys(KeysSpec::new()).unwrap();
        let problems = run(&registry, &spec, Value::seq([])).unwrap_err();
        assert_eq!(problems[0].form.to_string(), "map?");
    }
}
