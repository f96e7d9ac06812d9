//! # Sequence Regex Engine
//!
//! Matches `cat`, `alt`, `repeat`, and `&` patterns against the elements of
//! a sequence with a single cursor moving left to right.
//!
//! ## Matching Rules
//!
//! - A non-regex spec consumes exactly one element and is evaluated against
//!   it. `Nested` is non-regex, so its wrapped pattern sees that element as a
//!   complete sequence of its own.
//! - A `Ref` resolving to a regex, directly or through other names, splices
//!   into the enclosing pattern.
//! - Name resolutions are counted against `MAX_RESOLUTION_DEPTH` only until
//!   the cursor advances; a pattern that recurses once per element is
//!   bounded by the input, not by the limit.
//! - `Repeat` is greedy and does not backtrack. Each repetition is atomic: a
//!   repetition that fails leaves the cursor where that repetition started.
//! - A repetition that matches without consuming input ends the loop and
//!   satisfies any remaining minimum, since repeating it cannot change the
//!   outcome.
//!
//! ## Diagnostics
//!
//! Every problem raised inside a pattern records the cursor index where it
//! was raised as the first step of its data path. A successful match also
//! carries the problems that stopped it from consuming more (the failed
//! repetition that ended a loop). When input remains after the top-level
//! pattern, those are reported; `Extra input` is reported only when nothing
//! tried and failed at that position.

use vspec_core::{Keyword, SpecError, Value, ValueMap};

use crate::conform::{Evaluator, Outcome};
use crate::form::Form;
use crate::problem::{self, DataKey, Problem, EXTRA_INPUT, INSUFFICIENT_INPUT};
use crate::spec::Spec;

/// Result of matching a pattern at a cursor position.
#[derive(Debug)]
enum Step {
    /// The pattern matched `items[pos..next]`.
    Matched {
        /// Conformed sub-result.
        value: Value,
        /// The match carries nothing worth recording in an enclosing `cat`.
        empty: bool,
        /// Cursor after the match.
        next: usize,
        /// Why the match did not extend past `next`, if anything was tried.
        blocked: Vec<Problem>,
    },
    /// The pattern failed at or after the cursor.
    Failed(Vec<Problem>),
}

impl Step {
    fn matched(value: Value, next: usize) -> Self {
        Self::Matched {
            value,
            empty: false,
            next,
            blocked: Vec::new(),
        }
    }
}

/// Match a regex spec against a whole value, which must be a sequence.
pub(crate) fn conform_sequence(
    ev: &Evaluator<'_>,
    spec: &Spec,
    value: &Value,
    depth: usize,
) -> Result<Outcome, SpecError> {
    let Some(items) = value.as_seq() else {
        return Ok(Err(vec![Problem::new(Form::sym("sequential?"), value.clone())]));
    };
    match match_at(ev, spec, items, 0, depth)? {
        Step::Matched { next, blocked, .. } if next < items.len() => {
            tracing::trace!(consumed = next, len = items.len(), "sequence has trailing input");
            if !blocked.is_empty() {
                return Ok(Err(blocked));
            }
            Ok(Err(vec![Problem::new(Form::of(spec), Value::seq(items[next..].to_vec()))
                .with_reason(EXTRA_INPUT)
                .at(DataKey::Index(next))]))
        }
        Step::Matched { value, .. } => Ok(Ok(value)),
        Step::Failed(problems) => Ok(Err(problems)),
    }
}

fn insufficient(spec: &Spec, pos: usize) -> Step {
    Step::Failed(vec![Problem::new(Form::of(spec), Value::seq([]))
        .with_reason(INSUFFICIENT_INPUT)
        .at(DataKey::Index(pos))])
}

fn match_at(
    ev: &Evaluator<'_>,
    spec: &Spec,
    items: &[Value],
    pos: usize,
    depth: usize,
) -> Result<Step, SpecError> {
    match spec {
        Spec::Cat(fields) => match_cat(ev, fields, items, pos, depth),
        Spec::Alt(branches) => match_alt(ev, spec, branches, items, pos, depth),
        Spec::Repeat { min, max, inner } => {
            match_repeat(ev, spec, *min, *max, inner, items, pos, depth)
        }
        Spec::RegexAnd { inner, extras } => {
            let (value, empty, next, blocked) = match match_at(ev, inner, items, pos, depth)? {
                Step::Matched {
                    value,
                    empty,
                    next,
                    blocked,
                } => (value, empty, next, blocked),
                failed => return Ok(failed),
            };
            Ok(match ev.eval_and(extras, &value, depth)? {
                Ok(value) => Step::Matched {
                    value,
                    empty,
                    next,
                    blocked,
                },
                Err(problems) => Step::Failed(problem::under_key(problems, DataKey::Index(pos))),
            })
        }
        Spec::Ref(name) => {
            // Follow aliases first so a name bound to another regex name splices.
            let mut chain = vec![name.clone()];
            let mut resolved = ev.resolve_at(name, depth)?;
            loop {
                let alias = match resolved.as_ref() {
                    Spec::Ref(alias) => alias.clone(),
                    _ => break,
                };
                resolved = ev.resolve_at(&alias, depth + chain.len())?;
                chain.push(alias);
            }
            let step = if resolved.is_regex() {
                match_at(ev, &resolved, items, pos, depth + chain.len())?
            } else {
                match_element(ev, spec, &resolved, items, pos)?
            };
            let via_chain = |problems: Vec<Problem>| {
                chain
                    .iter()
                    .rev()
                    .fold(problems, |problems, name| problem::via(problems, name))
            };
            Ok(match step {
                Step::Failed(problems) => Step::Failed(via_chain(problems)),
                Step::Matched {
                    value,
                    empty,
                    next,
                    blocked,
                } => Step::Matched {
                    value,
                    empty,
                    next,
                    blocked: via_chain(blocked),
                },
            })
        }
        _ => match_element(ev, spec, spec, items, pos),
    }
}

/// Consume one element with a non-regex spec. `shown` names the spec in an
/// insufficient-input problem.
///
/// The element is a sub-value, so its evaluation starts a fresh resolution
/// count.
fn match_element(
    ev: &Evaluator<'_>,
    shown: &Spec,
    spec: &Spec,
    items: &[Value],
    pos: usize,
) -> Result<Step, SpecError> {
    let Some(item) = items.get(pos) else {
        return Ok(insufficient(shown, pos));
    };
    Ok(match ev.eval(spec, item, 0)? {
        Ok(value) => Step::matched(value, pos + 1),
        Err(problems) => Step::Failed(problem::under_key(problems, DataKey::Index(pos))),
    })
}

fn match_cat(
    ev: &Evaluator<'_>,
    fields: &[(Keyword, Spec)],
    items: &[Value],
    start: usize,
    depth: usize,
) -> Result<Step, SpecError> {
    let mut pos = start;
    let mut conformed = ValueMap::new();
    let mut stopped_by = Vec::new();
    for (tag, field) in fields {
        let depth = if pos > start { 0 } else { depth };
        match match_at(ev, field, items, pos, depth)? {
            Step::Matched {
                value,
                empty,
                next,
                blocked,
            } => {
                if !empty {
                    conformed.insert(Value::from(tag.clone()), value);
                }
                // Only problems raised at the final cursor explain the stop.
                if next > pos {
                    stopped_by.clear();
                }
                stopped_by.extend(problem::under_tag(blocked, tag));
                pos = next;
            }
            Step::Failed(problems) => return Ok(Step::Failed(problem::under_tag(problems, tag))),
        }
    }
    Ok(Step::Matched {
        empty: conformed.is_empty() && pos == start,
        value: Value::Map(conformed),
        next: pos,
        blocked: stopped_by,
    })
}

fn match_alt(
    ev: &Evaluator<'_>,
    spec: &Spec,
    branches: &[(Keyword, Spec)],
    items: &[Value],
    pos: usize,
    depth: usize,
) -> Result<Step, SpecError> {
    let mut problems = Vec::new();
    for (tag, branch) in branches {
        match match_at(ev, branch, items, pos, depth)? {
            Step::Matched {
                value,
                next,
                blocked,
                ..
            } => {
                return Ok(Step::Matched {
                    value: Value::seq([Value::from(tag.clone()), value]),
                    empty: false,
                    next,
                    blocked: problem::under_tag(blocked, tag),
                })
            }
            Step::Failed(branch_problems) => {
                problems.extend(problem::under_tag(branch_problems, tag))
            }
        }
    }
    if pos >= items.len() {
        return Ok(insufficient(spec, pos));
    }
    Ok(Step::Failed(problems))
}

#[allow(clippy::too_many_arguments)]
fn match_repeat(
    ev: &Evaluator<'_>,
    spec: &Spec,
    min: usize,
    max: Option<usize>,
    inner: &Spec,
    items: &[Value],
    start: usize,
    depth: usize,
) -> Result<Step, SpecError> {
    let mut pos = start;
    let mut matches = Vec::new();
    let mut stopped_by = Vec::new();
    while max.map_or(true, |max| matches.len() < max) {
        if pos >= items.len() && matches.len() >= min {
            break;
        }
        let depth = if pos > start { 0 } else { depth };
        match match_at(ev, inner, items, pos, depth)? {
            Step::Matched {
                value,
                next,
                blocked,
                ..
            } => {
                matches.push(value);
                stopped_by = blocked;
                if next == pos {
                    break;
                }
                pos = next;
            }
            Step::Failed(problems) if matches.len() >= min => {
                stopped_by = problems;
                break;
            }
            failed @ Step::Failed(_) => return Ok(failed),
        }
    }

    let empty = matches.is_empty();
    let value = if spec.is_optional_shape() {
        matches.pop().unwrap_or_else(Value::nil)
    } else {
        Value::Seq(matches)
    };
    Ok(Step::Matched {
        value,
        empty,
        next: pos,
        blocked: stopped_by,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use vspec_core::Keyword;

    fn kw(s: &str) -> Keyword {
        Keyword::new(s)
    }

    fn b(name: &str) -> Spec {
        Spec::builtin(name).unwrap()
    }

    fn run(registry: &Registry, spec: &Spec, value: Value) -> Outcome {
        Evaluator::new(registry).eval(spec, &value, 0).unwrap()
    }

    fn ints(xs: &[i64]) -> Value {
        Value::seq(xs.iter().copied().map(Value::int))
    }

    #[test]
    fn cat_conforms_to_tagged_map() {
        let registry = Registry::new();
        let spec = Spec::cat(vec![
            (kw("quantity"), b("number?")),
            (kw("unit"), b("keyword?")),
        ])
        .unwrap();
        let value = Value::seq([Value::int(2), Value::kw("teaspoon")]);
        assert_eq!(
            run(&registry, &spec, value),
            Ok(Value::map([
                (Value::kw("quantity"), Value::int(2)),
                (Value::kw("unit"), Value::kw("teaspoon")),
            ]))
        );
    }

    #[test]
    fn cat_failure_is_tagged_and_indexed() {
        let registry = Registry::new();
        let spec = Spec::cat(vec![
            (kw("quantity"), b("number?")),
            (kw("unit"), b("keyword?")),
        ])
        .unwrap();
        let problems =
            run(&registry, &spec, Value::seq([Value::kw("teaspoon"), Value::int(2)])).unwrap_err();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].path, vec![kw("quantity")]);
        assert_eq!(problems[0].in_path, vec![DataKey::Index(0)]);
        assert_eq!(problems[0].value, Value::kw("teaspoon"));
    }

    #[test]
    fn optional_absent_is_omitted_from_cat() {
        let registry = Registry::new();
        let spec = Spec::cat(vec![
            (kw("odds"), Spec::one_or_more(b("odd?"))),
            (kw("even"), Spec::optional(b("even?"))),
        ])
        .unwrap();
        assert_eq!(
            run(&registry, &spec, ints(&[1, 3, 5, 100])),
            Ok(Value::map([
                (Value::kw("odds"), ints(&[1, 3, 5])),
                (Value::kw("even"), Value::int(100)),
            ]))
        );
        assert_eq!(
            run(&registry, &spec, ints(&[1])),
            Ok(Value::map([(Value::kw("odds"), ints(&[1]))]))
        );
    }

    #[test]
    fn star_over_empty_is_empty_seq() {
        let registry = Registry::new();
        assert_eq!(
            run(&registry, &Spec::zero_or_more(b("int?")), Value::seq([])),
            Ok(Value::seq([]))
        );
        assert_eq!(
            run(&registry, &Spec::optional(b("int?")), Value::seq([])),
            Ok(Value::nil())
        );
    }

    #[test]
    fn greedy_repeat_does_not_give_back() {
        let registry = Registry::new();
        let spec = Spec::cat(vec![
            (kw("xs"), Spec::zero_or_more(b("int?"))),
            (kw("last"), b("int?")),
        ])
        .unwrap();
        let problems = run(&registry, &spec, ints(&[1, 2, 3])).unwrap_err();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].has_reason(INSUFFICIENT_INPUT));
        assert_eq!(problems[0].path, vec![kw("last")]);
        assert_eq!(problems[0].in_path, vec![DataKey::Index(3)]);
    }

    #[test]
    fn trailing_elements_are_extra_input() {
        let registry = Registry::new();
        let spec = Spec::cat(vec![(kw("a"), b("int?"))]).unwrap();
        let problems = run(&registry, &spec, ints(&[1, 2, 3])).unwrap_err();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].has_reason(EXTRA_INPUT));
        assert_eq!(problems[0].value, ints(&[2, 3]));
        assert_eq!(problems[0].in_path, vec![DataKey::Index(1)]);
    }

    #[test]
    fn plus_requires_one() {
        let registry = Registry::new();
        let problems = run(&registry, &Spec::one_or_more(b("odd?")), ints(&[])).unwrap_err();
        assert!(problems[0].has_reason(INSUFFICIENT_INPUT));
        assert_eq!(problems[0].form.to_string(), "odd?");
        let problems = run(&registry, &Spec::one_or_more(b("odd?")), ints(&[2])).unwrap_err();
        assert_eq!(problems[0].form.to_string(), "odd?");
        assert_eq!(problems[0].in_path, vec![DataKey::Index(0)]);
    }

    #[test]
    fn bounded_repeat_stops_at_max() {
        let registry = Registry::new();
        let spec = Spec::cat(vec![
            (kw("head"), Spec::repeat(1, Some(2), b("int?")).unwrap()),
            (kw("tail"), Spec::zero_or_more(b("int?"))),
        ])
        .unwrap();
        assert_eq!(
            run(&registry, &spec, ints(&[1, 2, 3, 4])),
            Ok(Value::map([
                (Value::kw("head"), ints(&[1, 2])),
                (Value::kw("tail"), ints(&[3, 4])),
            ]))
        );
    }

    #[test]
    fn alt_tags_the_matching_branch() {
        let registry = Registry::new();
        let spec = Spec::alt(vec![
            (kw("pair"), Spec::cat(vec![(kw("k"), b("keyword?")), (kw("v"), b("int?"))]).unwrap()),
            (kw("single"), b("int?")),
        ])
        .unwrap();
        assert_eq!(
            run(&registry, &spec, ints(&[7])),
            Ok(Value::seq([Value::kw("single"), Value::int(7)]))
        );
        let problems = run(&registry, &spec, Value::seq([Value::str("x")])).unwrap_err();
        assert_eq!(problems.len(), 2);
        assert!(problems
            .iter()
            .all(|p| p.in_path == vec![DataKey::Index(0)]));
    }

    #[test]
    fn alt_at_end_is_insufficient_input() {
        let registry = Registry::new();
        let spec = Spec::alt(vec![(kw("i"), b("int?")), (kw("s"), b("string?"))]).unwrap();
        let problems = run(&registry, &spec, ints(&[])).unwrap_err();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].form.to_string(), "(alt :i int? :s string?)");
        assert!(problems[0].has_reason(INSUFFICIENT_INPUT));
    }

    #[test]
    fn nested_matches_a_single_element() {
        let registry = Registry::new();
        let pairs = Spec::zero_or_more(Spec::nested(
            Spec::cat(vec![(kw("k"), b("keyword?")), (kw("v"), b("int?"))]).unwrap(),
        ));
        let value = Value::seq([
            Value::seq([Value::kw("a"), Value::int(1)]),
            Value::seq([Value::kw("b"), Value::int(2)]),
        ]);
        let conformed = run(&registry, &pairs, value).unwrap();
        assert_eq!(conformed.as_seq().map(<[Value]>::len), Some(2));

        let spliced = Spec::zero_or_more(
            Spec::cat(vec![(kw("k"), b("keyword?")), (kw("v"), b("int?"))]).unwrap(),
        );
        let flat = Value::seq([Value::kw("a"), Value::int(1), Value::kw("b"), Value::int(2)]);
        assert_eq!(run(&registry, &spliced, flat).unwrap().as_seq().map(<[Value]>::len), Some(2));
    }

    #[test]
    fn ref_to_regex_splices() {
        let registry = Registry::new();
        registry
            .register(
                kw("app/pair"),
                Spec::cat(vec![(kw("k"), b("keyword?")), (kw("v"), b("int?"))]).unwrap(),
            )
            .unwrap();
        let spec = Spec::one_or_more(Spec::reference(kw("app/pair")));
        let value = Value::seq([Value::kw("a"), Value::int(1), Value::kw("b"), Value::int(2)]);
        assert!(run(&registry, &spec, value).is_ok());

        let bad = Value::seq([Value::kw("a"), Value::str("x")]);
        let problems = run(&registry, &spec, bad).unwrap_err();
        assert_eq!(problems[0].via, vec![kw("app/pair")]);
        assert_eq!(problems[0].in_path, vec![DataKey::Index(1)]);
    }

    #[test]
    fn regex_and_checks_conformed_result() {
        let registry = Registry::new();
        let spec = Spec::regex_and(Spec::zero_or_more(b("any?")), vec![b("even-count?")]);
        assert_eq!(run(&registry, &spec, ints(&[1, 2])), Ok(ints(&[1, 2])));
        let problems = run(&registry, &spec, ints(&[1, 2, 3])).unwrap_err();
        assert_eq!(problems[0].form.to_string(), "even-count?");
        assert_eq!(problems[0].value, ints(&[1, 2, 3]));
    }

    #[test]
    fn non_sequence_is_rejected() {
        let registry = Registry::new();
        let problems =
            run(&registry, &Spec::zero_or_more(b("int?")), Value::int(3)).unwrap_err();
        assert_eq!(problems[0].form.to_string(), "sequential?");
    }

    #[test]
    fn zero_progress_repetition_terminates() {
        let registry = Registry::new();
        let spec = Spec::one_or_more(Spec::zero_or_more(b("int?")));
        assert_eq!(
            run(&registry, &spec, Value::seq([])),
            Ok(Value::seq([Value::seq([])]))
        );
    }

    #[test]
    fn stopped_repeat_explains_the_blocking_element() {
        let registry = Registry::new();
        let spec = Spec::cat(vec![(kw("xs"), Spec::zero_or_more(b("int?")))]).unwrap();
        let problems =
            run(&registry, &spec, Value::seq([Value::int(1), Value::kw("a")])).unwrap_err();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].form.to_string(), "int?");
        assert_eq!(problems[0].path, vec![kw("xs")]);
        assert_eq!(problems[0].in_path, vec![DataKey::Index(1)]);
        assert_eq!(problems[0].value, Value::kw("a"));
    }

    #[test]
    fn alias_of_regex_name_splices() {
        let registry = Registry::new();
        registry
            .register(
                kw("app/pair"),
                Spec::cat(vec![(kw("k"), b("keyword?")), (kw("v"), b("int?"))]).unwrap(),
            )
            .unwrap();
        registry
            .register(kw("app/alias"), Spec::reference(kw("app/pair")))
            .unwrap();
        let flat = Value::seq([Value::kw("a"), Value::int(1), Value::kw("b"), Value::int(2)]);
        let direct = Spec::one_or_more(Spec::reference(kw("app/pair")));
        let aliased = Spec::one_or_more(Spec::reference(kw("app/alias")));
        assert_eq!(
            run(&registry, &aliased, flat.clone()),
            run(&registry, &direct, flat)
        );

        let bad = Value::seq([Value::kw("a"), Value::str("x")]);
        let problems = run(&registry, &aliased, bad).unwrap_err();
        assert_eq!(problems[0].via, vec![kw("app/alias"), kw("app/pair")]);
        assert_eq!(problems[0].in_path, vec![DataKey::Index(1)]);
    }

    #[test]
    fn right_recursion_is_bounded_by_input() {
        // Debug builds use large frames; give the recursion room.
        std::thread::Builder::new()
            .stack_size(16 * 1024 * 1024)
            .spawn(|| {
                let registry = Registry::new();
                let cons = Spec::cat(vec![
                    (kw("h"), b("int?")),
                    (kw("t"), Spec::reference(kw("app/ints"))),
                ])
                .unwrap();
                let empty = Spec::cat(vec![]).unwrap();
                let list = Spec::alt(vec![(kw("cons"), cons), (kw("nil"), empty)]).unwrap();
                registry.register(kw("app/ints"), list).unwrap();

                let long: Vec<i64> = (0..200).collect();
                let ev = Evaluator::new(&registry);
                let outcome = ev
                    .eval(&Spec::reference(kw("app/ints")), &ints(&long), 0)
                    .unwrap();
                assert!(outcome.is_ok());
            })
            .unwrap()
            .join()
            .unwrap();
    }

    #[test]
    fn left_recursion_without_progress_is_malformed() {
        let registry = Registry::new();
        let left = Spec::cat(vec![
            (kw("again"), Spec::reference(kw("app/left"))),
            (kw("x"), b("int?")),
        ])
        .unwrap();
        registry.register(kw("app/left"), left).unwrap();
        let err = Evaluator::new(&registry)
            .eval(&Spec::reference(kw("app/left")), &ints(&[1, 2]), 0)
            .unwrap_err();
        assert!(matches!(err, SpecError::MalformedSpec { .. }));
    }

    #[test]
    fn zero_bounded_repeat_matches_only_nothing() {
        let registry = Registry::new();
        let spec = Spec::repeat(0, Some(0), b("int?")).unwrap();
        assert_eq!(run(&registry, &spec, ints(&[])), Ok(ints(&[])));
        let problems = run(&registry, &spec, ints(&[1])).unwrap_err();
        assert_eq!(problems[0].reason.as_deref(), Some(EXTRA_INPUT));
    }
}
