//! # Evaluator
//!
//! One recursive walk implements both `conform` and `explain`: evaluating a
//! spec against a value yields either the conformed value or the problems
//! that explain the failure. `conform` discards the problems, `explain`
//! discards the value.
//!
//! Evaluation is a pure function of the spec, the value, and the registry
//! entries it resolves. Configuration defects (`UnresolvedName`,
//! `MalformedSpec`) abort the walk as `Err`; a value failing to conform is
//! the inner `Err` of [`Outcome`].

use vspec_core::{SpecError, Value};

use crate::form::Form;
use crate::keys;
use crate::problem::{self, Problem};
use crate::regex;
use crate::registry::Registry;
use crate::spec::Spec;

/// Conformed value, or the problems explaining why there is none.
pub(crate) type Outcome = Result<Value, Vec<Problem>>;

/// Maximum number of name resolutions without progress.
///
/// The count restarts whenever evaluation moves to a sub-value (a map
/// attribute, a sequence element) or a sequence pattern advances its
/// cursor, so recursive specs over long or deep data never reach it. A
/// name chain that consumes nothing (`:a` referring to `:a`) does, and
/// fails instead of overflowing the stack.
pub const MAX_RESOLUTION_DEPTH: usize = 128;

/// Walks specs against values using a registry for name resolution.
pub(crate) struct Evaluator<'r> {
    registry: &'r Registry,
}

impl<'r> Evaluator<'r> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub(crate) fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Evaluate `spec` against a single value.
    ///
    /// `depth` counts resolutions since the last progress, see
    /// [`MAX_RESOLUTION_DEPTH`].
    pub(crate) fn eval(&self, spec: &Spec, value: &Value, depth: usize) -> Result<Outcome, SpecError> {
        match spec {
            Spec::Pred(p) => Ok(if p.test(value) {
                Ok(value.clone())
            } else {
                Err(vec![Problem::new(Form::of(spec), value.clone())])
            }),
            Spec::Member(set) => Ok(if set.contains(value) {
                Ok(value.clone())
            } else {
                Err(vec![Problem::new(Form::of(spec), value.clone())])
            }),
            Spec::Ref(name) => {
                let resolved = self.resolve_at(name, depth)?;
                let outcome = self.eval(&resolved, value, depth + 1)?;
                Ok(outcome.map_err(|problems| problem::via(problems, name)))
            }
            Spec::And(components) => self.eval_and(components, value, depth),
            Spec::Or(branches) => {
                let mut problems = Vec::new();
                for (tag, branch) in branches {
                    match self.eval(branch, value, depth)? {
                        Ok(conformed) => {
                            return Ok(Ok(Value::seq([Value::from(tag.clone()), conformed])))
                        }
                        Err(branch_problems) => {
                            problems.extend(problem::under_tag(branch_problems, tag))
                        }
                    }
                }
                Ok(Err(problems))
            }
            Spec::Keys(k) => keys::conform_map(self, k, value),
            Spec::Cat(_) | Spec::Alt(_) | Spec::Repeat { .. } | Spec::RegexAnd { .. } => {
                regex::conform_sequence(self, spec, value, depth)
            }
            Spec::Nested(inner) => self.eval(inner, value, depth),
        }
    }

    /// Thread `value` through every component, stopping at the first failure.
    pub(crate) fn eval_and(
        &self,
        components: &[Spec],
        value: &Value,
        depth: usize,
    ) -> Result<Outcome, SpecError> {
        let mut current = value.clone();
        for component in components {
            match self.eval(component, &current, depth)? {
                Ok(next) => current = next,
                Err(problems) => return Ok(Err(problems)),
            }
        }
        Ok(Ok(current))
    }

    /// Resolve a name, enforcing [`MAX_RESOLUTION_DEPTH`].
    pub(crate) fn resolve_at(
        &self,
        name: &vspec_core::Keyword,
        depth: usize,
    ) -> Result<std::sync::Arc<Spec>, SpecError> {
        if depth >= MAX_RESOLUTION_DEPTH {
            return Err(SpecError::malformed(format!(
                "resolution depth {MAX_RESOLUTION_DEPTH} exceeded at {name}; \
                 the spec likely refers to itself without consuming input"
            )));
        }
        self.registry.resolve(name)
    }
}
