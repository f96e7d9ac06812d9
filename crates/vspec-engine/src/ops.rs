//! # Conformance Operations
//!
//! `valid`, `conform`, `explain`, and `describe` on an explicit
//! [`Registry`]. Each accepts either a spec value or a registered name.
//!
//! All four return `Err` only for configuration defects: a name that does
//! not resolve, or a spec that cannot be evaluated. An inline spec is
//! re-checked for structural defects before evaluation. Non-conforming data is
//! reported in the `Ok` value.

use vspec_core::{Keyword, SpecError, Value};

use crate::conform::{Evaluator, Outcome};
use crate::form::Form;
use crate::problem::{Conformed, Problem};
use crate::registry::Registry;
use crate::spec::Spec;

/// What an operation is applied to: a spec value or a registered name.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// An inline spec.
    Spec(&'a Spec),
    /// A registered spec, resolved at call time.
    Name(&'a Keyword),
}

impl<'a> From<&'a Spec> for Target<'a> {
    fn from(spec: &'a Spec) -> Self {
        Self::Spec(spec)
    }
}

impl<'a> From<&'a Keyword> for Target<'a> {
    fn from(name: &'a Keyword) -> Self {
        Self::Name(name)
    }
}

impl Registry {
    fn evaluate(&self, target: Target<'_>, value: &Value) -> Result<Outcome, SpecError> {
        let ev = Evaluator::new(self);
        match target {
            Target::Spec(spec) => {
                spec.validate()?;
                ev.eval(spec, value, 0)
            }
            Target::Name(name) => ev.eval(&Spec::Ref(name.clone()), value, 0),
        }
    }

    /// Whether `value` conforms.
    pub fn valid<'a>(&self, target: impl Into<Target<'a>>, value: &Value) -> Result<bool, SpecError> {
        Ok(self.evaluate(target.into(), value)?.is_ok())
    }

    /// The conformed (destructured) value, or [`Conformed::Invalid`].
    pub fn conform<'a>(
        &self,
        target: impl Into<Target<'a>>,
        value: &Value,
    ) -> Result<Conformed, SpecError> {
        Ok(match self.evaluate(target.into(), value)? {
            Ok(conformed) => Conformed::Valid(conformed),
            Err(_) => Conformed::Invalid,
        })
    }

    /// Every problem preventing `value` from conforming; empty when valid.
    pub fn explain<'a>(
        &self,
        target: impl Into<Target<'a>>,
        value: &Value,
    ) -> Result<Vec<Problem>, SpecError> {
        let target = target.into();
        let problems = self.evaluate(target, value)?.err().unwrap_or_default();
        if !problems.is_empty() {
            tracing::debug!(problems = problems.len(), "value did not conform");
        }
        Ok(problems)
    }

    /// The structural form of a spec. A name renders its registered spec.
    pub fn describe<'a>(&self, target: impl Into<Target<'a>>) -> Result<Form, SpecError> {
        match target.into() {
            Target::Spec(spec) => Ok(Form::of(spec)),
            Target::Name(name) => {
                let spec = self.resolve(name)?;
                Ok(Form::of(&spec))
            }
        }
    }
}
