//! # vspec-engine: Specification and Conformance Engine
//!
//! Declarative specs over [`vspec_core::Value`]: predicates, membership
//! sets, `and`/`or`, map `keys`, and sequence regex operators (`cat`, `alt`,
//! `*`, `+`, `?`, `&`). One evaluator answers four questions about a value:
//!
//! - [`valid`]: does it conform?
//! - [`conform`]: what is its destructured form? (`or`/`alt` tag the chosen
//!   branch, `cat` names its parts, `keys` conforms each attribute.)
//! - [`explain`]: if not, why not, as structured [`Problem`]s.
//! - [`describe`]: what does the spec look like, as an s-expression [`Form`].
//!
//! ## Names
//!
//! Specs are registered under qualified keywords in a [`Registry`]. `Ref`
//! nodes and `keys` attributes resolve through it lazily at evaluation
//! time, so specs can be registered in any order and can be recursive.
//! The free functions in this module use [`Registry::global`]; the methods
//! on `Registry` do the same work against an explicit handle.
//!
//! ## Crate Policy
//!
//! - Depends only on `vspec-core` internally.
//! - No I/O. Logging goes through `tracing`; no subscriber is installed.
//! - No `.unwrap()` outside tests.

mod conform;
pub mod form;
mod keys;
mod ops;
pub mod pred;
pub mod problem;
mod regex;
pub mod registry;
pub mod spec;

pub use conform::MAX_RESOLUTION_DEPTH;
pub use form::Form;
pub use ops::Target;
pub use pred::Predicate;
pub use problem::{Conformed, DataKey, Problem, EXTRA_INPUT, INSUFFICIENT_INPUT};
pub use registry::Registry;
pub use spec::{KeysSpec, Spec};
pub use vspec_core::{Keyword, SpecError, Value, ValueMap};

/// Register a spec in the global registry.
pub fn register(name: Keyword, spec: Spec) -> Result<(), SpecError> {
    Registry::global().register(name, spec)
}

/// Whether `value` conforms, using the global registry.
pub fn valid<'a>(target: impl Into<Target<'a>>, value: &Value) -> Result<bool, SpecError> {
    Registry::global().valid(target, value)
}

/// Conform `value`, using the global registry.
pub fn conform<'a>(target: impl Into<Target<'a>>, value: &Value) -> Result<Conformed, SpecError> {
    Registry::global().conform(target, value)
}

/// Explain why `value` does not conform, using the global registry.
pub fn explain<'a>(
    target: impl Into<Target<'a>>,
    value: &Value,
) -> Result<Vec<Problem>, SpecError> {
    Registry::global().explain(target, value)
}

/// Describe a spec or registered name, using the global registry.
pub fn describe<'a>(target: impl Into<Target<'a>>) -> Result<Form, SpecError> {
    Registry::global().describe(target)
}
