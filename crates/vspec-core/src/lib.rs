//! # vspec-core: Foundational Types for vspec
//!
//! This crate defines the substrate every spec operates over. It depends on
//! nothing internal; every other crate in the workspace depends on it.
//!
//! ## Key Design Principles
//!
//! 1. **One value model.** [`Value`] is a closed union of atoms, ordered
//!    sequences, and keyed maps. Specs never see host types, only values.
//!
//! 2. **Values are immutable and totally ordered.** Equality, ordering, and
//!    hashing are defined for every value (floats by IEEE total order, maps
//!    independent of insertion order) so any value can be a map key or a
//!    member of a membership set.
//!
//! 3. **`Keyword` is the only name type.** Registry names, `or`/`cat`/`alt`
//!    tags, and attribute keys in data are all keywords.
//!
//! 4. **Errors are for programmer defects.** A value failing a spec is data,
//!    not an error. [`SpecError`] covers unresolved names, malformed specs,
//!    bad names, and failed document conversion.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vspec-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod convert;
pub mod error;
pub mod keyword;
pub mod value;

pub use error::SpecError;
pub use keyword::Keyword;
pub use value::{Atom, Value, ValueMap};
