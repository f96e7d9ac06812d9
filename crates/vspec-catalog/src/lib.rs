//! # vspec-catalog: Declarative Spec Catalogs
//!
//! Loads named specs from YAML or JSON documents into a
//! [`vspec_engine::Registry`], so spec definitions can live in
//! configuration rather than code.
//!
//! - [`load_catalog`] reads a file, choosing the format by extension.
//! - [`parse_catalog_str`] parses catalog text directly.
//!
//! Both return the names they registered. See [`loader`] for the document
//! layout and the `expr` module docs for the expression grammar.
//!
//! ## Crate Policy
//!
//! - Depends on `vspec-core` and `vspec-engine` internally.
//! - Errors name the catalog entry they occurred in.

pub mod error;
mod expr;
pub mod loader;

pub use error::CatalogError;
pub use loader::{load_catalog, parse_catalog_str, CATALOG_EXTENSIONS};
