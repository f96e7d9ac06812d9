//! # Spec Registry
//!
//! Maps qualified names to specs. `Ref` nodes and `keys` attribute lookups
//! resolve through a registry at evaluation time, so specs may refer to
//! names that are registered later, including themselves.
//!
//! ## Lifecycle
//!
//! - Entries are created or overwritten by [`Registry::register`]; the last
//!   write wins and there is no versioning.
//! - Entries are never removed; they live as long as the registry.
//! - [`Registry::global`] is the process-wide instance used by the free
//!   functions at the crate root. Independent registries can be created for
//!   isolation (tests, multi-tenant catalogs) and passed explicitly.
//!
//! ## Thread Safety
//!
//! The table sits behind a `parking_lot::RwLock` and stores `Arc<Spec>`.
//! Lookups clone the `Arc` out under the read lock, so evaluation never holds
//! the lock and a concurrent redefinition is observed either entirely or not
//! at all. Registration is expected during setup; concurrent registration of
//! the same name is a last-write-wins race.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use vspec_core::{Keyword, SpecError};

use crate::spec::Spec;

/// Thread-safe, cloneable name → spec table.
///
/// Clones share the same underlying table.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    specs: Arc<RwLock<HashMap<Keyword, Arc<Spec>>>>,
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::new)
    }

    /// Register a spec under a name, replacing any previous definition.
    ///
    /// The spec is checked with [`Spec::validate`] first; a malformed spec
    /// is rejected and any existing definition is kept.
    pub fn register(&self, name: Keyword, spec: Spec) -> Result<(), SpecError> {
        if let Err(e) = spec.validate() {
            tracing::warn!(name = %name, error = %e, "rejected malformed spec");
            return Err(e);
        }
        let previous = self.specs.write().insert(name.clone(), Arc::new(spec));
        if previous.is_some() {
            tracing::debug!(name = %name, "redefined spec");
        } else {
            tracing::debug!(name = %name, "registered spec");
        }
        Ok(())
    }

    /// Look up a spec, failing with `UnresolvedName` if absent.
    pub fn resolve(&self, name: &Keyword) -> Result<Arc<Spec>, SpecError> {
        self.get(name).ok_or_else(|| {
            tracing::trace!(name = %name, "spec name did not resolve");
            SpecError::unresolved(name)
        })
    }

    /// Look up a spec.
    pub fn get(&self, name: &Keyword) -> Option<Arc<Spec>> {
        self.specs.read().get(name).cloned()
    }

    /// Whether a name is registered.
    pub fn contains(&self, name: &Keyword) -> bool {
        self.specs.read().contains_key(name)
    }

    /// All registered names, sorted.
    pub fn names(&self) -> Vec<Keyword> {
        let mut names: Vec<Keyword> = self.specs.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered specs.
    pub fn len(&self) -> usize {
        self.specs.read().len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.specs.read().is_empty()
    }
}
