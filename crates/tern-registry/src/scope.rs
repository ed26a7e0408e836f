//! Lexical scopes and scope activation.
//!
//! Scopes live in an arena inside [`Declarations`](crate::Declarations) and
//! point at their parent by id. Entering a scope hands back a
//! [`ScopeActivation`] token that must be passed to
//! [`Declarations::exit_scope`](crate::Declarations::exit_scope) to restore
//! the previous scope, whatever the outcome of the work done inside it.

use rustc_hash::FxHashMap;
use tern_core::ScopeId;

use crate::{Declarable, SpecializationKey};

/// A single lexical scope.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub(crate) parent: Option<ScopeId>,
    pub(crate) bindings: FxHashMap<String, Declarable>,
}

impl Scope {
    pub(crate) fn child_of(parent: ScopeId) -> Self {
        Self {
            parent: Some(parent),
            bindings: FxHashMap::default(),
        }
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    /// The binding for a name in this scope only.
    pub fn get(&self, name: &str) -> Option<&Declarable> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Saved state of an active scope, restored on exit.
#[must_use = "a scope activation must be passed back to Declarations::exit_scope"]
#[derive(Debug)]
pub struct ScopeActivation {
    pub(crate) previous: ScopeId,
    pub(crate) previous_specialization: Option<SpecializationKey>,
    /// Arena length to truncate back to for disposable scopes.
    pub(crate) truncate_to: Option<usize>,
}
