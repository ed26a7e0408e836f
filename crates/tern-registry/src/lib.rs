//! Symbol and scope store for the tern declaration pass.
//!
//! This crate provides [`Declarations`], which owns every entity the pass
//! registers and the lexical scopes that bind names to them:
//!
//! - [`declarable`]: callables, generics, variables, constants, labels and
//!   the [`Declarable`] bindings that refer to them
//! - [`scope`]: the scope arena entries and [`ScopeActivation`] tokens
//! - [`declarations`]: declaration, lookup and scope activation

pub mod declarable;
pub mod declarations;
pub mod scope;

pub use declarable::{
    BuiltinLinkage, Callable, CallableOrigin, CallableVariant, Constant, Declarable, Generic,
    Label, SpecializationKey, Variable, VariableKind,
};
pub use declarations::{Declarations, GLOBAL_SCOPE};
pub use scope::{Scope, ScopeActivation};
