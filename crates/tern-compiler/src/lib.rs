//! The tern declaration pass.
//!
//! Walks a parsed [`Ast`](tern_syntax::Ast) once, building the symbol table
//! in a [`Declarations`](tern_registry::Declarations) store and resolving
//! generic callables into concrete specializations on demand.
//!
//! ## Components
//!
//! - [`signature`]: resolves syntactic signatures and checks calling conventions
//! - [`control_split`]: records variables mutated inside loops and try blocks
//! - [`specialization`]: deferred specialization requests and callable naming
//! - [`DeclarationPass`]: the dispatcher, callable declarator and
//!   specialization resolver
//!
//! ## Example
//!
//! ```
//! use tern_compiler::{DeclarationOptions, DeclarationPass};
//! use tern_registry::Declarations;
//! use tern_syntax::AstBuilder;
//!
//! let mut b = AstBuilder::new();
//! let sig = b.signature().implicit("context", "Context").returns("void");
//! let callable = b.builtin_callable("Noop", false, sig);
//! let body = b.block(vec![]);
//! let decl = b.standard(callable, Some(body));
//! let ast = b.ast(vec![decl]);
//!
//! let mut decls = Declarations::new();
//! let output = DeclarationPass::new(&mut decls, DeclarationOptions::default()).run(&ast);
//! assert!(!output.has_errors());
//! assert_eq!(decls.builtins().count(), 1);
//! ```

pub mod control_split;
pub mod options;
pub mod signature;
pub mod specialization;
mod visitor;

pub use control_split::{ChangedVariables, ControlSplitKey, ControlSplitTracker, ControlSplits};
pub use options::DeclarationOptions;
pub use signature::SignatureBuilder;
pub use specialization::{
    SpecializationQueue, SpecializationRequest, generated_callable_name,
};
pub use visitor::{DeclarationOutput, DeclarationPass};
