//! Declaration and generic specialization for tern.
//!
//! This crate ties the workspace together: build (or parse) a syntax tree
//! with [`syntax`], then [`declare`] it to populate a [`Declarations`] store
//! and collect the pass results in a [`DeclarationOutput`].
//!
//! # Example
//!
//! ```
//! use tern::prelude::*;
//!
//! let mut b = AstBuilder::new();
//! let smi = b.abstract_type("Smi", Some("Object"));
//! let sig = b.signature().param("x", "T").returns("T");
//! let id = b.macro_callable("Id", sig);
//! let x = b.ident("x");
//! let ret = b.ret(Some(x));
//! let body = b.block(vec![ret]);
//! let id = b.generic(id, &["T"], Some(body));
//! let one = b.number("1");
//! let call = b.generic_call("Id", &["Smi"], vec![one]);
//! let call = b.expr_stmt(call);
//! let caller_sig = b.signature().returns("void");
//! let caller = b.macro_callable("Caller", caller_sig);
//! let caller_body = b.block(vec![call]);
//! let caller = b.standard(caller, Some(caller_body));
//!
//! let (decls, output) = declare(&b.ast(vec![smi, id, caller]), DeclarationOptions::default());
//! assert!(!output.has_errors());
//! assert!(decls.callables().any(|c| c.name == "Id3Smi"));
//! ```

pub use tern_syntax as syntax;

pub use tern_compiler::{
    ChangedVariables, ControlSplitKey, ControlSplits, DeclarationOptions, DeclarationOutput,
    DeclarationPass, SpecializationRequest, generated_callable_name,
};
pub use tern_core::{
    CallableId, ConstantId, DeclarationError, GenericId, LabelId, NodeId, RegistrationError,
    ScopeId, Signature, Span, TypeHash, TypeOracle, VariableId,
};
pub use tern_registry::{
    BuiltinLinkage, Callable, CallableVariant, Declarable, Declarations, Generic,
    SpecializationKey, Variable, VariableKind,
};

/// Commonly used items for driving the pass.
pub mod prelude {
    pub use crate::declare;
    pub use tern_compiler::{DeclarationOptions, DeclarationOutput, DeclarationPass};
    pub use tern_core::{DeclarationError, RegistrationError, Span};
    pub use tern_registry::{Declarable, Declarations, SpecializationKey};
    pub use tern_syntax::{Ast, AstBuilder, CallableKind, Decl, Expr, Stmt};
}

/// Run the declaration pass over `ast` with a fresh store.
///
/// Errors never abort the pass; inspect [`DeclarationOutput::errors`].
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn declare(
    ast: &tern_syntax::Ast,
    options: DeclarationOptions,
) -> (Declarations, DeclarationOutput) {
    let mut decls = Declarations::new();
    let output = DeclarationPass::new(&mut decls, options).run(ast);
    tracing::debug!(
        declarations = ast.declarations.len(),
        callables = output.callables_registered,
        specializations = output.specializations_realized,
        errors = output.errors.len(),
        "declaration pass finished"
    );
    (decls, output)
}
