//! Declaration nodes.
//!
//! Provides the two declaration-level node families:
//! - [`Decl`]: everything that may appear in a module
//! - [`CallableNode`]: the callable header shared by standard, generic and
//!   specialized declarations, dispatched on its [`CallableKind`]

use tern_core::{NodeId, Span};

use crate::ast::{CallableSignature, Expr, Stmt, TypeExpr};

/// A declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// `type Name extends Parent generates 'T';`
    Type(TypeDecl),
    /// `const name: T = expr;`
    Const(ConstDecl),
    /// `extern const name: T generates 'literal';`
    ExternConst(ExternConstDecl),
    /// A non-generic callable, with or without body
    Standard(StandardDecl),
    /// `macro Name<T, U>(...)`
    Generic(GenericDecl),
    /// `Name<Smi>(...) { ... }` / `extern Name<Smi>(...);`
    Specialization(SpecializationDecl),
    /// `module name { ... }`
    Module(ModuleDecl),
}

impl Decl {
    /// Get the span of this declaration.
    pub fn span(&self) -> Span {
        match self {
            Self::Type(d) => d.span,
            Self::Const(d) => d.span,
            Self::ExternConst(d) => d.span,
            Self::Standard(d) => d.span,
            Self::Generic(d) => d.span,
            Self::Specialization(d) => d.span,
            Self::Module(d) => d.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub extends: Option<String>,
    pub generates: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub expression: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternConstDecl {
    pub name: String,
    pub ty: TypeExpr,
    pub literal: String,
    pub span: Span,
}

/// A non-generic callable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardDecl {
    pub callable: CallableNode,
    /// `None` for external callables
    pub body: Option<Stmt>,
    pub span: Span,
}

/// A generic callable declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericDecl {
    pub callable: CallableNode,
    /// Type parameter names, e.g. `["T"]`
    pub generic_parameters: Vec<String>,
    /// `None` for extern-only generics that are never specialized from source
    pub body: Option<Stmt>,
    pub span: Span,
}

/// An explicit specialization of a generic.
///
/// Example: `Convert<Smi>(implicit context: Context)(o: Object): Smi { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct SpecializationDecl {
    pub id: NodeId,
    pub name: String,
    /// Concrete type arguments, positionally binding the generic's parameters
    pub generic_parameters: Vec<TypeExpr>,
    pub external: bool,
    pub signature: CallableSignature,
    pub body: Option<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDecl {
    pub id: NodeId,
    pub name: String,
    pub declarations: Vec<Decl>,
    pub span: Span,
}

/// A callable header.
#[derive(Debug, Clone, PartialEq)]
pub struct CallableNode {
    pub id: NodeId,
    pub name: String,
    pub signature: CallableSignature,
    pub kind: CallableKind,
    pub span: Span,
}

/// The callable-declaration node family.
#[derive(Debug, Clone, PartialEq)]
pub enum CallableKind {
    /// `extern macro Name(...)`, implemented by the backend operator `op`
    ExternalMacro { op: String },
    /// `extern builtin Name(...)`, implemented outside this source
    ExternalBuiltin { javascript_linkage: bool },
    /// `extern runtime Name(...)`
    ExternalRuntime,
    /// `macro Name(...) { ... }`
    Macro { op: Option<String> },
    /// `builtin Name(...) { ... }` / `javascript builtin Name(...) { ... }`
    Builtin { javascript_linkage: bool },
}

impl CallableKind {
    /// Human-readable kind, used in diagnostics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            CallableKind::ExternalMacro { .. } => "external macro",
            CallableKind::ExternalBuiltin { .. } => "external builtin",
            CallableKind::ExternalRuntime => "external runtime",
            CallableKind::Macro { .. } => "macro",
            CallableKind::Builtin { .. } => "builtin",
        }
    }
}
