//! Syntax tree for the tern runtime language.
//!
//! The tree is produced by the parser (outside this workspace) and consumed
//! read-only by the declaration pass. It is split into four closed node
//! families so that every dispatch over them is an exhaustive `match`:
//!
//! - [`Expr`] - expressions
//! - [`Stmt`] - statements
//! - [`Decl`] - declarations
//! - [`CallableKind`] - callable headers, dispatched with their signature and body

pub mod decl;
pub mod expr;
pub mod stmt;
pub mod types;

pub use decl::*;
pub use expr::*;
pub use stmt::*;
pub use types::*;

/// A parsed compilation: the ordered top-level declaration list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ast {
    pub declarations: Vec<Decl>,
}

impl Ast {
    pub fn new(declarations: Vec<Decl>) -> Self {
        Self { declarations }
    }
}
