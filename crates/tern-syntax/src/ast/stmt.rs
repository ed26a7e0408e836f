//! Statement nodes.
//!
//! Statements that open a scope or a control split (blocks, loops, try/label)
//! carry a [`NodeId`] so that per-node state can be keyed on them.

use tern_core::{NodeId, Span};

use crate::ast::{CallExpr, Expr, ParameterList, TypeExpr};

/// A statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Expression statement (`expr;`)
    Expression(ExpressionStmt),
    /// Variable declaration (`let x: T = e;` / `const x: T = e;`)
    VarDeclaration(VarDeclarationStmt),
    /// Braced block
    Block(BlockStmt),
    /// If statement
    If(IfStmt),
    /// While loop
    While(WhileStmt),
    /// C-style for loop
    For(ForLoopStmt),
    /// `for (x: T of iterable [begin:end])`
    ForOf(ForOfLoopStmt),
    /// Return statement
    Return(ReturnStmt),
    /// `goto Label(args)`
    Goto(GotoStmt),
    /// Break statement
    Break(BreakStmt),
    /// Continue statement
    Continue(ContinueStmt),
    /// `tail Callee(args)`
    TailCall(TailCallStmt),
    /// `assert(expr)` / `check(expr)`
    Assert(AssertStmt),
    /// `unreachable` / `debug`
    Debug(DebugStmt),
    /// `try { ... } label L(params) { ... }`
    TryLabel(TryLabelStmt),
}

impl Stmt {
    /// Get the span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Expression(s) => s.span,
            Self::VarDeclaration(s) => s.span,
            Self::Block(s) => s.span,
            Self::If(s) => s.span,
            Self::While(s) => s.span,
            Self::For(s) => s.span,
            Self::ForOf(s) => s.span,
            Self::Return(s) => s.span,
            Self::Goto(s) => s.span,
            Self::Break(s) => s.span,
            Self::Continue(s) => s.span,
            Self::TailCall(s) => s.span,
            Self::Assert(s) => s.span,
            Self::Debug(s) => s.span,
            Self::TryLabel(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarationStmt {
    pub name: String,
    pub ty: TypeExpr,
    /// `const` rather than `let`
    pub const_qualified: bool,
    pub initializer: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub id: NodeId,
    /// Deferred blocks are only generated when control reaches them
    pub deferred: bool,
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub is_constexpr: bool,
    pub condition: Expr,
    pub if_true: Box<Stmt>,
    pub if_false: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub id: NodeId,
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForLoopStmt {
    pub id: NodeId,
    pub var_declaration: Option<VarDeclarationStmt>,
    pub test: Option<Expr>,
    pub action: Option<Expr>,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForOfLoopStmt {
    pub id: NodeId,
    pub var_declaration: VarDeclarationStmt,
    pub iterable: Expr,
    /// Optional `[begin:end]` slice bounds
    pub begin: Option<Expr>,
    pub end: Option<Expr>,
    pub body: Box<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GotoStmt {
    pub label: String,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakStmt {
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinueStmt {
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TailCallStmt {
    pub call: CallExpr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssertStmt {
    pub expression: Expr,
    /// Source text of the asserted expression, for the failure message
    pub source: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugStmt {
    pub reason: String,
    pub never_continues: bool,
    pub span: Span,
}

/// A try block with its handler label blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct TryLabelStmt {
    pub id: NodeId,
    pub try_block: Box<Stmt>,
    pub label_blocks: Vec<LabelBlock>,
    pub span: Span,
}

/// A handler: a label with typed parameters and the body control transfers to.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelBlock {
    pub id: NodeId,
    pub label: String,
    pub parameters: ParameterList,
    pub body: Box<Stmt>,
    pub span: Span,
}
