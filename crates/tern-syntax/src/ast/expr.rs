//! Expression nodes.

use tern_core::Span;

use crate::ast::TypeExpr;

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Name reference, optionally with explicit type arguments (`Cast<Smi>`)
    Identifier(IdentifierExpr),
    /// Call of a named callable
    Call(CallExpr),
    /// `location = value` or `location op= value`
    Assignment(AssignmentExpr),
    /// `++x`, `x--`, ...
    IncrementDecrement(IncrementDecrementExpr),
    /// `object.field`
    FieldAccess(FieldAccessExpr),
    /// `array[index]`
    ElementAccess(ElementAccessExpr),
    /// `a || b`
    LogicalOr(LogicalExpr),
    /// `a && b`
    LogicalAnd(LogicalExpr),
    /// `c ? a : b`
    Conditional(ConditionalExpr),
    /// Numeric literal
    NumberLiteral(NumberLiteralExpr),
    /// String literal
    StringLiteral(StringLiteralExpr),
}

impl Expr {
    /// Get the span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Identifier(e) => e.span,
            Self::Call(e) => e.span,
            Self::Assignment(e) => e.span,
            Self::IncrementDecrement(e) => e.span,
            Self::FieldAccess(e) => e.span,
            Self::ElementAccess(e) => e.span,
            Self::LogicalOr(e) => e.span,
            Self::LogicalAnd(e) => e.span,
            Self::Conditional(e) => e.span,
            Self::NumberLiteral(e) => e.span,
            Self::StringLiteral(e) => e.span,
        }
    }
}

/// A name reference.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierExpr {
    pub name: String,
    /// Explicit type arguments; non-empty only for generic references
    pub generic_arguments: Vec<TypeExpr>,
    pub span: Span,
}

/// A call expression.
///
/// Example: `Convert<Smi>(context, value) otherwise Bailout`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: IdentifierExpr,
    pub arguments: Vec<Expr>,
    /// Labels the callee may transfer control to (`otherwise ...`)
    pub labels: Vec<String>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpr {
    pub location: Box<Expr>,
    /// Compound operator (`+` for `+=`), `None` for plain assignment
    pub op: Option<String>,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementDecrementOp {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncrementDecrementExpr {
    pub location: Box<Expr>,
    pub op: IncrementDecrementOp,
    pub postfix: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldAccessExpr {
    pub object: Box<Expr>,
    pub field: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementAccessExpr {
    pub array: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpr {
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    pub condition: Box<Expr>,
    pub if_true: Box<Expr>,
    pub if_false: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteralExpr {
    pub number: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteralExpr {
    pub literal: String,
    pub span: Span,
}
