//! Programmatic construction of syntax trees.
//!
//! [`AstBuilder`] allocates unique [`NodeId`]s and gives every node a distinct
//! source line, so trees built by drivers, tests and benchmarks behave like
//! parsed ones: per-node state never collides and every error is attributable.
//!
//! # Example
//!
//! ```
//! use tern_syntax::builder::AstBuilder;
//!
//! let mut b = AstBuilder::new();
//! let sig = b
//!     .signature()
//!     .implicit("context", "Context")
//!     .param("x", "T")
//!     .returns("T");
//! let callable = b.macro_callable("Id", sig);
//! let x = b.ident("x");
//! let ret = b.ret(Some(x));
//! let body = b.block(vec![ret]);
//! let generic = b.generic(callable, &["T"], Some(body));
//! let ast = b.ast(vec![generic]);
//! assert_eq!(ast.declarations.len(), 1);
//! ```

use tern_core::{NodeId, Span};

use crate::ast::*;

/// Allocates node ids and positions while building a tree.
#[derive(Debug, Default)]
pub struct AstBuilder {
    next_id: u32,
    next_line: u32,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            next_line: 1,
        }
    }

    /// Allocate a fresh node id.
    pub fn node_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Allocate a fresh source position.
    pub fn span(&mut self) -> Span {
        let span = Span::new(self.next_line, 1, 0);
        self.next_line += 1;
        span
    }

    pub fn ast(&self, declarations: Vec<Decl>) -> Ast {
        Ast::new(declarations)
    }

    // ==========================================================================
    // Types and signatures
    // ==========================================================================

    pub fn ty(&mut self, name: &str) -> TypeExpr {
        TypeExpr {
            name: name.to_string(),
            span: self.span(),
        }
    }

    /// Start a signature; finish it with [`SignatureBuilder::returns`].
    pub fn signature(&mut self) -> SignatureBuilder {
        SignatureBuilder {
            parameters: ParameterList::default(),
            labels: Vec::new(),
        }
    }

    /// A label-block parameter list from `(name, type)` pairs.
    pub fn parameters(&mut self, params: &[(&str, &str)]) -> ParameterList {
        ParameterList {
            names: params.iter().map(|(n, _)| n.to_string()).collect(),
            types: params.iter().map(|(_, t)| TypeExpr::new(*t)).collect(),
            ..ParameterList::default()
        }
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    pub fn ident(&mut self, name: &str) -> Expr {
        Expr::Identifier(self.identifier(name, &[]))
    }

    pub fn identifier(&mut self, name: &str, generic_arguments: &[&str]) -> IdentifierExpr {
        IdentifierExpr {
            name: name.to_string(),
            generic_arguments: generic_arguments.iter().map(|t| self.ty(t)).collect(),
            span: self.span(),
        }
    }

    pub fn number(&mut self, number: &str) -> Expr {
        Expr::NumberLiteral(NumberLiteralExpr {
            number: number.to_string(),
            span: self.span(),
        })
    }

    pub fn string(&mut self, literal: &str) -> Expr {
        Expr::StringLiteral(StringLiteralExpr {
            literal: literal.to_string(),
            span: self.span(),
        })
    }

    pub fn call(&mut self, name: &str, arguments: Vec<Expr>) -> Expr {
        self.generic_call(name, &[], arguments)
    }

    /// `name<types...>(arguments...)`
    pub fn generic_call(&mut self, name: &str, types: &[&str], arguments: Vec<Expr>) -> Expr {
        Expr::Call(self.call_expr(name, types, arguments, Vec::new()))
    }

    pub fn call_expr(
        &mut self,
        name: &str,
        types: &[&str],
        arguments: Vec<Expr>,
        labels: Vec<String>,
    ) -> CallExpr {
        CallExpr {
            callee: self.identifier(name, types),
            arguments,
            labels,
            span: self.span(),
        }
    }

    /// `name = value`
    pub fn assign(&mut self, name: &str, value: Expr) -> Expr {
        let location = self.ident(name);
        Expr::Assignment(AssignmentExpr {
            location: Box::new(location),
            op: None,
            value: Box::new(value),
            span: self.span(),
        })
    }

    /// `name++`
    pub fn increment(&mut self, name: &str) -> Expr {
        let location = self.ident(name);
        Expr::IncrementDecrement(IncrementDecrementExpr {
            location: Box::new(location),
            op: IncrementDecrementOp::Increment,
            postfix: true,
            span: self.span(),
        })
    }

    // ==========================================================================
    // Statements
    // ==========================================================================

    pub fn expr_stmt(&mut self, expression: Expr) -> Stmt {
        Stmt::Expression(ExpressionStmt {
            expression,
            span: self.span(),
        })
    }

    pub fn var_declaration(
        &mut self,
        name: &str,
        ty: &str,
        initializer: Option<Expr>,
    ) -> VarDeclarationStmt {
        VarDeclarationStmt {
            name: name.to_string(),
            ty: self.ty(ty),
            const_qualified: false,
            initializer,
            span: self.span(),
        }
    }

    /// `let name: ty = initializer;`
    pub fn let_var(&mut self, name: &str, ty: &str, initializer: Option<Expr>) -> Stmt {
        Stmt::VarDeclaration(self.var_declaration(name, ty, initializer))
    }

    pub fn block(&mut self, statements: Vec<Stmt>) -> Stmt {
        Stmt::Block(BlockStmt {
            id: self.node_id(),
            deferred: false,
            statements,
            span: self.span(),
        })
    }

    pub fn if_stmt(&mut self, condition: Expr, if_true: Stmt, if_false: Option<Stmt>) -> Stmt {
        Stmt::If(IfStmt {
            is_constexpr: false,
            condition,
            if_true: Box::new(if_true),
            if_false: if_false.map(Box::new),
            span: self.span(),
        })
    }

    pub fn while_loop(&mut self, condition: Expr, body: Stmt) -> Stmt {
        Stmt::While(WhileStmt {
            id: self.node_id(),
            condition,
            body: Box::new(body),
            span: self.span(),
        })
    }

    pub fn for_loop(
        &mut self,
        var_declaration: Option<VarDeclarationStmt>,
        test: Option<Expr>,
        action: Option<Expr>,
        body: Stmt,
    ) -> Stmt {
        Stmt::For(ForLoopStmt {
            id: self.node_id(),
            var_declaration,
            test,
            action,
            body: Box::new(body),
            span: self.span(),
        })
    }

    pub fn for_of(&mut self, var_declaration: VarDeclarationStmt, iterable: Expr, body: Stmt) -> Stmt {
        Stmt::ForOf(ForOfLoopStmt {
            id: self.node_id(),
            var_declaration,
            iterable,
            begin: None,
            end: None,
            body: Box::new(body),
            span: self.span(),
        })
    }

    pub fn ret(&mut self, value: Option<Expr>) -> Stmt {
        Stmt::Return(ReturnStmt {
            value,
            span: self.span(),
        })
    }

    pub fn goto(&mut self, label: &str, arguments: Vec<Expr>) -> Stmt {
        Stmt::Goto(GotoStmt {
            label: label.to_string(),
            arguments,
            span: self.span(),
        })
    }

    pub fn tail_call(&mut self, name: &str, arguments: Vec<Expr>) -> Stmt {
        let call = self.call_expr(name, &[], arguments, Vec::new());
        Stmt::TailCall(TailCallStmt {
            call,
            span: self.span(),
        })
    }

    pub fn try_label(&mut self, try_block: Stmt, label_blocks: Vec<LabelBlock>) -> Stmt {
        Stmt::TryLabel(TryLabelStmt {
            id: self.node_id(),
            try_block: Box::new(try_block),
            label_blocks,
            span: self.span(),
        })
    }

    pub fn label_block(&mut self, label: &str, parameters: ParameterList, body: Stmt) -> LabelBlock {
        LabelBlock {
            id: self.node_id(),
            label: label.to_string(),
            parameters,
            body: Box::new(body),
            span: self.span(),
        }
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    pub fn callable(&mut self, name: &str, kind: CallableKind, signature: CallableSignature) -> CallableNode {
        CallableNode {
            id: self.node_id(),
            name: name.to_string(),
            signature,
            kind,
            span: self.span(),
        }
    }

    pub fn macro_callable(&mut self, name: &str, signature: CallableSignature) -> CallableNode {
        self.callable(name, CallableKind::Macro { op: None }, signature)
    }

    pub fn builtin_callable(
        &mut self,
        name: &str,
        javascript_linkage: bool,
        signature: CallableSignature,
    ) -> CallableNode {
        self.callable(name, CallableKind::Builtin { javascript_linkage }, signature)
    }

    pub fn standard(&mut self, callable: CallableNode, body: Option<Stmt>) -> Decl {
        Decl::Standard(StandardDecl {
            callable,
            body,
            span: self.span(),
        })
    }

    pub fn generic(&mut self, callable: CallableNode, parameters: &[&str], body: Option<Stmt>) -> Decl {
        Decl::Generic(GenericDecl {
            callable,
            generic_parameters: parameters.iter().map(|p| p.to_string()).collect(),
            body,
            span: self.span(),
        })
    }

    /// An explicit specialization; `external` is derived from the body's absence.
    pub fn specialization(
        &mut self,
        name: &str,
        types: &[&str],
        signature: CallableSignature,
        body: Option<Stmt>,
    ) -> Decl {
        Decl::Specialization(SpecializationDecl {
            id: self.node_id(),
            name: name.to_string(),
            generic_parameters: types.iter().map(|t| self.ty(t)).collect(),
            external: body.is_none(),
            signature,
            body,
            span: self.span(),
        })
    }

    /// `type name extends parent generates 'TNode<name>';`
    pub fn abstract_type(&mut self, name: &str, extends: Option<&str>) -> Decl {
        Decl::Type(TypeDecl {
            name: name.to_string(),
            extends: extends.map(str::to_string),
            generates: format!("TNode<{}>", name),
            span: self.span(),
        })
    }

    /// `const name: ty = expression;`
    pub fn constant(&mut self, name: &str, ty: &str, expression: Expr) -> Decl {
        Decl::Const(ConstDecl {
            name: name.to_string(),
            ty: self.ty(ty),
            expression,
            span: self.span(),
        })
    }

    /// `extern const name: ty generates 'literal';`
    pub fn extern_constant(&mut self, name: &str, ty: &str, literal: &str) -> Decl {
        Decl::ExternConst(ExternConstDecl {
            name: name.to_string(),
            ty: self.ty(ty),
            literal: literal.to_string(),
            span: self.span(),
        })
    }

    pub fn module(&mut self, name: &str, declarations: Vec<Decl>) -> Decl {
        Decl::Module(ModuleDecl {
            id: self.node_id(),
            name: name.to_string(),
            declarations,
            span: self.span(),
        })
    }
}

/// Fluent construction of a [`CallableSignature`].
#[derive(Debug)]
pub struct SignatureBuilder {
    parameters: ParameterList,
    labels: Vec<LabelAndTypes>,
}

impl SignatureBuilder {
    /// Add an implicit parameter. Implicit parameters must come first.
    pub fn implicit(mut self, name: &str, ty: &str) -> Self {
        self.parameters.names.push(name.to_string());
        self.parameters.types.push(TypeExpr::new(ty));
        self.parameters.implicit_count += 1;
        self
    }

    pub fn param(mut self, name: &str, ty: &str) -> Self {
        self.parameters.names.push(name.to_string());
        self.parameters.types.push(TypeExpr::new(ty));
        self
    }

    /// End the parameter list with `...name`.
    pub fn varargs(mut self, arguments_variable: &str) -> Self {
        self.parameters.has_varargs = true;
        self.parameters.arguments_variable = arguments_variable.to_string();
        self
    }

    pub fn label(mut self, name: &str, types: &[&str]) -> Self {
        self.labels.push(LabelAndTypes {
            name: name.to_string(),
            types: types.iter().map(|t| TypeExpr::new(*t)).collect(),
        });
        self
    }

    pub fn returns(self, return_type: &str) -> CallableSignature {
        CallableSignature {
            parameters: self.parameters,
            return_type: TypeExpr::new(return_type),
            labels: self.labels,
        }
    }
}
