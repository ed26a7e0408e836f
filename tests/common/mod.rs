//! Shared harness for the declaration integration tests.
//!
//! Trees are built with [`AstBuilder`]; [`Declared`] runs the pass and
//! offers assertions that print every collected error on failure.

#![allow(dead_code)]

use tern::prelude::*;
use tern::{Callable, NodeId};

/// A finished pass: the populated store plus the pass output.
pub struct Declared {
    pub decls: Declarations,
    pub output: DeclarationOutput,
}

impl Declared {
    pub fn run(ast: &Ast) -> Self {
        Self::run_with(ast, DeclarationOptions::default())
    }

    pub fn run_with(ast: &Ast, options: DeclarationOptions) -> Self {
        let (decls, output) = declare(ast, options);
        Self { decls, output }
    }

    /// Assert that the pass reported nothing.
    pub fn assert_success(&self) {
        if !self.output.errors.is_empty() {
            for err in &self.output.errors {
                eprintln!("{}", err);
            }
            panic!(
                "Expected a clean pass, but got {} errors",
                self.output.errors.len()
            );
        }
    }

    /// Assert exactly one error was reported and return it.
    pub fn single_error(&self) -> &DeclarationError {
        match self.output.errors.as_slice() {
            [err] => err,
            errors => panic!("Expected exactly one error, got {:?}", errors),
        }
    }

    /// The registered callable with this generated name.
    pub fn callable(&self, name: &str) -> &Callable {
        self.decls
            .callables()
            .find(|c| c.name == name)
            .unwrap_or_else(|| panic!("No callable named {}", name))
    }

    /// Names of the variables recorded for a split instance.
    pub fn changed(&self, node: NodeId, specialization: Option<&SpecializationKey>) -> Vec<String> {
        self.output
            .control_splits
            .get(node, specialization)
            .map(|set| {
                set.iter()
                    .map(|v| self.decls.variable(*v).name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn type_hash(&self, name: &str) -> tern::TypeHash {
        self.decls
            .lookup_type(name)
            .unwrap_or_else(|e| panic!("{}", e))
    }
}

// =============================================================================
// Tree fragments
// =============================================================================

/// `type Smi extends Object;`
pub fn smi(b: &mut AstBuilder) -> Decl {
    b.abstract_type("Smi", Some("Object"))
}

/// `macro name(): void { statements }`
pub fn void_macro(b: &mut AstBuilder, name: &str, statements: Vec<Stmt>) -> Decl {
    let sig = b.signature().returns("void");
    let callable = b.macro_callable(name, sig);
    let body = b.block(statements);
    b.standard(callable, Some(body))
}

/// `name<types>(1);`
pub fn call_stmt(b: &mut AstBuilder, name: &str, types: &[&str]) -> Stmt {
    let one = b.number("1");
    let call = b.generic_call(name, types, vec![one]);
    b.expr_stmt(call)
}

/// `let name: ty = 0;`
pub fn zero_var(b: &mut AstBuilder, name: &str, ty: &str) -> Stmt {
    let zero = b.number("0");
    b.let_var(name, ty, Some(zero))
}

/// `name = 1;`
pub fn assign_one(b: &mut AstBuilder, name: &str) -> Stmt {
    let one = b.number("1");
    let assign = b.assign(name, one);
    b.expr_stmt(assign)
}

pub fn stmt_id(stmt: &Stmt) -> NodeId {
    match stmt {
        Stmt::Block(s) => s.id,
        Stmt::While(s) => s.id,
        Stmt::For(s) => s.id,
        Stmt::ForOf(s) => s.id,
        Stmt::TryLabel(s) => s.id,
        other => panic!("statement has no node id: {:?}", other),
    }
}
