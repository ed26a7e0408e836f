//! Statement dispatch.
//!
//! Loops and try blocks are control splits: every variable assigned inside
//! them is recorded against the split's node. `if` is not a split.

use tern_core::DeclarationError;
use tern_registry::{Declarable, VariableKind};
use tern_syntax::{
    BlockStmt, ForLoopStmt, ForOfLoopStmt, GotoStmt, IfStmt, ReturnStmt, Stmt, TryLabelStmt,
    VarDeclarationStmt, WhileStmt,
};

use super::callable::RETURN_VALUE_VARIABLE;
use super::{AtSpan, DeclarationPass, Result, declared};
use crate::signature;

impl DeclarationPass<'_> {
    pub(super) fn visit_statement(&mut self, stmt: &Stmt) -> Result<()> {
        self.with_position(stmt.span(), |this| match stmt {
            Stmt::Expression(s) => this.visit_expression(&s.expression),
            Stmt::VarDeclaration(s) => this.visit_var_declaration(s),
            Stmt::Block(s) => this.visit_block(s),
            Stmt::If(s) => this.visit_if(s),
            Stmt::While(s) => this.visit_while(s),
            Stmt::For(s) => this.visit_for(s),
            Stmt::ForOf(s) => this.visit_for_of(s),
            Stmt::Return(s) => this.visit_return(s),
            Stmt::Goto(s) => this.visit_goto(s),
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Debug(_) => Ok(()),
            Stmt::TailCall(s) => this.visit_call(&s.call),
            Stmt::Assert(s) => this.visit_expression(&s.expression),
            Stmt::TryLabel(s) => this.visit_try_label(s),
        })
    }

    fn visit_var_declaration(&mut self, stmt: &VarDeclarationStmt) -> Result<()> {
        let span = self.position();
        let ty = self.decls.get_type(&stmt.ty).at(span)?;
        self.decls
            .declare_variable(&stmt.name, ty, stmt.const_qualified, VariableKind::Local)
            .at(span)?;
        declared!(
            self,
            name = %stmt.name,
            ty = %self.decls.oracle().type_name(ty),
            "declared variable"
        );
        if let Some(initializer) = &stmt.initializer {
            self.visit_expression(initializer)?;
        }
        Ok(())
    }

    fn visit_block(&mut self, block: &BlockStmt) -> Result<()> {
        self.with_node_scope(block.id, |this| {
            for stmt in &block.statements {
                this.visit_statement(stmt)?;
            }
            Ok(())
        })
    }

    fn visit_if(&mut self, stmt: &IfStmt) -> Result<()> {
        self.visit_expression(&stmt.condition)?;
        self.visit_statement(&stmt.if_true)?;
        if let Some(if_false) = &stmt.if_false {
            self.visit_statement(if_false)?;
        }
        Ok(())
    }

    fn visit_while(&mut self, stmt: &WhileStmt) -> Result<()> {
        self.visit_expression(&stmt.condition)?;
        self.with_control_split(stmt.id, |this| this.visit_statement(&stmt.body))
    }

    /// The test and action run on every iteration, so they belong to the split.
    fn visit_for(&mut self, stmt: &ForLoopStmt) -> Result<()> {
        self.with_node_scope(stmt.id, |this| {
            if let Some(var_declaration) = &stmt.var_declaration {
                this.visit_var_declaration(var_declaration)?;
            }
            this.with_control_split(stmt.id, |this| {
                if let Some(test) = &stmt.test {
                    this.visit_expression(test)?;
                }
                if let Some(action) = &stmt.action {
                    this.visit_expression(action)?;
                }
                this.visit_statement(&stmt.body)
            })
        })
    }

    fn visit_for_of(&mut self, stmt: &ForOfLoopStmt) -> Result<()> {
        self.with_node_scope(stmt.id, |this| {
            this.visit_var_declaration(&stmt.var_declaration)?;
            this.visit_expression(&stmt.iterable)?;
            if let Some(begin) = &stmt.begin {
                this.visit_expression(begin)?;
            }
            if let Some(end) = &stmt.end {
                this.visit_expression(end)?;
            }
            this.with_control_split(stmt.id, |this| this.visit_statement(&stmt.body))
        })
    }

    /// In a macro with a return value, `return` assigns the implicit
    /// return-value variable.
    fn visit_return(&mut self, stmt: &ReturnStmt) -> Result<()> {
        let Some(callable) = self.current_callable else {
            return Err(DeclarationError::Internal {
                message: format!("return outside of a callable at {}", self.position()),
            });
        };
        let callable = self.decls.callable(callable);
        let oracle = self.decls.oracle();
        if callable.variant.is_macro()
            && callable.has_return_value(oracle.void_type(), oracle.never_type())
        {
            match self.decls.lookup_value(RETURN_VALUE_VARIABLE).at(self.position())? {
                Declarable::Variable(variable) => {
                    let variable = *variable;
                    self.tracker.mark_modified(variable);
                }
                other => {
                    return Err(DeclarationError::Internal {
                        message: format!("return value is bound to a {}", other.kind_name()),
                    });
                }
            }
        }
        if let Some(value) = &stmt.value {
            self.visit_expression(value)?;
        }
        Ok(())
    }

    fn visit_goto(&mut self, stmt: &GotoStmt) -> Result<()> {
        self.decls.lookup_label(&stmt.label).at(self.position())?;
        for argument in &stmt.arguments {
            self.visit_expression(argument)?;
        }
        Ok(())
    }

    /// Labels are declared in the try statement's scope and each label's
    /// parameters in the label block's scope, nested inside it. The try block
    /// and all label blocks form one control split.
    fn visit_try_label(&mut self, stmt: &TryLabelStmt) -> Result<()> {
        self.with_control_split(stmt.id, |this| {
            this.with_node_scope(stmt.id, |this| {
                for block in &stmt.label_blocks {
                    this.with_position(block.span, |this| {
                        let span = this.position();
                        let label = this.decls.declare_label(&block.label).at(span)?;
                        this.with_node_scope(block.id, |this| {
                            if let Some(err) =
                                signature::check_label_parameters(&block.label, &block.parameters, span)
                            {
                                this.report(err);
                            }
                            for (name, ty) in block.parameters.names.iter().zip(&block.parameters.types) {
                                let ty = this.decls.get_type(ty).at(span)?;
                                let variable = this
                                    .decls
                                    .declare_variable(name, ty, false, VariableKind::LabelParameter)
                                    .at(span)?;
                                this.decls.add_label_parameter(label, variable);
                            }
                            Ok(())
                        })?;
                        declared!(this, label = %block.label, "declared label");
                        Ok(())
                    })?;
                }
                this.visit_statement(&stmt.try_block)
            })?;

            for block in &stmt.label_blocks {
                this.with_node_scope(block.id, |this| this.visit_statement(&block.body))?;
            }
            Ok(())
        })
    }
}
