//! Expression dispatch.
//!
//! Expressions are only inspected for what the declaration stage needs:
//! assignments mark variables modified for the control-split tracker, and
//! identifiers with explicit type arguments request specializations.

use tern_registry::{Declarable, SpecializationKey};
use tern_syntax::{CallExpr, Expr, IdentifierExpr};

use super::{AtSpan, DeclarationPass, Result};
use crate::specialization::SpecializationRequest;

impl DeclarationPass<'_> {
    pub(super) fn visit_expression(&mut self, expr: &Expr) -> Result<()> {
        self.with_position(expr.span(), |this| match expr {
            Expr::Identifier(e) => this.visit_identifier(e),
            Expr::Call(e) => this.visit_call(e),
            Expr::Assignment(e) => {
                this.mark_location_modified(&e.location)?;
                this.visit_expression(&e.location)?;
                this.visit_expression(&e.value)
            }
            Expr::IncrementDecrement(e) => {
                this.mark_location_modified(&e.location)?;
                this.visit_expression(&e.location)
            }
            Expr::FieldAccess(e) => this.visit_expression(&e.object),
            Expr::ElementAccess(e) => {
                this.visit_expression(&e.array)?;
                this.visit_expression(&e.index)
            }
            Expr::LogicalOr(e) | Expr::LogicalAnd(e) => {
                this.visit_expression(&e.left)?;
                this.visit_expression(&e.right)
            }
            Expr::Conditional(e) => {
                this.visit_expression(&e.condition)?;
                this.visit_expression(&e.if_true)?;
                this.visit_expression(&e.if_false)
            }
            Expr::NumberLiteral(_) | Expr::StringLiteral(_) => Ok(()),
        })
    }

    /// Only plain identifiers name a variable; field and element locations
    /// mutate through a value that is not itself reassigned.
    fn mark_location_modified(&mut self, location: &Expr) -> Result<()> {
        let Expr::Identifier(identifier) = location else {
            return Ok(());
        };
        let value = self
            .decls
            .lookup_value(&identifier.name)
            .at(identifier.span)?;
        if let Declarable::Variable(variable) = value {
            let variable = *variable;
            self.tracker.mark_modified(variable);
        }
        Ok(())
    }

    /// Every `otherwise` label must resolve.
    pub(super) fn visit_call(&mut self, call: &CallExpr) -> Result<()> {
        self.with_position(call.span, |this| {
            this.with_position(call.callee.span, |this| this.visit_identifier(&call.callee))?;
            for argument in &call.arguments {
                this.visit_expression(argument)?;
            }
            for label in &call.labels {
                this.decls.lookup_label(label).at(this.position())?;
            }
            Ok(())
        })
    }

    /// A reference with explicit type arguments queues a specialization of
    /// every same-named generic that has a body. Which overload the call
    /// resolves to is unknown until argument types are, so all are queued.
    fn visit_identifier(&mut self, identifier: &IdentifierExpr) -> Result<()> {
        if identifier.generic_arguments.is_empty() {
            return Ok(());
        }
        let span = self.position();
        let types = identifier
            .generic_arguments
            .iter()
            .map(|ty| self.decls.get_type(ty))
            .collect::<std::result::Result<Vec<_>, _>>()
            .at(span)?;

        for generic in self.decls.lookup_generic(&identifier.name).at(span)? {
            if !self.decls.generic(generic).has_body() {
                continue;
            }
            self.queue_specialization(SpecializationRequest {
                key: SpecializationKey::new(generic, types.clone()),
                requested_at: span,
            });
        }
        Ok(())
    }
}
