//! Callable declarator.
//!
//! Registers builtins, macros and runtime functions from a callable header
//! and an already-built signature, then visits the body (if any) with the
//! callable active so `return` resolves against it.
//!
//! Local callables without a body are registered as external.

use tern_core::{CallableId, Signature, Span, TypeHash};
use tern_registry::{BuiltinLinkage, CallableOrigin, VariableKind};
use tern_syntax::{CallableKind, CallableNode, Stmt};

use super::{AtSpan, DeclarationPass, Result, declared};
use crate::signature;
use crate::specialization::generated_callable_name;

/// Name of the implicit variable a macro's `return` assigns to.
pub(crate) const RETURN_VALUE_VARIABLE: &str = "_return";

/// Value of the constant bound to a builtin's rest parameters.
const ARGUMENTS_VALUE: &str = "arguments";

impl DeclarationPass<'_> {
    /// Register a callable and visit its body.
    pub(super) fn visit_callable(
        &mut self,
        node: &CallableNode,
        signature: Signature,
        body: Option<&Stmt>,
    ) -> Result<CallableId> {
        self.with_position(node.span, |this| match &node.kind {
            CallableKind::ExternalMacro { op } => {
                this.declare_macro(node, signature, Some(op.clone()), None)
            }
            CallableKind::ExternalBuiltin { javascript_linkage } => {
                this.declare_builtin(node, signature, *javascript_linkage, None)
            }
            CallableKind::ExternalRuntime => this.declare_runtime(node, signature),
            CallableKind::Macro { op } => this.declare_macro(node, signature, op.clone(), body),
            CallableKind::Builtin { javascript_linkage } => {
                this.declare_builtin(node, signature, *javascript_linkage, body)
            }
        })
    }

    fn origin(&self, node: &CallableNode, body: Option<&Stmt>) -> CallableOrigin {
        CallableOrigin {
            source_name: node.name.clone(),
            node: node.id,
            body: body.cloned(),
            span: node.span,
        }
    }

    fn generated_name(&self, node: &CallableNode) -> String {
        generated_callable_name(&node.name, &self.decls.current_specialization_type_names())
    }

    /// Count a registered callable and tie it to the specialization it realizes.
    fn registered(&mut self, id: CallableId) {
        self.callables_registered += 1;
        if let Some(key) = self.decls.current_specialization().cloned() {
            if self.decls.specialization(&key).is_none() {
                self.decls.record_specialization(&key, id);
            }
        }
    }

    fn declare_runtime(&mut self, node: &CallableNode, signature: Signature) -> Result<CallableId> {
        let span = self.position();
        if let Some(err) = signature::check_runtime(&node.name, &signature, self.decls.oracle(), span) {
            self.report(err);
        }
        let name = self.generated_name(node);
        declared!(
            self,
            name = %name,
            signature = %signature.display(self.decls.oracle()),
            "declared external runtime"
        );
        let origin = self.origin(node, None);
        let id = self
            .decls
            .declare_runtime_function(&name, origin, signature)
            .at(span)?;
        self.registered(id);
        Ok(id)
    }

    /// Builtins share their calling-convention checks whether local or external.
    fn declare_builtin(
        &mut self,
        node: &CallableNode,
        mut signature: Signature,
        javascript: bool,
        body: Option<&Stmt>,
    ) -> Result<CallableId> {
        let span = self.position();
        for err in signature::check_builtin(&node.name, javascript, &signature, self.decls.oracle(), span) {
            self.report(err);
        }
        if !javascript {
            // Rest parameters were reported above; register a plain stub.
            signature.parameter_types.var_args = false;
        }
        let linkage = BuiltinLinkage::from_flags(javascript, signature.has_var_args());
        let external = body.is_none();

        let name = self.generated_name(node);
        declared!(
            self,
            name = %name,
            linkage = ?linkage,
            external,
            signature = %signature.display(self.decls.oracle()),
            "declared builtin"
        );
        let origin = self.origin(node, body);
        let id = self
            .decls
            .declare_builtin(&name, origin, linkage, external, signature)
            .at(span)?;
        self.registered(id);

        if let Some(body) = body {
            self.with_current_callable(id, |this| {
                this.with_node_scope(node.id, |this| {
                    let signature = this.decls.callable(id).signature.clone();
                    this.declare_signature(&signature)?;
                    if signature.has_var_args() {
                        let arguments = this.decls.oracle().arguments_type();
                        this.decls
                            .declare_constant(
                                &node.signature.parameters.arguments_variable,
                                arguments,
                                Some(ARGUMENTS_VALUE.to_string()),
                            )
                            .at(this.position())?;
                    }
                    this.visit_statement(body)
                })
            })?;
        }
        Ok(id)
    }

    /// Local macros are visited inside a control split keyed by their node.
    fn declare_macro(
        &mut self,
        node: &CallableNode,
        signature: Signature,
        op: Option<String>,
        body: Option<&Stmt>,
    ) -> Result<CallableId> {
        let span = self.position();
        let name = self.generated_name(node);
        let external = body.is_none();
        declared!(
            self,
            name = %name,
            external,
            signature = %signature.display(self.decls.oracle()),
            "declared macro"
        );
        let origin = self.origin(node, body);
        let id = self
            .decls
            .declare_macro(&name, origin, op, external, signature)
            .at(span)?;
        self.registered(id);

        if let Some(body) = body {
            self.with_current_callable(id, |this| {
                this.with_node_scope(node.id, |this| {
                    let signature = this.decls.callable(id).signature.clone();
                    this.declare_signature(&signature)?;
                    let oracle = this.decls.oracle();
                    if !oracle.is_void_or_never(signature.return_type) {
                        this.decls
                            .declare_variable(
                                RETURN_VALUE_VARIABLE,
                                signature.return_type,
                                false,
                                VariableKind::ReturnValue,
                            )
                            .at(this.position())?;
                    }
                    this.with_control_split(node.id, |this| this.visit_statement(body))
                })
            })?;
        }
        Ok(id)
    }

    /// Declare parameters as variables, and each signature label with one
    /// variable per label parameter named `<label><index>`.
    fn declare_signature(&mut self, signature: &Signature) -> Result<()> {
        let span = self.position();
        for (name, ty) in signature.parameter_names.iter().zip(signature.types()) {
            if name.is_empty() {
                continue;
            }
            self.decls
                .declare_variable(name, *ty, false, VariableKind::Parameter)
                .at(span)?;
        }
        for label in &signature.labels {
            self.declare_label_with_parameters(&label.name, &label.types, span)?;
        }
        Ok(())
    }

    fn declare_label_with_parameters(
        &mut self,
        name: &str,
        types: &[TypeHash],
        span: Span,
    ) -> Result<()> {
        let label = self.decls.declare_label(name).at(span)?;
        for (index, ty) in types.iter().enumerate() {
            let variable = self
                .decls
                .declare_variable(&format!("{}{}", name, index), *ty, false, VariableKind::LabelParameter)
                .at(span)?;
            self.decls.add_label_parameter(label, variable);
        }
        Ok(())
    }
}
