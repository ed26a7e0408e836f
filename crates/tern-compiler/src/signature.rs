//! Signature building and calling-convention checks.
//!
//! [`SignatureBuilder`] resolves every type named in a syntactic signature
//! against the active scope. The `check_*` functions then enforce the
//! calling conventions the grammar cannot express; their findings are
//! recoverable, so callers report them and keep the best-effort signature.

use tern_core::{
    DeclarationError, LabelDeclaration, ParameterTypes, RegistrationError, Signature, Span,
    TypeOracle,
};
use tern_registry::Declarations;
use tern_syntax::{CallableSignature, ParameterList};

/// Resolves syntactic signatures in the store's current scope.
pub struct SignatureBuilder<'d> {
    decls: &'d Declarations,
}

impl<'d> SignatureBuilder<'d> {
    pub fn new(decls: &'d Declarations) -> Self {
        Self { decls }
    }

    /// Build a semantic signature. Fails on the first unresolved type.
    pub fn build(&self, signature: &CallableSignature) -> Result<Signature, RegistrationError> {
        let parameters = &signature.parameters;
        let types = parameters
            .types
            .iter()
            .map(|ty| self.decls.get_type(ty))
            .collect::<Result<Vec<_>, _>>()?;

        let labels = signature
            .labels
            .iter()
            .map(|label| -> Result<LabelDeclaration, RegistrationError> {
                Ok(LabelDeclaration {
                    name: label.name.clone(),
                    types: label
                        .types
                        .iter()
                        .map(|ty| self.decls.get_type(ty))
                        .collect::<Result<Vec<_>, _>>()?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Signature {
            parameter_names: parameters.names.clone(),
            parameter_types: ParameterTypes {
                types,
                var_args: parameters.has_varargs,
            },
            implicit_count: parameters.implicit_count,
            return_type: self.decls.get_type(&signature.return_type)?,
            labels,
        })
    }
}

// ============================================================================
// Calling-convention checks
// ============================================================================

/// Check a builtin's signature: context first, receiver second for
/// JavaScript linkage, rest parameters only with JavaScript linkage.
pub fn check_builtin(
    name: &str,
    javascript: bool,
    signature: &Signature,
    oracle: &TypeOracle,
    span: Span,
) -> Vec<DeclarationError> {
    let mut errors = Vec::new();
    let types = signature.types();

    if types.first() != Some(&oracle.context_type()) {
        errors.push(DeclarationError::FirstParameterNotContext {
            kind: "builtin",
            name: name.to_string(),
            span,
        });
    }

    if signature.has_var_args() && !javascript {
        errors.push(DeclarationError::VarArgsWithoutJavaScript {
            name: name.to_string(),
            span,
        });
    }

    if javascript {
        match types.get(1) {
            Some(ty) if *ty == oracle.object_type() => {}
            found => errors.push(DeclarationError::SecondParameterNotObject {
                name: name.to_string(),
                found: found
                    .map(|ty| oracle.type_name(*ty).to_string())
                    .unwrap_or_else(|| "missing".to_string()),
                span,
            }),
        }
    }

    errors
}

/// Check that a runtime function takes the context first.
pub fn check_runtime(
    name: &str,
    signature: &Signature,
    oracle: &TypeOracle,
    span: Span,
) -> Option<DeclarationError> {
    (signature.types().first() != Some(&oracle.context_type())).then(|| {
        DeclarationError::FirstParameterNotContext {
            kind: "runtime",
            name: name.to_string(),
            span,
        }
    })
}

/// Label parameters can never be variadic.
pub fn check_label_parameters(
    label: &str,
    parameters: &ParameterList,
    span: Span,
) -> Option<DeclarationError> {
    parameters
        .has_varargs
        .then(|| DeclarationError::VariadicLabelParameters {
            label: label.to_string(),
            span,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tern_syntax::AstBuilder;

    fn declarations() -> Declarations {
        let mut decls = Declarations::new();
        decls
            .declare_abstract_type("Smi", Some("Object"), "TNode<Smi>")
            .unwrap();
        decls
    }

    #[test]
    fn builds_resolved_signature() {
        let decls = declarations();
        let mut b = AstBuilder::new();
        let sig = b
            .signature()
            .implicit("context", "Context")
            .param("x", "Smi")
            .label("Bailout", &["Object"])
            .returns("Smi");

        let built = SignatureBuilder::new(&decls).build(&sig).unwrap();
        let oracle = decls.oracle();
        assert_eq!(
            built.types(),
            &[oracle.context_type(), decls.lookup_type("Smi").unwrap()]
        );
        assert_eq!(built.implicit_count, 1);
        assert_eq!(built.parameter_names, vec!["context", "x"]);
        assert_eq!(built.labels[0].types, vec![oracle.object_type()]);
        assert_eq!(
            built.display(oracle).to_string(),
            "(Context, Smi) -> Smi labels Bailout(Object)"
        );
    }

    #[test]
    fn unresolved_type_fails() {
        let decls = declarations();
        let mut b = AstBuilder::new();
        let sig = b.signature().param("x", "T").returns("T");
        assert_eq!(
            SignatureBuilder::new(&decls).build(&sig),
            Err(RegistrationError::UnresolvedType("T".into()))
        );
    }

    fn build(decls: &Declarations, sig: CallableSignature) -> Signature {
        SignatureBuilder::new(decls).build(&sig).unwrap()
    }

    #[test]
    fn builtin_with_context_first_passes() {
        let decls = declarations();
        let mut b = AstBuilder::new();
        let sig = build(
            &decls,
            b.signature()
                .implicit("context", "Context")
                .param("x", "Smi")
                .returns("Smi"),
        );
        assert!(check_builtin("Foo", false, &sig, decls.oracle(), Span::default()).is_empty());
    }

    #[test]
    fn builtin_without_context_fails_once() {
        let decls = declarations();
        let mut b = AstBuilder::new();
        let sig = build(&decls, b.signature().param("x", "Smi").returns("Smi"));
        let errors = check_builtin("Foo", false, &sig, decls.oracle(), Span::new(4, 1, 0));
        assert_eq!(
            errors,
            vec![DeclarationError::FirstParameterNotContext {
                kind: "builtin",
                name: "Foo".into(),
                span: Span::new(4, 1, 0),
            }]
        );
    }

    #[test]
    fn javascript_builtin_needs_receiver() {
        let decls = declarations();
        let mut b = AstBuilder::new();
        let wrong = build(
            &decls,
            b.signature()
                .implicit("context", "Context")
                .param("receiver", "Smi")
                .returns("Object"),
        );
        let errors = check_builtin("Js", true, &wrong, decls.oracle(), Span::default());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("is Smi but should be Object"));

        let missing = build(
            &decls,
            b.signature().implicit("context", "Context").returns("Object"),
        );
        let errors = check_builtin("Js", true, &missing, decls.oracle(), Span::default());
        assert!(errors[0].to_string().contains("is missing but should be Object"));
    }

    #[test]
    fn varargs_require_javascript_linkage() {
        let decls = declarations();
        let mut b = AstBuilder::new();
        let sig = build(
            &decls,
            b.signature()
                .implicit("context", "Context")
                .param("receiver", "Object")
                .varargs("arguments")
                .returns("Object"),
        );
        assert!(check_builtin("Js", true, &sig, decls.oracle(), Span::default()).is_empty());
        let errors = check_builtin("Stub", false, &sig, decls.oracle(), Span::default());
        assert!(matches!(
            errors.as_slice(),
            [DeclarationError::VarArgsWithoutJavaScript { .. }]
        ));
    }

    #[test]
    fn runtime_needs_context() {
        let decls = declarations();
        let mut b = AstBuilder::new();
        let good = build(&decls, b.signature().param("c", "Context").returns("void"));
        let bad = build(&decls, b.signature().param("x", "Smi").returns("void"));
        assert!(check_runtime("R", &good, decls.oracle(), Span::default()).is_none());
        assert!(check_runtime("R", &bad, decls.oracle(), Span::default()).is_some());
    }

    #[test]
    fn variadic_label_parameters_rejected() {
        let mut params = ParameterList::default();
        assert!(check_label_parameters("L", &params, Span::default()).is_none());
        params.has_varargs = true;
        assert!(check_label_parameters("L", &params, Span::default()).is_some());
    }
}
