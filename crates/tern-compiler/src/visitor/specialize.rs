//! Generic specialization resolver.
//!
//! Explicit specialization declarations are matched against every generic
//! sharing their name; call-site references are queued and realized once the
//! declaration list has been walked. Both end in `specialize`, which
//! realizes exactly one callable per (generic, types) key.

use tern_core::{CallableId, DeclarationError, Signature, TypeHash};
use tern_registry::SpecializationKey;
use tern_syntax::{CallableSignature, SpecializationDecl, Stmt};

use super::{AtSpan, DeclarationPass, Result, declared};
use crate::signature::SignatureBuilder;
use crate::specialization::SpecializationRequest;

impl DeclarationPass<'_> {
    /// Match an explicit specialization against the generics sharing its
    /// name and realize the single match.
    pub(super) fn visit_specialization_decl(&mut self, decl: &SpecializationDecl) -> Result<()> {
        let span = self.position();
        if decl.body.is_some() == decl.external {
            return Err(DeclarationError::MalformedSpecialization {
                name: decl.name.clone(),
                span,
            });
        }

        let generics = self.decls.lookup_generic(&decl.name).at(span)?;
        let types = decl
            .generic_parameters
            .iter()
            .map(|ty| self.decls.get_type(ty))
            .collect::<std::result::Result<Vec<_>, _>>()
            .at(span)?;
        let signature = SignatureBuilder::new(self.decls)
            .build(&decl.signature)
            .at(span)?;

        let mut matching: Option<SpecializationKey> = None;
        for generic in generics {
            // A candidate with a different parameter count cannot bind these types.
            if self.decls.generic(generic).arity() != types.len() {
                continue;
            }
            let key = SpecializationKey::new(generic, types.clone());
            let candidate = self.candidate_signature(&key)?;
            if !candidate.has_same_types_as(&signature) {
                continue;
            }
            if let Some(first) = &matching {
                return Err(DeclarationError::AmbiguousSpecialization {
                    name: decl.name.clone(),
                    first: self.describe_generic(first),
                    second: self.describe_generic(&key),
                    span,
                });
            }
            matching = Some(key);
        }

        let Some(key) = matching else {
            return Err(DeclarationError::NoMatchingGeneric {
                name: decl.name.clone(),
                span,
            });
        };
        if self.decls.specialization(&key).is_some() {
            return Err(DeclarationError::DuplicateSpecialization {
                name: decl.name.clone(),
                types: self.decls.oracle().type_names(&key.types).join(", "),
                span,
            });
        }

        self.specialize(&key, &decl.signature, decl.body.as_ref())?;
        Ok(())
    }

    /// A generic's signature with its parameters bound to the key's types,
    /// built in a scope that is discarded afterwards.
    fn candidate_signature(&mut self, key: &SpecializationKey) -> Result<Signature> {
        self.with_trial_scope(key, |this| {
            let declaration = &this.decls.generic(key.generic).declaration;
            SignatureBuilder::new(this.decls)
                .build(&declaration.callable.signature)
                .at(this.position())
        })
    }

    fn describe_generic(&self, key: &SpecializationKey) -> String {
        let generic = self.decls.generic(key.generic);
        format!(
            "{}<{}> at {}",
            generic.name,
            generic.declaration.generic_parameters.join(", "),
            generic.declaration.span
        )
    }

    /// Queue a call-site request unless its key is realized or already queued.
    pub(super) fn queue_specialization(&mut self, request: SpecializationRequest) {
        if self.decls.specialization(&request.key).is_some() {
            return;
        }
        let generic = self.decls.generic(request.key.generic).name.clone();
        let types = self.type_names(&request.key.types);
        if self.queue.enqueue(request) {
            tracing::trace!(generic = %generic, types = ?types, "queued specialization");
        }
    }

    /// Realize queued requests, including those queued while draining.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(super) fn drain_specializations(&mut self) {
        while let Some(request) = self.queue.pop() {
            if self.decls.specialization(&request.key).is_some() {
                continue;
            }
            tracing::trace!(
                generic = %self.decls.generic(request.key.generic).name,
                types = ?self.type_names(&request.key.types),
                requested_at = %request.requested_at,
                "draining specialization"
            );
            let declaration = self.decls.generic(request.key.generic).declaration.clone();
            if let Err(err) = self.specialize(
                &request.key,
                &declaration.callable.signature,
                declaration.body.as_ref(),
            ) {
                self.report(err);
            }
        }
    }

    /// Realize one specialization: check the type count, bind the generic's
    /// parameters, build the signature under that binding and visit the
    /// callable. Errors are attributed to the generic's declaration.
    #[cfg_attr(feature = "profiling", profiling::function)]
    fn specialize(
        &mut self,
        key: &SpecializationKey,
        signature: &CallableSignature,
        body: Option<&Stmt>,
    ) -> Result<CallableId> {
        let generic = self.decls.generic(key.generic);
        let callable = generic.declaration.callable.clone();
        let arity = generic.arity();
        let span = generic.declaration.span;

        self.with_position(span, |this| {
            if arity != key.types.len() {
                return Err(DeclarationError::GenericArityMismatch {
                    name: callable.name.clone(),
                    expected: arity,
                    got: key.types.len(),
                    span: this.position(),
                });
            }

            let id = this.with_generic_scope(key, |this| {
                let signature = SignatureBuilder::new(this.decls)
                    .build(signature)
                    .at(this.position())?;
                this.visit_callable(&callable, signature, body)
            })?;

            this.specializations_realized += 1;
            declared!(
                this,
                generic = %callable.name,
                name = %this.decls.callable(id).name,
                "realized specialization"
            );
            Ok(id)
        })
    }

    fn type_names(&self, types: &[TypeHash]) -> Vec<String> {
        self.decls.oracle().type_names(types)
    }
}
