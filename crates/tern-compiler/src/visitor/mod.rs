//! The declaration pass.
//!
//! [`DeclarationPass`] walks the declaration list once, registering every
//! type, constant, callable and generic in the [`Declarations`] store and
//! realizing generic specializations on demand.
//!
//! ## Dispatch
//!
//! There is one dispatch `match` per node family, each in its own module:
//!
//! - `decl`: declarations, including explicit specializations
//! - `callable`: callable headers, dispatched with a built signature and body
//! - `stmt`: statements, including control-split bookkeeping
//! - `expr`: expressions, including call-site specialization requests
//! - `specialize`: matching and instantiation of generics
//!
//! ## State
//!
//! The source position, active scope, current callable and control-split
//! stack are changed only through the `with_*` helpers below, which restore
//! the previous state whether the closure succeeds or fails. A fatal error
//! unwinds to the enclosing top-level declaration, which records it, so
//! siblings are visited with clean state.

mod callable;
mod decl;
mod expr;
mod specialize;
mod stmt;

use tern_core::{CallableId, DeclarationError, NodeId, RegistrationError, Span};
use tern_registry::{Declarations, SpecializationKey};
use tern_syntax::Ast;

use crate::control_split::{ChangedVariables, ControlSplitKey, ControlSplitTracker, ControlSplits};
use crate::options::DeclarationOptions;
use crate::specialization::{SpecializationQueue, SpecializationRequest};

pub(crate) type Result<T> = std::result::Result<T, DeclarationError>;

/// Log a declaration event at `info` when verbose, `debug` otherwise.
macro_rules! declared {
    ($pass:expr, $($arg:tt)+) => {
        if $pass.options.is_verbose() {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}
pub(crate) use declared;

/// Attributes store failures to a source position.
pub(crate) trait AtSpan<T> {
    fn at(self, span: Span) -> Result<T>;
}

impl<T> AtSpan<T> for std::result::Result<T, RegistrationError> {
    fn at(self, span: Span) -> Result<T> {
        self.map_err(|source| DeclarationError::registration(source, span))
    }
}

/// Output of the declaration pass.
#[derive(Debug, Default)]
pub struct DeclarationOutput {
    /// Number of callables registered, specializations included.
    pub callables_registered: usize,
    /// Number of generic specializations realized.
    pub specializations_realized: usize,
    /// Collected errors, recoverable and fatal.
    pub errors: Vec<DeclarationError>,
    /// Changed-variable records for every control split.
    pub control_splits: ControlSplits,
    /// Unrealized requests left undrained (only when draining is disabled).
    /// Hand them to [`DeclarationPass::drain`] to realize them later.
    pub pending_specializations: Vec<SpecializationRequest>,
}

impl DeclarationOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors that aborted a declaration.
    pub fn fatal_errors(&self) -> impl Iterator<Item = &DeclarationError> {
        self.errors.iter().filter(|err| err.is_fatal())
    }
}

/// Walks a syntax tree and populates a [`Declarations`] store.
pub struct DeclarationPass<'a> {
    decls: &'a mut Declarations,
    options: DeclarationOptions,
    /// Source positions of the nodes being visited, innermost last.
    positions: Vec<Span>,
    /// Callable whose body is being visited; `return` resolves against it.
    current_callable: Option<CallableId>,
    errors: Vec<DeclarationError>,
    tracker: ControlSplitTracker,
    control_splits: ControlSplits,
    queue: SpecializationQueue,
    callables_registered: usize,
    specializations_realized: usize,
}

impl<'a> DeclarationPass<'a> {
    /// Create a new pass over a store.
    pub fn new(decls: &'a mut Declarations, options: DeclarationOptions) -> Self {
        Self {
            decls,
            options,
            positions: Vec::new(),
            current_callable: None,
            errors: Vec::new(),
            tracker: ControlSplitTracker::new(),
            control_splits: ControlSplits::new(),
            queue: SpecializationQueue::new(),
            callables_registered: 0,
            specializations_realized: 0,
        }
    }

    /// Run the pass over a syntax tree.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, ast: &Ast) -> DeclarationOutput {
        for decl in &ast.declarations {
            self.visit_top_level(decl);
        }

        if self.options.drains_specializations() {
            self.drain_specializations();
        }

        self.finish()
    }

    /// Realize requests left pending by an earlier run over the same store.
    ///
    /// Requests whose key has been realized in the meantime are skipped.
    /// Requests queued while draining are realized too, regardless of
    /// [`DeclarationOptions::drains_specializations`].
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn drain(mut self, requests: impl IntoIterator<Item = SpecializationRequest>) -> DeclarationOutput {
        for request in requests {
            self.queue_specialization(request);
        }
        self.drain_specializations();
        self.finish()
    }

    fn finish(self) -> DeclarationOutput {
        let decls = &*self.decls;
        // An explicit specialization may realize a key after its call site queued it.
        let pending_specializations = self
            .queue
            .into_pending()
            .into_iter()
            .filter(|request| decls.specialization(&request.key).is_none())
            .collect();

        DeclarationOutput {
            callables_registered: self.callables_registered,
            specializations_realized: self.specializations_realized,
            errors: self.errors,
            control_splits: self.control_splits,
            pending_specializations,
        }
    }

    /// Visit one error-isolation unit, recording a fatal error instead of
    /// propagating it.
    fn visit_top_level(&mut self, decl: &tern_syntax::Decl) {
        if let Err(err) = self.visit_declaration(decl) {
            self.report(err);
        }
    }

    // ==========================================================================
    // Errors
    // ==========================================================================

    /// The position errors are currently attributed to.
    fn position(&self) -> Span {
        self.positions.last().copied().unwrap_or_default()
    }

    fn report(&mut self, err: DeclarationError) {
        tracing::debug!(error = %err, fatal = err.is_fatal(), "declaration error");
        self.errors.push(err);
    }

    // ==========================================================================
    // Scoped state
    // ==========================================================================

    /// Attribute errors raised by `f` to `span`.
    fn with_position<R>(&mut self, span: Span, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        self.positions.push(span);
        let result = f(self);
        self.positions.pop();
        result
    }

    /// Run `f` in the scope owned by `node` under the active specialization.
    fn with_node_scope<R>(&mut self, node: NodeId, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        let activation = self.decls.enter_node_scope(node);
        let result = f(self);
        self.decls.exit_scope(activation);
        result
    }

    /// Run `f` in a disposable scope binding the generic's parameters to the key's types.
    fn with_trial_scope<R>(
        &mut self,
        key: &SpecializationKey,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let activation = self.decls.enter_trial_scope(key).at(self.position())?;
        let result = f(self);
        self.decls.exit_scope(activation);
        result
    }

    /// Run `f` in the scope of one specialization.
    fn with_generic_scope<R>(
        &mut self,
        key: &SpecializationKey,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let activation = self.decls.enter_generic_scope(key).at(self.position())?;
        let result = f(self);
        self.decls.exit_scope(activation);
        result
    }

    fn with_current_callable<R>(
        &mut self,
        callable: CallableId,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let previous = self.current_callable.replace(callable);
        let result = f(self);
        self.current_callable = previous;
        result
    }

    /// Run `f` inside a control split and record what changed against `node`.
    fn with_control_split<R>(&mut self, node: NodeId, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        self.tracker.push();
        let result = f(self);
        let changed = self.tracker.pop();
        self.record_control_split(node, changed);
        result
    }

    fn record_control_split(&mut self, node: NodeId, changed: ChangedVariables) {
        let key = ControlSplitKey {
            node,
            specialization: self.decls.current_specialization().cloned(),
        };
        if self.options.is_verbose() {
            for variable in &changed {
                tracing::info!(
                    variable = %self.decls.variable(*variable).name,
                    split = %node,
                    "variable modified in control split"
                );
            }
        }
        self.control_splits.record(key, changed);
    }
}
