//! Error types for the declaration stage.
//!
//! ## Error Hierarchy
//!
//! ```text
//! DeclarationError          - everything the pass reports, attributed to a Span
//! ├── signature shape       - recoverable, the pass continues best-effort
//! ├── specialization        - fatal for the enclosing declaration
//! ├── Registration(..)      - wraps a RegistrationError from the symbol store
//! └── Internal              - dispatcher/grammar mismatch, never user input
//! RegistrationError         - symbol store failures (no position information)
//! ```
//!
//! Recoverable errors are accumulated and the walk continues; fatal errors
//! unwind out of the current top-level declaration only.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors raised by the symbol store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// A declarable with this name already exists in the same scope.
    #[error("cannot redeclare '{0}' in the same scope")]
    Redeclaration(String),

    /// A type with this name already exists.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A macro overload with identical parameter types already exists.
    #[error("macro '{0}' with the same parameter types is already declared")]
    DuplicateOverload(String),

    /// A type name could not be resolved.
    #[error("cannot find type '{0}'")]
    UnresolvedType(String),

    /// A value name could not be resolved.
    #[error("cannot find value '{0}'")]
    UnresolvedValue(String),

    /// A label name could not be resolved.
    #[error("cannot find label '{0}'")]
    UnresolvedLabel(String),

    /// No generic with this name is visible.
    #[error("cannot find generic '{0}'")]
    UnresolvedGeneric(String),

    /// The name resolves, but to a different kind of declarable.
    #[error("'{name}' is a {found}, but a {expected} was expected")]
    WrongKind {
        name: String,
        found: &'static str,
        expected: &'static str,
    },
}

// ============================================================================
// Declaration Errors
// ============================================================================

/// Errors reported by the declaration pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeclarationError {
    /// A builtin or runtime function does not take the execution context first.
    #[error("at {span}: first parameter to {kind} '{name}' is not a context but should be")]
    FirstParameterNotContext {
        /// "builtin" or "runtime".
        kind: &'static str,
        name: String,
        span: Span,
    },

    /// A JavaScript builtin's second parameter is not the receiver object.
    #[error("at {span}: second parameter to javascript builtin '{name}' is {found} but should be Object")]
    SecondParameterNotObject {
        name: String,
        /// The offending type's name, or "missing".
        found: String,
        span: Span,
    },

    /// Rest parameters on something other than a JavaScript builtin.
    #[error("at {span}: builtin '{name}' with rest parameters must be a JavaScript builtin")]
    VarArgsWithoutJavaScript { name: String, span: Span },

    /// A label block declared `...` parameters.
    #[error("at {span}: cannot use ... for parameters of label '{label}'")]
    VariadicLabelParameters { label: String, span: Span },

    /// A specialization with both or neither of `extern` and a body.
    #[error("at {span}: specialization of '{name}' must either be marked 'extern' or have a body")]
    MalformedSpecialization { name: String, span: Span },

    /// No generic with this name matches the specialization's signature.
    #[error("at {span}: specialization of '{name}' doesn't match any generic declaration")]
    NoMatchingGeneric { name: String, span: Span },

    /// More than one generic matches the specialization's signature.
    #[error(
        "at {span}: specialization of '{name}' is ambiguous, it matches more than one generic declaration ({first} and {second})"
    )]
    AmbiguousSpecialization {
        name: String,
        first: String,
        second: String,
        span: Span,
    },

    /// The same (generic, type vector) pair was specialized explicitly twice.
    #[error("at {span}: cannot redeclare specialization of '{name}' with types <{types}>")]
    DuplicateSpecialization {
        name: String,
        types: String,
        span: Span,
    },

    /// Type argument count differs from the generic's parameter count.
    #[error(
        "at {span}: number of template parameters ({got}) to instantiation of generic '{name}' doesn't match the generic's declaration ({expected})"
    )]
    GenericArityMismatch {
        name: String,
        expected: usize,
        got: usize,
        span: Span,
    },

    /// A symbol store failure at the current source position.
    #[error("at {span}: {source}")]
    Registration {
        source: RegistrationError,
        span: Span,
    },

    /// Internal error: the pass reached a state the grammar cannot produce.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl DeclarationError {
    /// Attribute a store failure to a source position.
    pub fn registration(source: RegistrationError, span: Span) -> Self {
        DeclarationError::Registration { source, span }
    }

    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            DeclarationError::FirstParameterNotContext { span, .. } => *span,
            DeclarationError::SecondParameterNotObject { span, .. } => *span,
            DeclarationError::VarArgsWithoutJavaScript { span, .. } => *span,
            DeclarationError::VariadicLabelParameters { span, .. } => *span,
            DeclarationError::MalformedSpecialization { span, .. } => *span,
            DeclarationError::NoMatchingGeneric { span, .. } => *span,
            DeclarationError::AmbiguousSpecialization { span, .. } => *span,
            DeclarationError::DuplicateSpecialization { span, .. } => *span,
            DeclarationError::GenericArityMismatch { span, .. } => *span,
            DeclarationError::Registration { span, .. } => *span,
            DeclarationError::Internal { .. } => Span::default(),
        }
    }

    /// Whether this error unwinds the enclosing top-level declaration.
    ///
    /// Signature-shape violations are recoverable: they are reported and the
    /// pass continues with a best-effort signature.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            DeclarationError::FirstParameterNotContext { .. }
                | DeclarationError::SecondParameterNotObject { .. }
                | DeclarationError::VarArgsWithoutJavaScript { .. }
                | DeclarationError::VariadicLabelParameters { .. }
        )
    }
}
