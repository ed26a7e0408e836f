//! Entities owned by the store and the name bindings that refer to them.
//!
//! Scopes never hold entities directly. A name binds to a [`Declarable`],
//! which carries the stable id of the entity in the store's arenas.

use rustc_hash::FxHashMap;
use tern_core::{
    CallableId, ConstantId, GenericId, LabelId, NodeId, ScopeId, Signature, Span, TypeHash,
    VariableId,
};
use tern_syntax::{GenericDecl, Stmt};

// ============================================================================
// Declarable
// ============================================================================

/// What a name is bound to in a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declarable {
    Type(TypeHash),
    Variable(VariableId),
    Constant(ConstantId),
    Label(LabelId),
    Builtin(CallableId),
    RuntimeFunction(CallableId),
    /// Macro overloads sharing one name.
    MacroList(Vec<CallableId>),
    /// Generic overloads sharing one name.
    GenericList(Vec<GenericId>),
}

impl Declarable {
    /// Human-readable kind for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Declarable::Type(_) => "type",
            Declarable::Variable(_) => "variable",
            Declarable::Constant(_) => "constant",
            Declarable::Label(_) => "label",
            Declarable::Builtin(_) => "builtin",
            Declarable::RuntimeFunction(_) => "runtime function",
            Declarable::MacroList(_) => "macro",
            Declarable::GenericList(_) => "generic",
        }
    }

    /// Whether this binding can be used as a value.
    pub fn is_value(&self) -> bool {
        matches!(
            self,
            Declarable::Variable(_)
                | Declarable::Constant(_)
                | Declarable::Builtin(_)
                | Declarable::RuntimeFunction(_)
                | Declarable::MacroList(_)
        )
    }
}

// ============================================================================
// Callables
// ============================================================================

/// How a builtin is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinLinkage {
    /// Internal calling convention only.
    Stub,
    /// Callable from JavaScript with a fixed argument count.
    FixedArgsJavaScript,
    /// Callable from JavaScript with rest parameters.
    VarArgsJavaScript,
}

impl BuiltinLinkage {
    /// Linkage for a builtin with the given JavaScript linkage and rest-parameter flags.
    ///
    /// Rest parameters without JavaScript linkage are illegal; such builtins
    /// fall back to [`BuiltinLinkage::Stub`].
    pub fn from_flags(javascript: bool, var_args: bool) -> Self {
        match (javascript, var_args) {
            (false, _) => BuiltinLinkage::Stub,
            (true, false) => BuiltinLinkage::FixedArgsJavaScript,
            (true, true) => BuiltinLinkage::VarArgsJavaScript,
        }
    }

    pub fn is_javascript(self) -> bool {
        !matches!(self, BuiltinLinkage::Stub)
    }
}

/// The three callable variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallableVariant {
    Builtin {
        linkage: BuiltinLinkage,
        /// Implemented outside the compiled source.
        external: bool,
    },
    Macro {
        /// Backend operator implementing an external macro.
        op: Option<String>,
        external: bool,
    },
    RuntimeFunction,
}

impl CallableVariant {
    pub fn kind_name(&self) -> &'static str {
        match self {
            CallableVariant::Builtin { .. } => "builtin",
            CallableVariant::Macro { .. } => "macro",
            CallableVariant::RuntimeFunction => "runtime function",
        }
    }

    pub fn is_macro(&self) -> bool {
        matches!(self, CallableVariant::Macro { .. })
    }

    pub fn is_external(&self) -> bool {
        match self {
            CallableVariant::Builtin { external, .. } | CallableVariant::Macro { external, .. } => {
                *external
            }
            CallableVariant::RuntimeFunction => true,
        }
    }
}

/// Where a callable came from in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct CallableOrigin {
    /// Name as written, without specialization suffix.
    pub source_name: String,
    /// The callable node that declared it.
    pub node: NodeId,
    /// Body to lower, absent for external callables.
    pub body: Option<Stmt>,
    pub span: Span,
}

/// A registered callable.
#[derive(Debug, Clone, PartialEq)]
pub struct Callable {
    pub id: CallableId,
    /// Generated unique name (source name plus specialization suffix).
    pub name: String,
    pub source_name: String,
    pub variant: CallableVariant,
    pub signature: Signature,
    pub body: Option<Stmt>,
    pub node: NodeId,
    /// The specialization this callable realizes, if any.
    pub specialization: Option<SpecializationKey>,
    pub span: Span,
}

impl Callable {
    /// Whether the callable produces a value (return type is not void or never).
    pub fn has_return_value(&self, void: TypeHash, never: TypeHash) -> bool {
        self.signature.return_type != void && self.signature.return_type != never
    }
}

// ============================================================================
// Generics
// ============================================================================

/// Identity of one specialization: the generic plus its ordered concrete types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecializationKey {
    pub generic: GenericId,
    pub types: Vec<TypeHash>,
}

impl SpecializationKey {
    pub fn new(generic: GenericId, types: Vec<TypeHash>) -> Self {
        Self { generic, types }
    }
}

/// A generic callable declaration and its realized specializations.
#[derive(Debug, Clone)]
pub struct Generic {
    pub id: GenericId,
    pub name: String,
    pub declaration: GenericDecl,
    /// Scope the generic was declared in; specialization scopes are its children.
    pub scope: ScopeId,
    pub(crate) specializations: FxHashMap<Vec<TypeHash>, CallableId>,
}

impl Generic {
    /// Number of type parameters.
    pub fn arity(&self) -> usize {
        self.declaration.generic_parameters.len()
    }

    pub fn has_body(&self) -> bool {
        self.declaration.body.is_some()
    }

    /// The callable realized for a type vector, if any.
    pub fn specialization(&self, types: &[TypeHash]) -> Option<CallableId> {
        self.specializations.get(types).copied()
    }

    pub fn specializations(&self) -> impl Iterator<Item = (&[TypeHash], CallableId)> {
        self.specializations
            .iter()
            .map(|(types, id)| (types.as_slice(), *id))
    }

    pub fn specialization_count(&self) -> usize {
        self.specializations.len()
    }
}

// ============================================================================
// Values and labels
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// `let` / `const` in a body.
    Local,
    /// A signature parameter.
    Parameter,
    /// A label-block parameter.
    LabelParameter,
    /// The implicit return-value variable of a macro.
    ReturnValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub id: VariableId,
    pub name: String,
    pub ty: TypeHash,
    pub is_const: bool,
    pub kind: VariableKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub id: ConstantId,
    pub name: String,
    pub ty: TypeHash,
    /// Backend literal the constant lowers to, if bound to one.
    pub value: Option<String>,
}

/// A control-transfer target and the variables bound to its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub id: LabelId,
    pub name: String,
    pub parameters: Vec<VariableId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linkage_from_flags() {
        assert_eq!(BuiltinLinkage::from_flags(false, false), BuiltinLinkage::Stub);
        assert_eq!(BuiltinLinkage::from_flags(false, true), BuiltinLinkage::Stub);
        assert_eq!(
            BuiltinLinkage::from_flags(true, false),
            BuiltinLinkage::FixedArgsJavaScript
        );
        assert_eq!(
            BuiltinLinkage::from_flags(true, true),
            BuiltinLinkage::VarArgsJavaScript
        );
        assert!(!BuiltinLinkage::Stub.is_javascript());
    }

    #[test]
    fn runtime_functions_are_external() {
        assert!(CallableVariant::RuntimeFunction.is_external());
        assert!(
            !CallableVariant::Macro {
                op: None,
                external: false
            }
            .is_external()
        );
    }

    #[test]
    fn value_declarables() {
        assert!(Declarable::Variable(VariableId::new(0)).is_value());
        assert!(Declarable::MacroList(vec![]).is_value());
        assert!(!Declarable::Type(TypeHash::from_name("Smi")).is_value());
        assert!(!Declarable::GenericList(vec![]).is_value());
        assert_eq!(Declarable::Label(LabelId::new(1)).kind_name(), "label");
    }
}
