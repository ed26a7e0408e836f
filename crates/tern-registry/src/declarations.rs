//! The symbol store.
//!
//! [`Declarations`] owns every entity the declaration pass creates: types
//! (through the [`TypeOracle`]), callables, generics, variables, constants
//! and labels, plus the tree of lexical scopes that bind names to them.
//!
//! # Storage Model
//!
//! - Entities live in append-only arenas and are referred to by stable ids.
//! - Scopes live in their own arena. Only disposable trial scopes are ever
//!   removed, by truncating the arena back to its length on entry.
//! - Node scopes are keyed by the syntax node *and* the active
//!   specialization, so each specialization of a generic body gets its own
//!   scopes.
//!
//! # Example
//!
//! ```
//! use tern_registry::{Declarable, Declarations, VariableKind};
//! use tern_core::NodeId;
//!
//! let mut decls = Declarations::new();
//! let smi = decls.declare_abstract_type("Smi", None, "TNode<Smi>").unwrap();
//!
//! let activation = decls.enter_node_scope(NodeId::new(7));
//! let x = decls.declare_variable("x", smi, false, VariableKind::Local).unwrap();
//! assert_eq!(decls.lookup("x"), Some(&Declarable::Variable(x)));
//! decls.exit_scope(activation);
//!
//! assert!(decls.lookup("x").is_none());
//! ```

use rustc_hash::FxHashMap;
use tern_core::{
    CallableId, ConstantId, GenericId, LabelId, NodeId, RegistrationError, ScopeId, Signature,
    TypeHash, TypeOracle, VariableId,
};
use tern_syntax::{GenericDecl, TypeExpr};

use crate::{
    BuiltinLinkage, Callable, CallableOrigin, CallableVariant, Constant, Declarable, Generic,
    Label, Scope, ScopeActivation, SpecializationKey, Variable, VariableKind,
};

/// The outermost scope, holding the intrinsic types.
pub const GLOBAL_SCOPE: ScopeId = ScopeId::new(0);

type Result<T> = std::result::Result<T, RegistrationError>;

/// Symbol and scope store for one compilation.
#[derive(Debug)]
pub struct Declarations {
    oracle: TypeOracle,

    // === Scopes ===
    scopes: Vec<Scope>,
    current: ScopeId,
    current_specialization: Option<SpecializationKey>,
    node_scopes: FxHashMap<(NodeId, Option<SpecializationKey>), ScopeId>,
    generic_scopes: FxHashMap<SpecializationKey, ScopeId>,

    // === Entity arenas ===
    callables: Vec<Callable>,
    /// Local builtins in declaration order.
    builtins: Vec<CallableId>,
    generics: Vec<Generic>,
    variables: Vec<Variable>,
    constants: Vec<Constant>,
    labels: Vec<Label>,
}

impl Declarations {
    /// Create a store whose global scope binds the intrinsic types.
    pub fn new() -> Self {
        Self::with_oracle(TypeOracle::new())
    }

    /// Create a store around an existing type oracle, binding all of its types globally.
    pub fn with_oracle(oracle: TypeOracle) -> Self {
        let mut global = Scope::default();
        for entry in oracle.types() {
            global
                .bindings
                .insert(entry.name.clone(), Declarable::Type(entry.hash));
        }
        Self {
            oracle,
            scopes: vec![global],
            current: GLOBAL_SCOPE,
            current_specialization: None,
            node_scopes: FxHashMap::default(),
            generic_scopes: FxHashMap::default(),
            callables: Vec::new(),
            builtins: Vec::new(),
            generics: Vec::new(),
            variables: Vec::new(),
            constants: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn oracle(&self) -> &TypeOracle {
        &self.oracle
    }

    // ==========================================================================
    // Declaration
    // ==========================================================================

    fn bind(&mut self, name: &str, declarable: Declarable) -> Result<()> {
        let scope = &mut self.scopes[self.current.index()];
        if scope.bindings.contains_key(name) {
            return Err(RegistrationError::Redeclaration(name.to_string()));
        }
        scope.bindings.insert(name.to_string(), declarable);
        Ok(())
    }

    fn check_unbound(&self, name: &str) -> Result<()> {
        if self.scopes[self.current.index()].contains(name) {
            return Err(RegistrationError::Redeclaration(name.to_string()));
        }
        Ok(())
    }

    /// Declare a new abstract type and bind its name in the current scope.
    pub fn declare_abstract_type(
        &mut self,
        name: &str,
        parent: Option<&str>,
        generates: impl Into<String>,
    ) -> Result<TypeHash> {
        self.check_unbound(name)?;
        let parent = parent.map(|p| self.lookup_type(p)).transpose()?;
        let hash = self.oracle.declare_abstract_type(name, parent, generates)?;
        self.bind(name, Declarable::Type(hash))?;
        Ok(hash)
    }

    /// Bind a name to an existing type in the current scope.
    pub fn declare_type(&mut self, name: &str, ty: TypeHash) -> Result<()> {
        self.bind(name, Declarable::Type(ty))
    }

    fn push_callable(
        &mut self,
        name: &str,
        origin: CallableOrigin,
        variant: CallableVariant,
        signature: Signature,
    ) -> CallableId {
        let id = CallableId::from_index(self.callables.len());
        self.callables.push(Callable {
            id,
            name: name.to_string(),
            source_name: origin.source_name,
            variant,
            signature,
            body: origin.body,
            node: origin.node,
            specialization: self.current_specialization.clone(),
            span: origin.span,
        });
        id
    }

    /// Declare a builtin. Local builtins are also recorded in declaration order.
    pub fn declare_builtin(
        &mut self,
        name: &str,
        origin: CallableOrigin,
        linkage: BuiltinLinkage,
        external: bool,
        signature: Signature,
    ) -> Result<CallableId> {
        self.check_unbound(name)?;
        let id = self.push_callable(
            name,
            origin,
            CallableVariant::Builtin { linkage, external },
            signature,
        );
        self.bind(name, Declarable::Builtin(id))?;
        if !external {
            self.builtins.push(id);
        }
        Ok(id)
    }

    /// Declare a macro, adding an overload if the name already names macros.
    ///
    /// Fails if an overload with the same parameter types exists in this scope.
    pub fn declare_macro(
        &mut self,
        name: &str,
        origin: CallableOrigin,
        op: Option<String>,
        external: bool,
        signature: Signature,
    ) -> Result<CallableId> {
        let existing = match self.scopes[self.current.index()].get(name) {
            Some(Declarable::MacroList(list)) => list.clone(),
            Some(_) => return Err(RegistrationError::Redeclaration(name.to_string())),
            None => Vec::new(),
        };
        if existing
            .iter()
            .any(|id| self.callables[id.index()].signature.parameter_types == signature.parameter_types)
        {
            return Err(RegistrationError::DuplicateOverload(name.to_string()));
        }

        let id = self.push_callable(
            name,
            origin,
            CallableVariant::Macro { op, external },
            signature,
        );
        let scope = &mut self.scopes[self.current.index()];
        match scope.bindings.get_mut(name) {
            Some(Declarable::MacroList(list)) => list.push(id),
            _ => {
                scope
                    .bindings
                    .insert(name.to_string(), Declarable::MacroList(vec![id]));
            }
        }
        Ok(id)
    }

    pub fn declare_runtime_function(
        &mut self,
        name: &str,
        origin: CallableOrigin,
        signature: Signature,
    ) -> Result<CallableId> {
        self.check_unbound(name)?;
        let id = self.push_callable(name, origin, CallableVariant::RuntimeFunction, signature);
        self.bind(name, Declarable::RuntimeFunction(id))?;
        Ok(id)
    }

    pub fn declare_variable(
        &mut self,
        name: &str,
        ty: TypeHash,
        is_const: bool,
        kind: VariableKind,
    ) -> Result<VariableId> {
        self.check_unbound(name)?;
        let id = VariableId::from_index(self.variables.len());
        self.variables.push(Variable {
            id,
            name: name.to_string(),
            ty,
            is_const,
            kind,
        });
        self.bind(name, Declarable::Variable(id))?;
        Ok(id)
    }

    pub fn declare_constant(
        &mut self,
        name: &str,
        ty: TypeHash,
        value: Option<String>,
    ) -> Result<ConstantId> {
        self.check_unbound(name)?;
        let id = ConstantId::from_index(self.constants.len());
        self.constants.push(Constant {
            id,
            name: name.to_string(),
            ty,
            value,
        });
        self.bind(name, Declarable::Constant(id))?;
        Ok(id)
    }

    pub fn declare_label(&mut self, name: &str) -> Result<LabelId> {
        self.check_unbound(name)?;
        let id = LabelId::from_index(self.labels.len());
        self.labels.push(Label {
            id,
            name: name.to_string(),
            parameters: Vec::new(),
        });
        self.bind(name, Declarable::Label(id))?;
        Ok(id)
    }

    /// Attach a parameter variable to a label.
    pub fn add_label_parameter(&mut self, label: LabelId, variable: VariableId) {
        self.labels[label.index()].parameters.push(variable);
    }

    /// Declare a generic, adding an overload if the name already names generics.
    pub fn declare_generic(&mut self, name: &str, declaration: GenericDecl) -> Result<GenericId> {
        let id = GenericId::from_index(self.generics.len());
        let scope = &mut self.scopes[self.current.index()];
        match scope.bindings.get_mut(name) {
            Some(Declarable::GenericList(list)) => list.push(id),
            Some(_) => return Err(RegistrationError::Redeclaration(name.to_string())),
            None => {
                scope
                    .bindings
                    .insert(name.to_string(), Declarable::GenericList(vec![id]));
            }
        }
        self.generics.push(Generic {
            id,
            name: name.to_string(),
            declaration,
            scope: self.current,
            specializations: FxHashMap::default(),
        });
        Ok(id)
    }

    /// Record the callable realizing a specialization.
    pub fn record_specialization(&mut self, key: &SpecializationKey, callable: CallableId) {
        self.generics[key.generic.index()]
            .specializations
            .insert(key.types.clone(), callable);
    }

    /// The callable realizing a specialization, if it exists yet.
    pub fn specialization(&self, key: &SpecializationKey) -> Option<CallableId> {
        self.generics
            .get(key.generic.index())
            .and_then(|generic| generic.specialization(&key.types))
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Resolve a name through the current scope chain.
    pub fn lookup(&self, name: &str) -> Option<&Declarable> {
        self.lookup_from(self.current, name)
    }

    fn lookup_from(&self, scope: ScopeId, name: &str) -> Option<&Declarable> {
        let mut next = Some(scope);
        while let Some(id) = next {
            let scope = &self.scopes[id.index()];
            if let Some(declarable) = scope.get(name) {
                return Some(declarable);
            }
            next = scope.parent;
        }
        None
    }

    pub fn lookup_type(&self, name: &str) -> Result<TypeHash> {
        match self.lookup(name) {
            Some(Declarable::Type(ty)) => Ok(*ty),
            Some(other) => Err(wrong_kind(name, other, "type")),
            None => Err(RegistrationError::UnresolvedType(name.to_string())),
        }
    }

    /// Resolve a syntactic type reference.
    pub fn get_type(&self, expr: &TypeExpr) -> Result<TypeHash> {
        self.lookup_type(&expr.name)
    }

    /// Resolve a type name in the global scope only.
    pub fn lookup_global_type(&self, name: &str) -> Result<TypeHash> {
        match self.scopes[GLOBAL_SCOPE.index()].get(name) {
            Some(Declarable::Type(ty)) => Ok(*ty),
            Some(other) => Err(wrong_kind(name, other, "type")),
            None => Err(RegistrationError::UnresolvedType(name.to_string())),
        }
    }

    /// Resolve a name that must denote a value.
    pub fn lookup_value(&self, name: &str) -> Result<&Declarable> {
        match self.lookup(name) {
            Some(declarable) if declarable.is_value() => Ok(declarable),
            Some(other) => Err(wrong_kind(name, other, "value")),
            None => Err(RegistrationError::UnresolvedValue(name.to_string())),
        }
    }

    /// The variable a name resolves to, if its nearest binding is a variable.
    pub fn lookup_variable(&self, name: &str) -> Option<VariableId> {
        match self.lookup(name) {
            Some(Declarable::Variable(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn lookup_label(&self, name: &str) -> Result<LabelId> {
        match self.lookup(name) {
            Some(Declarable::Label(id)) => Ok(*id),
            Some(other) => Err(wrong_kind(name, other, "label")),
            None => Err(RegistrationError::UnresolvedLabel(name.to_string())),
        }
    }

    /// All generics visible under a name, in declaration order.
    pub fn lookup_generic(&self, name: &str) -> Result<Vec<GenericId>> {
        match self.lookup(name) {
            Some(Declarable::GenericList(list)) => Ok(list.clone()),
            Some(other) => Err(wrong_kind(name, other, "generic")),
            None => Err(RegistrationError::UnresolvedGeneric(name.to_string())),
        }
    }

    // ==========================================================================
    // Scope activation
    // ==========================================================================

    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    /// The specialization whose scope is active, if any.
    pub fn current_specialization(&self) -> Option<&SpecializationKey> {
        self.current_specialization.as_ref()
    }

    /// Names of the active specialization's types, empty outside generics.
    pub fn current_specialization_type_names(&self) -> Vec<String> {
        self.current_specialization
            .as_ref()
            .map(|key| self.oracle.type_names(&key.types))
            .unwrap_or_default()
    }

    fn activate(&mut self, scope: ScopeId, truncate_to: Option<usize>) -> ScopeActivation {
        let activation = ScopeActivation {
            previous: self.current,
            previous_specialization: self.current_specialization.clone(),
            truncate_to,
        };
        self.current = scope;
        activation
    }

    fn push_scope(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId::from_index(self.scopes.len());
        self.scopes.push(scope);
        id
    }

    /// Activate the scope owned by a syntax node under the current
    /// specialization, creating it as a child of the current scope on first use.
    pub fn enter_node_scope(&mut self, node: NodeId) -> ScopeActivation {
        let key = (node, self.current_specialization.clone());
        let scope = match self.node_scopes.get(&key) {
            Some(scope) => *scope,
            None => {
                let scope = self.push_scope(Scope::child_of(self.current));
                self.node_scopes.insert(key, scope);
                scope
            }
        };
        self.activate(scope, None)
    }

    fn binding_scope(&self, key: &SpecializationKey) -> Result<Scope> {
        let generic = &self.generics[key.generic.index()];
        let mut scope = Scope::child_of(generic.scope);
        for (name, ty) in generic.declaration.generic_parameters.iter().zip(&key.types) {
            if scope.bindings.contains_key(name) {
                return Err(RegistrationError::Redeclaration(name.clone()));
            }
            scope.bindings.insert(name.clone(), Declarable::Type(*ty));
        }
        Ok(scope)
    }

    /// Activate a disposable scope binding a generic's parameters to the
    /// key's types. Every scope created inside it is discarded on exit.
    pub fn enter_trial_scope(&mut self, key: &SpecializationKey) -> Result<ScopeActivation> {
        let mark = self.scopes.len();
        let scope = self.binding_scope(key)?;
        let scope = self.push_scope(scope);
        Ok(self.activate(scope, Some(mark)))
    }

    /// Activate the scope of one specialization, binding the generic's
    /// parameters to the key's types the first time it is entered.
    pub fn enter_generic_scope(&mut self, key: &SpecializationKey) -> Result<ScopeActivation> {
        let scope = match self.generic_scopes.get(key) {
            Some(scope) => *scope,
            None => {
                let scope = self.binding_scope(key)?;
                let scope = self.push_scope(scope);
                self.generic_scopes.insert(key.clone(), scope);
                scope
            }
        };
        let activation = self.activate(scope, None);
        self.current_specialization = Some(key.clone());
        Ok(activation)
    }

    /// Restore the state saved by an activation.
    pub fn exit_scope(&mut self, activation: ScopeActivation) {
        self.current = activation.previous;
        self.current_specialization = activation.previous_specialization;
        if let Some(mark) = activation.truncate_to {
            self.scopes.truncate(mark);
            self.node_scopes.retain(|_, scope| scope.index() < mark);
            self.generic_scopes.retain(|_, scope| scope.index() < mark);
        }
    }

    // ==========================================================================
    // Access
    //
    // Ids are only ever issued by this store and entity arenas are never
    // truncated, so indexing by a store-issued id cannot fail.
    // ==========================================================================

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    /// The scope a syntax node owns under a specialization, if it was entered.
    pub fn node_scope(
        &self,
        node: NodeId,
        specialization: Option<&SpecializationKey>,
    ) -> Option<ScopeId> {
        self.node_scopes
            .get(&(node, specialization.cloned()))
            .copied()
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn callable(&self, id: CallableId) -> &Callable {
        &self.callables[id.index()]
    }

    /// All callables in registration order.
    pub fn callables(&self) -> impl Iterator<Item = &Callable> {
        self.callables.iter()
    }

    pub fn callable_count(&self) -> usize {
        self.callables.len()
    }

    /// Local (non-external) builtins in declaration order.
    pub fn builtins(&self) -> impl Iterator<Item = &Callable> {
        self.builtins.iter().map(|id| &self.callables[id.index()])
    }

    pub fn generic(&self, id: GenericId) -> &Generic {
        &self.generics[id.index()]
    }

    pub fn generics(&self) -> impl Iterator<Item = &Generic> {
        self.generics.iter()
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.index()]
    }

    pub fn constant(&self, id: ConstantId) -> &Constant {
        &self.constants[id.index()]
    }

    pub fn label(&self, id: LabelId) -> &Label {
        &self.labels[id.index()]
    }
}

impl Default for Declarations {
    fn default() -> Self {
        Self::new()
    }
}

fn wrong_kind(name: &str, found: &Declarable, expected: &'static str) -> RegistrationError {
    RegistrationError::WrongKind {
        name: name.to_string(),
        found: found.kind_name(),
        expected,
    }
}
