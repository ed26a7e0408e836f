//! The Type Oracle: catalogue of known types and well-known type lookups.
//!
//! Types are identified by [`TypeHash`] and compared by identity. The oracle
//! starts out knowing the intrinsic types every declaration pass relies on
//! (see [`well_known`]); type declarations in source add abstract types.

use rustc_hash::FxHashMap;

use crate::{RegistrationError, TypeHash};

/// Names of the intrinsic types the declaration pass checks against.
pub mod well_known {
    /// The empty return type.
    pub const VOID: &str = "void";
    /// The return type of callables that never return.
    pub const NEVER: &str = "never";
    /// The execution-context type every builtin and runtime function receives first.
    pub const CONTEXT: &str = "Context";
    /// The receiver type of JavaScript-linkage builtins.
    pub const OBJECT: &str = "Object";
    /// The reserved collection type bound to a builtin's rest parameters.
    pub const ARGUMENTS: &str = "Arguments";
}

/// What kind of type an entry describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// `void`
    Void,
    /// `never`
    Never,
    /// The reserved arguments-collection type.
    Arguments,
    /// A declared abstract type with an optional parent and the backend type it generates.
    Abstract {
        parent: Option<TypeHash>,
        generates: String,
    },
}

/// A type known to the oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntry {
    pub name: String,
    pub hash: TypeHash,
    pub kind: TypeKind,
}

/// Catalogue of all types seen by the pass.
#[derive(Debug, Clone)]
pub struct TypeOracle {
    types: FxHashMap<TypeHash, TypeEntry>,
    /// Declaration order, for deterministic iteration.
    order: Vec<TypeHash>,
}

impl TypeOracle {
    /// Create an oracle that knows the intrinsic types.
    pub fn new() -> Self {
        let mut oracle = Self {
            types: FxHashMap::default(),
            order: Vec::new(),
        };
        oracle.insert(well_known::VOID, TypeKind::Void);
        oracle.insert(well_known::NEVER, TypeKind::Never);
        oracle.insert(well_known::ARGUMENTS, TypeKind::Arguments);
        oracle.insert(
            well_known::OBJECT,
            TypeKind::Abstract {
                parent: None,
                generates: "TNode<Object>".to_string(),
            },
        );
        oracle.insert(
            well_known::CONTEXT,
            TypeKind::Abstract {
                parent: Some(TypeHash::from_name(well_known::OBJECT)),
                generates: "TNode<Context>".to_string(),
            },
        );
        oracle
    }

    fn insert(&mut self, name: &str, kind: TypeKind) -> TypeHash {
        let hash = TypeHash::from_name(name);
        self.types.insert(
            hash,
            TypeEntry {
                name: name.to_string(),
                hash,
                kind,
            },
        );
        self.order.push(hash);
        hash
    }

    /// Declare a new abstract type.
    pub fn declare_abstract_type(
        &mut self,
        name: &str,
        parent: Option<TypeHash>,
        generates: impl Into<String>,
    ) -> Result<TypeHash, RegistrationError> {
        if self.types.contains_key(&TypeHash::from_name(name)) {
            return Err(RegistrationError::DuplicateType(name.to_string()));
        }
        Ok(self.insert(
            name,
            TypeKind::Abstract {
                parent,
                generates: generates.into(),
            },
        ))
    }

    /// Look up a type entry.
    pub fn get(&self, hash: TypeHash) -> Option<&TypeEntry> {
        self.types.get(&hash)
    }

    /// Whether the oracle knows this type.
    pub fn contains(&self, hash: TypeHash) -> bool {
        self.types.contains_key(&hash)
    }

    /// The display name of a type, or `<unknown>` for foreign hashes.
    pub fn type_name(&self, hash: TypeHash) -> &str {
        self.types
            .get(&hash)
            .map(|entry| entry.name.as_str())
            .unwrap_or("<unknown>")
    }

    /// Names of a type vector, in order.
    pub fn type_names(&self, types: &[TypeHash]) -> Vec<String> {
        types.iter().map(|t| self.type_name(*t).to_string()).collect()
    }

    /// Iterate over all types in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeEntry> {
        self.order.iter().filter_map(|hash| self.types.get(hash))
    }

    // ==========================================================================
    // Well-known types
    // ==========================================================================

    pub fn void_type(&self) -> TypeHash {
        TypeHash::from_name(well_known::VOID)
    }

    pub fn never_type(&self) -> TypeHash {
        TypeHash::from_name(well_known::NEVER)
    }

    pub fn context_type(&self) -> TypeHash {
        TypeHash::from_name(well_known::CONTEXT)
    }

    pub fn object_type(&self) -> TypeHash {
        TypeHash::from_name(well_known::OBJECT)
    }

    pub fn arguments_type(&self) -> TypeHash {
        TypeHash::from_name(well_known::ARGUMENTS)
    }

    /// Whether a callable with this return type produces no value.
    pub fn is_void_or_never(&self, hash: TypeHash) -> bool {
        hash == self.void_type() || hash == self.never_type()
    }
}

impl Default for TypeOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intrinsic_types_are_known() {
        let oracle = TypeOracle::new();
        assert!(oracle.contains(oracle.void_type()));
        assert!(oracle.contains(oracle.context_type()));
        assert!(oracle.contains(oracle.object_type()));
        assert!(oracle.contains(oracle.arguments_type()));
        assert_eq!(oracle.type_name(oracle.context_type()), "Context");
    }

    #[test]
    fn declare_abstract_type() {
        let mut oracle = TypeOracle::new();
        let smi = oracle
            .declare_abstract_type("Smi", Some(oracle.object_type()), "TNode<Smi>")
            .unwrap();
        assert_eq!(smi, TypeHash::from_name("Smi"));
        assert_eq!(oracle.type_name(smi), "Smi");
        match &oracle.get(smi).unwrap().kind {
            TypeKind::Abstract { parent, generates } => {
                assert_eq!(*parent, Some(oracle.object_type()));
                assert_eq!(generates, "TNode<Smi>");
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn duplicate_type_rejected() {
        let mut oracle = TypeOracle::new();
        let result = oracle.declare_abstract_type("Context", None, "TNode<Context>");
        assert_eq!(
            result,
            Err(RegistrationError::DuplicateType("Context".to_string()))
        );
    }

    #[test]
    fn void_and_never_produce_no_value() {
        let oracle = TypeOracle::new();
        assert!(oracle.is_void_or_never(oracle.void_type()));
        assert!(oracle.is_void_or_never(oracle.never_type()));
        assert!(!oracle.is_void_or_never(oracle.object_type()));
    }

    #[test]
    fn unknown_hash_has_placeholder_name() {
        let oracle = TypeOracle::new();
        assert_eq!(oracle.type_name(TypeHash::from_name("Missing")), "<unknown>");
    }
}
