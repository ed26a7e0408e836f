//! Semantic callable signatures.
//!
//! A [`Signature`] is the fully resolved form of a syntactic callable
//! signature: every type reference has been looked up, so it contains no
//! unbound generic parameter names.

use std::fmt;

use crate::{TypeHash, TypeOracle};

/// Ordered parameter types plus the rest-parameter flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterTypes {
    pub types: Vec<TypeHash>,
    /// Whether the parameter list ends in `...`.
    pub var_args: bool,
}

/// A label a callable may transfer control to, with its parameter types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDeclaration {
    pub name: String,
    pub types: Vec<TypeHash>,
}

/// A resolved callable signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Parameter names, positionally matching `parameter_types.types`.
    pub parameter_names: Vec<String>,
    pub parameter_types: ParameterTypes,
    /// Number of leading implicit parameters.
    pub implicit_count: usize,
    pub return_type: TypeHash,
    pub labels: Vec<LabelDeclaration>,
}

impl Signature {
    /// All parameter types, implicit ones included.
    pub fn types(&self) -> &[TypeHash] {
        &self.parameter_types.types
    }

    pub fn has_var_args(&self) -> bool {
        self.parameter_types.var_args
    }

    /// Structural equality over everything that identifies a specialization:
    /// parameter types, the varargs flag, the return type and every label's
    /// parameter types. Names are ignored.
    pub fn has_same_types_as(&self, other: &Signature) -> bool {
        if self.parameter_types != other.parameter_types || self.return_type != other.return_type
        {
            return false;
        }
        self.labels.len() == other.labels.len()
            && self
                .labels
                .iter()
                .zip(&other.labels)
                .all(|(a, b)| a.types == b.types)
    }

    /// Render the signature with type names, e.g. `(Context, Smi) -> Smi`.
    pub fn display<'a>(&'a self, oracle: &'a TypeOracle) -> SignatureDisplay<'a> {
        SignatureDisplay {
            signature: self,
            oracle,
        }
    }
}

/// Helper returned by [`Signature::display`].
pub struct SignatureDisplay<'a> {
    signature: &'a Signature,
    oracle: &'a TypeOracle,
}

impl fmt::Display for SignatureDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sig = self.signature;
        let mut params = self.oracle.type_names(sig.types());
        if sig.has_var_args() {
            params.push("...".to_string());
        }
        write!(
            f,
            "({}) -> {}",
            params.join(", "),
            self.oracle.type_name(sig.return_type)
        )?;
        if !sig.labels.is_empty() {
            let labels: Vec<String> = sig
                .labels
                .iter()
                .map(|label| {
                    if label.types.is_empty() {
                        label.name.clone()
                    } else {
                        format!(
                            "{}({})",
                            label.name,
                            self.oracle.type_names(&label.types).join(", ")
                        )
                    }
                })
                .collect();
            write!(f, " labels {}", labels.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature(types: &[&str], ret: &str) -> Signature {
        Signature {
            parameter_names: (0..types.len()).map(|i| format!("p{}", i)).collect(),
            parameter_types: ParameterTypes {
                types: types.iter().map(|t| TypeHash::from_name(t)).collect(),
                var_args: false,
            },
            implicit_count: 0,
            return_type: TypeHash::from_name(ret),
            labels: Vec::new(),
        }
    }

    #[test]
    fn same_types_ignores_names() {
        let a = signature(&["Context", "Smi"], "Smi");
        let mut b = a.clone();
        b.parameter_names = vec!["context".into(), "value".into()];
        assert!(a.has_same_types_as(&b));
    }

    #[test]
    fn different_return_type_differs() {
        let a = signature(&["Smi"], "Smi");
        let b = signature(&["Smi"], "Object");
        assert!(!a.has_same_types_as(&b));
    }

    #[test]
    fn varargs_flag_participates() {
        let a = signature(&["Context", "Object"], "Object");
        let mut b = a.clone();
        b.parameter_types.var_args = true;
        assert!(!a.has_same_types_as(&b));
    }

    #[test]
    fn label_types_participate() {
        let mut a = signature(&["Smi"], "void");
        let mut b = a.clone();
        a.labels.push(LabelDeclaration {
            name: "Bailout".into(),
            types: vec![TypeHash::from_name("Smi")],
        });
        b.labels.push(LabelDeclaration {
            name: "Other".into(),
            types: vec![TypeHash::from_name("Object")],
        });
        assert!(!a.has_same_types_as(&b));
        b.labels[0].types = vec![TypeHash::from_name("Smi")];
        assert!(a.has_same_types_as(&b));
    }

    #[test]
    fn display_uses_type_names() {
        let mut oracle = TypeOracle::new();
        oracle.declare_abstract_type("Smi", None, "TNode<Smi>").unwrap();
        let sig = signature(&["Context", "Smi"], "Smi");
        assert_eq!(sig.display(&oracle).to_string(), "(Context, Smi) -> Smi");
    }
}
