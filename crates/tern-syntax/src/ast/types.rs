//! Syntactic type references and callable signatures.

use tern_core::Span;

/// A reference to a type by name, resolved against the current scope.
///
/// Example: `Smi`, `T` (a generic parameter), `constexpr int31`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    /// Type name as written
    pub name: String,
    /// Source location
    pub span: Span,
}

impl TypeExpr {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            span: Span::default(),
        }
    }
}

/// A parameter list as written in a signature or label block.
///
/// Example: `(implicit context: Context)(receiver: Object, ...arguments)`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterList {
    /// Parameter names, empty for unnamed parameters
    pub names: Vec<String>,
    /// Parameter types, positionally matching `names`
    pub types: Vec<TypeExpr>,
    /// Number of leading implicit parameters
    pub implicit_count: usize,
    /// Whether the list ends in `...`
    pub has_varargs: bool,
    /// Name bound to the rest parameters, if any
    pub arguments_variable: String,
}

/// A label a callable may transfer control to.
///
/// Example: `labels Bailout(Smi)`
#[derive(Debug, Clone, PartialEq)]
pub struct LabelAndTypes {
    pub name: String,
    pub types: Vec<TypeExpr>,
}

/// A callable's signature as written.
#[derive(Debug, Clone, PartialEq)]
pub struct CallableSignature {
    pub parameters: ParameterList,
    pub return_type: TypeExpr,
    pub labels: Vec<LabelAndTypes>,
}
