//! Stable identifiers for syntax nodes and store-owned entities.
//!
//! The symbol store owns every callable, generic, variable, constant, label
//! and scope in arenas; everything else refers to them through these
//! copyable indices. Syntax nodes that act as keys (callables, loops,
//! try blocks, blocks, modules) carry a [`NodeId`].

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// Create an id with the given index.
            #[inline]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Create an id from an arena position.
            #[inline]
            pub fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            /// The arena position this id refers to.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(index: u32) -> Self {
                Self::new(index)
            }
        }
    };
}

define_id!(
    /// Identifies a syntax node that the pass keys state on.
    NodeId,
    "node_"
);
define_id!(
    /// Identifies a lexical scope in the symbol store.
    ScopeId,
    "scope_"
);
define_id!(
    /// Identifies a registered builtin, macro or runtime function.
    CallableId,
    "callable_"
);
define_id!(
    /// Identifies a generic declaration.
    GenericId,
    "generic_"
);
define_id!(
    /// Identifies a declared variable or parameter.
    VariableId,
    "var_"
);
define_id!(
    /// Identifies a declared constant.
    ConstantId,
    "const_"
);
define_id!(
    /// Identifies a declared label.
    LabelId,
    "label_"
);
