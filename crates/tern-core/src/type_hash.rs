//! Deterministic hash-based type identity.
//!
//! This module provides [`TypeHash`], a 64-bit hash that uniquely identifies a
//! type by name. Hashes are computed deterministically, so the same type name
//! always produces the same identity:
//!
//! - Forward references (hash computed before the type is declared)
//! - Well-known types comparable without a store round-trip
//! - Type vectors usable directly as specialization keys
//!
//! # Examples
//!
//! ```
//! use tern_core::TypeHash;
//!
//! let smi = TypeHash::from_name("Smi");
//! assert_eq!(smi, TypeHash::from_name("Smi"));
//! assert_ne!(smi, TypeHash::from_name("HeapObject"));
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Domain marker for type hashes
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;
}

/// A deterministic 64-bit hash identifying a type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
