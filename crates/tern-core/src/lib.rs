//! Core types shared by every stage of the tern front end.
//!
//! - [`span`]: source positions used for error attribution
//! - [`ids`]: stable identifiers for syntax nodes and store-owned entities
//! - [`type_hash`]: deterministic type identities
//! - [`types`]: the Type Oracle and well-known types
//! - [`signature`]: resolved callable signatures
//! - [`error`]: store and pass error taxonomy

pub mod error;
pub mod ids;
pub mod signature;
pub mod span;
pub mod type_hash;
pub mod types;

pub use error::{DeclarationError, RegistrationError};
pub use ids::{CallableId, ConstantId, GenericId, LabelId, NodeId, ScopeId, VariableId};
pub use signature::{LabelDeclaration, ParameterTypes, Signature, SignatureDisplay};
pub use span::Span;
pub use type_hash::TypeHash;
pub use types::{TypeEntry, TypeKind, TypeOracle, well_known};
