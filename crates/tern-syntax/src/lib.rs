//! Syntax tree consumed by the tern declaration pass.
//!
//! - [`ast`]: the four closed node families and their payloads
//! - [`builder`]: programmatic tree construction with unique node ids

pub mod ast;
pub mod builder;

pub use ast::*;
pub use builder::{AstBuilder, SignatureBuilder};
