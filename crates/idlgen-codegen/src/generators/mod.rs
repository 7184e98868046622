//! Built-in code generation backends
//!
//! Each backend implements [`crate::generator::CodeGenerator`] and is
//! registered by name in [`crate::registry`].

pub mod java;
pub mod json;

pub use java::JavaGenerator;
pub use json::JsonGenerator;
