//! Vigil Core Types
//!
//! This crate provides the foundational types used throughout the Vigil system:
//! - Value types (the Value enum with scalar, collection and object values)
//! - Objects (typed instances of a class with ordered fields)
//! - Declared field types (FieldType) and runtime type tags (TypeTag)

mod object;
mod types;
mod value;

pub use object::*;
pub use types::*;
pub use value::*;
