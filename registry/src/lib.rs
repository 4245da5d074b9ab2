//! Vigil Registry
//!
//! The constraint model: classes, enums, fields and their compiled
//! constraints, built once and read-only afterwards.
//!
//! Responsibilities:
//! - Compile constraint expressions at schema build time
//! - Check type references and union variant bindings
//! - Resolve `block.<name>` dependencies into a per-class evaluation order
//! - Reject dependency cycles before any value is validated

mod builder;
mod error;
mod resolve;
mod schema;
mod types;

pub use builder::{class_tag, ClassBuilder, SchemaBuilder};
pub use error::{SchemaError, SchemaResult};
pub use schema::Schema;
pub use types::{Block, Constraint, ConstraintKind, EnumDef, Field, FieldDef};
pub(crate) use types::ConstraintDef;
