//! Vigil Constraint Validation
//!
//! Walks a value against a compiled schema, running every field and class
//! constraint in dependency order:
//! - asserts abort validation with a `ValidationError`
//! - checks are recorded next to the value they apply to, in a `Validated`
//!   tree that mirrors the input

mod checks;
mod config;
mod error;
mod path;
mod validated;
mod validator;

pub use checks::{CheckResult, Checks};
pub use config::{ConfigError, ValidatorConfig};
pub use error::{ValidationError, ValidationResult};
pub use path::{FieldPath, PathSegment};
pub use validated::Validated;
pub use validator::{Outcome, Validator};
