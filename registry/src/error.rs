//! Schema construction errors.

use thiserror::Error;
use vigil_core::TypeTag;
use vigil_parser::ParseError;

/// Errors raised while building a schema. Never raised during validation.
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// A constraint expression failed to compile.
    #[error("invalid constraint expression on {owner}: {source}")]
    Expression {
        /// `Class.field` or `Class` for block-level constraints.
        owner: String,
        expression: String,
        #[source]
        source: ParseError,
    },

    #[error("Duplicate class name: {0}")]
    DuplicateClass(String),

    #[error("Duplicate enum name: {0}")]
    DuplicateEnum(String),

    #[error("Duplicate field '{field}' in class {class}")]
    DuplicateField { class: String, field: String },

    /// Two checks on one field or class would share a key in the checks map.
    #[error("Duplicate check '{message}' on {owner}")]
    DuplicateCheck { owner: String, message: String },

    #[error("Duplicate variant '{variant}' in enum {name}")]
    DuplicateVariant { name: String, variant: String },

    #[error("Unknown type '{name}' referenced by {class}.{field}")]
    UnknownType {
        class: String,
        field: String,
        name: String,
    },

    /// A constraint on a field with several alternatives must name the one it applies to.
    #[error("constraint '{message}' on union field {class}.{field} needs a variant binding")]
    UnboundUnionConstraint {
        class: String,
        field: String,
        message: String,
    },

    #[error("constraint '{message}' on {class}.{field} is bound to {variant}, which is not a variant of {field_type}")]
    InvalidVariantBinding {
        class: String,
        field: String,
        message: String,
        variant: TypeTag,
        field_type: String,
    },

    #[error("constraint '{message}' on {owner} references unknown field block.{reference}")]
    UnknownFieldReference {
        owner: String,
        message: String,
        reference: String,
    },

    #[error("dependency cycle in {class}: {}", .cycle.join(" -> "))]
    DependencyCycle { class: String, cycle: Vec<String> },
}

impl SchemaError {
    pub fn expression(
        owner: impl Into<String>,
        expression: impl Into<String>,
        source: ParseError,
    ) -> Self {
        Self::Expression {
            owner: owner.into(),
            expression: expression.into(),
            source,
        }
    }

    pub fn unknown_type(
        class: impl Into<String>,
        field: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self::UnknownType {
            class: class.into(),
            field: field.into(),
            name: name.into(),
        }
    }

    pub fn dependency_cycle(class: impl Into<String>, cycle: Vec<String>) -> Self {
        Self::DependencyCycle {
            class: class.into(),
            cycle,
        }
    }
}

/// Result type for schema construction.
pub type SchemaResult<T> = Result<T, SchemaError>;
