//! Evaluation error types.

use thiserror::Error;

/// Errors that make an expression unevaluable.
///
/// These are distinct from an expression evaluating to `false`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Field access on an object that does not declare the field.
    #[error("unknown field '{field}' on {type_name}")]
    UnknownField { field: String, type_name: String },

    /// Map lookup of an absent key.
    #[error("missing key '{key}'")]
    MissingKey { key: String },

    /// List or string index past either end.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// Operand of the wrong type.
    #[error("type error: {message}")]
    TypeError { message: String },

    /// Call to a function outside the intrinsic library.
    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    /// Wrong number of arguments to an intrinsic.
    #[error("{name} expects {expected} argument(s), got {found}")]
    Arity {
        name: String,
        expected: String,
        found: usize,
    },

    /// Regular expression built at evaluation time failed to compile.
    #[error("invalid regular expression '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    /// Division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The whole expression did not produce a boolean.
    #[error("constraint must evaluate to a boolean, got {found}")]
    NotBoolean { found: String },
}

impl EvalError {
    pub fn unknown_field(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    pub fn index_out_of_range(index: i64, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::TypeError {
            message: message.into(),
        }
    }

    pub fn unknown_function(name: impl Into<String>) -> Self {
        Self::UnknownFunction { name: name.into() }
    }

    pub fn arity(name: impl Into<String>, expected: impl Into<String>, found: usize) -> Self {
        Self::Arity {
            name: name.into(),
            expected: expected.into(),
            found,
        }
    }

    pub fn invalid_regex(pattern: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidRegex {
            pattern: pattern.into(),
            reason: reason.to_string(),
        }
    }

    pub fn not_boolean(found: impl Into<String>) -> Self {
        Self::NotBoolean {
            found: found.into(),
        }
    }
}

/// Result type for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;
