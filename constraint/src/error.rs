//! Validation errors.

use std::borrow::Cow;

use thiserror::Error;
use vigil_eval::EvalError;

use crate::FieldPath;

/// Why a validation call aborted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("assertion '{message}' failed at {path}")]
    AssertionFailed {
        message: String,
        path: FieldPath,
        expression: Option<String>,
    },

    #[error("constraint '{message}' could not be evaluated at {path}: {source}")]
    Evaluation {
        message: String,
        path: FieldPath,
        expression: Option<String>,
        #[source]
        source: EvalError,
    },

    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: FieldPath,
        expected: String,
        found: String,
    },

    #[error("unknown class: {name}")]
    UnknownClass { name: String },

    #[error("maximum nesting depth {limit} exceeded at {path}")]
    DepthExceeded { path: FieldPath, limit: usize },
}

impl ValidationError {
    pub fn type_mismatch(
        path: &FieldPath,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        ValidationError::TypeMismatch {
            path: path.clone(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unknown_class(name: impl Into<String>) -> Self {
        ValidationError::UnknownClass { name: name.into() }
    }

    /// The declared message of the failing constraint, or the error's
    /// display text for structural failures.
    pub fn message(&self) -> Cow<'_, str> {
        match self {
            ValidationError::AssertionFailed { message, .. }
            | ValidationError::Evaluation { message, .. } => Cow::Borrowed(message),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// Where in the value the failure happened.
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            ValidationError::AssertionFailed { path, .. }
            | ValidationError::Evaluation { path, .. }
            | ValidationError::TypeMismatch { path, .. }
            | ValidationError::DepthExceeded { path, .. } => Some(path),
            ValidationError::UnknownClass { .. } => None,
        }
    }

    /// Source text of the failing constraint, when recorded.
    pub fn expression(&self) -> Option<&str> {
        match self {
            ValidationError::AssertionFailed { expression, .. }
            | ValidationError::Evaluation { expression, .. } => expression.as_deref(),
            _ => None,
        }
    }

    pub fn is_assertion(&self) -> bool {
        matches!(self, ValidationError::AssertionFailed { .. })
    }
}

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;
