//! Scenario errors.

use thiserror::Error;
use vigil_registry::SchemaError;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario '{0}' has no schema")]
    MissingSchema(String),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("step '{step}' failed: {message}")]
    AssertionFailed { step: String, message: String },
}

impl ScenarioError {
    pub fn assertion_failed(step: impl Into<String>, message: impl Into<String>) -> Self {
        ScenarioError::AssertionFailed {
            step: step.into(),
            message: message.into(),
        }
    }
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;
