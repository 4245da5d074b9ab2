//! Validator configuration.
//!
//! Loaded from TOML or built in code:
//!
//! ```
//! use vigil_constraint::ValidatorConfig;
//!
//! let config = ValidatorConfig::from_toml_str(r#"
//!     max_depth = 32
//!     parallel_batches = true
//! "#).unwrap();
//!
//! assert_eq!(config.max_depth, 32);
//! assert!(config.include_expressions);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for a `Validator`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ValidatorConfig {
    /// Deepest nesting of objects, lists and maps accepted before validation
    /// fails with `DepthExceeded`.
    pub max_depth: usize,

    /// Validate batches on the rayon thread pool.
    pub parallel_batches: bool,

    /// Attach constraint source text to errors and check results.
    pub include_expressions: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_depth: 128,
            parallel_batches: false,
            include_expressions: true,
        }
    }
}

impl ValidatorConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_parallel_batches(mut self, parallel: bool) -> Self {
        self.parallel_batches = parallel;
        self
    }

    pub fn with_include_expressions(mut self, include: bool) -> Self {
        self.include_expressions = include;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        Ok(())
    }
}
