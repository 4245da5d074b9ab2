//! Parser error types.

use crate::Span;
use thiserror::Error;

/// A parse error with location information.
#[derive(Debug, Clone, Error)]
#[error("parse error at line {}, column {}: {message}", .span.line, .span.column)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub expected: Option<String>,
    pub found: Option<String>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            expected: None,
            found: None,
        }
    }

    pub fn unexpected_token(span: Span, expected: &str, found: &str) -> Self {
        Self {
            message: format!("expected {}, found {}", expected, found),
            span,
            expected: Some(expected.to_string()),
            found: Some(found.to_string()),
        }
    }

    pub fn unknown_name(span: Span, name: &str) -> Self {
        Self {
            message: format!(
                "unknown name '{}': expected this, block, root or a function call",
                name
            ),
            span,
            expected: Some("this, block or root".to_string()),
            found: Some(name.to_string()),
        }
    }

    pub fn unknown_function(span: Span, name: &str) -> Self {
        Self {
            message: format!("unknown function '{}'", name),
            span,
            expected: Some("an intrinsic function".to_string()),
            found: Some(name.to_string()),
        }
    }

    pub fn arity(span: Span, name: &str, expected: impl std::fmt::Display, found: usize) -> Self {
        Self {
            message: format!(
                "function '{}' takes {} argument(s), found {}",
                name, expected, found
            ),
            span,
            expected: Some(expected.to_string()),
            found: Some(found.to_string()),
        }
    }

    pub fn invalid_regex(span: Span, pattern: &str, reason: impl std::fmt::Display) -> Self {
        Self::new(
            format!("invalid regular expression '{}': {}", pattern, reason),
            span,
        )
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.column
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
