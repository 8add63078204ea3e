//! Error types for Strata Config resolution.
//!
//! This module defines the error hierarchy used by the resolution
//! engine. All errors implement the standard `std::error::Error`
//! trait via `thiserror`.
//!
//! # Error Handling Philosophy
//!
//! Strata follows Rust's explicit error handling approach:
//! - Functions that can fail return `Result<T, StrataError>`
//! - Errors are values, not control flow
//! - Configuration resolution is not a transient-failure domain, so
//!   nothing is retried; every error surfaces synchronously to the
//!   caller of the triggering operation
//!
//! # Example
//!
//! ```
//! use strata_core::{Result, StrataError};
//!
//! fn activate(profile: &str) -> Result<()> {
//!     if profile.is_empty() {
//!         return Err(StrataError::invalid_state("activator already finalized"));
//!     }
//!     Ok(())
//! }
//!
//! match activate("prod") {
//!     Ok(()) => println!("activated"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Main error type for resolution operations.
///
/// Covers the failures that can occur after documents are parsed:
/// profile expression evaluation, profile activation, and property
/// lookup (including placeholder resolution).
///
/// # Example
///
/// ```
/// use strata_core::StrataError;
///
/// let error = StrataError::expression_syntax("a & b | c", "mixed '&' and '|' without parentheses");
/// assert!(error.is_expression_syntax());
/// ```
#[derive(Debug, Error)]
pub enum StrataError {
    /// A profile expression could not be parsed.
    #[error("invalid profile expression '{expression}': {reason}")]
    ExpressionSyntax {
        /// The offending expression text
        expression: String,
        /// Why it was rejected
        reason: String,
    },

    /// A `${...}` placeholder referenced a key with no value and no default.
    #[error("could not resolve placeholder '${{{placeholder}}}' in value of key '{key}'")]
    UnresolvedPlaceholder {
        /// The placeholder key that failed to resolve
        placeholder: String,
        /// The property key whose value contained the placeholder
        key: String,
    },

    /// Placeholder resolution looped back to a key already being resolved.
    #[error("circular placeholder reference for key '{key}' (chain: {chain})")]
    CircularReference {
        /// The key at which the cycle was detected
        key: String,
        /// The resolution chain leading to the cycle, `->` separated
        chain: String,
    },

    /// An operation was invoked in a state that forbids it.
    ///
    /// Indicates a defect in the caller (e.g. requesting profile
    /// activation after the active set was finalized), not a
    /// recoverable condition.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Generic internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StrataError {
    /// Creates an ExpressionSyntax error.
    pub fn expression_syntax(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExpressionSyntax {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Creates an UnresolvedPlaceholder error.
    pub fn unresolved_placeholder(placeholder: impl Into<String>, key: impl Into<String>) -> Self {
        Self::UnresolvedPlaceholder {
            placeholder: placeholder.into(),
            key: key.into(),
        }
    }

    /// Creates a CircularReference error from the chain of keys that
    /// were being resolved when the cycle closed.
    pub fn circular_reference(key: impl Into<String>, chain: &[String]) -> Self {
        Self::CircularReference {
            key: key.into(),
            chain: chain.join(" -> "),
        }
    }

    /// Creates an InvalidState error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this is an expression syntax error.
    pub fn is_expression_syntax(&self) -> bool {
        matches!(self, Self::ExpressionSyntax { .. })
    }

    /// Returns true if this is an unresolved placeholder error.
    pub fn is_unresolved_placeholder(&self) -> bool {
        matches!(self, Self::UnresolvedPlaceholder { .. })
    }

    /// Returns true if this is a circular reference error.
    pub fn is_circular_reference(&self) -> bool {
        matches!(self, Self::CircularReference { .. })
    }

    /// Returns true if this error indicates a caller defect.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}

/// Type alias for Results with StrataError.
pub type Result<T> = std::result::Result<T, StrataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_syntax_display() {
        let error = StrataError::expression_syntax("a & b | c", "mixed operators");
        let msg = format!("{}", error);

        assert!(msg.contains("a & b | c"));
        assert!(msg.contains("mixed operators"));
    }

    #[test]
    fn test_unresolved_placeholder_display() {
        let error = StrataError::unresolved_placeholder("db.url", "app.datasource");
        let msg = format!("{}", error);

        assert!(msg.contains("${db.url}"));
        assert!(msg.contains("app.datasource"));
    }

    #[test]
    fn test_circular_reference_chain() {
        let chain = vec!["a".to_string(), "b".to_string()];
        let error = StrataError::circular_reference("a", &chain);
        let msg = format!("{}", error);

        assert!(msg.contains("a -> b"));
        assert!(error.is_circular_reference());
    }

    #[test]
    fn test_query_methods() {
        assert!(StrataError::invalid_state("finalized").is_invalid_state());
        assert!(!StrataError::internal("boom").is_invalid_state());
        assert!(StrataError::expression_syntax("", "empty").is_expression_syntax());
    }

    #[test]
    fn test_result_with_question_mark() {
        fn inner() -> Result<()> {
            Err(StrataError::internal("test"))
        }

        fn outer() -> Result<String> {
            inner()?;
            Ok("success".into())
        }

        assert!(outer().is_err());
    }
}
