//! Value provenance tracking.
//!
//! Every scalar read from a configuration document carries the source
//! identifier and the 0-based line/column of its start mark, so
//! diagnostics can point at the exact place a value came from.

use crate::value::ConfigValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The source location a configuration value was read from.
///
/// # Example
///
/// ```
/// use strata_core::Origin;
///
/// let origin = Origin::new("config/application.yml", 3, 8);
/// assert_eq!(origin.to_string(), "config/application.yml:3:8");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Origin {
    /// Identifier of the source (file path, URI, or synthetic name).
    pub source: String,
    /// 0-based line of the value's start mark.
    pub line: usize,
    /// 0-based column of the value's start mark.
    pub column: usize,
}

impl Origin {
    /// Creates a new Origin.
    pub fn new(source: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            source: source.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line, self.column)
    }
}

/// A configuration value paired with its origin.
///
/// Origin tracking is done by pairing, never by wrapping parser node
/// types: a value constructed programmatically (defaults, command-line
/// arguments) simply has no origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginTrackedValue {
    /// The value itself.
    pub value: ConfigValue,
    /// Where the value was read from, if it came from a document.
    pub origin: Option<Origin>,
}

impl OriginTrackedValue {
    /// Creates a tracked value with an origin.
    pub fn new(value: impl Into<ConfigValue>, origin: Origin) -> Self {
        Self {
            value: value.into(),
            origin: Some(origin),
        }
    }

    /// Creates a value with no recorded origin.
    pub fn untracked(value: impl Into<ConfigValue>) -> Self {
        Self {
            value: value.into(),
            origin: None,
        }
    }

    /// Returns the value rendered as a string.
    pub fn render(&self) -> String {
        self.value.render()
    }
}

impl From<ConfigValue> for OriginTrackedValue {
    fn from(value: ConfigValue) -> Self {
        Self::untracked(value)
    }
}
