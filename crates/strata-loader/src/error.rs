//! Error types for configuration loading.

use strata_core::StrataError;

/// Errors that can occur while locating and parsing configuration
/// documents.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A document could not be parsed.
    #[error("parse error in {source_name}: {reason}")]
    Parse {
        /// Identifier of the document that failed (file path or name).
        source_name: String,
        /// 0-based line of the failure, when the parser knows it.
        line: Option<usize>,
        /// 0-based column of the failure, when the parser knows it.
        column: Option<usize>,
        /// Description of the failure.
        reason: String,
    },

    /// An explicitly configured location has no registered parser for
    /// its extension.
    #[error("unsupported format for location '{location}': no parser registered for extension '{extension}'")]
    UnsupportedFormat {
        /// The configured location string.
        location: String,
        /// The unrecognized extension.
        extension: String,
    },

    /// A required location does not exist.
    #[error("location not found: {location}")]
    LocationNotFound {
        /// The configured location string.
        location: String,
    },

    /// An I/O error occurred while reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A resolution-layer error (profile expression, activation state).
    #[error(transparent)]
    Core(#[from] StrataError),
}

impl LoadError {
    /// Creates a parse error without position information.
    pub fn parse(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            line: None,
            column: None,
            reason: reason.into(),
        }
    }

    /// Creates a parse error carrying the 0-based failure position.
    pub fn parse_at(
        source_name: impl Into<String>,
        line: usize,
        column: usize,
        reason: impl Into<String>,
    ) -> Self {
        let reason = reason.into();
        Self::Parse {
            source_name: source_name.into(),
            line: Some(line),
            column: Some(column),
            reason: format!("line {}, column {}: {}", line, column, reason),
        }
    }

    /// Creates an unsupported format error.
    pub fn unsupported_format(location: impl Into<String>, extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            location: location.into(),
            extension: extension.into(),
        }
    }

    /// Creates a location not found error.
    pub fn location_not_found(location: impl Into<String>) -> Self {
        Self::LocationNotFound {
            location: location.into(),
        }
    }

    /// Returns true if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Returns true if this is an unsupported format error.
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. })
    }

    /// Returns true if this is a location not found error.
    pub fn is_location_not_found(&self) -> bool {
        matches!(self, Self::LocationNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = LoadError::parse("application.yml", "mapping values are not allowed");
        assert_eq!(
            err.to_string(),
            "parse error in application.yml: mapping values are not allowed"
        );
    }

    #[test]
    fn test_parse_error_with_position() {
        let err = LoadError::parse_at("app.yml", 3, 7, "unexpected character");
        let msg = err.to_string();

        assert!(msg.contains("app.yml"));
        assert!(msg.contains("line 3"));
        assert!(msg.contains("column 7"));
        assert!(err.is_parse());
    }

    #[test]
    fn test_unsupported_format_display() {
        let err = LoadError::unsupported_format("config/app.unknown", "unknown");
        let msg = err.to_string();

        assert!(msg.contains("config/app.unknown"));
        assert!(msg.contains("'unknown'"));
        assert!(err.is_unsupported_format());
    }

    #[test]
    fn test_core_error_conversion() {
        let core = StrataError::expression_syntax("a & b | c", "mixed operators");
        let err: LoadError = core.into();

        assert!(matches!(err, LoadError::Core(_)));
        assert!(err.to_string().contains("a & b | c"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: LoadError = io.into();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
