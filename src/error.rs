//! Error types for pgfilter.

use thiserror::Error;

/// The main error type for filter translation.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Writing to the output sink failed.
    #[error("IO error: {0}")]
    Io(#[from] std::fmt::Error),

    /// A literal could not be evaluated to the type the encoder needs.
    #[error("Cannot convert {found} literal to {expected}")]
    Coercion {
        expected: &'static str,
        found: &'static str,
    },

    /// The filter uses a construct this dialect cannot encode.
    #[error("Unsupported filter: {0}")]
    Unsupported(String),

    /// A function was called with too few arguments.
    #[error("Function {function} expects at least {expected} argument(s), got {found}")]
    Arity {
        function: String,
        expected: usize,
        found: usize,
    },

    /// Failure raised while a dialect hook was encoding a node.
    ///
    /// This is the one category that crosses the walker boundary; the
    /// original error stays reachable through `source()`.
    #[error("Translation failed: {0}")]
    Translation(#[source] Box<FilterError>),

    /// Failed to parse a filter expression.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Malformed WKT/EWKT geometry text.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FilterError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create a coercion error.
    pub fn coercion(expected: &'static str, found: &'static str) -> Self {
        Self::Coercion { expected, found }
    }

    /// Wrap an error raised inside a dialect hook. Already wrapped errors are
    /// returned unchanged so nested hooks do not stack wrappers.
    pub fn translation(err: FilterError) -> Self {
        match err {
            err @ FilterError::Translation(_) => err,
            err => FilterError::Translation(Box::new(err)),
        }
    }
}

/// Result type alias for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let err = FilterError::parse(5, "unexpected character");
        assert_eq!(
            err.to_string(),
            "Parse error at position 5: unexpected character"
        );
    }

    #[test]
    fn test_translation_keeps_cause() {
        let err = FilterError::translation(FilterError::Io(std::fmt::Error));
        assert_eq!(err.to_string(), "Translation failed: IO error: an error occurred when formatting an argument");
        let cause = err.source().expect("wrapped cause");
        assert!(cause.to_string().starts_with("IO error"));
    }

    #[test]
    fn test_translation_does_not_nest() {
        let once = FilterError::translation(FilterError::coercion("geometry", "boolean"));
        let twice = FilterError::translation(once);
        match twice {
            FilterError::Translation(inner) => {
                assert!(matches!(*inner, FilterError::Coercion { .. }))
            }
            other => panic!("expected translation error, got {other:?}"),
        }
    }
}
