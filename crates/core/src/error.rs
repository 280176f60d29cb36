//! Error types for filter parsing and configuration
//!
//! Every failure the filter engine can report while turning a client filter
//! into a predicate tree is a client input error. Configuration failures are
//! the only internal kind.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

/// Result type alias for filter engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification used by the API layer to pick a response code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The client sent something the engine cannot accept
    InvalidArgument,
    /// The engine itself is misconfigured
    Internal,
}

/// Error types for the filter engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Field is neither in the schema nor resolvable under a known parent
    #[error("querying on non schema field '{field}'")]
    UnknownField {
        /// Field name as it appeared in the filter
        field: String,
    },

    /// JSON value shape not accepted at this position
    #[error("unsupported value: {reason}")]
    UnsupportedValue {
        /// What was wrong with the value
        reason: String,
    },

    /// Unknown key inside a comparison object
    #[error("expression is not supported inside comparison operator {operator}")]
    UnsupportedOperator {
        /// The offending key
        operator: String,
    },

    /// `{"field": {}}`
    #[error("empty comparison object for field '{field}'")]
    EmptyOperator {
        /// Field the empty object was attached to
        field: String,
    },

    /// `$regex`/`$contains`/`$not` used on a field that cannot hold strings
    #[error("field '{field}' of type '{field_type}' is not supported for 'regex/contains/not' filters. Only 'string' or an 'array of string' is supported")]
    PatternOnNonString {
        /// Field name
        field: String,
        /// Declared type name
        field_type: &'static str,
    },

    /// `$collation` object could not be understood
    #[error("invalid collation: {reason}")]
    InvalidCollation {
        /// Why the collation was rejected
        reason: String,
    },

    /// Case-insensitive collation requested while building for a secondary index
    #[error("found case insensitive collation")]
    CaseInsensitiveForbidden,

    /// `$regex` pattern did not compile
    #[error("invalid regex '{pattern}': {reason}")]
    InvalidRegex {
        /// Pattern as supplied
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// Literal could not be represented under the field's type
    #[error("invalid value for type '{field_type}': {reason}")]
    InvalidValue {
        /// Target type name
        field_type: &'static str,
        /// Why the conversion failed
        reason: String,
    },

    /// Filter bytes are not a well-formed filter document
    #[error("malformed filter: {reason}")]
    MalformedFilter {
        /// Parser message
        reason: String,
    },

    /// `$and`/`$or` nesting exceeds the configured depth
    #[error("filter nesting depth {depth} exceeds maximum of {max}")]
    NestingTooDeep {
        /// Depth reached
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// Configuration could not be read or parsed
    #[error("configuration error: {reason}")]
    Config {
        /// Underlying cause
        reason: String,
    },
}

impl Error {
    /// Classify this error for the API layer
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. } => ErrorKind::Internal,
            Error::UnknownField { .. }
            | Error::UnsupportedValue { .. }
            | Error::UnsupportedOperator { .. }
            | Error::EmptyOperator { .. }
            | Error::PatternOnNonString { .. }
            | Error::InvalidCollation { .. }
            | Error::CaseInsensitiveForbidden
            | Error::InvalidRegex { .. }
            | Error::InvalidValue { .. }
            | Error::MalformedFilter { .. }
            | Error::NestingTooDeep { .. } => ErrorKind::InvalidArgument,
        }
    }

    /// Shorthand for `kind() == ErrorKind::InvalidArgument`
    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    /// Build an `UnsupportedValue` error
    pub fn unsupported_value(reason: impl Into<String>) -> Self {
        Error::UnsupportedValue {
            reason: reason.into(),
        }
    }

    /// Build a `MalformedFilter` error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedFilter {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::malformed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_unknown_field() {
        let err = Error::UnknownField {
            field: "a.b".to_string(),
        };
        assert_eq!(err.to_string(), "querying on non schema field 'a.b'");
    }

    #[test]
    fn test_error_display_pattern_on_non_string() {
        let err = Error::PatternOnNonString {
            field: "price".to_string(),
            field_type: "double",
        };
        let msg = err.to_string();
        assert!(msg.contains("price"));
        assert!(msg.contains("double"));
    }

    #[test]
    fn test_error_display_nesting() {
        let err = Error::NestingTooDeep { depth: 33, max: 32 };
        let msg = err.to_string();
        assert!(msg.contains("33"));
        assert!(msg.contains("32"));
    }

    #[test]
    fn test_parse_errors_are_invalid_argument() {
        let errors = vec![
            Error::UnknownField { field: "x".into() },
            Error::unsupported_value("object"),
            Error::UnsupportedOperator {
                operator: "$in".into(),
            },
            Error::EmptyOperator { field: "x".into() },
            Error::CaseInsensitiveForbidden,
            Error::InvalidRegex {
                pattern: "(".into(),
                reason: "unclosed group".into(),
            },
            Error::malformed("not an object"),
            Error::NestingTooDeep { depth: 2, max: 1 },
        ];
        for err in errors {
            assert!(err.is_invalid_argument(), "{err} should be invalid argument");
        }
    }

    #[test]
    fn test_config_error_is_internal() {
        let err = Error::Config {
            reason: "unreadable".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(!err.is_invalid_argument());
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::MalformedFilter { .. }));
    }
}
