//! Error types for the timeliness validation library.
//!
//! Errors in this crate are represented by the [`TimelinessError`] enum, built
//! with `thiserror`. Note that none of these errors leave a validation pass:
//! parse and calendar failures become an `invalid_datetime` violation, and
//! operand failures become a `restriction_invalid` violation for the single
//! restriction involved.

use crate::temporal::Kind;
use thiserror::Error;

/// Boxed error returned by host callbacks (computed operands, record lookups).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The main error type for the timeliness library.
#[derive(Error, Debug)]
pub enum TimelinessError {
    /// The raw text matched none of the registered formats for the kind.
    #[error("'{value}' does not match any {kind} format")]
    InvalidFormat {
        /// The kind that was requested
        kind: Kind,
        /// The trimmed input text
        value: String,
    },

    /// The text matched a format but describes an impossible value.
    #[error("{components:?} is not a valid {kind}")]
    InvalidCalendar {
        /// The kind that was requested
        kind: Kind,
        /// The extracted component tuple
        components: [i64; 7],
    },

    /// A restriction operand could not be resolved because the host failed.
    #[error("Restriction '{restriction}' could not be evaluated: {message}")]
    RestrictionEvaluation {
        /// Name of the restriction (`before`, `after`, ...)
        restriction: String,
        /// Detailed error message
        message: String,
        /// Underlying host error
        #[source]
        source: Option<BoxError>,
    },

    /// A format string handed to a registry builder does not compile.
    #[error("Invalid format '{format}': {message}")]
    InvalidFormatSpec {
        /// The offending format string
        format: String,
        /// Why it was rejected
        message: String,
    },

    /// Error related to configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TimelinessError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// A type alias for `Result<T, TimelinessError>`.
pub type Result<T> = std::result::Result<T, TimelinessError>;

impl TimelinessError {
    /// Creates a new restriction evaluation error wrapping a host error.
    pub fn restriction_evaluation_with_source(restriction: impl Into<String>, source: BoxError) -> Self {
        Self::RestrictionEvaluation {
            restriction: restriction.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a new invalid format spec error.
    pub fn invalid_format_spec(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFormatSpec {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Returns true when the error means "not a valid <kind>".
    ///
    /// Both the no-pattern and the impossible-calendar cases are reported to
    /// users identically.
    pub fn is_invalid_value(&self) -> bool {
        matches!(
            self,
            Self::InvalidFormat { .. } | Self::InvalidCalendar { .. }
        )
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<TimelinessError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.with_context(|| msg.to_string())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e.into() {
            TimelinessError::Configuration(inner) => {
                TimelinessError::Configuration(format!("{}: {}", f(), inner))
            }
            TimelinessError::Serialization(inner) => {
                TimelinessError::Serialization(format!("{}: {}", f(), inner))
            }
            other => TimelinessError::Configuration(format!("{}: {}", f(), other)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invalid_format_message() {
        let err = TimelinessError::InvalidFormat {
            kind: Kind::Date,
            value: "tomorrow".to_string(),
        };
        assert_eq!(err.to_string(), "'tomorrow' does not match any date format");
        assert!(err.is_invalid_value());
    }

    #[test]
    fn test_invalid_calendar_is_invalid_value() {
        let err = TimelinessError::InvalidCalendar {
            kind: Kind::DateTime,
            components: [1980, 2, 30, 1, 2, 3, 0],
        };
        assert!(err.is_invalid_value());
        assert!(err.to_string().ends_with("is not a valid datetime"));
    }

    #[test]
    fn test_restriction_evaluation_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::Other, "clock unavailable");
        let err = TimelinessError::restriction_evaluation_with_source("before", Box::new(source));

        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "Restriction 'before' could not be evaluated: clock unavailable"
        );
        assert!(!err.is_invalid_value());
    }

    #[test]
    fn test_serde_json_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: TimelinessError = parse.unwrap_err().into();
        assert!(matches!(err, TimelinessError::Serialization(_)));
    }

    #[test]
    fn test_error_context() {
        fn failing_operation() -> Result<()> {
            Err(TimelinessError::Configuration("unknown kind".to_string()))
        }

        let err = failing_operation()
            .context("While loading options")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: While loading options: unknown kind"
        );
    }
}
