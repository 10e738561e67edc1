use thiserror::Error;

use crate::value::Value;

/// Errors raised while constructing or executing query functions.
///
/// Construction errors (`UnknownFunction`, `UnknownMethod`,
/// `InvalidArguments`) abort setup of a query. Every other variant is a
/// per-record runtime failure that a `catch` can recover from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No function is registered under this name
    #[error("unrecognised function '{0}'")]
    UnknownFunction(String),

    /// No method is registered under this name
    #[error("unrecognised method '{0}'")]
    UnknownMethod(String),

    /// Arity or argument kinds rejected at construction time
    #[error("{name}: {reason}")]
    InvalidArguments {
        /// Function or method name
        name: String,
        /// What was wrong with the arguments
        reason: String,
    },

    /// Variable lookup failed
    #[error("variable '{0}' undefined")]
    UndefinedVariable(String),

    /// Metadata lookup failed
    #[error("metadata value '{0}' not found")]
    MetadataNotFound(String),

    /// Structured path lookup failed
    #[error("path '{0}' not found")]
    PathNotFound(String),

    /// A value had the wrong type for the operation applied to it
    #[error("expected {expected} value, found {actual}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        actual: String,
    },

    /// Environment variable unset
    #[error("environment variable '{0}' not set")]
    EnvNotFound(String),

    /// Deliberate failure raised by `throw`
    #[error("{0}")]
    Thrown(String),

    /// Named map referenced by `apply` does not exist
    #[error("map '{0}' not found")]
    MapNotFound(String),

    /// Index does not address a record of the batch
    #[error("message index {index} out of bounds for batch of {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: i64,
        /// Batch length
        len: usize,
    },

    /// Record body is not valid JSON
    #[error("failed to parse message as JSON: {0}")]
    Json(String),
}

impl Error {
    /// Create an invalid arguments error
    pub fn invalid_arguments(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidArguments {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a type mismatch error from the value that was found
    pub fn type_mismatch(expected: impl Into<String>, actual: &Value) -> Self {
        Error::TypeMismatch {
            expected: expected.into(),
            actual: actual.type_name().to_string(),
        }
    }

    /// Whether this error can only occur while building a query
    #[must_use]
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            Error::UnknownFunction(_) | Error::UnknownMethod(_) | Error::InvalidArguments { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}
