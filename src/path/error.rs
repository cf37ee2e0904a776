//! Error types for path resolution and handle operations.

use thiserror::Error;

/// Errors raised while resolving a path or operating on the selected value.
///
/// A missing map key is never an error: navigation reports it as absence and
/// `get` turns it into the caller's default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path tried to descend into, or enumerate, a leaf.
    #[error("cannot descend into {found} at segment '{segment}'")]
    StructuralMismatch { segment: String, found: &'static str },
    /// A sequence was addressed with a segment that is not an integer.
    #[error("'{segment}' is not a valid sequence index")]
    NotAnIndex { segment: String },
    /// A sequence was addressed past its bounds.
    #[error("index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: i64, len: usize },
    /// The operation needs a different kind of value at the current position.
    #[error("{operation} requires {expected}, found {found}")]
    TypeMismatch {
        operation: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    /// Malformed input handed to a constructor or option parser.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl PathError {
    pub(crate) fn type_mismatch(
        operation: &'static str,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        PathError::TypeMismatch {
            operation,
            expected,
            found,
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        PathError::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, PathError>;
