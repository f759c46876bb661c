//! Error types for the value-tree engine
//!
//! All engine errors are synchronous and abort the enclosing
//! `apply_mutations` / `compare` call. A structural mismatch found by the
//! comparator is NOT an error; it is reported as a normal result.
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::limits::LimitError;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed key path text
///
/// Carries the raw path text and a human readable reason. No partial
/// parse result is ever returned alongside this error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid key path '{path}': {reason}")]
pub struct KeyPathError {
    /// The path text that failed to parse
    pub path: String,
    /// Why parsing failed
    pub reason: String,
}

impl KeyPathError {
    /// Create a new key path error
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        KeyPathError {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of an external blob collaborator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlobError {
    /// No blob with this name exists in the dataset
    #[error("blob '{0}' not found")]
    NotFound(String),

    /// The blob exists but could not be loaded
    #[error("failed to load blob '{name}': {reason}")]
    Load {
        /// Blob name as given in the request
        name: String,
        /// Underlying failure
        reason: String,
    },
}

/// Error type for the value-tree engine
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Malformed key path text
    #[error(transparent)]
    PathSyntax(#[from] KeyPathError),

    /// A path step traversed a value of the wrong kind
    #[error("type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        /// Path text up to and including the failing step
        path: String,
        /// Container kind the path segment requires
        expected: &'static str,
        /// Kind of the value actually found
        found: &'static str,
    },

    /// An intermediate container is absent and creation was not requested
    #[error("path not found: '{path}'")]
    NotFound {
        /// Path text up to the missing step
        path: String,
    },

    /// A wire value has no tree representation
    #[error("unsupported value type: {0}")]
    UnsupportedValueType(String),

    /// Blob resolver failure
    #[error(transparent)]
    Blob(#[from] BlobError),

    /// A configured limit was exceeded
    #[error(transparent)]
    Limit(#[from] LimitError),
}

impl Error {
    /// Check if this is the internal not-found signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Check if this is a type mismatch
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. })
    }
}
