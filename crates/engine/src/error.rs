//! Error types for request handling

use replikit_core::{BlobError, Error as CoreError};
use replikit_store::StoreError;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Error type for request handling
///
/// A failed verification is not an error; it is reported through
/// `VerifyResponse`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request is malformed
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Value-tree engine failure
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Document, snapshot or blob store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration could not be read, parsed or written
    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Create a bad request error
    pub fn bad_request(msg: impl Into<String>) -> Self {
        EngineError::BadRequest(msg.into())
    }

    /// Check if the caller is at fault
    ///
    /// Path syntax errors, type mismatches, unsupported values and missing
    /// snapshots all stem from the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        match self {
            EngineError::BadRequest(_) => true,
            EngineError::Core(e) => !matches!(e, CoreError::Blob(BlobError::Load { .. })),
            EngineError::Store(e) => matches!(
                e,
                StoreError::CollectionNotFound(_)
                    | StoreError::SnapshotNotFound(_)
                    | StoreError::NotInSnapshot { .. }
                    | StoreError::Blob(BlobError::NotFound(_))
            ),
            EngineError::Config(_) => false,
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::BadRequest(e.to_string())
    }
}
