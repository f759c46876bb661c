//! Error types for the document and snapshot stores

use crate::key::DocumentKey;
use replikit_core::BlobError;
use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Error type for store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Collection was never created
    #[error("collection '{0}' not found")]
    CollectionNotFound(String),

    /// No snapshot with this id exists
    #[error("snapshot '{0}' not found")]
    SnapshotNotFound(String),

    /// The document was not captured by the snapshot
    #[error("document '{key}' is not in snapshot '{snapshot}'")]
    NotInSnapshot {
        /// Snapshot id
        snapshot: String,
        /// Document that was looked up
        key: DocumentKey,
    },

    /// Operation on a transaction that already committed or rolled back
    #[error("transaction is closed")]
    TransactionClosed,

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Blob could not be resolved
    #[error(transparent)]
    Blob(#[from] BlobError),
}
