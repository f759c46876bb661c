//! Document, snapshot and blob stores for replikit
//!
//! This crate implements the collaborators the value-tree engine works
//! against:
//! - MemoryStore: transactional in-memory document store
//! - SnapshotStore: immutable pre-mutation captures of documents
//! - BlobStore: content-addressed blob bytes, also the blob validator
//! - DatasetBlobResolver: loads named blobs from a dataset directory

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod blob;
pub mod error;
pub mod key;
pub mod memory;
pub mod snapshot;

pub use blob::{content_type_for, digest_of, BlobStore, DatasetBlobResolver};
pub use error::{Result, StoreError};
pub use key::DocumentKey;
pub use memory::{DocumentStore, MemoryStore, Transaction};
pub use snapshot::{Snapshot, SnapshotId, SnapshotStore};
