//! replikit - document value-tree engine for replication test servers
//!
//! Documents are JSON-like value trees addressed by key paths such as
//! `$.addresses[0].city`. Test suites describe changes as deltas of updated
//! properties, removed properties and blob attachments; the server applies
//! them, snapshots documents before replication and verifies the replicated
//! state afterwards.
//!
//! # Quick Start
//!
//! ```ignore
//! use replikit::{DatabaseUpdateItem, TestDatabase, WireDelta};
//!
//! let db = TestDatabase::default();
//! let key = db.default_key("doc1");
//! let snapshot = db.snapshot_documents(&[key])?;
//!
//! let delta: WireDelta = serde_json::from_value(serde_json::json!({
//!     "updatedProperties": [{"$.name": "Alice"}]
//! }))?;
//! let changes = vec![DatabaseUpdateItem::update("_default._default", "doc1", delta)];
//! db.update_database(&changes)?;
//!
//! assert!(db.verify_documents(&snapshot, &changes)?.result);
//! ```
//!
//! # Architecture
//!
//! - `replikit-core`: key paths, value trees, mutation and comparison
//! - `replikit-store`: documents, snapshots and blobs
//! - `replikit-engine`: request flows, configuration and logging

pub use replikit_engine::*;

pub use replikit_core::{
    from_wire, to_wire, BlobRef, BlobResolver, BlobValidator, Mismatch, MismatchReason,
};
pub use replikit_store::{BlobStore, DatasetBlobResolver};
