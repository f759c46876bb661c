//! Document snapshots for post-mutation verification
//!
//! A snapshot captures the state of a chosen set of documents before a test
//! suite mutates them. Verification later rebuilds the expected state from
//! the captured documents plus the declared changes.
//!
//! Snapshots are immutable once captured and shared through `Arc`, so a
//! verification in progress is unaffected by a concurrent `remove`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use dashmap::DashMap;
use replikit_core::Value;
use tracing::info;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::key::DocumentKey;
use crate::memory::DocumentStore;

/// Unique identifier of a captured snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotId(Uuid);

impl SnapshotId {
    /// Generate a new random id
    pub fn new() -> Self {
        SnapshotId(Uuid::new_v4())
    }
}

impl Default for SnapshotId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SnapshotId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(SnapshotId)
            .map_err(|_| StoreError::SnapshotNotFound(s.to_string()))
    }
}

/// Captured state of a set of documents
///
/// Each captured key maps to `Some(doc)` if the document existed at capture
/// time and `None` if it did not.
#[derive(Debug, Clone)]
pub struct Snapshot {
    id: SnapshotId,
    version: u64,
    documents: BTreeMap<DocumentKey, Option<Value>>,
}

impl Snapshot {
    /// Get the snapshot id
    pub fn id(&self) -> SnapshotId {
        self.id
    }

    /// Store version the snapshot was taken at
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Look up a captured document
    ///
    /// # Returns
    ///
    /// * `Ok(Some(doc))` - The document existed at capture time
    /// * `Ok(None)` - The document was captured as absent
    /// * `Err(NotInSnapshot)` - The key was never captured
    pub fn document(&self, key: &DocumentKey) -> Result<Option<&Value>> {
        self.documents
            .get(key)
            .map(Option::as_ref)
            .ok_or_else(|| StoreError::NotInSnapshot {
                snapshot: self.id.to_string(),
                key: key.clone(),
            })
    }

    /// Check if `key` was captured
    pub fn contains(&self, key: &DocumentKey) -> bool {
        self.documents.contains_key(key)
    }

    /// Iterate over captured keys and states in key order
    pub fn iter(&self) -> impl Iterator<Item = (&DocumentKey, Option<&Value>)> {
        self.documents.iter().map(|(k, v)| (k, v.as_ref()))
    }

    /// Number of captured keys
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if nothing was captured
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Registry of captured snapshots
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshots: DashMap<SnapshotId, Arc<Snapshot>>,
}

impl SnapshotStore {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current state of `keys` from `store`
    ///
    /// Duplicate keys are captured once. All keys are read from one
    /// consistent state of the store.
    pub fn capture<S>(&self, store: &S, keys: &[DocumentKey]) -> Result<SnapshotId>
    where
        S: DocumentStore + ?Sized,
    {
        let version = store.version();
        let docs = store.get_many(keys)?;
        let documents: BTreeMap<_, _> = keys.iter().cloned().zip(docs).collect();
        let id = SnapshotId::new();
        let snapshot = Snapshot {
            id,
            version,
            documents,
        };
        info!(snapshot = %id, documents = snapshot.len(), version, "captured snapshot");
        self.snapshots.insert(id, Arc::new(snapshot));
        Ok(id)
    }

    /// Get a snapshot by id
    pub fn get(&self, id: &SnapshotId) -> Result<Arc<Snapshot>> {
        self.snapshots
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| StoreError::SnapshotNotFound(id.to_string()))
    }

    /// Drop a snapshot; returns whether it existed
    pub fn remove(&self, id: &SnapshotId) -> bool {
        self.snapshots.remove(id).is_some()
    }

    /// Number of live snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if no snapshots are held
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
