//! TestDatabase: the document database behind the test server
//!
//! Owns the document store, snapshots and blobs, and implements the three
//! request flows replication test suites drive:
//!
//! 1. `update_database`: apply a batch of update items in one transaction
//! 2. `snapshot_documents`: capture documents before replication
//! 3. `verify_documents`: check the database against a snapshot and changes

use std::collections::HashSet;
use std::sync::Arc;

use replikit_core::{to_wire, BlobResolver, NoBlobs, Value, ValueBridge};
use replikit_store::{
    BlobStore, DatasetBlobResolver, DocumentKey, DocumentStore, MemoryStore, SnapshotId,
    SnapshotStore,
};
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::{EngineError, Result};
use crate::update::{DatabaseUpdateItem, UpdateType};
use crate::verify::{self, VerifyResponse};

/// Document database driven by test suite requests
#[derive(Debug)]
pub struct TestDatabase {
    config: ServerConfig,
    bridge: ValueBridge,
    store: MemoryStore,
    snapshots: SnapshotStore,
    blobs: Arc<BlobStore>,
}

impl TestDatabase {
    /// Create an empty database with the configured collections
    pub fn new(config: ServerConfig) -> Self {
        let store = MemoryStore::with_collections(config.all_collections());
        info!(
            collections = ?store.collections(),
            dataset = ?config.dataset_dir,
            "opened test database"
        );
        TestDatabase {
            bridge: ValueBridge::new(config.limits),
            config,
            store,
            snapshots: SnapshotStore::new(),
            blobs: Arc::new(BlobStore::new()),
        }
    }

    /// Get the configuration the database was opened with
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the underlying document store
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Get the blob store holding blobs attached to documents
    pub fn blobs(&self) -> &Arc<BlobStore> {
        &self.blobs
    }

    /// Key of `id` in the default collection
    pub fn default_key(&self, id: impl Into<String>) -> DocumentKey {
        DocumentKey::new(self.config.default_collection.clone(), id)
    }

    /// Apply a batch of update items atomically
    ///
    /// `UPDATE` loads the document (an empty object if absent), applies the
    /// item's delta and stores the result. `DELETE` and `PURGE` remove the
    /// document if present. Any failure rolls back the whole batch, blobs
    /// included: dataset blobs are loaded into a per-batch store and only
    /// become visible once the batch commits.
    ///
    /// Returns the commit version.
    pub fn update_database(&self, items: &[DatabaseUpdateItem]) -> Result<u64> {
        let staged = Arc::new(BlobStore::new());
        let resolver = self.dataset_resolver(Arc::clone(&staged));
        let resolver: &dyn BlobResolver = match &resolver {
            Some(resolver) => resolver,
            None => &NoBlobs,
        };

        let mut txn = self.store.begin();
        for item in items {
            let key = item.key(&self.config.default_collection);
            let outcome = match item.kind {
                UpdateType::Update => txn.get(&key).map_err(EngineError::from).and_then(|doc| {
                    let doc = doc.unwrap_or_else(Value::object);
                    let doc = self.bridge.apply_mutations(doc, &item.delta, resolver)?;
                    txn.put(key.clone(), doc)?;
                    Ok(())
                }),
                UpdateType::Delete | UpdateType::Purge => {
                    txn.delete(&key).map(|_| ()).map_err(EngineError::from)
                }
            };
            if let Err(e) = outcome {
                txn.rollback();
                debug!(document = %key, error = %e, "update batch rolled back");
                return Err(e);
            }
            debug!(document = %key, kind = %item.kind, "staged update item");
        }
        let version = txn.commit()?;
        self.blobs.merge(&staged);
        self.release_unreferenced_blobs()?;
        info!(items = items.len(), version, "applied update batch");
        Ok(version)
    }

    /// Drop blobs no stored document references
    ///
    /// Returns the number of blobs removed.
    pub fn release_unreferenced_blobs(&self) -> Result<usize> {
        if self.blobs.is_empty() {
            return Ok(0);
        }
        let mut referenced = HashSet::new();
        for collection in self.store.collections() {
            for id in self.store.document_ids(&collection)? {
                if let Some(doc) = self.store.get(&DocumentKey::new(collection.as_str(), id))? {
                    collect_blob_digests(&doc, &mut referenced);
                }
            }
        }
        let removed = self.blobs.retain(|digest| referenced.contains(digest));
        if removed > 0 {
            debug!(removed, "released unreferenced blobs");
        }
        Ok(removed)
    }

    /// Capture the current state of `keys` for later verification
    pub fn snapshot_documents(&self, keys: &[DocumentKey]) -> Result<SnapshotId> {
        Ok(self.snapshots.capture(&self.store, keys)?)
    }

    /// Drop a snapshot; returns whether it existed
    pub fn release_snapshot(&self, id: &SnapshotId) -> bool {
        self.snapshots.remove(id)
    }

    /// Verify the database against a snapshot and the changes since
    pub fn verify_documents(
        &self,
        snapshot_id: &SnapshotId,
        changes: &[DatabaseUpdateItem],
    ) -> Result<VerifyResponse> {
        let snapshot = self.snapshots.get(snapshot_id)?;
        // Expected blobs are resolved into a scratch store so they never
        // count as present in the database.
        let scratch = Arc::new(BlobStore::new());
        let resolver = self.dataset_resolver(scratch);
        let resolver: &dyn BlobResolver = match &resolver {
            Some(resolver) => resolver,
            None => &NoBlobs,
        };
        verify::verify_documents(
            &self.store,
            &snapshot,
            changes,
            &self.config.default_collection,
            &self.bridge,
            resolver,
            self.blobs.as_ref(),
        )
    }

    /// Get the wire JSON of a document, if it exists
    pub fn get_document(&self, key: &DocumentKey) -> Result<Option<serde_json::Value>> {
        Ok(self.store.get(key)?.map(|doc| to_wire(&doc)))
    }

    /// Store a wire JSON document, replacing any existing one
    pub fn put_document(&self, key: DocumentKey, doc: &serde_json::Value) -> Result<u64> {
        let doc = self.bridge.decode(doc)?;
        if !doc.is_object() {
            return Err(EngineError::bad_request(format!(
                "document '{}' must be a JSON object, found {}",
                key,
                doc.type_name()
            )));
        }
        let mut txn = self.store.begin();
        txn.put(key, doc)?;
        Ok(txn.commit()?)
    }

    fn dataset_resolver(&self, store: Arc<BlobStore>) -> Option<DatasetBlobResolver> {
        self.config
            .dataset_dir
            .as_ref()
            .map(|dir| DatasetBlobResolver::new(dir.clone(), store))
    }
}

/// Collect the digest of every blob in `value`
fn collect_blob_digests(value: &Value, digests: &mut HashSet<String>) {
    match value {
        Value::Blob(blob) => {
            digests.insert(blob.digest.clone());
        }
        Value::Array(items) => {
            for item in items {
                collect_blob_digests(item, digests);
            }
        }
        Value::Object(obj) => {
            for item in obj.values() {
                collect_blob_digests(item, digests);
            }
        }
        _ => {}
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}
