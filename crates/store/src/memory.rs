//! MemoryStore: in-memory transactional document store
//!
//! Documents live in a single `BTreeMap<DocumentKey, Value>` behind a
//! `parking_lot::RwLock`. Transactions buffer their writes and apply them
//! as one batch under the write lock on commit, so readers never observe a
//! partially applied transaction.
//!
//! # Isolation
//!
//! Transactions read their own buffered writes first and fall back to the
//! latest committed state. There is no conflict detection; the last commit
//! wins.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use replikit_core::Value;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::key::DocumentKey;

/// Transactional document store used by the test server
pub trait DocumentStore: Send + Sync {
    /// Get the committed document at `key`
    fn get(&self, key: &DocumentKey) -> Result<Option<Value>>;

    /// Read several documents from one consistent state
    fn get_many(&self, keys: &[DocumentKey]) -> Result<Vec<Option<Value>>>;

    /// List the ids of all documents in a collection, in order
    fn document_ids(&self, collection: &str) -> Result<Vec<String>>;

    /// Current commit version (0 before any commit)
    fn version(&self) -> u64;

    /// Start a new transaction
    fn begin(&self) -> Box<dyn Transaction>;
}

/// Unit of atomic work against a [`DocumentStore`]
///
/// Dropping an open transaction discards its writes.
pub trait Transaction: Send {
    /// Get a document, seeing this transaction's own writes
    fn get(&self, key: &DocumentKey) -> Result<Option<Value>>;

    /// Insert or replace a document
    fn put(&mut self, key: DocumentKey, doc: Value) -> Result<()>;

    /// Delete a document; returns whether it existed
    fn delete(&mut self, key: &DocumentKey) -> Result<bool>;

    /// Apply all buffered writes atomically and return the commit version
    fn commit(&mut self) -> Result<u64>;

    /// Discard all buffered writes
    fn rollback(&mut self);

    /// Check if the transaction can still be used
    fn is_open(&self) -> bool;
}

#[derive(Debug, Default)]
struct Shared {
    collections: RwLock<BTreeSet<String>>,
    data: RwLock<BTreeMap<DocumentKey, Value>>,
    version: AtomicU64,
}

impl Shared {
    fn check_collection(&self, collection: &str) -> Result<()> {
        if self.collections.read().contains(collection) {
            Ok(())
        } else {
            Err(StoreError::CollectionNotFound(collection.to_string()))
        }
    }
}

/// In-memory implementation of [`DocumentStore`]
///
/// Cloning shares the same underlying data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    /// Create an empty store with no collections
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given collections
    pub fn with_collections<I, S>(collections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        for collection in collections {
            store.create_collection(collection);
        }
        store
    }

    /// Create a collection; returns false if it already existed
    pub fn create_collection(&self, name: impl Into<String>) -> bool {
        self.shared.collections.write().insert(name.into())
    }

    /// List collection names
    pub fn collections(&self) -> Vec<String> {
        self.shared.collections.read().iter().cloned().collect()
    }

    /// Number of committed documents across all collections
    pub fn len(&self) -> usize {
        self.shared.data.read().len()
    }

    /// Check if the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.shared.data.read().is_empty()
    }

    /// Run `f` in a transaction, committing on `Ok` and rolling back on `Err`
    pub fn transaction<F, T, E>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut dyn Transaction) -> std::result::Result<T, E>,
        E: From<StoreError>,
    {
        let mut txn = self.begin();
        match f(txn.as_mut()) {
            Ok(value) => {
                txn.commit()?;
                Ok(value)
            }
            Err(e) => {
                txn.rollback();
                Err(e)
            }
        }
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, key: &DocumentKey) -> Result<Option<Value>> {
        self.shared.check_collection(&key.collection)?;
        Ok(self.shared.data.read().get(key).cloned())
    }

    fn get_many(&self, keys: &[DocumentKey]) -> Result<Vec<Option<Value>>> {
        for key in keys {
            self.shared.check_collection(&key.collection)?;
        }
        let data = self.shared.data.read();
        Ok(keys.iter().map(|key| data.get(key).cloned()).collect())
    }

    fn document_ids(&self, collection: &str) -> Result<Vec<String>> {
        self.shared.check_collection(collection)?;
        let data = self.shared.data.read();
        Ok(data
            .range(DocumentKey::collection_start(collection)..)
            .take_while(|(k, _)| k.collection == collection)
            .map(|(k, _)| k.id.clone())
            .collect())
    }

    fn version(&self) -> u64 {
        self.shared.version.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Box<dyn Transaction> {
        Box::new(MemoryTransaction {
            shared: Arc::clone(&self.shared),
            writes: BTreeMap::new(),
            open: true,
        })
    }
}

/// Transaction over a [`MemoryStore`]
///
/// `None` in the write buffer marks a pending delete.
struct MemoryTransaction {
    shared: Arc<Shared>,
    writes: BTreeMap<DocumentKey, Option<Value>>,
    open: bool,
}

impl MemoryTransaction {
    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(StoreError::TransactionClosed)
        }
    }
}

impl Transaction for MemoryTransaction {
    fn get(&self, key: &DocumentKey) -> Result<Option<Value>> {
        self.ensure_open()?;
        self.shared.check_collection(&key.collection)?;
        if let Some(pending) = self.writes.get(key) {
            return Ok(pending.clone());
        }
        Ok(self.shared.data.read().get(key).cloned())
    }

    fn put(&mut self, key: DocumentKey, doc: Value) -> Result<()> {
        self.ensure_open()?;
        self.shared.check_collection(&key.collection)?;
        self.writes.insert(key, Some(doc));
        Ok(())
    }

    fn delete(&mut self, key: &DocumentKey) -> Result<bool> {
        let existed = self.get(key)?.is_some();
        self.writes.insert(key.clone(), None);
        Ok(existed)
    }

    fn commit(&mut self) -> Result<u64> {
        self.ensure_open()?;
        self.open = false;
        let writes = std::mem::take(&mut self.writes);
        let count = writes.len();

        let mut data = self.shared.data.write();
        for (key, doc) in writes {
            match doc {
                Some(doc) => {
                    data.insert(key, doc);
                }
                None => {
                    data.remove(&key);
                }
            }
        }
        let version = self.shared.version.fetch_add(1, Ordering::SeqCst) + 1;
        drop(data);

        debug!(version, writes = count, "committed transaction");
        Ok(version)
    }

    fn rollback(&mut self) {
        if self.open {
            debug!(writes = self.writes.len(), "rolled back transaction");
        }
        self.open = false;
        self.writes.clear();
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
