//! Blob storage and dataset blob resolution
//!
//! Blob bytes are content addressed: the key of a blob is its digest,
//! `sha256-<base64>` of the content. Value trees only carry [`BlobRef`]
//! metadata; [`BlobStore`] holds the bytes and answers whether a referenced
//! blob is present.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use dashmap::DashMap;
use replikit_core::{BlobError, BlobRef, BlobResolver, BlobValidator};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Subdirectory of a dataset holding blob files
pub const BLOBS_DIR: &str = "blobs";

/// Compute the content digest of `bytes`
pub fn digest_of(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    format!("sha256-{}", BASE64.encode(hash))
}

/// Content type for a blob file name, derived from its extension
pub fn content_type_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => replikit_core::bridge::DEFAULT_CONTENT_TYPE,
    }
}

/// Content-addressed in-memory blob bytes
#[derive(Debug, Default)]
pub struct BlobStore {
    blobs: DashMap<String, Arc<Vec<u8>>>,
}

impl BlobStore {
    /// Create an empty blob store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` and return a reference with the given content type
    ///
    /// Storing identical content twice keeps a single copy.
    pub fn put(&self, content_type: &str, bytes: Vec<u8>) -> BlobRef {
        let digest = digest_of(&bytes);
        let length = bytes.len() as u64;
        self.blobs
            .entry(digest.clone())
            .or_insert_with(|| Arc::new(bytes));
        BlobRef::new(content_type, digest, length)
    }

    /// Get blob bytes by digest
    pub fn get(&self, digest: &str) -> Option<Arc<Vec<u8>>> {
        self.blobs.get(digest).map(|entry| Arc::clone(entry.value()))
    }

    /// Check if a digest is stored
    pub fn contains(&self, digest: &str) -> bool {
        self.blobs.contains_key(digest)
    }

    /// Remove a blob by digest; returns whether it was stored
    pub fn remove(&self, digest: &str) -> bool {
        self.blobs.remove(digest).is_some()
    }

    /// Keep only the blobs whose digest satisfies `keep`
    ///
    /// Returns the number of blobs removed.
    pub fn retain<F>(&self, mut keep: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let before = self.blobs.len();
        self.blobs.retain(|digest, _| keep(digest));
        before.saturating_sub(self.blobs.len())
    }

    /// Copy every blob of `other` into this store
    pub fn merge(&self, other: &BlobStore) {
        for entry in other.blobs.iter() {
            self.blobs
                .entry(entry.key().clone())
                .or_insert_with(|| Arc::clone(entry.value()));
        }
    }

    /// Number of distinct blobs stored
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Check if no blobs are stored
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl BlobValidator for BlobStore {
    /// A blob exists when its digest is stored with the referenced length
    fn exists(&self, blob: &BlobRef) -> bool {
        self.blobs
            .get(&blob.digest)
            .map_or(false, |bytes| bytes.len() as u64 == blob.length)
    }
}

/// Resolves blob names against `<dataset>/blobs/<name>`
///
/// Loaded content is written into the shared [`BlobStore`], so documents
/// referencing the blob validate as present afterwards.
#[derive(Debug, Clone)]
pub struct DatasetBlobResolver {
    dir: PathBuf,
    store: Arc<BlobStore>,
}

impl DatasetBlobResolver {
    /// Create a resolver for the dataset rooted at `dataset_dir`
    pub fn new(dataset_dir: impl Into<PathBuf>, store: Arc<BlobStore>) -> Self {
        DatasetBlobResolver {
            dir: dataset_dir.into().join(BLOBS_DIR),
            store,
        }
    }

    /// Directory blob files are read from
    pub fn blobs_dir(&self) -> &Path {
        &self.dir
    }

    /// Get the blob store loaded content goes into
    pub fn store(&self) -> &Arc<BlobStore> {
        &self.store
    }
}

impl BlobResolver for DatasetBlobResolver {
    fn resolve(&self, name: &str) -> Result<BlobRef, BlobError> {
        if name.is_empty() || Path::new(name).components().count() != 1 {
            return Err(BlobError::NotFound(name.to_string()));
        }
        let path = self.dir.join(name);
        let bytes = std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => BlobError::NotFound(name.to_string()),
            _ => BlobError::Load {
                name: name.to_string(),
                reason: e.to_string(),
            },
        })?;
        let blob = self.store.put(content_type_for(name), bytes);
        debug!(blob = name, digest = %blob.digest, length = blob.length, "loaded dataset blob");
        Ok(blob)
    }
}
