//! Delta mutations
//!
//! A [`MutationSpec`] is one edit batch for one document. [`apply_delta`]
//! applies it in a fixed order:
//!
//! 1. removals
//! 2. property updates
//! 3. blob attachments
//!
//! Removing something that is not there is never an error. Updates and blob
//! attachments create missing parents. Any error aborts the whole call; the
//! tree may then be partially modified and must be discarded by the caller.

use crate::error::{BlobError, Result};
use crate::limits::Limits;
use crate::navigate::resolve_parent;
use crate::path::{KeyPath, PathSegment};
use crate::value::{BlobRef, Value};
use tracing::debug;

/// Supplies blob references for blob names during mutation
///
/// Implementations may perform I/O; the engine waits for the call to return
/// and propagates its error.
pub trait BlobResolver {
    /// Resolve a blob name to a reference
    fn resolve(&self, name: &str) -> std::result::Result<BlobRef, BlobError>;
}

impl<F> BlobResolver for F
where
    F: Fn(&str) -> std::result::Result<BlobRef, BlobError>,
{
    fn resolve(&self, name: &str) -> std::result::Result<BlobRef, BlobError> {
        self(name)
    }
}

/// Resolver for batches that carry no blobs; every lookup fails
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBlobs;

impl BlobResolver for NoBlobs {
    fn resolve(&self, name: &str) -> std::result::Result<BlobRef, BlobError> {
        Err(BlobError::NotFound(name.to_string()))
    }
}

/// One edit batch for one document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MutationSpec {
    /// Paths to remove
    pub removed: Vec<KeyPath>,
    /// Paths to overwrite, in request order
    pub updated: Vec<(KeyPath, Value)>,
    /// Paths to set to a resolved blob, with the blob name
    pub blobs: Vec<(KeyPath, String)>,
}

impl MutationSpec {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a removal (builder pattern)
    pub fn remove(mut self, path: KeyPath) -> Self {
        self.removed.push(path);
        self
    }

    /// Add an update (builder pattern)
    pub fn update(mut self, path: KeyPath, value: impl Into<Value>) -> Self {
        self.updated.push((path, value.into()));
        self
    }

    /// Add a blob attachment (builder pattern)
    pub fn blob(mut self, path: KeyPath, name: impl Into<String>) -> Self {
        self.blobs.push((path, name.into()));
        self
    }

    /// Check if the batch contains no operations
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.updated.is_empty() && self.blobs.is_empty()
    }
}

/// Apply a batch to a document tree
///
/// # Errors
///
/// `TypeMismatch`, `Limit` and `Blob` errors abort the call at the first
/// failing operation.
pub fn apply_delta<R>(
    doc: &mut Value,
    spec: &MutationSpec,
    resolver: &R,
    limits: &Limits,
) -> Result<()>
where
    R: BlobResolver + ?Sized,
{
    for path in &spec.removed {
        debug!(path = %path, "removing property");
        remove_at_path(doc, path, limits)?;
    }

    for (path, value) in &spec.updated {
        debug!(path = %path, "updating property");
        set_at_path(doc, path, value.clone(), limits)?;
    }

    for (path, name) in &spec.blobs {
        debug!(path = %path, blob = %name, "attaching blob");
        let blob = resolver.resolve(name)?;
        set_at_path(doc, path, Value::Blob(blob), limits)?;
    }

    Ok(())
}

/// Set the value at `path`, creating missing parents
///
/// The previous value at the leaf is replaced whatever its kind. An index
/// past the end of its array pads the array with `Null` first.
pub fn set_at_path(root: &mut Value, path: &KeyPath, value: Value, limits: &Limits) -> Result<()> {
    let parent = resolve_parent(root, path, true, limits)?;
    match (path.last_segment(), parent) {
        (Some(PathSegment::Key(key)), Value::Object(obj)) => {
            obj.insert(key.clone(), value);
        }
        (Some(PathSegment::Index(idx)), Value::Array(arr)) => {
            let idx = *idx;
            if idx >= arr.len() {
                limits.validate_array_index(idx)?;
                arr.resize(idx + 1, Value::Null);
            }
            arr[idx] = value;
        }
        // resolve_parent guarantees the parent kind matches the last segment
        _ => {}
    }
    Ok(())
}

/// Remove the value at `path`
///
/// Removing an object key deletes the entry; removing an array index deletes
/// the element and shifts later elements down.
///
/// # Returns
///
/// * `Ok(Some(value))` - The removed value
/// * `Ok(None)` - Nothing existed at the path
/// * `Err(_)` - A path step landed on a value of the wrong kind
pub fn remove_at_path(root: &mut Value, path: &KeyPath, limits: &Limits) -> Result<Option<Value>> {
    let parent = match resolve_parent(root, path, false, limits) {
        Ok(parent) => parent,
        Err(e) if e.is_not_found() => return Ok(None),
        Err(e) => return Err(e),
    };
    let removed = match (path.last_segment(), parent) {
        (Some(PathSegment::Key(key)), Value::Object(obj)) => obj.shift_remove(key),
        (Some(PathSegment::Index(idx)), Value::Array(arr)) if *idx < arr.len() => {
            Some(arr.remove(*idx))
        }
        _ => None,
    };
    Ok(removed)
}
