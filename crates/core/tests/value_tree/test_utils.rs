//! Shared helpers for value-tree integration tests

pub use replikit_core::{
    from_wire, get_at_path, to_wire, value_is_equals, AssumeBlobsExist, BlobError, BlobRef,
    Error, KeyPath, Limits, PathSegment, Value, ValueBridge, WireDelta,
};
pub use serde_json::json;

/// Decode a wire document
pub fn tree(v: serde_json::Value) -> Value {
    from_wire(&v).expect("valid wire document")
}

/// Parse a key path
pub fn path(s: &str) -> KeyPath {
    s.parse().expect("valid key path")
}

/// Decode a wire delta
pub fn delta(v: serde_json::Value) -> WireDelta {
    serde_json::from_value(v).expect("valid wire delta")
}

/// Resolver serving a single JPEG blob named `image.jpg`
pub fn dataset_blobs(name: &str) -> Result<BlobRef, BlobError> {
    match name {
        "image.jpg" => Ok(sample_blob()),
        other => Err(BlobError::NotFound(other.to_string())),
    }
}

/// Blob reference returned by [`dataset_blobs`]
pub fn sample_blob() -> BlobRef {
    BlobRef::new("image/jpeg", "sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=", 1024)
}

/// Apply a wire delta to a wire document and return the wire result
pub fn apply(doc: serde_json::Value, d: serde_json::Value) -> Result<serde_json::Value, Error> {
    let bridge = ValueBridge::default();
    bridge
        .apply_mutations(tree(doc), &delta(d), &dataset_blobs)
        .map(|v| to_wire(&v))
}

/// Compare two wire documents, rendering the mismatch path
pub fn compare(a: serde_json::Value, b: serde_json::Value) -> (bool, Option<String>) {
    let (equal, at) = value_is_equals(&tree(a), &tree(b), &AssumeBlobsExist);
    (equal, at.map(|p| p.to_string()))
}
