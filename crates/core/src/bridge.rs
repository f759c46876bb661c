//! Wire format bridge and engine facade
//!
//! Converts between the JSON wire representation and [`Value`] trees, and
//! exposes the two operations request handlers consume:
//!
//! - [`ValueBridge::apply_mutations`]: decode a wire delta and apply it to a
//!   document
//! - [`ValueBridge::compare`]: structural equality with blob validation
//!
//! # Blob Wire Form
//!
//! ```json
//! {"@type": "blob", "content_type": "image/jpeg", "digest": "sha256-...", "length": 1024}
//! ```
//!
//! An object tagged `"@type": "blob"` must carry a string `digest`; blobs
//! with inline `data` have no tree representation.

use crate::compare::{find_mismatch, value_is_equals, BlobValidator, Mismatch};
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::mutation::{apply_delta, BlobResolver, MutationSpec};
use crate::path::KeyPath;
use crate::value::{BlobRef, Object, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number};

/// Object key marking a typed special value
pub const TYPE_KEY: &str = "@type";

/// `@type` tag of a blob reference
pub const BLOB_TYPE: &str = "blob";

/// Default content type when a blob does not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Mutation batch as it appears on the wire
///
/// ```json
/// {
///   "updatedProperties": [ { "<path>": <value> } ],
///   "removedProperties": [ "<path>" ],
///   "updatedBlobs": { "<path>": "<blobName>" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDelta {
    /// Path/value maps, applied in order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_properties: Option<Vec<IndexMap<String, serde_json::Value>>>,
    /// Paths to remove
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed_properties: Option<Vec<String>>,
    /// Path to blob name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_blobs: Option<IndexMap<String, String>>,
}

impl WireDelta {
    /// Check if the delta carries no operations
    pub fn is_empty(&self) -> bool {
        self.updated_properties.as_ref().map_or(true, |u| u.iter().all(|m| m.is_empty()))
            && self.removed_properties.as_ref().map_or(true, Vec::is_empty)
            && self.updated_blobs.as_ref().map_or(true, IndexMap::is_empty)
    }

    /// Decode into a mutation batch, parsing every path and value
    pub fn decode(&self, limits: &Limits) -> Result<MutationSpec> {
        let mut spec = MutationSpec::new();
        for path in self.removed_properties.iter().flatten() {
            spec.removed.push(KeyPath::parse_with_limits(path, limits)?);
        }
        for updates in self.updated_properties.iter().flatten() {
            for (path, value) in updates {
                let path = KeyPath::parse_with_limits(path, limits)?;
                spec.updated.push((path, from_wire_with_limits(value, limits)?));
            }
        }
        for (path, name) in self.updated_blobs.iter().flatten() {
            spec.blobs.push((KeyPath::parse_with_limits(path, limits)?, name.clone()));
        }
        Ok(spec)
    }
}

/// Facade over parsing, navigation, mutation and comparison
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueBridge {
    limits: Limits,
}

impl ValueBridge {
    /// Create a bridge enforcing the given limits
    pub fn new(limits: Limits) -> Self {
        ValueBridge { limits }
    }

    /// Get the limits in force
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Decode a wire document
    pub fn decode(&self, json: &serde_json::Value) -> Result<Value> {
        from_wire_with_limits(json, &self.limits)
    }

    /// Apply a wire delta to a document and return the mutated document
    ///
    /// On error the document is dropped; nothing partial escapes.
    pub fn apply_mutations<R>(&self, doc: Value, delta: &WireDelta, resolver: &R) -> Result<Value>
    where
        R: BlobResolver + ?Sized,
    {
        let spec = delta.decode(&self.limits)?;
        let mut doc = doc;
        apply_delta(&mut doc, &spec, resolver, &self.limits)?;
        Ok(doc)
    }

    /// Compare an expected tree with an actual one
    pub fn compare<V>(&self, expected: &Value, actual: &Value, validator: &V) -> (bool, Option<KeyPath>)
    where
        V: BlobValidator + ?Sized,
    {
        value_is_equals(expected, actual, validator)
    }

    /// Compare and report full details of the first difference
    pub fn diff<V>(&self, expected: &Value, actual: &Value, validator: &V) -> Option<Mismatch>
    where
        V: BlobValidator + ?Sized,
    {
        find_mismatch(expected, actual, validator)
    }
}

/// Decode a wire value with default limits
pub fn from_wire(json: &serde_json::Value) -> Result<Value> {
    from_wire_with_limits(json, &Limits::default())
}

/// Decode a wire value, rejecting nesting deeper than the limits allow
pub fn from_wire_with_limits(json: &serde_json::Value, limits: &Limits) -> Result<Value> {
    decode(json, 0, limits)
}

fn decode(json: &serde_json::Value, depth: usize, limits: &Limits) -> Result<Value> {
    Ok(match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => decode_number(n)?,
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(arr) => {
            limits.validate_depth(depth + 1)?;
            Value::Array(
                arr.iter()
                    .map(|v| decode(v, depth + 1, limits))
                    .collect::<Result<Vec<_>>>()?,
            )
        }
        serde_json::Value::Object(obj) => {
            if obj.get(TYPE_KEY).and_then(|t| t.as_str()) == Some(BLOB_TYPE) {
                return decode_blob(obj).map(Value::Blob);
            }
            limits.validate_depth(depth + 1)?;
            let mut out = Object::with_capacity(obj.len());
            for (key, value) in obj {
                out.insert(key.clone(), decode(value, depth + 1, limits)?);
            }
            Value::Object(out)
        }
    })
}

fn decode_number(n: &Number) -> Result<Value> {
    if let Some(i) = n.as_i64() {
        Ok(Value::Int(i))
    } else if let Some(u) = n.as_u64() {
        Ok(Value::UInt(u))
    } else if let Some(d) = n.as_f64() {
        Ok(Value::Double(d))
    } else {
        Err(Error::UnsupportedValueType(format!("number {}", n)))
    }
}

fn decode_blob(obj: &Map<String, serde_json::Value>) -> Result<BlobRef> {
    if obj.contains_key("data") {
        return Err(Error::UnsupportedValueType(
            "blob with inline data".to_string(),
        ));
    }
    let digest = obj
        .get("digest")
        .and_then(|d| d.as_str())
        .ok_or_else(|| Error::UnsupportedValueType("blob without digest".to_string()))?;
    let content_type = obj
        .get("content_type")
        .and_then(|c| c.as_str())
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    let length = obj.get("length").and_then(|l| l.as_u64()).unwrap_or(0);
    Ok(BlobRef::new(content_type, digest, length))
}

/// Encode a value tree as wire JSON
///
/// Non-finite doubles have no JSON form and encode as null.
pub fn to_wire(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::UInt(u) => serde_json::Value::Number((*u).into()),
        Value::Double(d) => {
            Number::from_f64(*d).map_or(serde_json::Value::Null, serde_json::Value::Number)
        }
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(arr) => serde_json::Value::Array(arr.iter().map(to_wire).collect()),
        Value::Object(obj) => serde_json::Value::Object(
            obj.iter().map(|(k, v)| (k.clone(), to_wire(v))).collect(),
        ),
        Value::Blob(blob) => {
            let mut map = Map::new();
            map.insert(TYPE_KEY.to_string(), BLOB_TYPE.into());
            map.insert("content_type".to_string(), blob.content_type.clone().into());
            map.insert("digest".to_string(), blob.digest.clone().into());
            map.insert("length".to_string(), blob.length.into());
            serde_json::Value::Object(map)
        }
    }
}
