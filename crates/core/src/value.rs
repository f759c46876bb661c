//! Value tree types
//!
//! This module defines:
//! - Value: the recursive document value tree
//! - BlobRef: metadata reference to externally stored binary content
//!
//! ## Value Model
//!
//! The Value enum has nine variants:
//! - Null, Bool, Int, UInt, Double, String, Array, Object, Blob
//!
//! Trees are owned top-down: Object and Array variants own their children,
//! so a tree never contains cycles or shared nodes. Object keys keep
//! insertion order, which is irrelevant to equality.
//!
//! `UInt` only holds values above `i64::MAX`; wire decoding keeps every
//! integer that fits in `i64` as `Int`.

use indexmap::IndexMap;
use std::fmt;

/// Ordered map used for Object values
pub type Object = IndexMap<String, Value>;

/// Reference to an externally stored blob
///
/// The engine never looks at blob bytes. Two refs are considered the same
/// blob when their metadata matches; whether the bytes actually exist in
/// the target store is decided by a blob validator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobRef {
    /// MIME type of the content
    pub content_type: String,
    /// Content digest, e.g. `sha256-<base64>`
    pub digest: String,
    /// Content length in bytes
    pub length: u64,
}

impl BlobRef {
    /// Create a new blob reference
    pub fn new(content_type: impl Into<String>, digest: impl Into<String>, length: u64) -> Self {
        BlobRef {
            content_type: content_type.into(),
            digest: digest.into(),
            length,
        }
    }
}

/// A node in a document value tree
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Null value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// Unsigned integer too large for `Int`
    UInt(u64),
    /// 64-bit floating point
    Double(f64),
    /// UTF-8 string
    String(String),
    /// Dense, zero-indexed array
    Array(Vec<Value>),
    /// Object with unique string keys in insertion order
    Object(Object),
    /// Reference to an external blob
    Blob(BlobRef),
}

impl Value {
    /// Create an empty object
    pub fn object() -> Self {
        Value::Object(Object::new())
    }

    /// Create an empty array
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    /// Get the kind name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) | Value::UInt(_) | Value::Double(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Blob(_) => "blob",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this is a numeric value
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::UInt(_) | Value::Double(_))
    }

    /// Check if this is an array value
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Check if this is an object value
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Check if this is a blob reference
    pub fn is_blob(&self) -> bool {
        matches!(self, Value::Blob(_))
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an integer that fits
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Get as f64 if this is any numeric value
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::UInt(u) => Some(*u as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as a slice if this is an Array value
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as a mutable vector if this is an Array value
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as an object map if this is an Object value
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get as a mutable object map if this is an Object value
    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get as a blob reference
    pub fn as_blob(&self) -> Option<&BlobRef> {
        match self {
            Value::Blob(b) => Some(b),
            _ => None,
        }
    }

    /// Look up a key if this is an Object value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(key))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::bridge::to_wire(self))
    }
}

// ============================================================================
// From implementations for ergonomic construction
// ============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::UInt(v),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<BlobRef> for Value {
    fn from(v: BlobRef) -> Self {
        Value::Blob(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
