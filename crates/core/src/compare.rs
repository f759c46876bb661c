//! Structural equality of value trees
//!
//! The comparator walks two trees depth-first, left to right, and stops at
//! the first difference. The difference is located by a [`KeyPath`] built
//! from each container's key or index as the recursion unwinds.
//!
//! ## Rules
//!
//! - Object key order is irrelevant; a key present on only one side is a
//!   mismatch at that key.
//! - Arrays compare pairwise over the common prefix; a length difference is
//!   reported at the first index past the shorter array.
//! - Numbers compare by numeric value: `Int(1)`, `UInt(1)` and `Double(1.0)`
//!   are equal.
//! - Blobs never compare content. Equal metadata is required, then the
//!   blob validator must confirm the actual blob exists.

use crate::path::{KeyPath, PathSegment};
use crate::value::{BlobRef, Value};

/// Confirms that a referenced blob is present in the target store
pub trait BlobValidator {
    /// Check whether the blob exists
    fn exists(&self, blob: &BlobRef) -> bool;
}

impl<F> BlobValidator for F
where
    F: Fn(&BlobRef) -> bool,
{
    fn exists(&self, blob: &BlobRef) -> bool {
        self(blob)
    }
}

/// Validator that accepts every blob
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeBlobsExist;

impl BlobValidator for AssumeBlobsExist {
    fn exists(&self, _blob: &BlobRef) -> bool {
        true
    }
}

/// Why two trees differ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchReason {
    /// Values differ in kind, content, or presence
    MismatchedProperty,
    /// Blob metadata matches but the validator could not find the blob
    MissingBlob,
}

/// First difference found between an expected and an actual tree
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// Location of the differing node
    pub path: KeyPath,
    /// Kind of difference
    pub reason: MismatchReason,
    /// Expected value at the location (None if absent)
    pub expected: Option<Value>,
    /// Actual value at the location (None if absent)
    pub actual: Option<Value>,
}

/// Compare two trees, returning equality and the first differing path
///
/// `a` is treated as the expected tree and `b` as the actual one.
pub fn value_is_equals<V>(a: &Value, b: &Value, validator: &V) -> (bool, Option<KeyPath>)
where
    V: BlobValidator + ?Sized,
{
    match find_mismatch(a, b, validator) {
        None => (true, None),
        Some(mismatch) => (false, Some(mismatch.path)),
    }
}

/// Find the first difference between `expected` and `actual`
pub fn find_mismatch<V>(expected: &Value, actual: &Value, validator: &V) -> Option<Mismatch>
where
    V: BlobValidator + ?Sized,
{
    compare(Some(expected), Some(actual), validator).map(Unwound::finish)
}

/// Mismatch whose path segments are collected innermost first
struct Unwound {
    reversed: Vec<PathSegment>,
    reason: MismatchReason,
    expected: Option<Value>,
    actual: Option<Value>,
}

impl Unwound {
    fn new(reason: MismatchReason, expected: Option<&Value>, actual: Option<&Value>) -> Self {
        Unwound {
            reversed: Vec::new(),
            reason,
            expected: expected.cloned(),
            actual: actual.cloned(),
        }
    }

    fn within(mut self, segment: PathSegment) -> Self {
        self.reversed.push(segment);
        self
    }

    fn finish(mut self) -> Mismatch {
        self.reversed.reverse();
        Mismatch {
            path: KeyPath::from_segments(self.reversed),
            reason: self.reason,
            expected: self.expected,
            actual: self.actual,
        }
    }
}

fn compare<V>(expected: Option<&Value>, actual: Option<&Value>, validator: &V) -> Option<Unwound>
where
    V: BlobValidator + ?Sized,
{
    let mismatch = || Some(Unwound::new(MismatchReason::MismatchedProperty, expected, actual));

    let (exp, act) = match (expected, actual) {
        (None, None) => return None,
        (Some(exp), Some(act)) => (exp, act),
        _ => return mismatch(),
    };

    match (exp, act) {
        (Value::Null, Value::Null) => None,
        (Value::Bool(a), Value::Bool(b)) if a == b => None,
        (Value::String(a), Value::String(b)) if a == b => None,
        (a, b) if a.is_number() && b.is_number() => {
            if numbers_equal(a, b) {
                None
            } else {
                mismatch()
            }
        }
        (Value::Object(a), Value::Object(b)) => {
            for (key, value) in a {
                if let Some(found) = compare(Some(value), b.get(key), validator) {
                    return Some(found.within(PathSegment::Key(key.clone())));
                }
            }
            for (key, value) in b {
                if !a.contains_key(key) {
                    return Some(
                        Unwound::new(MismatchReason::MismatchedProperty, None, Some(value))
                            .within(PathSegment::Key(key.clone())),
                    );
                }
            }
            None
        }
        (Value::Array(a), Value::Array(b)) => {
            for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
                if let Some(found) = compare(Some(x), Some(y), validator) {
                    return Some(found.within(PathSegment::Index(i)));
                }
            }
            if a.len() != b.len() {
                let i = a.len().min(b.len());
                return Some(
                    Unwound::new(MismatchReason::MismatchedProperty, a.get(i), b.get(i))
                        .within(PathSegment::Index(i)),
                );
            }
            None
        }
        (Value::Blob(a), Value::Blob(b)) => {
            if a != b {
                mismatch()
            } else if !validator.exists(b) {
                Some(Unwound::new(MismatchReason::MissingBlob, expected, actual))
            } else {
                None
            }
        }
        _ => mismatch(),
    }
}

/// Numeric equality across Int, UInt and Double
fn numbers_equal(a: &Value, b: &Value) -> bool {
    match (integer_of(a), integer_of(b)) {
        (Some(x), Some(y)) => x == y,
        (Some(i), None) => double_equals_integer(b, i),
        (None, Some(i)) => double_equals_integer(a, i),
        (None, None) => a.as_f64() == b.as_f64(),
    }
}

fn integer_of(v: &Value) -> Option<i128> {
    match v {
        Value::Int(i) => Some(*i as i128),
        Value::UInt(u) => Some(*u as i128),
        _ => None,
    }
}

fn double_equals_integer(v: &Value, i: i128) -> bool {
    match v {
        Value::Double(d) => d.is_finite() && d.fract() == 0.0 && *d == i as f64 && *d as i128 == i,
        _ => false,
    }
}
