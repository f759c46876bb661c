//! Tree navigation
//!
//! [`resolve_parent`] walks every segment of a path except the last and
//! returns the container that directly holds the final segment. Reads,
//! writes and removals share this walk and then act on the last segment
//! themselves.
//!
//! With `create_missing` set, absent intermediate containers are created on
//! the way down. The kind of a new container is decided by looking ahead to
//! the next segment: an object for a key, an array for an index. Arrays are
//! padded with `Null` up to and including the requested index, never
//! truncated.

use crate::error::{Error, KeyPathError, Result};
use crate::limits::Limits;
use crate::path::{KeyPath, PathSegment};
use crate::value::Value;
use indexmap::map::Entry;

/// Resolve the container holding the final segment of `path`
///
/// The returned value is an `Object` when the final segment is a key and an
/// `Array` when it is an index.
///
/// # Errors
///
/// * `TypeMismatch` - a segment lands on a value of the wrong kind
/// * `NotFound` - an intermediate container is absent and `create_missing`
///   is false
/// * `Limit` - padding an array would exceed the configured maximum index
/// * `PathSyntax` - the path has no segments
pub fn resolve_parent<'a>(
    root: &'a mut Value,
    path: &KeyPath,
    create_missing: bool,
    limits: &Limits,
) -> Result<&'a mut Value> {
    let segments = path.segments();
    let (last, parents) = segments
        .split_last()
        .ok_or_else(|| Error::PathSyntax(KeyPathError::new("", "Empty key path")))?;

    let mut current = root;
    for (i, segment) in parents.iter().enumerate() {
        let next = &segments[i + 1];
        current = step(current, path, i, segment, next, create_missing, limits)?;
    }

    expect_container(current, last, path, parents.len())?;
    Ok(current)
}

/// Get the value at `path`, if every step exists and has the right kind
pub fn get_at_path<'a>(root: &'a Value, path: &KeyPath) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.segments() {
        current = match (segment, current) {
            (PathSegment::Key(key), Value::Object(obj)) => obj.get(key)?,
            (PathSegment::Index(idx), Value::Array(arr)) => arr.get(*idx)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Descend one segment from `current`
fn step<'a>(
    current: &'a mut Value,
    path: &KeyPath,
    position: usize,
    segment: &PathSegment,
    next: &PathSegment,
    create_missing: bool,
    limits: &Limits,
) -> Result<&'a mut Value> {
    expect_container(current, segment, path, position)?;
    match (segment, current) {
        (PathSegment::Key(key), Value::Object(obj)) => match obj.entry(key.clone()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) if create_missing => Ok(entry.insert(empty_container_for(next))),
            Entry::Vacant(_) => Err(Error::NotFound {
                path: path.prefix_string(position + 1),
            }),
        },
        (PathSegment::Index(idx), Value::Array(arr)) => {
            let idx = *idx;
            if idx >= arr.len() {
                if !create_missing {
                    return Err(Error::NotFound {
                        path: path.prefix_string(position + 1),
                    });
                }
                limits.validate_array_index(idx)?;
                arr.resize(idx + 1, Value::Null);
                arr[idx] = empty_container_for(next);
            }
            Ok(&mut arr[idx])
        }
        (segment, other) => Err(type_mismatch(path, position, segment, other)),
    }
}

/// Check that `value` is the container kind `segment` requires
fn expect_container(
    value: &Value,
    segment: &PathSegment,
    path: &KeyPath,
    position: usize,
) -> Result<()> {
    match (segment, value) {
        (PathSegment::Key(_), Value::Object(_)) | (PathSegment::Index(_), Value::Array(_)) => {
            Ok(())
        }
        _ => Err(type_mismatch(path, position, segment, value)),
    }
}

fn type_mismatch(path: &KeyPath, position: usize, segment: &PathSegment, found: &Value) -> Error {
    Error::TypeMismatch {
        path: location(path, position),
        expected: segment.container_name(),
        found: found.type_name(),
    }
}

/// Render the location of the container addressed by `segments[..count]`
fn location(path: &KeyPath, count: usize) -> String {
    if count == 0 {
        "$".to_string()
    } else {
        path.prefix_string(count)
    }
}

/// New empty container matching the kind `next` requires
fn empty_container_for(next: &PathSegment) -> Value {
    match next {
        PathSegment::Key(_) => Value::object(),
        PathSegment::Index(_) => Value::array(),
    }
}
