//! Core value-tree engine for replikit
//!
//! This crate defines the path-addressed document engine used by the test
//! server:
//! - Value: recursive document value tree with blob references
//! - KeyPath: parsed dot/bracket key paths
//! - Navigation: parent resolution with optional container creation
//! - Mutation: ordered removals, updates and blob attachments
//! - Comparison: structural equality with mismatch location
//! - ValueBridge: wire decoding and the facade used by request handlers
//! - Limits: bounds on path length, array extension and nesting depth

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bridge;
pub mod compare;
pub mod error;
pub mod limits;
pub mod mutation;
pub mod navigate;
pub mod path;
pub mod value;

pub use bridge::{from_wire, from_wire_with_limits, to_wire, ValueBridge, WireDelta};
pub use compare::{
    find_mismatch, value_is_equals, AssumeBlobsExist, BlobValidator, Mismatch, MismatchReason,
};
pub use error::{BlobError, Error, KeyPathError, Result};
pub use limits::{LimitError, Limits, MAX_ARRAY_INDEX, MAX_NESTING_DEPTH, MAX_PATH_SEGMENTS};
pub use mutation::{apply_delta, remove_at_path, set_at_path, BlobResolver, MutationSpec, NoBlobs};
pub use navigate::{get_at_path, resolve_parent};
pub use path::{KeyPath, PathSegment};
pub use value::{BlobRef, Object, Value};
