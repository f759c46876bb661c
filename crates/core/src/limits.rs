//! Size limits for paths and value trees
//!
//! Paths and wire values come straight from remote test suites, so the
//! engine bounds what a single request can make it allocate:
//!
//! | Limit | Default | Checked by |
//! |-------|---------|------------|
//! | Path segments | 256 | key path parsing |
//! | Array index | 1M | array auto-extension |
//! | Nesting depth | 128 | wire decoding |

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum number of segments in a key path
pub const MAX_PATH_SEGMENTS: usize = 256;

/// Default maximum array index reachable through auto-extension
pub const MAX_ARRAY_INDEX: usize = 1_000_000;

/// Default maximum nesting depth of a decoded wire value
pub const MAX_NESTING_DEPTH: usize = 128;

/// Error type for limit violations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LimitError {
    /// Path has too many segments
    #[error("path length {length} exceeds maximum of {max} segments")]
    PathTooLong {
        /// Actual segment count
        length: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Array extension would exceed the maximum index
    #[error("array index {index} exceeds maximum of {max}")]
    ArrayIndexTooLarge {
        /// Requested index
        index: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Value nesting is too deep
    #[error("nesting depth {depth} exceeds maximum of {max} levels")]
    NestingTooDeep {
        /// Depth reached
        depth: usize,
        /// Maximum allowed
        max: usize,
    },
}

/// Limits applied by the engine
///
/// Deserializes from the `[limits]` section of the server configuration;
/// missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum number of segments in a key path (default: 256)
    pub max_path_segments: usize,
    /// Maximum array index reachable by auto-extension (default: 1M)
    pub max_array_index: usize,
    /// Maximum nesting depth of decoded wire values (default: 128)
    pub max_nesting_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_path_segments: MAX_PATH_SEGMENTS,
            max_array_index: MAX_ARRAY_INDEX,
            max_nesting_depth: MAX_NESTING_DEPTH,
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        Limits {
            max_path_segments: 8,
            max_array_index: 100,
            max_nesting_depth: 4,
        }
    }

    /// Validate the number of segments in a path
    pub fn validate_path_length(&self, length: usize) -> Result<(), LimitError> {
        if length > self.max_path_segments {
            Err(LimitError::PathTooLong {
                length,
                max: self.max_path_segments,
            })
        } else {
            Ok(())
        }
    }

    /// Validate an index that is about to extend an array
    pub fn validate_array_index(&self, index: usize) -> Result<(), LimitError> {
        if index > self.max_array_index {
            Err(LimitError::ArrayIndexTooLarge {
                index,
                max: self.max_array_index,
            })
        } else {
            Ok(())
        }
    }

    /// Validate a nesting depth reached while decoding
    pub fn validate_depth(&self, depth: usize) -> Result<(), LimitError> {
        if depth > self.max_nesting_depth {
            Err(LimitError::NestingTooDeep {
                depth,
                max: self.max_nesting_depth,
            })
        } else {
            Ok(())
        }
    }
}
