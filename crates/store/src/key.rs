//! Document addressing

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully qualified document address
///
/// Ordering is by collection, then id, so all documents of a collection are
/// contiguous in an ordered map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentKey {
    /// Collection name, e.g. `_default._default`
    pub collection: String,
    /// Document id within the collection
    pub id: String,
}

impl DocumentKey {
    /// Create a new document key
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Self {
        DocumentKey {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Smallest key of a collection, used as a range start
    pub(crate) fn collection_start(collection: &str) -> Self {
        DocumentKey::new(collection, "")
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.collection, self.id)
    }
}
