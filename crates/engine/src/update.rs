//! Update items as sent by replication test suites
//!
//! One item describes the change to one document:
//!
//! ```json
//! {
//!   "type": "UPDATE",
//!   "collection": "_default._default",
//!   "documentID": "doc1",
//!   "updatedProperties": [{"$.name": "Alice"}],
//!   "removedProperties": ["$.nickname"],
//!   "updatedBlobs": {"$.avatar": "image.jpg"}
//! }
//! ```

use replikit_core::WireDelta;
use replikit_store::DocumentKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of change applied to a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UpdateType {
    /// Apply the item's delta, creating the document if absent
    Update,
    /// Delete the document
    Delete,
    /// Purge the document
    Purge,
}

impl UpdateType {
    /// Check if the change removes the document
    pub fn removes_document(&self) -> bool {
        matches!(self, UpdateType::Delete | UpdateType::Purge)
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UpdateType::Update => "UPDATE",
            UpdateType::Delete => "DELETE",
            UpdateType::Purge => "PURGE",
        };
        write!(f, "{}", s)
    }
}

/// Change to one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseUpdateItem {
    /// Kind of change
    #[serde(rename = "type")]
    pub kind: UpdateType,
    /// Collection name; the configured default collection when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    /// Document id
    #[serde(rename = "documentID")]
    pub document_id: String,
    /// Property and blob changes; only meaningful for `UPDATE`
    #[serde(flatten)]
    pub delta: WireDelta,
}

impl DatabaseUpdateItem {
    /// Create an `UPDATE` item
    pub fn update(collection: impl Into<String>, id: impl Into<String>, delta: WireDelta) -> Self {
        DatabaseUpdateItem {
            kind: UpdateType::Update,
            collection: Some(collection.into()),
            document_id: id.into(),
            delta,
        }
    }

    /// Create a `DELETE` item
    pub fn delete(collection: impl Into<String>, id: impl Into<String>) -> Self {
        DatabaseUpdateItem {
            kind: UpdateType::Delete,
            collection: Some(collection.into()),
            document_id: id.into(),
            delta: WireDelta::default(),
        }
    }

    /// Create a `PURGE` item
    pub fn purge(collection: impl Into<String>, id: impl Into<String>) -> Self {
        DatabaseUpdateItem {
            kind: UpdateType::Purge,
            ..Self::delete(collection, id)
        }
    }

    /// Address of the document this item changes
    pub fn key(&self, default_collection: &str) -> DocumentKey {
        DocumentKey::new(
            self.collection.as_deref().unwrap_or(default_collection),
            self.document_id.clone(),
        )
    }
}
