//! Post-mutation document verification
//!
//! A test suite snapshots a set of documents, performs replication, then
//! asks the server to verify that the database now holds exactly what the
//! snapshot plus the declared changes imply:
//!
//! - every changed document matches its snapshot state with the change's
//!   delta applied (`UPDATE`), or is absent (`DELETE`, `PURGE`)
//! - every other captured document is unchanged, or still absent
//!
//! Several changes to the same document apply in order.

use std::collections::BTreeMap;

use replikit_core::{to_wire, BlobResolver, BlobValidator, MismatchReason, Value, ValueBridge};
use replikit_store::{DocumentKey, DocumentStore, Snapshot};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::update::{DatabaseUpdateItem, UpdateType};

/// Outcome of a verification request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// True when every document is as expected
    pub result: bool,
    /// Human readable reason for a failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The offending document as found in the database
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<serde_json::Value>,
    /// Expected value at the mismatch location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<serde_json::Value>,
    /// Actual value at the mismatch location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<serde_json::Value>,
}

impl VerifyResponse {
    /// Successful verification
    pub fn passed() -> Self {
        VerifyResponse {
            result: true,
            description: None,
            document: None,
            expected: None,
            actual: None,
        }
    }

    /// Failed verification for `key` with a reason such as `was not found`
    pub fn failed(key: &DocumentKey, reason: impl AsRef<str>) -> Self {
        VerifyResponse {
            result: false,
            description: Some(format!(
                "Document '{}' in '{}' {}",
                key.id,
                key.collection,
                reason.as_ref()
            )),
            ..Self::passed()
        }
    }

    fn with_document(mut self, doc: &Value) -> Self {
        self.document = Some(to_wire(doc));
        self
    }
}

/// Expected end state of one changed document
struct ExpectedState {
    kind: UpdateType,
    doc: Option<Value>,
}

/// Check the store against a snapshot and the changes made since
///
/// Expected documents are rebuilt with `resolver`; blobs found in actual
/// documents are checked with `validator`.
pub fn verify_documents<S, R, V>(
    store: &S,
    snapshot: &Snapshot,
    changes: &[DatabaseUpdateItem],
    default_collection: &str,
    bridge: &ValueBridge,
    resolver: &R,
    validator: &V,
) -> Result<VerifyResponse>
where
    S: DocumentStore + ?Sized,
    R: BlobResolver + ?Sized,
    V: BlobValidator + ?Sized,
{
    let mut expected: BTreeMap<DocumentKey, ExpectedState> = BTreeMap::new();
    for change in changes {
        let key = change.key(default_collection);
        let base = match expected.remove(&key) {
            Some(state) => state.doc,
            None => snapshot.document(&key)?.cloned(),
        };
        let doc = if change.kind.removes_document() {
            None
        } else {
            let base = base.unwrap_or_else(Value::object);
            Some(bridge.apply_mutations(base, &change.delta, resolver)?)
        };
        expected.insert(
            key,
            ExpectedState {
                kind: change.kind,
                doc,
            },
        );
    }

    for (key, state) in &expected {
        let absent_reason = match state.kind {
            UpdateType::Delete => "was not deleted",
            UpdateType::Purge => "was not purged",
            UpdateType::Update => "should not exist",
        };
        let actual = store.get(key)?;
        if let Some(failure) = check_document(
            key,
            state.doc.as_ref(),
            actual.as_ref(),
            absent_reason,
            bridge,
            validator,
        ) {
            return Ok(failure);
        }
    }

    for (key, captured) in snapshot.iter() {
        if expected.contains_key(key) {
            continue;
        }
        let actual = store.get(key)?;
        if let Some(failure) = check_document(
            key,
            captured,
            actual.as_ref(),
            "should not exist",
            bridge,
            validator,
        ) {
            return Ok(failure);
        }
    }

    info!(
        snapshot = %snapshot.id(),
        changes = changes.len(),
        documents = snapshot.len(),
        "verification passed"
    );
    Ok(VerifyResponse::passed())
}

/// Compare one document's expected and actual state
fn check_document<V>(
    key: &DocumentKey,
    expected: Option<&Value>,
    actual: Option<&Value>,
    absent_reason: &str,
    bridge: &ValueBridge,
    validator: &V,
) -> Option<VerifyResponse>
where
    V: BlobValidator + ?Sized,
{
    let failure = match (expected, actual) {
        (None, None) => return None,
        (None, Some(actual)) => VerifyResponse::failed(key, absent_reason).with_document(actual),
        (Some(_), None) => VerifyResponse::failed(key, "was not found"),
        (Some(expected), Some(actual)) => {
            let mismatch = bridge.diff(expected, actual, validator)?;
            let reason = match mismatch.reason {
                MismatchReason::MismatchedProperty => {
                    format!("had unexpected properties at key '{}'", mismatch.path)
                }
                MismatchReason::MissingBlob => {
                    format!("had non-existing blob at key '{}'", mismatch.path)
                }
            };
            VerifyResponse {
                expected: mismatch.expected.as_ref().map(to_wire),
                actual: mismatch.actual.as_ref().map(to_wire),
                ..VerifyResponse::failed(key, reason).with_document(actual)
            }
        }
    };
    warn!(
        document = %key,
        reason = failure.description.as_deref().unwrap_or_default(),
        "verification failed"
    );
    Some(failure)
}
