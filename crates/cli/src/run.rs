//! Action execution.
//!
//! Each handler returns the formatted output and whether the command
//! succeeded; `main` maps that onto the process exit code.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use replikit_core::{to_wire, AssumeBlobsExist, BlobResolver, NoBlobs, Value, WireDelta};
use replikit_engine::{
    DatabaseUpdateItem, DocumentKey, ServerConfig, TestDatabase, ValueBridge, CONFIG_FILE_NAME,
};
use replikit_store::{BlobStore, DatasetBlobResolver};
use tracing::info;

use crate::format::{format_comparison, format_document, format_verify, OutputMode};
use crate::parse::CliAction;

/// Output of one action.
#[derive(Debug)]
pub struct Outcome {
    pub output: String,
    pub success: bool,
}

impl Outcome {
    fn ok(output: String) -> Self {
        Outcome {
            output,
            success: true,
        }
    }
}

/// Execute an action against a configuration.
pub fn run(action: CliAction, config: ServerConfig, mode: OutputMode) -> anyhow::Result<Outcome> {
    match action {
        CliAction::Apply {
            doc,
            delta,
            dataset,
        } => run_apply(doc.as_deref(), &delta, with_dataset(config, dataset), mode),
        CliAction::Compare { expected, actual } => run_compare(&expected, &actual, &config, mode),
        CliAction::Verify {
            before,
            changes,
            after,
            dataset,
        } => run_verify(&before, &changes, &after, with_dataset(config, dataset), mode),
        CliAction::Init { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            ServerConfig::write_default_if_missing(&path)?;
            Ok(Outcome::ok(format!("Config at {}", path.display())))
        }
    }
}

fn with_dataset(mut config: ServerConfig, dataset: Option<PathBuf>) -> ServerConfig {
    if dataset.is_some() {
        config.dataset_dir = dataset;
    }
    config
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in '{}'", path.display()))
}

fn run_apply(
    doc: Option<&Path>,
    delta: &Path,
    config: ServerConfig,
    mode: OutputMode,
) -> anyhow::Result<Outcome> {
    let bridge = ValueBridge::new(config.limits);
    let doc = match doc {
        Some(path) => bridge.decode(&read_json(path)?)?,
        None => Value::object(),
    };
    let delta: WireDelta = serde_json::from_value(read_json(delta)?)
        .with_context(|| format!("Invalid delta in '{}'", delta.display()))?;

    let resolver = config
        .dataset_dir
        .as_ref()
        .map(|dir| DatasetBlobResolver::new(dir.clone(), Arc::new(BlobStore::new())));
    let resolver: &dyn BlobResolver = match &resolver {
        Some(resolver) => resolver,
        None => &NoBlobs,
    };

    let result = bridge.apply_mutations(doc, &delta, resolver)?;
    Ok(Outcome::ok(format_document(&to_wire(&result), mode)))
}

fn run_compare(
    expected: &Path,
    actual: &Path,
    config: &ServerConfig,
    mode: OutputMode,
) -> anyhow::Result<Outcome> {
    let bridge = ValueBridge::new(config.limits);
    let expected = bridge.decode(&read_json(expected)?)?;
    let actual = bridge.decode(&read_json(actual)?)?;
    let mismatch = bridge.diff(&expected, &actual, &AssumeBlobsExist);
    Ok(Outcome {
        output: format_comparison(mismatch.as_ref(), mode),
        success: mismatch.is_none(),
    })
}

/// Documents by id; `null` marks an absent document.
fn read_documents(path: &Path) -> anyhow::Result<BTreeMap<String, serde_json::Value>> {
    match read_json(path)? {
        serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
        other => bail!(
            "'{}' must hold a JSON object of document id to document, found {}",
            path.display(),
            json_type(&other)
        ),
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Replay a before state, snapshot it, install the after state and verify
/// it against the changes.
fn run_verify(
    before: &Path,
    changes: &Path,
    after: &Path,
    config: ServerConfig,
    mode: OutputMode,
) -> anyhow::Result<Outcome> {
    let before_docs = read_documents(before)?;
    let after_docs = read_documents(after)?;
    let changes: Vec<DatabaseUpdateItem> = serde_json::from_value(read_json(changes)?)
        .with_context(|| format!("Invalid update items in '{}'", changes.display()))?;

    let db = TestDatabase::new(config);
    for (id, doc) in before_docs.iter().filter(|(_, doc)| !doc.is_null()) {
        db.put_document(db.default_key(id.as_str()), doc)?;
    }

    let mut keys: Vec<DocumentKey> = before_docs
        .keys()
        .map(|id| db.default_key(id.as_str()))
        .chain(changes.iter().map(|item| item.key(&db.config().default_collection)))
        .collect();
    keys.sort();
    keys.dedup();
    let snapshot = db.snapshot_documents(&keys)?;

    // Install the after state: documents are replaced, nulls are deleted.
    let default_collection = db.config().default_collection.clone();
    let mut deletions = Vec::new();
    for (id, doc) in &after_docs {
        if doc.is_null() {
            deletions.push(DatabaseUpdateItem::delete(default_collection.as_str(), id.as_str()));
        } else {
            db.put_document(db.default_key(id.as_str()), doc)?;
        }
    }
    db.update_database(&deletions)?;
    let loaded = load_change_blobs(&db, &changes)?;

    let response = db.verify_documents(&snapshot, &changes)?;
    db.release_snapshot(&snapshot);
    info!(
        result = response.result,
        documents = keys.len(),
        blobs = loaded,
        "verification finished"
    );
    Ok(Outcome {
        output: format_verify(&response, mode),
        success: response.result,
    })
}

/// Load every dataset blob named by `changes` into the database
///
/// The after state only carries blob references; replicated blob content
/// is taken from the dataset. Without a dataset nothing is loaded.
fn load_change_blobs(db: &TestDatabase, changes: &[DatabaseUpdateItem]) -> anyhow::Result<usize> {
    let dir = match &db.config().dataset_dir {
        Some(dir) => dir.clone(),
        None => return Ok(0),
    };
    let resolver = DatasetBlobResolver::new(dir, Arc::clone(db.blobs()));
    let mut loaded = 0;
    for change in changes.iter().filter(|c| !c.kind.removes_document()) {
        for name in change.delta.updated_blobs.iter().flat_map(|blobs| blobs.values()) {
            resolver.resolve(name).with_context(|| {
                format!("Failed to load blob '{}' for '{}'", name, change.document_id)
            })?;
            loaded += 1;
        }
    }
    Ok(loaded)
}
