//! Shared helpers for replication scenarios

pub use replikit::{DatabaseUpdateItem, DocumentKey, ServerConfig, TestDatabase};
pub use serde_json::json;
use tempfile::TempDir;

/// Dataset directory holding `blobs/image.jpg`
pub fn create_dataset() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let blobs = dir.path().join("blobs");
    std::fs::create_dir_all(&blobs).expect("blobs dir");
    std::fs::write(blobs.join("image.jpg"), b"\xff\xd8\xff\xe0replicated").expect("write blob");
    dir
}

/// Database over `dataset` with an extra collection
pub fn create_db(dataset: &TempDir) -> TestDatabase {
    TestDatabase::new(ServerConfig {
        dataset_dir: Some(dataset.path().to_path_buf()),
        collections: vec!["inventory.route".to_string()],
        ..ServerConfig::default()
    })
}

/// Copy `keys` from `source` to `target`, including referenced blob bytes
pub fn replicate(source: &TestDatabase, target: &TestDatabase, keys: &[DocumentKey]) {
    for key in keys {
        match source.get_document(key).expect("read source") {
            Some(doc) => {
                copy_blobs(source, target, &doc);
                target.put_document(key.clone(), &doc).expect("write target");
            }
            None => {
                let item = DatabaseUpdateItem::delete(key.collection.clone(), key.id.clone());
                target.update_database(&[item]).expect("delete target");
            }
        }
    }
}

fn copy_blobs(source: &TestDatabase, target: &TestDatabase, doc: &serde_json::Value) {
    match doc {
        serde_json::Value::Object(map) if map.get("@type") == Some(&json!("blob")) => {
            let digest = map["digest"].as_str().expect("blob digest");
            let content_type = map["content_type"].as_str().expect("blob content type");
            let bytes = source.blobs().get(digest).expect("source blob");
            target.blobs().put(content_type, bytes.as_ref().clone());
        }
        serde_json::Value::Object(map) => {
            for value in map.values() {
                copy_blobs(source, target, value);
            }
        }
        serde_json::Value::Array(items) => {
            for value in items {
                copy_blobs(source, target, value);
            }
        }
        _ => {}
    }
}
