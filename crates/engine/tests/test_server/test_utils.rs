//! Shared helpers for test server flows

pub use replikit_engine::{
    DatabaseUpdateItem, DocumentKey, EngineError, ServerConfig, TestDatabase, VerifyResponse,
};
pub use serde_json::json;
use tempfile::TempDir;

pub const COLL: &str = "_default._default";

/// Key in the default collection
pub fn key(id: &str) -> DocumentKey {
    DocumentKey::new(COLL, id)
}

/// Decode a list of update items
pub fn items(v: serde_json::Value) -> Vec<DatabaseUpdateItem> {
    serde_json::from_value(v).expect("valid update items")
}

/// Database without a dataset
pub fn create_test_db() -> TestDatabase {
    TestDatabase::new(ServerConfig {
        collections: vec!["inventory.hotel".to_string()],
        ..ServerConfig::default()
    })
}

/// Database whose dataset holds `blobs/image.jpg` and `blobs/doc.bin`
pub fn create_test_db_with_dataset() -> (TempDir, TestDatabase) {
    let dir = TempDir::new().expect("temp dir");
    let blobs = dir.path().join("blobs");
    std::fs::create_dir_all(&blobs).expect("blobs dir");
    std::fs::write(blobs.join("image.jpg"), b"\xff\xd8\xff\xe0fake-jpeg").expect("write blob");
    std::fs::write(blobs.join("doc.bin"), b"\x00\x01\x02").expect("write blob");
    let db = TestDatabase::new(ServerConfig {
        dataset_dir: Some(dir.path().to_path_buf()),
        ..ServerConfig::default()
    });
    (dir, db)
}

/// Seed documents into the default collection
pub fn seed(db: &TestDatabase, docs: &[(&str, serde_json::Value)]) {
    for (id, doc) in docs {
        db.put_document(key(id), doc).expect("seed document");
    }
}
