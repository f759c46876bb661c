//! snapshot_documents / verify_documents flows

use crate::test_utils::*;

fn update_name() -> Vec<DatabaseUpdateItem> {
    items(json!([{
        "type": "UPDATE",
        "documentID": "doc1",
        "updatedProperties": [{"$.name": "Bob"}],
        "removedProperties": ["$.age"]
    }]))
}

#[test]
fn test_snapshot_update_verify_passes() {
    let db = create_test_db();
    seed(&db, &[("doc1", json!({"name": "Alice", "age": 30})), ("doc2", json!({"k": 1}))]);
    let snapshot = db.snapshot_documents(&[key("doc1"), key("doc2")]).unwrap();

    let changes = update_name();
    db.update_database(&changes).unwrap();

    assert_eq!(db.verify_documents(&snapshot, &changes).unwrap(), VerifyResponse::passed());
}

#[test]
fn test_verify_detects_missed_replication() {
    let db = create_test_db();
    seed(&db, &[("doc1", json!({"name": "Alice", "age": 30}))]);
    let snapshot = db.snapshot_documents(&[key("doc1")]).unwrap();

    let response = db.verify_documents(&snapshot, &update_name()).unwrap();
    assert!(!response.result);
    assert_eq!(
        response.description.as_deref(),
        Some("Document 'doc1' in '_default._default' had unexpected properties at key 'name'")
    );
}

#[test]
fn test_verify_detects_unexpected_change() {
    let db = create_test_db();
    seed(&db, &[("doc1", json!({"list": [1, 2, 3]}))]);
    let snapshot = db.snapshot_documents(&[key("doc1")]).unwrap();
    seed(&db, &[("doc1", json!({"list": [1, 2]}))]);

    let response = db.verify_documents(&snapshot, &[]).unwrap();
    assert_eq!(
        response.description.as_deref(),
        Some("Document 'doc1' in '_default._default' had unexpected properties at key 'list[2]'")
    );
    assert_eq!(response.expected, Some(json!(3)));
    assert_eq!(response.actual, None);
}

#[test]
fn test_verify_deleted_document() {
    let db = create_test_db();
    seed(&db, &[("doc1", json!({}))]);
    let snapshot = db.snapshot_documents(&[key("doc1")]).unwrap();
    let changes = items(json!([{"type": "DELETE", "documentID": "doc1"}]));

    let before = db.verify_documents(&snapshot, &changes).unwrap();
    assert_eq!(
        before.description.as_deref(),
        Some("Document 'doc1' in '_default._default' was not deleted")
    );

    db.update_database(&changes).unwrap();
    assert!(db.verify_documents(&snapshot, &changes).unwrap().result);
}

#[test]
fn test_unknown_snapshot() {
    let db = create_test_db();
    let snapshot = db.snapshot_documents(&[key("doc1")]).unwrap();
    assert!(db.release_snapshot(&snapshot));
    let err = db.verify_documents(&snapshot, &[]).unwrap_err();
    assert!(err.is_client_error());
}

#[test]
fn test_verify_response_wire_form() {
    let db = create_test_db();
    seed(&db, &[("doc1", json!({"name": "Alice"}))]);
    let snapshot = db.snapshot_documents(&[key("doc1")]).unwrap();
    let response = db.verify_documents(&snapshot, &update_name()).unwrap();
    let wire = serde_json::to_value(&response).unwrap();
    assert_eq!(wire["result"], false);
    assert_eq!(wire["document"], json!({"name": "Alice"}));
    assert_eq!(wire["expected"], json!("Bob"));
    assert_eq!(wire["actual"], json!("Alice"));

    let passed = serde_json::to_value(VerifyResponse::passed()).unwrap();
    assert_eq!(passed, json!({"result": true}));
}
