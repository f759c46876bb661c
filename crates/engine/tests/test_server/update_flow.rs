//! update_database flows

use crate::test_utils::*;

#[test]
fn test_update_creates_document() {
    let db = create_test_db();
    db.update_database(&items(json!([{
        "type": "UPDATE",
        "documentID": "doc1",
        "updatedProperties": [{"$.a.b[2].c": 42}]
    }])))
    .unwrap();
    assert_eq!(
        db.get_document(&key("doc1")).unwrap(),
        Some(json!({"a": {"b": [null, null, {"c": 42}]}}))
    );
}

#[test]
fn test_update_modifies_existing_document() {
    let db = create_test_db();
    seed(&db, &[("doc1", json!({"a": {"b": 1, "c": 2}}))]);
    db.update_database(&items(json!([{
        "type": "UPDATE",
        "documentID": "doc1",
        "removedProperties": ["$.a.b"]
    }])))
    .unwrap();
    assert_eq!(db.get_document(&key("doc1")).unwrap(), Some(json!({"a": {"c": 2}})));
}

#[test]
fn test_delete_and_purge() {
    let db = create_test_db();
    seed(&db, &[("d1", json!({})), ("d2", json!({}))]);
    db.update_database(&items(json!([
        {"type": "DELETE", "documentID": "d1"},
        {"type": "PURGE", "documentID": "d2"},
        {"type": "DELETE", "documentID": "never-existed"}
    ])))
    .unwrap();
    assert!(db.get_document(&key("d1")).unwrap().is_none());
    assert!(db.get_document(&key("d2")).unwrap().is_none());
}

#[test]
fn test_named_collection() {
    let db = create_test_db();
    db.update_database(&items(json!([{
        "type": "UPDATE",
        "collection": "inventory.hotel",
        "documentID": "h1",
        "updatedProperties": [{"name": "Grand"}]
    }])))
    .unwrap();
    let hotel = DocumentKey::new("inventory.hotel", "h1");
    assert_eq!(db.get_document(&hotel).unwrap(), Some(json!({"name": "Grand"})));
    assert!(db.get_document(&key("h1")).unwrap().is_none());
}

#[test]
fn test_failed_item_rolls_back_batch() {
    let db = create_test_db();
    seed(&db, &[("doc1", json!({"a": 5}))]);
    let err = db
        .update_database(&items(json!([
            {"type": "UPDATE", "documentID": "doc2", "updatedProperties": [{"x": 1}]},
            {"type": "UPDATE", "documentID": "doc1", "updatedProperties": [{"a.b": 1}]}
        ])))
        .unwrap_err();
    assert!(err.is_client_error());
    assert!(db.get_document(&key("doc2")).unwrap().is_none());
    assert_eq!(db.get_document(&key("doc1")).unwrap(), Some(json!({"a": 5})));
}

#[test]
fn test_unknown_collection_rejected() {
    let db = create_test_db();
    let err = db
        .update_database(&items(json!([
            {"type": "UPDATE", "collection": "nope.nope", "documentID": "x"}
        ])))
        .unwrap_err();
    assert!(matches!(err, EngineError::Store(_)));
}

#[test]
fn test_blob_without_dataset_fails() {
    let db = create_test_db();
    let err = db
        .update_database(&items(json!([{
            "type": "UPDATE",
            "documentID": "doc1",
            "updatedBlobs": {"photo": "image.jpg"}
        }])))
        .unwrap_err();
    assert!(matches!(err, EngineError::Core(_)));
    assert!(db.get_document(&key("doc1")).unwrap().is_none());
}

#[test]
fn test_put_document_requires_object() {
    let db = create_test_db();
    let err = db.put_document(key("x"), &json!([1, 2])).unwrap_err();
    assert!(matches!(err, EngineError::BadRequest(_)));
}
