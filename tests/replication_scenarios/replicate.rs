use crate::test_utils::*;

fn changes() -> Vec<DatabaseUpdateItem> {
    serde_json::from_value(json!([
        {
            "type": "UPDATE",
            "documentID": "hotel_1",
            "updatedProperties": [{"$.name": "Grand", "$.rooms[2].beds": 2}],
            "removedProperties": ["$.closed"],
            "updatedBlobs": {"$.photos[0]": "image.jpg"}
        },
        {
            "type": "UPDATE",
            "collection": "inventory.route",
            "documentID": "route_7",
            "updatedProperties": [{"$.stops": ["SFO", "LAX"]}]
        },
        {"type": "PURGE", "documentID": "hotel_2"}
    ]))
    .expect("valid changes")
}

fn touched_keys() -> Vec<DocumentKey> {
    vec![
        DocumentKey::new("_default._default", "hotel_1"),
        DocumentKey::new("_default._default", "hotel_2"),
        DocumentKey::new("_default._default", "hotel_3"),
        DocumentKey::new("inventory.route", "route_7"),
    ]
}

/// Source and target start out with the same documents
fn setup() -> (tempfile::TempDir, TestDatabase, TestDatabase) {
    let dataset = create_dataset();
    let source = create_db(&dataset);
    let target = create_db(&dataset);
    for db in [&source, &target] {
        db.put_document(db.default_key("hotel_1"), &json!({"closed": true}))
            .unwrap();
        db.put_document(db.default_key("hotel_2"), &json!({"name": "Old"}))
            .unwrap();
        db.put_document(db.default_key("hotel_3"), &json!({"name": "Untouched"}))
            .unwrap();
    }
    (dataset, source, target)
}

#[test]
fn test_full_replication_verifies() {
    let (_dataset, source, target) = setup();
    let snapshot = target.snapshot_documents(&touched_keys()).unwrap();

    source.update_database(&changes()).unwrap();
    replicate(&source, &target, &touched_keys());

    let response = target.verify_documents(&snapshot, &changes()).unwrap();
    assert!(response.result, "{:?}", response.description);

    let hotel = target.get_document(&target.default_key("hotel_1")).unwrap().unwrap();
    assert_eq!(hotel["rooms"], json!([null, null, {"beds": 2}]));
    assert_eq!(hotel["photos"][0]["content_type"], "image/jpeg");
    assert!(hotel.get("closed").is_none());
}

#[test]
fn test_missing_replicated_blob_fails() {
    let (_dataset, source, target) = setup();
    let snapshot = target.snapshot_documents(&touched_keys()).unwrap();

    source.update_database(&changes()).unwrap();
    // Documents arrive without their blob bytes.
    for key in touched_keys() {
        match source.get_document(&key).unwrap() {
            Some(doc) => {
                target.put_document(key, &doc).unwrap();
            }
            None => {
                target
                    .update_database(&[DatabaseUpdateItem::delete(key.collection, key.id)])
                    .unwrap();
            }
        }
    }

    let response = target.verify_documents(&snapshot, &changes()).unwrap();
    assert!(!response.result);
    let description = response.description.unwrap();
    assert!(
        description.contains("had non-existing blob at key 'photos[0]'"),
        "{}",
        description
    );
}

#[test]
fn test_partial_replication_fails() {
    let (_dataset, source, target) = setup();
    let snapshot = target.snapshot_documents(&touched_keys()).unwrap();

    source.update_database(&changes()).unwrap();
    let keys = touched_keys();
    replicate(&source, &target, &keys[..1]);

    let response = target.verify_documents(&snapshot, &changes()).unwrap();
    assert!(!response.result);
    assert!(response.description.unwrap().contains("'hotel_2'"));
}

#[test]
fn test_config_file_drives_database() {
    let dataset = create_dataset();
    let path = dataset.path().join(replikit::CONFIG_FILE_NAME);
    ServerConfig {
        dataset_dir: Some(dataset.path().to_path_buf()),
        collections: vec!["inventory.route".to_string()],
        ..ServerConfig::default()
    }
    .write_to_file(&path)
    .unwrap();

    let db = TestDatabase::new(ServerConfig::from_file(&path).unwrap());
    db.update_database(&changes()).unwrap();
    let route = db
        .get_document(&DocumentKey::new("inventory.route", "route_7"))
        .unwrap()
        .unwrap();
    assert_eq!(route, json!({"stops": ["SFO", "LAX"]}));
}
