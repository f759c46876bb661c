//! Mutation scenarios as sent by replication test suites

use crate::test_utils::*;

#[test]
fn test_update_creates_nested_path() {
    let result = apply(json!({}), json!({"updatedProperties": [{"$.a.b[2].c": 42}]})).unwrap();
    assert_eq!(result, json!({"a": {"b": [null, null, {"c": 42}]}}));
}

#[test]
fn test_remove_object_key() {
    let result = apply(
        json!({"a": {"b": 1, "c": 2}}),
        json!({"removedProperties": ["$.a.b"]}),
    )
    .unwrap();
    assert_eq!(result, json!({"a": {"c": 2}}));
}

#[test]
fn test_remove_array_element_shifts() {
    let result = apply(
        json!({"list": ["x", "y", "z"]}),
        json!({"removedProperties": ["list[1]"]}),
    )
    .unwrap();
    assert_eq!(result, json!({"list": ["x", "z"]}));
}

#[test]
fn test_remove_missing_paths_is_noop() {
    let doc = json!({"a": {"b": [1, 2]}});
    let result = apply(
        doc.clone(),
        json!({"removedProperties": ["$.zzz", "a.q.r", "a.b[9]"]}),
    )
    .unwrap();
    assert_eq!(result, doc);
}

#[test]
fn test_multiple_update_maps_apply_in_order() {
    let result = apply(
        json!({}),
        json!({"updatedProperties": [{"name": "first"}, {"name": "second", "tags[1]": "b"}]}),
    )
    .unwrap();
    assert_eq!(result, json!({"name": "second", "tags": [null, "b"]}));
}

#[test]
fn test_removals_run_before_updates() {
    let result = apply(
        json!({"a": {"old": true}}),
        json!({
            "updatedProperties": [{"a.new": 1}],
            "removedProperties": ["a"]
        }),
    )
    .unwrap();
    assert_eq!(result, json!({"a": {"new": 1}}));
}

#[test]
fn test_update_replaces_subtree() {
    let result = apply(
        json!({"profile": {"address": {"city": "Paris"}}}),
        json!({"updatedProperties": [{"profile.address": {"zip": "75001"}}]}),
    )
    .unwrap();
    assert_eq!(result, json!({"profile": {"address": {"zip": "75001"}}}));
}

#[test]
fn test_blob_attachment() {
    let result = apply(
        json!({"title": "pic"}),
        json!({"updatedBlobs": {"$.attachments.photo": "image.jpg"}}),
    )
    .unwrap();
    assert_eq!(result["attachments"]["photo"]["@type"], "blob");
    assert_eq!(result["attachments"]["photo"]["content_type"], "image/jpeg");
    assert_eq!(result["attachments"]["photo"]["length"], 1024);
}

#[test]
fn test_blob_overrides_update_on_same_path() {
    let result = apply(
        json!({}),
        json!({
            "updatedProperties": [{"photo": "placeholder"}],
            "updatedBlobs": {"photo": "image.jpg"}
        }),
    )
    .unwrap();
    assert_eq!(result["photo"]["@type"], "blob");
}

#[test]
fn test_unknown_blob_fails_whole_call() {
    let err = apply(json!({}), json!({"updatedBlobs": {"photo": "missing.png"}})).unwrap_err();
    assert_eq!(err, Error::Blob(BlobError::NotFound("missing.png".to_string())));
}

#[test]
fn test_update_through_scalar_fails() {
    let err = apply(
        json!({"a": 5}),
        json!({"updatedProperties": [{"a.b": 1}]}),
    )
    .unwrap_err();
    assert!(err.is_type_mismatch());
}

#[test]
fn test_invalid_path_fails_before_mutating() {
    let err = apply(
        json!({"a": 1}),
        json!({"removedProperties": ["a"], "updatedProperties": [{"$x": 1}]}),
    )
    .unwrap_err();
    assert!(matches!(err, Error::PathSyntax(_)));
}

#[test]
fn test_array_index_limit_applies() {
    let bridge = ValueBridge::new(Limits::with_small_limits());
    let err = bridge
        .apply_mutations(
            Value::object(),
            &delta(json!({"updatedProperties": [{"a[1000]": 1}]})),
            &dataset_blobs,
        )
        .unwrap_err();
    assert!(matches!(err, Error::Limit(_)));
}
