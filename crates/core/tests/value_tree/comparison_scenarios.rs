//! Comparison scenarios

use crate::test_utils::*;

#[test]
fn test_key_order_is_irrelevant() {
    assert_eq!(compare(json!({"a": 1, "b": 2}), json!({"b": 2, "a": 1})), (true, None));
}

#[test]
fn test_array_length_mismatch_index() {
    assert_eq!(compare(json!([1, 2, 3]), json!([1, 2])), (false, Some("[2]".to_string())));
}

#[test]
fn test_nested_mismatch_path() {
    assert_eq!(
        compare(
            json!({"user": {"emails": ["a@x", "b@x"]}}),
            json!({"user": {"emails": ["a@x", "c@x"]}})
        ),
        (false, Some("user.emails[1]".to_string()))
    );
}

#[test]
fn test_escaped_key_in_mismatch_path() {
    assert_eq!(
        compare(json!({"a.b": 1}), json!({"a.b": 2})),
        (false, Some(r"a\.b".to_string()))
    );
}

#[test]
fn test_missing_blob_reported_at_blob_path() {
    let doc = apply(
        json!({}),
        json!({"updatedBlobs": {"files[0].content": "image.jpg"}}),
    )
    .unwrap();
    let value = tree(doc);
    let missing = |_: &BlobRef| false;
    let bridge = ValueBridge::default();
    let (equal, at) = bridge.compare(&value, &value.clone(), &missing);
    assert!(!equal);
    assert_eq!(at.unwrap().to_string(), "files[0].content");
}

#[test]
fn test_present_blob_compares_equal() {
    let doc = tree(apply(json!({}), json!({"updatedBlobs": {"photo": "image.jpg"}})).unwrap());
    let present = |b: &BlobRef| *b == sample_blob();
    let (equal, at) = ValueBridge::default().compare(&doc, &doc.clone(), &present);
    assert!(equal);
    assert!(at.is_none());
}

#[test]
fn test_compare_is_symmetric_on_equal_trees() {
    let a = json!({"x": [1, {"y": null}], "z": "s"});
    let b = json!({"z": "s", "x": [1, {"y": null}]});
    assert_eq!(compare(a.clone(), b.clone()), compare(b, a));
}

#[test]
fn test_integer_and_float_forms_are_equal() {
    assert_eq!(compare(json!({"n": 3}), json!({"n": 3.0})), (true, None));
}
