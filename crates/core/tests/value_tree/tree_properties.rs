//! Property tests for mutation and comparison

use crate::test_utils::*;
use proptest::prelude::*;
use replikit_core::{remove_at_path, set_at_path};

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        prop::num::f64::NORMAL.prop_map(Value::Double),
        "[a-z]{0,12}".prop_map(Value::String),
    ]
}

fn segment_strategy() -> impl Strategy<Value = PathSegment> {
    prop_oneof![
        "[a-z]{1,4}".prop_map(PathSegment::Key),
        (0usize..8).prop_map(PathSegment::Index),
    ]
}

prop_compose! {
    fn key_path_strategy()(
        first in "[a-z]{1,4}",
        rest in prop::collection::vec(segment_strategy(), 0..5),
    ) -> KeyPath {
        let mut segments = vec![PathSegment::Key(first)];
        segments.extend(rest);
        KeyPath::from_segments(segments)
    }
}

proptest! {
    #[test]
    fn test_update_then_get_round_trips(p in key_path_strategy(), v in scalar_strategy()) {
        let mut doc = Value::object();
        set_at_path(&mut doc, &p, v.clone(), &Limits::default()).unwrap();
        prop_assert_eq!(get_at_path(&doc, &p), Some(&v));
    }

    #[test]
    fn test_removing_missing_path_twice_is_stable(p in key_path_strategy()) {
        prop_assume!(!matches!(p.segments().first(), Some(PathSegment::Key(k)) if k == "zz"));
        let original = tree(json!({"zz": {"kept": [1, 2, 3]}}));
        let mut doc = original.clone();
        prop_assert_eq!(remove_at_path(&mut doc, &p, &Limits::default()).unwrap(), None);
        let once = doc.clone();
        prop_assert_eq!(remove_at_path(&mut doc, &p, &Limits::default()).unwrap(), None);
        prop_assert_eq!(&doc, &once);
        prop_assert_eq!(doc, original);
    }

    #[test]
    fn test_array_padding(k in 0usize..64, v in scalar_strategy()) {
        let mut doc = tree(json!({"list": []}));
        let p = KeyPath::root().key("list").index(k);
        set_at_path(&mut doc, &p, v.clone(), &Limits::default()).unwrap();
        let list = doc.get("list").and_then(Value::as_array).unwrap();
        prop_assert_eq!(list.len(), k + 1);
        prop_assert!(list[..k].iter().all(Value::is_null));
        prop_assert_eq!(&list[k], &v);
    }

    #[test]
    fn test_tree_equals_itself(p in key_path_strategy(), v in scalar_strategy()) {
        let mut doc = Value::object();
        set_at_path(&mut doc, &p, v, &Limits::default()).unwrap();
        let (equal, at) = value_is_equals(&doc, &doc.clone(), &AssumeBlobsExist);
        prop_assert!(equal);
        prop_assert!(at.is_none());
    }
}
