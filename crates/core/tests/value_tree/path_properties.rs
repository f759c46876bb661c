//! Property tests for key path parsing and rendering

use crate::test_utils::*;
use proptest::prelude::*;

fn segment_strategy() -> impl Strategy<Value = PathSegment> {
    prop_oneof![
        "[a-zA-Z0-9_ .\\[\\]\\\\-]{1,8}".prop_map(PathSegment::Key),
        (0usize..50).prop_map(PathSegment::Index),
    ]
}

prop_compose! {
    fn key_path_strategy()(
        first in "[a-zA-Z_.\\[\\]][a-zA-Z0-9_.]{0,8}",
        rest in prop::collection::vec(segment_strategy(), 0..6),
    ) -> KeyPath {
        let mut segments = vec![PathSegment::Key(first)];
        segments.extend(rest);
        KeyPath::from_segments(segments)
    }
}

proptest! {
    #[test]
    fn test_render_then_parse_is_identity(p in key_path_strategy()) {
        let text = p.to_string();
        let parsed: KeyPath = text.parse().unwrap();
        prop_assert_eq!(parsed, p);
    }

    #[test]
    fn test_dollar_prefix_is_optional(p in key_path_strategy()) {
        let text = p.to_string();
        let with_prefix: KeyPath = format!("$.{}", text).parse().unwrap();
        prop_assert_eq!(with_prefix, p);
    }

    #[test]
    fn test_parse_never_panics(text in "\\PC{0,24}") {
        let _ = text.parse::<KeyPath>();
    }
}
