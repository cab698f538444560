//! Property-based tests for virtual path handling.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::overlay::PathConverter;
    use crate::path::{clean, glob_match, is_absolute, join, parent, strip_root};
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn segments() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[a-z0-9_]{1,8}", 1..6)
    }

    // ============================================================================
    // clean
    // ============================================================================

    proptest! {
        /// Property: cleaning is idempotent
        #[test]
        fn clean_is_idempotent(input in "[a-z./]{0,30}") {
            let once = clean(&input);
            prop_assert_eq!(clean(&once), once.clone());
        }

        /// Property: cleaning preserves absoluteness
        #[test]
        fn clean_preserves_absoluteness(input in "[a-z./]{0,30}") {
            prop_assert_eq!(is_absolute(&clean(&input)), is_absolute(&input));
        }

        /// Property: cleaned absolute paths carry no empty, `.` or `..` segments
        #[test]
        fn clean_absolute_has_no_dot_segments(input in "/[a-z./]{0,30}") {
            let cleaned = clean(&input);
            if cleaned != "/" {
                for segment in cleaned[1..].split('/') {
                    prop_assert!(!segment.is_empty(), "empty segment in {}", cleaned);
                    prop_assert!(segment != "." && segment != "..", "dot segment in {}", cleaned);
                }
            }
        }
    }

    // ============================================================================
    // join / parent / strip_root
    // ============================================================================

    proptest! {
        /// Property: joining a path's last segment onto its parent gives it back
        #[test]
        fn parent_then_join_round_trips(parts in segments()) {
            let full = format!("/{}", parts.join("/"));
            let last = parts.last().unwrap();
            prop_assert_eq!(join(&parent(&full), last), full.clone());
        }

        /// Property: strip_root undoes join for relative clean paths
        #[test]
        fn strip_root_undoes_join(root in segments(), rel in segments()) {
            let root = format!("/{}", root.join("/"));
            let rel = rel.join("/");
            let joined = join(&root, &rel);
            prop_assert_eq!(strip_root(&joined, &root), Some(rel.as_str()));
            prop_assert_eq!(strip_root(&joined, "/"), Some(&joined[1..]));
        }

        /// Property: a literal path matches itself as a glob
        #[test]
        fn literal_glob_matches_itself(parts in segments()) {
            let full = format!("/{}", parts.join("/"));
            prop_assert!(glob_match(&full, &full).unwrap());
        }

        /// Property: `*` never crosses a separator
        #[test]
        fn star_matches_only_direct_children(parts in segments()) {
            let full = format!("/root/{}", parts.join("/"));
            prop_assert_eq!(glob_match("/root/*", &full).unwrap(), parts.len() == 1);
        }
    }

    // ============================================================================
    // PathConverter
    // ============================================================================

    proptest! {
        /// Property: source -> target -> source is the identity below the root
        #[test]
        fn converter_round_trips(rel in segments(), target in segments()) {
            let target_root = format!("/{}", target.join("/"));
            let converter = PathConverter::new("/mnt/source", target_root.clone());

            let source = PathBuf::from("/mnt/source").join(rel.join("/"));
            let virtual_path = converter.source_to_target(&source).unwrap();

            prop_assert!(virtual_path.starts_with(&target_root));
            prop_assert_eq!(converter.target_to_source(&virtual_path).unwrap(), source);
        }
    }
}
