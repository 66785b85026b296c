//! Tier 2: Incremental Maintenance
//!
//! Updates touch only keywords that changed; removal recomputes keywords from
//! the stored text.

use super::test_utils::*;
use vnsearch::{AddOptions, Error, Keyword, RemoveOptions, TextKey, TextRecord, UpdateOptions};

// ============================================================================
// Diff Correctness
// ============================================================================

/// "ao dai" → "ao dai dep" gains only "dep"
#[test]
fn test_tier2_update_appends_keyword() {
    let mut search = engine(&[("1", "ao dai")]);
    let summary = search
        .update_object(TextRecord::new("1", "ao dai dep"), UpdateOptions::default())
        .unwrap();

    assert!(summary.removed_keywords.is_empty());
    assert_eq!(summary.new_keywords, vec!["dep"]);
    assert_eq!(summary.updated, 1);
}

/// Unchanged keywords keep their leaves while changed ones move
#[test]
fn test_tier2_unchanged_leaves_untouched() {
    let mut search = engine(&[("1", "ao dai"), ("2", "ao so mi")]);
    let ao_before = index_of(&search, "default").branch("a").cloned();

    search
        .update_object(TextRecord::new("1", "ao dai dep"), UpdateOptions::default())
        .unwrap();

    let index = index_of(&search, "default");
    assert_eq!(index.branch("a").cloned(), ao_before);
    assert!(index.contains(&TextKey::from("1"), &Keyword::new("dep")));
}

/// Swapping one word removes exactly that word
#[test]
fn test_tier2_update_swaps_keyword() {
    let mut search = engine(&[("1", "bán áo"), ("2", "áo")]);
    let summary = search
        .update_object(TextRecord::new("1", "bán quần"), UpdateOptions::default())
        .unwrap();

    assert_eq!(summary.removed_keywords, vec!["áo"]);
    assert_eq!(summary.new_keywords, vec!["quần"]);

    let index = index_of(&search, "default");
    assert!(!index.contains(&TextKey::from("1"), &Keyword::new("áo")));
    assert!(index.contains(&TextKey::from("2"), &Keyword::new("áo")));
}

/// Incremental updates end in the same index as a fresh build
#[test]
fn test_tier2_incremental_equals_rebuild() {
    let mut search = engine(&[("1", "bán áo dài"), ("2", "áo sơ mi"), ("3", "quần tây")]);
    search
        .update_object(TextRecord::new("1", "áo dài đẹp"), UpdateOptions::default())
        .unwrap();
    search
        .remove_object("3", None, RemoveOptions::default())
        .unwrap();
    search
        .add_object(TextRecord::new("4", "mũ bảo hiểm"), AddOptions::default())
        .unwrap();

    let rebuilt = engine(&[("1", "áo dài đẹp"), ("2", "áo sơ mi"), ("4", "mũ bảo hiểm")]);
    assert_eq!(index_of(&search, "default"), index_of(&rebuilt, "default"));
}

/// A keyword-identical update still refreshes the stored record
#[test]
fn test_tier2_update_refreshes_metadata() {
    let mut search = engine(&[("1", "Phở bò")]);
    let before = index_of(&search, "default");

    let updated = TextRecord::new("1", "phở BÒ").with_metadata("price", serde_json::json!(45000));
    let summary = search
        .update_object(updated, UpdateOptions::default())
        .unwrap();

    assert!(summary.new_keywords.is_empty() && summary.removed_keywords.is_empty());
    assert_eq!(index_of(&search, "default"), before);
    let stored = search.get_object("1", None).unwrap();
    assert_eq!(stored.text, "phở BÒ");
    assert_eq!(stored.metadata["price"], 45000);
}

// ============================================================================
// Batch Semantics
// ============================================================================

/// A failing batch leaves nothing applied
#[test]
fn test_tier2_update_many_validates_all_first() {
    let mut search = engine(&[("1", "áo"), ("2", "quần")]);
    let before = index_of(&search, "default");

    let err = search
        .update_many_objects(
            vec![TextRecord::new("1", "mũ"), TextRecord::new("9", "giày")],
            UpdateOptions::default(),
        )
        .unwrap_err();

    assert_eq!(err, Error::key_not_found("default", "9"));
    assert_eq!(index_of(&search, "default"), before);
    assert_eq!(search.get_object("1", None).unwrap().text, "áo");
}

/// Batch update reports per-partition counts and merged deltas
#[test]
fn test_tier2_update_many_counts() {
    let mut search = engine(&[("1", "áo"), ("2", "quần")]);
    let summary = search
        .update_many_objects(
            vec![
                TextRecord::new("1", "áo mới"),
                TextRecord::new("2", "quần mới"),
                TextRecord::new("3", "mũ").with_partition("hats"),
            ],
            UpdateOptions::upsert(),
        )
        .unwrap();

    assert_eq!(summary.updated, 2);
    assert_eq!(summary.added, 1);
    assert_eq!(summary.new_keywords, vec!["mới", "mũ"]);
    assert_eq!(summary.partitions["default"].updated, 2);
    assert_eq!(summary.partitions["hats"].added, 1);
}

// ============================================================================
// Removal
// ============================================================================

/// Removal recomputes keywords from the stored text
#[test]
fn test_tier2_remove_uses_stored_text() {
    let mut search = engine(&[("1", "Khách sạn Vincom")]);
    let summary = search
        .remove_object("1", None, RemoveOptions::default())
        .unwrap();

    assert_eq!(summary.removed_keywords, vec!["khách", "sạn", "vincom"]);
    assert!(index_of(&search, "default").is_empty());
}

/// Force turns missing keys into no-ops
#[test]
fn test_tier2_force_remove_missing() {
    let mut search = engine(&[("1", "áo")]);
    let summary = search
        .remove_many_objects(&["1", "404"], None, RemoveOptions::force())
        .unwrap();

    assert_eq!(summary.removed, 1);
    assert!(search.is_empty());
}
