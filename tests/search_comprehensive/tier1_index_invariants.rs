//! Tier 1: Index Invariants
//!
//! A key sits at a leaf iff that keyword was extracted from the key's current
//! text, and no empty node ever persists.

use super::test_utils::*;
use vnsearch::{
    extract_keywords, AddOptions, Keyword, KeywordIndex, RemoveOptions, TextKey, TextRecord,
};

// ============================================================================
// Round-Trip
// ============================================================================

/// Adding then removing a record restores the index exactly
#[test]
fn test_tier1_add_remove_round_trip() {
    let mut search = engine(&[("1", "Khách sạn Vincom"), ("2", "Nhà hàng Phở Bò")]);
    let before = index_of(&search, "default");

    search
        .add_object(TextRecord::new("3", "Khách sạn Mường Thanh"), AddOptions::default())
        .unwrap();
    assert_ne!(index_of(&search, "default"), before);

    search
        .remove_object("3", None, RemoveOptions::default())
        .unwrap();
    let after = index_of(&search, "default");

    assert_eq!(after, before);
    assert!(after.is_well_formed());
}

/// Removing the only record of a sound class prunes its whole branch
#[test]
fn test_tier1_remove_prunes_to_root() {
    let mut search = engine(&[("1", "khách"), ("2", "trường")]);
    assert!(index_of(&search, "default").branch("tr").is_some());

    search
        .remove_object("2", None, RemoveOptions::default())
        .unwrap();

    let index = index_of(&search, "default");
    assert!(index.branch("tr").is_none());
    assert_eq!(index.sound_classes(), 1);
    assert!(index.is_well_formed());
}

/// Removing every record leaves an empty index
#[test]
fn test_tier1_remove_all_leaves_empty_index() {
    let mut search = engine(&[("1", "áo dài"), ("2", "áo sơ mi"), ("3", "quần")]);
    search
        .remove_many_objects(&["1", "2", "3"], None, RemoveOptions::default())
        .unwrap();

    assert_eq!(index_of(&search, "default"), KeywordIndex::new());
    assert_eq!(search.stats().leaf_paths, 0);
    assert_eq!(search.stats().postings, 0);
}

// ============================================================================
// Idempotence
// ============================================================================

/// Indexing the same contribution twice equals indexing it once
#[test]
fn test_tier1_contribution_idempotent() {
    let key = TextKey::from("1");
    let keywords = extract_keywords("bán áo dài", true);

    let mut once = KeywordIndex::new();
    once.add_contribution(&key, &keywords);

    let mut twice = KeywordIndex::new();
    twice.add_contribution(&key, &keywords);
    twice.add_contribution(&key, &keywords);

    assert_eq!(once, twice);
    assert_eq!(twice.postings(), 3);
}

/// Replacing a record with the same text leaves the index untouched
#[test]
fn test_tier1_replace_same_text_idempotent() {
    let mut search = engine(&[("1", "Áo dài đẹp")]);
    let before = index_of(&search, "default");

    let summary = search
        .add_object(TextRecord::new("1", "Áo dài đẹp"), AddOptions::replace())
        .unwrap();

    assert_eq!(summary.updated, 1);
    assert!(summary.new_keywords.is_empty());
    assert!(summary.removed_keywords.is_empty());
    assert_eq!(index_of(&search, "default"), before);
}

// ============================================================================
// Leaf Membership
// ============================================================================

/// Each extracted keyword has exactly its own leaf
#[test]
fn test_tier1_leaf_membership_matches_text() {
    let search = engine(&[("1", "Phở bò tái"), ("2", "Phở gà")]);
    let index = index_of(&search, "default");
    let one = TextKey::from("1");
    let two = TextKey::from("2");

    assert!(index.contains(&one, &Keyword::new("phở")));
    assert!(index.contains(&two, &Keyword::new("phở")));
    assert!(index.contains(&one, &Keyword::new("tái")));
    assert!(!index.contains(&two, &Keyword::new("tái")));
    assert!(!index.contains(&one, &Keyword::new("pho")));
    assert_eq!(index.leaf_paths(), 4);
    assert_eq!(index.postings(), 5);
}

/// Case folding merges spellings onto one leaf
#[test]
fn test_tier1_case_folded_leaves() {
    let search = engine(&[("1", "KHÁCH SẠN"), ("2", "khách sạn")]);
    let index = index_of(&search, "default");
    assert_eq!(index.leaf_paths(), 2);
    assert_eq!(index.postings(), 4);
}
