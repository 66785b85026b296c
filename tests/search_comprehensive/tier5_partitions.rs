//! Tier 5: Partitions
//!
//! Partitions are independent namespaces; the default partition always
//! exists.

use super::test_utils::*;
use vnsearch::{
    AddOptions, Error, RemoveOptions, SearchConfig, SearchOptions, TextRecord, TextSearch,
    DEFAULT_PARTITION,
};

fn two_partitions() -> TextSearch {
    let records = vec![
        TextRecord::new("a1", "Khách sạn Vincom").with_partition("a"),
        TextRecord::new("a2", "Khách sạn ABC").with_partition("a"),
        TextRecord::new("b1", "Khách sạn Mường Thanh").with_partition("b"),
        TextRecord::new("d1", "Nhà hàng"),
    ];
    TextSearch::initialize(records, SearchConfig::default())
        .unwrap()
        .0
}

/// Removing partition "b" changes nothing observable in "a"
#[test]
fn test_tier5_partition_isolation() {
    let mut search = two_partitions();
    let only_a = SearchOptions::new().partitions(["a"]);

    let results_before = search.search("khach san", &only_a).unwrap();
    let stats_before = search.partition("a").unwrap().stats();
    let index_before = index_of(&search, "a");

    search.remove_partitions(&["b"]).unwrap();

    let results_after = search.search("khach san", &only_a).unwrap();
    assert_same_results(&results_before, &results_after);
    assert_eq!(search.partition("a").unwrap().stats(), stats_before);
    assert_eq!(index_of(&search, "a"), index_before);
    assert_eq!(results_after.keys(), vec!["a1", "a2"]);
}

/// The default partition can never be removed
#[test]
fn test_tier5_default_partition_protected() {
    let mut search = two_partitions();
    let err = search.remove_partitions(&[DEFAULT_PARTITION]).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(search.partition(DEFAULT_PARTITION).is_some());
}

/// A rejected name aborts the whole removal
#[test]
fn test_tier5_remove_partitions_all_or_nothing() {
    let mut search = two_partitions();
    let err = search.remove_partitions(&["a", "default"]).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(search.partition_names(), vec!["a", "b", "default"]);
}

/// Searching all partitions covers every namespace
#[test]
fn test_tier5_search_defaults_to_all_partitions() {
    let search = two_partitions();
    let results = search_all(&search, "khach san");
    assert_eq!(results.keys(), vec!["a1", "a2", "b1"]);
    assert_eq!(results.partitions, vec!["a", "b", "default"]);
}

/// Selecting a subset restricts the results and is echoed back
#[test]
fn test_tier5_search_subset() {
    let search = two_partitions();
    let results = search
        .search("khach san", &SearchOptions::new().partitions(["b", "default"]))
        .unwrap();
    assert_eq!(results.keys(), vec!["b1"]);
    assert_eq!(results.partitions, vec!["b", "default"]);
}

/// The same key may live in two partitions independently
#[test]
fn test_tier5_same_key_in_two_partitions() {
    let mut search = two_partitions();
    search
        .add_object(TextRecord::new("a1", "Phở bò").with_partition("b"), AddOptions::default())
        .unwrap();

    assert_eq!(search.get_object("a1", Some("a")).unwrap().text, "Khách sạn Vincom");
    assert_eq!(search.get_object("a1", Some("b")).unwrap().text, "Phở bò");

    search
        .remove_object("a1", Some("b"), RemoveOptions::default())
        .unwrap();
    assert!(search.contains("a1", Some("a")));
    assert!(!search.contains("a1", Some("b")));
}

/// Partitions are created on first write when allowed
#[test]
fn test_tier5_auto_create_on_add() {
    let mut search = two_partitions();
    let summary = search
        .add_object(TextRecord::new("c1", "Cà phê").with_partition("c"), AddOptions::default())
        .unwrap();

    assert_eq!(summary.partitions["c"].added, 1);
    assert_eq!(search.partition_names(), vec!["a", "b", "c", "default"]);
}

/// Without auto-creation, unknown partitions are rejected
#[test]
fn test_tier5_no_auto_create() {
    let config = SearchConfig::default().with_auto_create_partitions(false);
    let mut search = TextSearch::empty(config).unwrap();
    let err = search
        .add_object(TextRecord::new("c1", "Cà phê").with_partition("c"), AddOptions::default())
        .unwrap_err();

    assert_eq!(err, Error::PartitionNotFound("c".into()));
    assert_eq!(search.partition_names(), vec![DEFAULT_PARTITION]);
}

/// Clearing one partition keeps the others and the partition itself
#[test]
fn test_tier5_clear_single_partition() {
    let mut search = two_partitions();
    let none: [&str; 0] = [];
    let summary = search
        .remove_many_objects(&none, Some("a"), RemoveOptions::default())
        .unwrap();

    assert_eq!(summary.removed, 2);
    assert!(search.partition("a").unwrap().is_empty());
    assert_eq!(search.len(), 2);
}

/// Stats add up across partitions
#[test]
fn test_tier5_stats_per_partition() {
    let search = two_partitions();
    let stats = search.stats();

    assert_eq!(stats.partitions, 3);
    assert_eq!(stats.records, 4);
    let names: Vec<_> = stats.per_partition.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "default"]);
    assert_eq!(
        stats.leaf_paths,
        stats.per_partition.iter().map(|p| p.leaf_paths).sum::<usize>()
    );
}
