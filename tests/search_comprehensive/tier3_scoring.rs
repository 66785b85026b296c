//! Tier 3: Scoring
//!
//! Level weights: L0 0.1 and L1 0.2 (both × ligature length), L2 0.5, L3 1.5.
//! Level scores are summed in tenths and converted once, so totals over any
//! number of keywords are exact decimals and threshold comparisons at the
//! boundary are exact.

use super::test_utils::*;
use vnsearch::{SearchConfig, SearchOptions, TextRecord, TextSearch};

// ============================================================================
// Level Weights
// ============================================================================

/// Exact match with a one-letter ligature scores 2.3
#[test]
fn test_tier3_exact_one_letter_ligature() {
    let search = engine(&[("1", "bán")]);
    let results = search_unbounded(&search, "bán");
    assert_eq!(score(&results, "1"), 2.3);
}

/// Exact match with a two-letter ligature scores 2.6
#[test]
fn test_tier3_exact_two_letter_ligature() {
    let search = engine(&[("1", "khách")]);
    let results = search_unbounded(&search, "khách");
    assert_eq!(score(&results, "1"), 2.6);
}

/// Unaccented query against accented text scores L0 + L1 + L2
#[test]
fn test_tier3_accent_insensitive_match() {
    let search = engine(&[("1", "khách")]);
    let results = search_unbounded(&search, "khach");
    assert_eq!(score(&results, "1"), 1.1);
}

/// Same ligature, different word: L0 + L1 only
#[test]
fn test_tier3_ligature_only_match() {
    let search = engine(&[("1", "không")]);
    let results = search.search("khách", &SearchOptions::new().threshold(0.0)).unwrap();
    assert_eq!(score(&results, "1"), 0.6);
}

/// đ and d share a sound class
#[test]
fn test_tier3_pure_ligature_spans_d_stroke() {
    let search = engine(&[("1", "dạ")]);
    let results = search.search("đi", &SearchOptions::new().threshold(0.0)).unwrap();
    assert_eq!(score(&results, "1"), 0.1);
}

// ============================================================================
// Monotonicity
// ============================================================================

/// exact > accent-stripped > ligature-only
#[test]
fn test_tier3_monotonic_levels() {
    let search = engine(&[("exact", "bán"), ("stripped", "ban"), ("ligature", "bút")]);
    let results = search.search("bán", &SearchOptions::new().threshold(0.0)).unwrap();

    assert_eq!(results.keys(), vec!["exact", "stripped", "ligature"]);
    assert!(score(&results, "exact") > score(&results, "stripped"));
    assert!(score(&results, "stripped") > score(&results, "ligature"));
}

/// A vowel-initial accented query ranks the exact spelling first
///
/// "ao" lives under ligature "a" while "áo" lives under "á", so the
/// accent-stripped record only shares the pure ligature class.
#[test]
fn test_tier3_vowel_initial_exact_wins() {
    let search = engine(&[("exact", "áo"), ("stripped", "ao"), ("other", "ăn")]);
    let results = search.search("áo", &SearchOptions::new().threshold(0.0)).unwrap();

    assert_eq!(score(&results, "exact"), 2.3);
    assert_eq!(score(&results, "stripped"), 0.1);
    assert_eq!(score(&results, "other"), 0.1);
    assert_eq!(results.keys()[0], "exact");
}

/// Scores add up across query keywords
#[test]
fn test_tier3_scores_sum_across_keywords() {
    let search = engine(&[("both", "bán áo"), ("one", "bán quần")]);
    let results = search_all(&search, "bán áo");

    assert_eq!(score(&results, "both"), 4.6);
    assert_eq!(score(&results, "one"), 2.3);
}

/// More matched keywords rank higher
#[test]
fn test_tier3_more_keywords_rank_higher() {
    let search = engine(&[
        ("1", "Khách sạn Mường Thanh Hà Nội"),
        ("2", "Khách sạn Mường Hà"),
        ("3", "Khách sạn"),
    ]);
    let results = search_all(&search, "khách sạn mường thanh");
    assert_eq!(results.keys(), vec!["1", "2", "3"]);
}

// ============================================================================
// Threshold Boundary
// ============================================================================

/// A score equal to the threshold is excluded, one unit above is included
#[test]
fn test_tier3_threshold_is_exclusive() {
    let search = engine(&[("1", "bút")]);

    let at = search.search("bán", &SearchOptions::new().threshold(0.3)).unwrap();
    assert!(at.is_empty());
    assert_eq!(at.total, 0);

    let below = search.search("bán", &SearchOptions::new().threshold(0.2)).unwrap();
    assert_eq!(below.keys(), vec!["1"]);
    assert_eq!(score(&below, "1"), 0.3);
}

/// Three ligature-only matches total exactly 0.3, which a 0.3 threshold excludes
#[test]
fn test_tier3_threshold_is_exclusive_across_keywords() {
    let search = engine(&[("1", "ăn ở ừ")]);

    let at = search.search("áo ổ ú", &SearchOptions::new().threshold(0.3)).unwrap();
    assert_eq!(at.total, 0);
    assert!(at.is_empty());

    let below = search.search("áo ổ ú", &SearchOptions::new().threshold(0.2)).unwrap();
    assert_eq!(below.keys(), vec!["1"]);
    assert_eq!(score(&below, "1"), 0.3);
}

/// Sums across keywords and partitions stay exact
#[test]
fn test_tier3_multi_keyword_sum_is_exact() {
    let search = engine(&[("1", "bán áo"), ("2", "ăn ở ừ")]);
    let results = search_unbounded(&search, "bán áo");
    assert_eq!(score(&results, "1"), 4.6);

    let results = search
        .search("áo ổ ú", &SearchOptions::new().threshold(0.0))
        .unwrap();
    assert_eq!(score(&results, "2"), 0.3);
}

/// Boundary holds at the default threshold's neighbourhood too
#[test]
fn test_tier3_threshold_boundary_stripped_match() {
    let search = engine(&[("1", "ban")]);

    let at = search.search("bán", &SearchOptions::new().threshold(0.8)).unwrap();
    assert_eq!(at.total, 0);

    let below = search.search("bán", &SearchOptions::new().threshold(0.7)).unwrap();
    assert_eq!(below.total, 1);
}

/// The default threshold of 0.5 drops ligature-only matches
#[test]
fn test_tier3_default_threshold_drops_weak_matches() {
    let search = engine(&[("strong", "bán"), ("weak", "bút")]);
    let results = search_all(&search, "bán");
    assert_eq!(results.keys(), vec!["strong"]);
    assert_eq!(results.threshold_score, 0.5);
}

/// A configured threshold becomes the default for every search
#[test]
fn test_tier3_configured_threshold() {
    let config = SearchConfig::default().with_threshold(0.0);
    let search = engine_with(&[("strong", "bán"), ("weak", "bút")], config);
    assert_eq!(search_all(&search, "bán").total, 2);
}

// ============================================================================
// Score Bias
// ============================================================================

/// Bias is split over query keywords
#[test]
fn test_tier3_bias_divided_by_keyword_count() {
    let records = vec![TextRecord::new("1", "bán áo").with_score_bias(2.0)];
    let (search, _) = TextSearch::initialize(records, SearchConfig::default()).unwrap();

    let plain = search_all(&search, "bán quần");
    let biased = search
        .search("bán quần", &SearchOptions::new().use_score_bias(true))
        .unwrap();

    // bias 2.0 over two query keywords, record matched under "bán" only
    assert!((score(&biased, "1") - score(&plain, "1") - 1.0).abs() < 1e-9);
}

/// Bias is ignored unless enabled
#[test]
fn test_tier3_bias_off_by_default() {
    let records = vec![
        TextRecord::new("1", "phở").with_score_bias(100.0),
        TextRecord::new("2", "phở"),
    ];
    let (search, _) = TextSearch::initialize(records, SearchConfig::default()).unwrap();
    let results = search_all(&search, "phở");
    assert_eq!(score(&results, "1"), score(&results, "2"));
}
