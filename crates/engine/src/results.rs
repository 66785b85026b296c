//! Call options and result types
//!
//! Everything a coordinator call accepts beyond its records, and everything
//! it reports back. All result types serialize with serde so callers can log
//! or ship them as-is.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use vnsearch_core::{Error, SortOrder, TextKey};
use vnsearch_search::Keyword;

// ============================================================================
// Mutation options
// ============================================================================

/// Options for `add_object` / `add_many_objects`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOptions {
    /// Existing keys are updated instead of rejected
    pub replace: bool,
}

impl AddOptions {
    /// Add that overwrites existing keys
    pub fn replace() -> Self {
        AddOptions { replace: true }
    }
}

/// Options for `update_object` / `update_many_objects`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOptions {
    /// Missing keys are added instead of rejected
    pub upsert: bool,
}

impl UpdateOptions {
    /// Update that adds missing keys
    pub fn upsert() -> Self {
        UpdateOptions { upsert: true }
    }
}

/// Options for `remove_object` / `remove_many_objects`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveOptions {
    /// Missing keys are ignored instead of rejected
    pub force: bool,
}

impl RemoveOptions {
    /// Remove that ignores missing keys
    pub fn force() -> Self {
        RemoveOptions { force: true }
    }
}

// ============================================================================
// Initialization
// ============================================================================

/// A record rejected during initialization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordError {
    /// Position in the input sequence
    pub position: usize,
    /// Key, when it could be read
    pub key: Option<TextKey>,
    /// Why the record was rejected
    #[serde(serialize_with = "serialize_display")]
    pub error: Error,
}

fn serialize_display<S: Serializer>(error: &Error, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome of `TextSearch::initialize`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InitSummary {
    /// Records stored and indexed
    pub indexed: usize,
    /// Partitions that exist after initialization
    pub partitions: usize,
    /// Valid records that yielded no keywords (not stored)
    pub skipped: Vec<TextKey>,
    /// Invalid or duplicate records (not stored)
    pub errors: Vec<RecordError>,
}

impl InitSummary {
    /// True if every input record was indexed
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.errors.is_empty()
    }
}

// ============================================================================
// Search
// ============================================================================

/// One ranked result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Matched record
    pub key: TextKey,
    /// Accumulated score, strictly above the threshold
    pub score: f64,
}

/// A page of search results plus the effective options
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    /// Ranked page
    pub hits: Vec<SearchHit>,
    /// Matches above the threshold before pagination
    pub total: usize,
    /// Effective threshold
    pub threshold_score: f64,
    /// Effective offset
    pub offset: usize,
    /// Effective limit (0 = unbounded)
    pub limit: usize,
    /// Effective ordering
    pub sort_order: SortOrder,
    /// Partitions that were searched
    pub partitions: Vec<String>,
    /// Normalized query text (keywords joined by a space)
    pub text: String,
    /// Keywords extracted from the query
    pub keywords: Vec<String>,
}

impl SearchResults {
    /// Number of hits on this page
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// True if this page has no hits
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Keys on this page, in rank order
    pub fn keys(&self) -> Vec<&str> {
        self.hits.iter().map(|h| h.key.as_str()).collect()
    }

    /// Score of `key` on this page
    pub fn score_of(&self, key: &str) -> Option<f64> {
        self.hits
            .iter()
            .find(|h| h.key.as_str() == key)
            .map(|h| h.score)
    }
}

// ============================================================================
// Mutation
// ============================================================================

/// Per-partition counts of one mutation call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PartitionCounts {
    /// Records added
    pub added: usize,
    /// Records updated in place
    pub updated: usize,
    /// Records removed
    pub removed: usize,
    /// Records skipped for yielding no keywords
    pub skipped: usize,
}

/// Outcome of an add, update or remove call
///
/// `new_keywords` and `removed_keywords` are the keyword delta of the call:
/// keywords indexed for some record and keywords unindexed from some record,
/// deduplicated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MutationSummary {
    /// Records added
    pub added: usize,
    /// Records updated in place
    pub updated: usize,
    /// Records removed
    pub removed: usize,
    /// Counts per affected partition
    pub partitions: BTreeMap<String, PartitionCounts>,
    /// Keywords gained
    pub new_keywords: Vec<String>,
    /// Keywords lost
    pub removed_keywords: Vec<String>,
    /// Keys skipped for yielding no keywords
    pub skipped: Vec<TextKey>,
}

impl MutationSummary {
    fn counts(&mut self, partition: &str) -> &mut PartitionCounts {
        self.partitions.entry(partition.to_string()).or_default()
    }

    pub(crate) fn record_added(&mut self, partition: &str, keywords: &[Keyword]) {
        self.added += 1;
        self.counts(partition).added += 1;
        self.new_keywords.extend(keywords.iter().map(|k| k.text.clone()));
    }

    pub(crate) fn record_updated(
        &mut self,
        partition: &str,
        added: &[Keyword],
        removed: &[Keyword],
    ) {
        self.updated += 1;
        self.counts(partition).updated += 1;
        self.new_keywords.extend(added.iter().map(|k| k.text.clone()));
        self.removed_keywords.extend(removed.iter().map(|k| k.text.clone()));
    }

    pub(crate) fn record_removed(&mut self, partition: &str, keywords: &[Keyword]) {
        self.removed += 1;
        self.counts(partition).removed += 1;
        self.removed_keywords.extend(keywords.iter().map(|k| k.text.clone()));
    }

    pub(crate) fn record_skipped(&mut self, partition: &str, key: TextKey) {
        self.counts(partition).skipped += 1;
        self.skipped.push(key);
    }

    /// Deduplicate the keyword deltas
    pub(crate) fn finish(mut self) -> Self {
        dedupe(&mut self.new_keywords);
        dedupe(&mut self.removed_keywords);
        self
    }

    /// True if the call changed nothing
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.updated == 0 && self.removed == 0
    }
}

fn dedupe(keywords: &mut Vec<String>) {
    let mut seen = FxHashSet::default();
    keywords.retain(|k| seen.insert(k.clone()));
}

// ============================================================================
// Statistics
// ============================================================================

/// Size of one partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionStats {
    /// Partition name
    pub name: String,
    /// Stored records
    pub records: usize,
    /// Distinct keyword leaves (walked)
    pub leaf_paths: usize,
    /// (key, keyword) memberships
    pub postings: usize,
    /// Distinct pure ligature classes
    pub sound_classes: usize,
}

/// Size of the whole engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Number of partitions
    pub partitions: usize,
    /// Stored records across partitions
    pub records: usize,
    /// Keyword leaves across partitions
    pub leaf_paths: usize,
    /// Memberships across partitions
    pub postings: usize,
    /// Breakdown in partition name order
    pub per_partition: Vec<PartitionStats>,
}

impl FromIterator<PartitionStats> for IndexStats {
    fn from_iter<I: IntoIterator<Item = PartitionStats>>(iter: I) -> Self {
        let mut stats = IndexStats::default();
        for p in iter {
            stats.partitions += 1;
            stats.records += p.records;
            stats.leaf_paths += p.leaf_paths;
            stats.postings += p.postings;
            stats.per_partition.push(p);
        }
        stats
    }
}
