//! Partition: one keyword index plus its record dictionary
//!
//! The dictionary is the source of truth for a record's current keywords.
//! Keywords are always recomputed from the stored text before unindexing,
//! never cached, so the index cannot drift from the dictionary.

use crate::results::PartitionStats;
use rustc_hash::FxHashMap;
use vnsearch_core::{PartitionName, TextKey, TextRecord};
use vnsearch_search::{
    apply_bias, extract_keywords, Keyword, KeywordDiff, KeywordIndex, ScoreSheet, Scorer,
};

/// A named, independent index and dictionary
#[derive(Debug, Clone)]
pub struct Partition {
    name: PartitionName,
    index: KeywordIndex,
    dictionary: FxHashMap<TextKey, TextRecord>,
}

impl Partition {
    /// Create an empty partition
    pub fn new(name: PartitionName) -> Self {
        Partition {
            name,
            index: KeywordIndex::new(),
            dictionary: FxHashMap::default(),
        }
    }

    /// Build a partition from records and their extracted keywords in one pass
    ///
    /// Records without keywords are left out and their keys returned.
    pub fn build(
        name: PartitionName,
        entries: Vec<(TextRecord, Vec<Keyword>)>,
    ) -> (Self, Vec<TextKey>) {
        let mut dictionary = FxHashMap::default();
        dictionary.reserve(entries.len());

        let keyed: Vec<(TextKey, Vec<Keyword>)> = entries
            .into_iter()
            .map(|(record, keywords)| {
                let key = record.key.clone();
                dictionary.insert(key.clone(), record);
                (key, keywords)
            })
            .collect();

        let build = KeywordIndex::bulk_build(keyed, None);
        for key in &build.skipped {
            dictionary.remove(key);
        }

        let partition = Partition {
            name,
            index: build.index,
            dictionary,
        };
        (partition, build.skipped)
    }

    /// Partition name
    pub fn name(&self) -> &PartitionName {
        &self.name
    }

    /// Read access to the keyword index
    pub fn index(&self) -> &KeywordIndex {
        &self.index
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.dictionary.len()
    }

    /// True if no record is stored
    pub fn is_empty(&self) -> bool {
        self.dictionary.is_empty()
    }

    /// Stored record by key
    pub fn get(&self, key: &str) -> Option<&TextRecord> {
        self.dictionary.get(key)
    }

    /// True if `key` is stored
    pub fn contains(&self, key: &str) -> bool {
        self.dictionary.contains_key(key)
    }

    /// Stored keys, sorted
    pub fn keys(&self) -> Vec<&TextKey> {
        let mut keys: Vec<_> = self.dictionary.keys().collect();
        keys.sort();
        keys
    }

    /// Keywords of the text currently stored under `key`
    pub fn keywords_of(&self, key: &str, fold_case: bool) -> Option<Vec<Keyword>> {
        self.dictionary
            .get(key)
            .map(|record| extract_keywords(&record.text, fold_case))
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Store `record`, re-indexing only the keywords that changed
    ///
    /// For a new key every keyword is added. For an existing key the old
    /// keywords are recomputed from the stored text and diffed against
    /// `keywords`. The dictionary entry is replaced either way.
    pub fn upsert(
        &mut self,
        record: TextRecord,
        keywords: &[Keyword],
        fold_case: bool,
    ) -> KeywordDiff {
        let old = self
            .keywords_of(record.key.as_str(), fold_case)
            .unwrap_or_default();
        let diff = self.index.apply_diff(&record.key, &old, keywords);
        self.dictionary.insert(record.key.clone(), record);
        diff
    }

    /// Remove `key` from the index and dictionary
    ///
    /// Returns the removed record and the keywords it was indexed under.
    pub fn remove(&mut self, key: &str, fold_case: bool) -> Option<(TextRecord, Vec<Keyword>)> {
        let record = self.dictionary.remove(key)?;
        let keywords = extract_keywords(&record.text, fold_case);
        self.index.remove_contribution(&record.key, &keywords);
        Some((record, keywords))
    }

    /// Remove every record, returning them in key order with their keywords
    pub fn clear(&mut self, fold_case: bool) -> Vec<(TextRecord, Vec<Keyword>)> {
        let mut removed: Vec<_> = self
            .dictionary
            .drain()
            .map(|(_, record)| {
                let keywords = extract_keywords(&record.text, fold_case);
                (record, keywords)
            })
            .collect();
        removed.sort_by(|a, b| a.0.key.cmp(&b.0.key));
        self.index.clear();
        removed
    }

    // ========================================================================
    // Query
    // ========================================================================

    /// Score every record reachable from the query keywords
    ///
    /// Per-keyword scores are summed. With `use_bias`, each record's score
    /// bias is spread evenly over the query keywords, counted once for each
    /// keyword it matches.
    pub fn score<'a>(
        &'a self,
        keywords: &[Keyword],
        scorer: &dyn Scorer,
        use_bias: bool,
    ) -> ScoreSheet<'a> {
        let mut sheet = ScoreSheet::new();
        for keyword in keywords {
            let sets = self.index.match_sets(keyword);
            sheet.add_keyword(scorer.score_keyword(keyword, &sets));
        }
        if use_bias {
            apply_bias(&mut sheet, keywords.len(), |key| {
                self.dictionary.get(key).map(|r| r.score_bias)
            });
        }
        sheet
    }

    /// Size of this partition
    pub fn stats(&self) -> PartitionStats {
        PartitionStats {
            name: self.name.to_string(),
            records: self.dictionary.len(),
            leaf_paths: self.index.leaf_paths(),
            postings: self.index.postings(),
            sound_classes: self.index.sound_classes(),
        }
    }
}
