//! Scoring infrastructure
//!
//! This module provides:
//! - Scorer trait for pluggable scoring of index matches
//! - LevelScorer: the default four-level weighted scorer
//! - ScoreSheet: exact accumulation across keywords and partitions
//! - Score bias and additive score merging
//!
//! # Level Weights
//!
//! | Level | Matches | Weight |
//! |-------|---------|--------|
//! | L0 | same pure ligature class | 0.1 × ligature length |
//! | L1 | same ligature class | 0.2 × ligature length |
//! | L2 | same keyword ignoring accents | 0.5 |
//! | L3 | exact keyword | 1.5 |
//!
//! A key matched at a deeper level is also matched at every shallower one,
//! so an exact one-letter-ligature match scores 0.1 + 0.2 + 0.5 + 1.5 = 2.3.
//!
//! Level scores are integer tenths from the scorer up to the final merge and
//! are converted to `f64` once, so a total of 0.3 over three keywords is
//! exactly `0.3` and compares equal to a 0.3 threshold.

use crate::index::MatchSets;
use crate::tokenizer::Keyword;
use rustc_hash::FxHashMap;
use vnsearch_core::TextKey;

/// Record key → level score in tenths of a point
pub type UnitMap<'a> = FxHashMap<&'a TextKey, u64>;

/// Record key → final score
pub type ScoreMap<'a> = FxHashMap<&'a TextKey, f64>;

// ============================================================================
// LevelWeights
// ============================================================================

/// Per-level weights, in tenths of a point
///
/// Level scores are summed as integers and converted once, so a
/// single-keyword score is exactly the nearest `f64` to its decimal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelWeights {
    /// Shared pure ligature class (scaled by ligature length)
    pub l0: u32,
    /// Shared ligature class (scaled by ligature length)
    pub l1: u32,
    /// Same pure keyword
    pub l2: u32,
    /// Exact keyword
    pub l3: u32,
}

impl Default for LevelWeights {
    fn default() -> Self {
        LevelWeights {
            l0: 1,
            l1: 2,
            l2: 5,
            l3: 15,
        }
    }
}

// ============================================================================
// Scorer Trait
// ============================================================================

/// Pluggable scoring interface
///
/// Scorers turn the match sets of one query keyword into per-key scores.
/// Higher scores indicate more relevant records.
///
/// # Thread Safety
///
/// Scorers must be Send + Sync for concurrent search operations.
pub trait Scorer: Send + Sync {
    /// Score every key reachable from `keyword`
    fn score_keyword<'a>(&self, keyword: &Keyword, sets: &MatchSets<'a>) -> UnitMap<'a>;

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

// ============================================================================
// LevelScorer
// ============================================================================

/// Default scorer: weighted sum of the levels a key is matched at
#[derive(Debug, Clone, Default)]
pub struct LevelScorer {
    weights: LevelWeights,
}

impl LevelScorer {
    /// Create a scorer with custom weights
    pub fn new(weights: LevelWeights) -> Self {
        LevelScorer { weights }
    }

    /// Current weights
    pub fn weights(&self) -> LevelWeights {
        self.weights
    }

    /// Score in tenths for one key
    fn units(&self, key: &TextKey, ligature_len: u32, sets: &MatchSets<'_>) -> u64 {
        let w = &self.weights;
        let mut units = 0;
        if sets.l0.contains(key) {
            units += w.l0 * ligature_len;
        }
        if sets.l1.contains(key) {
            units += w.l1 * ligature_len;
        }
        if sets.l2.contains(key) {
            units += w.l2;
        }
        if sets.l3.contains(key) {
            units += w.l3;
        }
        u64::from(units)
    }
}

impl Scorer for LevelScorer {
    fn score_keyword<'a>(&self, keyword: &Keyword, sets: &MatchSets<'a>) -> UnitMap<'a> {
        let ligature_len = keyword.ligature_len() as u32;

        // l0 is the union of all levels
        sets.l0
            .iter()
            .map(|&key| (key, self.units(key, ligature_len, sets)))
            .collect()
    }

    fn name(&self) -> &str {
        "four-level"
    }
}

// ============================================================================
// ScoreSheet
// ============================================================================

/// Scores under accumulation
///
/// Level units and score bias are kept apart until [`ScoreSheet::finish`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreSheet<'a> {
    units: UnitMap<'a>,
    matched: FxHashMap<&'a TextKey, usize>,
    bias: ScoreMap<'a>,
}

impl<'a> ScoreSheet<'a> {
    /// Empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the scores of one query keyword
    pub fn add_keyword(&mut self, units: UnitMap<'a>) {
        for (key, value) in units {
            *self.units.entry(key).or_insert(0) += value;
            *self.matched.entry(key).or_insert(0) += 1;
        }
    }

    /// Add a bias amount for `key`
    pub fn add_bias(&mut self, key: &'a TextKey, amount: f64) {
        *self.bias.entry(key).or_insert(0.0) += amount;
    }

    /// Fold another sheet into this one
    pub fn merge(&mut self, other: ScoreSheet<'a>) {
        for (key, value) in other.units {
            *self.units.entry(key).or_insert(0) += value;
        }
        for (key, count) in other.matched {
            *self.matched.entry(key).or_insert(0) += count;
        }
        for (key, amount) in other.bias {
            self.add_bias(key, amount);
        }
    }

    /// Accumulated tenths for `key`
    pub fn units(&self, key: &TextKey) -> Option<u64> {
        self.units.get(key).copied()
    }

    /// Number of query keywords `key` matched
    pub fn matched(&self, key: &TextKey) -> usize {
        self.matched.get(key).copied().unwrap_or(0)
    }

    /// Number of scored keys
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True if no key was scored
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Convert units to points once and add the bias
    pub fn finish(self) -> ScoreMap<'a> {
        let bias = self.bias;
        self.units
            .into_iter()
            .map(|(key, units)| {
                let score = units as f64 / 10.0 + bias.get(key).copied().unwrap_or(0.0);
                (key, score)
            })
            .collect()
    }
}

// ============================================================================
// Bias and Merging
// ============================================================================

/// Add each key's bias scaled by the share of query keywords it matched
///
/// Equivalent to adding `bias / keyword_count` once per matched keyword.
/// Keys for which `bias_of` returns `None` are left alone.
pub fn apply_bias<'a, F>(sheet: &mut ScoreSheet<'a>, keyword_count: usize, bias_of: F)
where
    F: Fn(&TextKey) -> Option<f64>,
{
    if keyword_count == 0 {
        return;
    }
    let divisor = keyword_count as f64;
    let amounts: Vec<(&'a TextKey, f64)> = sheet
        .matched
        .iter()
        .filter_map(|(&key, &count)| bias_of(key).map(|b| (key, b * count as f64 / divisor)))
        .collect();
    for (key, amount) in amounts {
        sheet.add_bias(key, amount);
    }
}

/// Additive merge: a key's units, match counts and bias are summed over
/// all sheets
///
/// Used across partitions. Absence from a sheet contributes nothing.
pub fn merge_scores<'a, I>(sheets: I) -> ScoreSheet<'a>
where
    I: IntoIterator<Item = ScoreSheet<'a>>,
{
    let mut merged = ScoreSheet::new();
    for sheet in sheets {
        merged.merge(sheet);
    }
    merged
}
