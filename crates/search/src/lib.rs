//! Search infrastructure for vnsearch
//!
//! This crate provides:
//! - Normalizer: Vietnamese-aware tokenizer and keyword class derivation
//! - KeywordIndex: four-level inverted index with incremental maintenance
//! - Scorer trait and LevelScorer default implementation
//! - Exact additive score merging across keywords and partitions
//!
//! Nothing here holds shared state; every operation takes the index it works
//! on explicitly, so partitions can be built and tested in isolation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod index;
pub mod scorer;
pub mod tokenizer;

// Re-export commonly used types
pub use index::{diff_keywords, BulkBuild, KeywordDiff, KeywordIndex, MatchSets};
pub use scorer::{
    apply_bias, merge_scores, LevelScorer, LevelWeights, ScoreMap, ScoreSheet, Scorer, UnitMap,
};
pub use tokenizer::{
    extract_keywords, ligature_class, pure_ligature_class, remove_accents, slugify, tokenize,
    Keyword,
};
