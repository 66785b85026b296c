//! vnsearch - In-memory text search for Vietnamese records
//!
//! Records (product names, place names, short titles) are indexed so that
//! queries match regardless of accent marks or leading-consonant spelling,
//! and matches are ranked by a graduated four-level relevance score.
//!
//! # Quick Start
//!
//! ```
//! use vnsearch::{SearchConfig, SearchOptions, TextRecord, TextSearch};
//!
//! let records = vec![
//!     TextRecord::new("1", "Khách sạn Vincom"),
//!     TextRecord::new("2", "Khách sạn ABC"),
//! ];
//! let (search, summary) = TextSearch::initialize(records, SearchConfig::default())?;
//! assert_eq!(summary.indexed, 2);
//!
//! let results = search.search("khach san", &SearchOptions::default())?;
//! assert_eq!(results.total, 2);
//! # Ok::<(), vnsearch::Error>(())
//! ```
//!
//! # Architecture
//!
//! - [`vnsearch_core`]: errors, record and configuration types
//! - [`vnsearch_search`]: normalizer, four-level keyword index, scorer
//! - [`vnsearch_engine`]: partitions and the [`TextSearch`] coordinator

pub use vnsearch_core::{
    Error, PartitionName, Result, SearchConfig, SearchOptions, SortOrder, TextKey, TextRecord,
    DEFAULT_PARTITION,
};
pub use vnsearch_engine::*;
pub use vnsearch_search::{extract_keywords, Keyword, KeywordIndex};
