//! Search engine for vnsearch
//!
//! This crate ties the lower layers together:
//! - TextSearch: initialize, search, add, update and remove records
//! - Partition: one keyword index and record dictionary per namespace
//! - Result types reported by every call
//!
//! The engine is the only component that knows about:
//! - Partition routing and auto-creation
//! - Validate-all-then-apply batch semantics
//! - Cross-partition score merging and pagination

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coordinator;
pub mod partition;
pub mod results;

pub use coordinator::TextSearch;
pub use partition::Partition;
pub use results::{
    AddOptions, IndexStats, InitSummary, MutationSummary, PartitionCounts, PartitionStats,
    RecordError, RemoveOptions, SearchHit, SearchResults, UpdateOptions,
};
