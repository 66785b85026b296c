//! Core types for vnsearch
//!
//! This crate defines the foundational types used throughout the system:
//! - Error: Error type hierarchy
//! - TextKey / TextRecord: record identity and stored value
//! - PartitionName: validated partition namespace names
//! - SearchConfig / SearchOptions: init-time defaults and per-call overrides

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod partition_name;
pub mod types;

pub use config::{ResolvedOptions, SearchConfig, SearchOptions, SortOrder};
pub use error::{Error, Result};
pub use partition_name::{PartitionName, PartitionNameError, DEFAULT_PARTITION};
pub use types::{TextKey, TextRecord};
