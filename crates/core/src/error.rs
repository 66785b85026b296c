//! Error types for vnsearch
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Every variant is raised eagerly, before any index or dictionary mutation,
//! so a failed call never leaves a partition half-updated.

use thiserror::Error;

/// Result type alias for vnsearch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for vnsearch
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Malformed input: empty key or value after trimming, invalid partition
    /// name, malformed record object, forbidden operation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Key does not exist in the target partition
    #[error("Key not found: {key} in partition {partition}")]
    KeyNotFound {
        /// Partition that was searched
        partition: String,
        /// Missing key
        key: String,
    },

    /// Partition does not exist and may not be auto-created
    #[error("Partition not found: {0}")]
    PartitionNotFound(String),

    /// Key already exists in the target partition
    #[error("Duplicate key: {key} already exists in partition {partition}")]
    DuplicateKey {
        /// Partition holding the existing record
        partition: String,
        /// Conflicting key
        key: String,
    },

    /// Invalid threshold, limit, offset, sort order or field name
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Build a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Build a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    /// Build a key-not-found error
    pub fn key_not_found(partition: impl Into<String>, key: impl Into<String>) -> Self {
        Error::KeyNotFound {
            partition: partition.into(),
            key: key.into(),
        }
    }

    /// Build a duplicate-key error
    pub fn duplicate_key(partition: impl Into<String>, key: impl Into<String>) -> Self {
        Error::DuplicateKey {
            partition: partition.into(),
            key: key.into(),
        }
    }

    /// True for `KeyNotFound` and `PartitionNotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::KeyNotFound { .. } | Error::PartitionNotFound(_))
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Configuration(e.to_string())
    }
}
