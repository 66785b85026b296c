//! Partition names
//!
//! Every record lives in one partition, an independent keyword index plus
//! record dictionary. Records name their partition by string; the name is
//! checked once on the way in and carried as a `PartitionName` afterwards.
//!
//! A name is 1 to 128 ASCII letters, digits, `_`, `-` or `.`, and starts with
//! a letter, digit or `_`. Accented letters are rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length of a partition name
pub const MAX_PARTITION_NAME_LENGTH: usize = 128;

/// Name of the partition that always exists and cannot be removed
pub const DEFAULT_PARTITION: &str = "default";

/// Name of a partition, checked on construction and on deserialization
///
/// `"products"`, `"shop_2024"` and `"vn.hanoi"` are accepted; `"-tmp"`,
/// `"hà nội"` and `""` are not.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PartitionName(String);

/// Why a string was refused as a partition name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartitionNameError {
    /// Blank name
    Empty,
    /// More than [`MAX_PARTITION_NAME_LENGTH`] characters
    TooLong {
        /// Characters in the rejected name
        length: usize,
        /// Limit
        max: usize,
    },
    /// Character outside the partition alphabet
    InvalidChar {
        /// Offending character
        char: char,
        /// Character offset in the name
        position: usize,
    },
    /// Leading `-` or `.`
    InvalidStart {
        /// Offending first character
        char: char,
    },
}

impl fmt::Display for PartitionNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartitionNameError::Empty => write!(f, "partition name is empty"),
            PartitionNameError::TooLong { length, max } => write!(
                f,
                "partition name has {} characters, at most {} are allowed",
                length, max
            ),
            PartitionNameError::InvalidChar { char, position } => write!(
                f,
                "unexpected '{}' at offset {} in partition name",
                char, position
            ),
            PartitionNameError::InvalidStart { char } => {
                write!(f, "partition name may not begin with '{}'", char)
            }
        }
    }
}

impl std::error::Error for PartitionNameError {}

impl From<PartitionNameError> for crate::Error {
    fn from(e: PartitionNameError) -> Self {
        crate::Error::Validation(e.to_string())
    }
}

impl PartitionName {
    /// Check `name` and wrap it
    ///
    /// # Errors
    ///
    /// The first rule `name` breaks, as a `PartitionNameError`.
    pub fn new(name: impl Into<String>) -> Result<Self, PartitionNameError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(PartitionName(name))
    }

    /// The default partition
    pub fn default_partition() -> Self {
        PartitionName(DEFAULT_PARTITION.to_string())
    }

    /// Check `name` against the partition naming rules
    pub fn validate(name: &str) -> Result<(), PartitionNameError> {
        let Some(first) = name.chars().next() else {
            return Err(PartitionNameError::Empty);
        };

        let length = name.chars().count();
        if length > MAX_PARTITION_NAME_LENGTH {
            return Err(PartitionNameError::TooLong {
                length,
                max: MAX_PARTITION_NAME_LENGTH,
            });
        }

        if !first.is_ascii_alphanumeric() && first != '_' {
            return Err(PartitionNameError::InvalidStart { char: first });
        }

        for (position, ch) in name.chars().enumerate() {
            if !Self::is_valid_char(ch) {
                return Err(PartitionNameError::InvalidChar { char: ch, position });
            }
        }

        Ok(())
    }

    #[inline]
    fn is_valid_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'
    }

    /// Get the name as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this is the default partition
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_PARTITION
    }

    /// Unwrap into the plain name
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for PartitionName {
    fn default() -> Self {
        Self::default_partition()
    }
}

impl AsRef<str> for PartitionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for PartitionName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartitionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PartitionName {
    type Error = PartitionNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PartitionName::new(value)
    }
}

impl TryFrom<&str> for PartitionName {
    type Error = PartitionNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        PartitionName::new(value)
    }
}

impl From<PartitionName> for String {
    fn from(name: PartitionName) -> Self {
        name.0
    }
}

// ============================================================================
// Tests
// ============================================================================
