//! Search configuration
//!
//! `SearchConfig` is fixed at initialization and supplies the defaults for
//! every search. `SearchOptions` carries per-call overrides which are resolved
//! against the config into `ResolvedOptions`.
//!
//! All option values are parsed with validation and fail closed: a malformed
//! sort order or a negative threshold is rejected, never coerced.
//!
//! # Example
//!
//! ```toml
//! # Field names used when reading records from JSON objects
//! key_field = "textId"
//! value_field = "text"
//!
//! # Matches scoring at or below the threshold are dropped
//! threshold_score = 0.5
//! # 0 = unbounded
//! limit = 30
//! # "descending" (default) or "ascending"; -1 / 1 are accepted too
//! sort_order = "descending"
//! ```

use crate::error::{Error, Result};
use crate::partition_name::PartitionName;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default key field name for JSON records
pub const DEFAULT_KEY_FIELD: &str = "textId";
/// Default value field name for JSON records
pub const DEFAULT_VALUE_FIELD: &str = "text";
/// Default partition field name for JSON records
pub const DEFAULT_PARTITION_FIELD: &str = "partition";
/// Default score bias field name for JSON records
pub const DEFAULT_SCORE_BIAS_FIELD: &str = "addedScore";
/// Default score threshold
pub const DEFAULT_THRESHOLD: f64 = 0.5;
/// Default result limit
pub const DEFAULT_LIMIT: usize = 30;

// ============================================================================
// SortOrder
// ============================================================================

/// Result ordering by score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "RawSortOrder")]
pub enum SortOrder {
    /// Highest score first
    #[default]
    Descending,
    /// Lowest score first
    Ascending,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSortOrder {
    Int(i64),
    Text(String),
}

impl TryFrom<RawSortOrder> for SortOrder {
    type Error = Error;

    fn try_from(raw: RawSortOrder) -> Result<Self> {
        match raw {
            RawSortOrder::Int(n) => SortOrder::try_from(n),
            RawSortOrder::Text(s) => s.parse(),
        }
    }
}

impl TryFrom<i64> for SortOrder {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            -1 => Ok(SortOrder::Descending),
            1 => Ok(SortOrder::Ascending),
            other => Err(Error::configuration(format!(
                "sort order must be -1 or 1, got {}",
                other
            ))),
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "-1" | "desc" | "descending" => Ok(SortOrder::Descending),
            "1" | "asc" | "ascending" => Ok(SortOrder::Ascending),
            _ => Err(Error::configuration(format!(
                "invalid sort order '{}': expected \"descending\" or \"ascending\"",
                s
            ))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Descending => f.write_str("descending"),
            SortOrder::Ascending => f.write_str("ascending"),
        }
    }
}

// ============================================================================
// SearchConfig
// ============================================================================

/// Init-time configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// JSON field holding the record key
    pub key_field: String,
    /// JSON field holding the indexed text
    pub value_field: String,
    /// JSON field holding the partition name
    pub partition_field: String,
    /// JSON field holding the manual score bias
    pub score_bias_field: String,
    /// Matches scoring at or below this value are excluded
    pub threshold_score: f64,
    /// Page size; 0 = unbounded
    pub limit: usize,
    /// Page offset
    pub offset: usize,
    /// Result ordering
    pub sort_order: SortOrder,
    /// Add each record's score bias to its score
    pub use_score_bias: bool,
    /// Create unknown partitions on first reference instead of failing
    pub auto_create_partitions: bool,
    /// Lower-case text before tokenizing
    pub fold_case: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            key_field: DEFAULT_KEY_FIELD.to_string(),
            value_field: DEFAULT_VALUE_FIELD.to_string(),
            partition_field: DEFAULT_PARTITION_FIELD.to_string(),
            score_bias_field: DEFAULT_SCORE_BIAS_FIELD.to_string(),
            threshold_score: DEFAULT_THRESHOLD,
            limit: DEFAULT_LIMIT,
            offset: 0,
            sort_order: SortOrder::Descending,
            use_score_bias: false,
            auto_create_partitions: true,
            fold_case: true,
        }
    }
}

impl SearchConfig {
    /// Parse and validate a TOML document; missing keys take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: SearchConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Builder: set threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold_score = threshold;
        self
    }

    /// Builder: set limit
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Builder: set sort order
    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Builder: enable or disable score bias
    pub fn with_score_bias(mut self, enabled: bool) -> Self {
        self.use_score_bias = enabled;
        self
    }

    /// Builder: enable or disable partition auto-creation
    pub fn with_auto_create_partitions(mut self, enabled: bool) -> Self {
        self.auto_create_partitions = enabled;
        self
    }

    /// Check field names and defaults
    ///
    /// # Errors
    ///
    /// `Configuration` if a field name is blank, two field names collide, or
    /// the threshold is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("key_field", &self.key_field),
            ("value_field", &self.value_field),
            ("partition_field", &self.partition_field),
            ("score_bias_field", &self.score_bias_field),
        ];
        for (i, (option, name)) in fields.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(Error::configuration(format!("{} must not be empty", option)));
            }
            if let Some((other, _)) = fields[..i].iter().find(|(_, n)| n == name) {
                return Err(Error::configuration(format!(
                    "{} and {} both use field '{}'",
                    other, option, name
                )));
            }
        }
        validate_threshold(self.threshold_score)
    }

    /// True if `field` is one of the four configured record fields
    pub fn is_reserved_field(&self, field: &str) -> bool {
        field == self.key_field
            || field == self.value_field
            || field == self.partition_field
            || field == self.score_bias_field
    }
}

fn validate_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(Error::configuration(format!(
            "threshold score must be a finite number >= 0, got {}",
            threshold
        )));
    }
    Ok(())
}

// ============================================================================
// SearchOptions
// ============================================================================

/// Per-call overrides of the configured defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Override `threshold_score`
    pub threshold_score: Option<f64>,
    /// Override `limit`
    pub limit: Option<usize>,
    /// Override `offset`
    pub offset: Option<usize>,
    /// Override `sort_order`
    pub sort_order: Option<SortOrder>,
    /// Override `use_score_bias`
    pub use_score_bias: Option<bool>,
    /// Restrict the search to these partitions; `None` searches all
    pub partitions: Option<Vec<String>>,
}

impl SearchOptions {
    /// Create empty options (all defaults)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set threshold
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold_score = Some(threshold);
        self
    }

    /// Builder: set limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Builder: set offset
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Builder: set sort order
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = Some(order);
        self
    }

    /// Builder: enable or disable score bias
    pub fn use_score_bias(mut self, enabled: bool) -> Self {
        self.use_score_bias = Some(enabled);
        self
    }

    /// Builder: restrict to partitions
    pub fn partitions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.partitions = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Resolve against config defaults, validating every override
    pub fn resolve(&self, config: &SearchConfig) -> Result<ResolvedOptions> {
        let threshold_score = self.threshold_score.unwrap_or(config.threshold_score);
        validate_threshold(threshold_score)?;

        let partitions = match &self.partitions {
            None => None,
            Some(names) => Some(
                names
                    .iter()
                    .map(|n| PartitionName::new(n.as_str()).map_err(Error::from))
                    .collect::<Result<Vec<_>>>()?,
            ),
        };

        Ok(ResolvedOptions {
            threshold_score,
            limit: self.limit.unwrap_or(config.limit),
            offset: self.offset.unwrap_or(config.offset),
            sort_order: self.sort_order.unwrap_or(config.sort_order),
            use_score_bias: self.use_score_bias.unwrap_or(config.use_score_bias),
            partitions,
        })
    }
}

/// Effective options of one search call
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    /// Exclusive lower bound on scores
    pub threshold_score: f64,
    /// Page size; 0 = unbounded
    pub limit: usize,
    /// Page offset
    pub offset: usize,
    /// Result ordering
    pub sort_order: SortOrder,
    /// Add record score bias
    pub use_score_bias: bool,
    /// Selected partitions; `None` = all
    pub partitions: Option<Vec<PartitionName>>,
}
