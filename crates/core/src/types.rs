//! Record types
//!
//! - TextKey: identifier of a record within a partition
//! - TextRecord: the stored value plus metadata of an indexed record

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ============================================================================
// TextKey
// ============================================================================

/// Unique identifier of a record within a partition
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextKey(String);

impl TextKey {
    /// Create a new key
    pub fn new(key: impl Into<String>) -> Self {
        TextKey(key.into())
    }

    /// Get the key as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the key is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TextKey {
    fn from(key: &str) -> Self {
        TextKey(key.to_string())
    }
}

impl From<String> for TextKey {
    fn from(key: String) -> Self {
        TextKey(key)
    }
}

impl AsRef<str> for TextKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for TextKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// TextRecord
// ============================================================================

/// A record as handed to the search engine and stored in its dictionary
///
/// Only `text` is indexed. `metadata` carries any other fields of the source
/// object and is replaced wholesale on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    /// Record identifier, unique within its partition
    pub key: TextKey,
    /// Indexed text
    pub text: String,
    /// Owning partition; `None` routes to the default partition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,
    /// Manual score bias, used when `use_score_bias` is enabled
    #[serde(default)]
    pub score_bias: f64,
    /// Non-indexed fields
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl TextRecord {
    /// Create a record routed to the default partition
    pub fn new(key: impl Into<TextKey>, text: impl Into<String>) -> Self {
        TextRecord {
            key: key.into(),
            text: text.into(),
            partition: None,
            score_bias: 0.0,
            metadata: Map::new(),
        }
    }

    /// Builder: set partition
    pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = Some(partition.into());
        self
    }

    /// Builder: set score bias
    pub fn with_score_bias(mut self, bias: f64) -> Self {
        self.score_bias = bias;
        self
    }

    /// Builder: attach a metadata field
    pub fn with_metadata(mut self, field: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(field.into(), value);
        self
    }

    /// Check key and text are non-empty after trimming and the bias is finite
    pub fn validate(&self) -> Result<()> {
        if self.key.is_blank() {
            return Err(Error::validation("record key must not be empty"));
        }
        if self.text.trim().is_empty() {
            return Err(Error::validation(format!(
                "record {} has an empty text value",
                self.key
            )));
        }
        if !self.score_bias.is_finite() {
            return Err(Error::validation(format!(
                "record {} has a non-finite score bias",
                self.key
            )));
        }
        Ok(())
    }

    /// Read a record from a JSON object using the configured field names
    ///
    /// The key may be a string or a number. Fields other than key, value,
    /// partition and score bias are kept as metadata.
    pub fn from_json(value: &Value, config: &SearchConfig) -> Result<Self> {
        let Value::Object(object) = value else {
            return Err(Error::validation("record must be a JSON object"));
        };

        let key = match object.get(&config.key_field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(_) => {
                return Err(Error::validation(format!(
                    "field '{}' must be a string or number",
                    config.key_field
                )))
            }
            None => {
                return Err(Error::validation(format!(
                    "missing key field '{}'",
                    config.key_field
                )))
            }
        };

        let text = match object.get(&config.value_field) {
            Some(Value::String(s)) => s.clone(),
            _ => {
                return Err(Error::validation(format!(
                    "record {} is missing string field '{}'",
                    key, config.value_field
                )))
            }
        };

        let partition = match object.get(&config.partition_field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                return Err(Error::validation(format!(
                    "field '{}' must be a string",
                    config.partition_field
                )))
            }
        };

        let score_bias = match object.get(&config.score_bias_field) {
            None | Some(Value::Null) => 0.0,
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(_) => {
                return Err(Error::validation(format!(
                    "field '{}' must be a number",
                    config.score_bias_field
                )))
            }
        };

        let metadata = object
            .iter()
            .filter(|(field, _)| !config.is_reserved_field(field))
            .map(|(field, v)| (field.clone(), v.clone()))
            .collect();

        Ok(TextRecord {
            key: TextKey(key),
            text,
            partition,
            score_bias,
            metadata,
        })
    }
}
