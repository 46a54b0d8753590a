//! Shard key configuration
//!
//! Shard keys arrive from mapping sources with directions in either
//! integer or string form (`1`, `-1`, `"1"`, `"-1"`). They are normalized
//! to signed integers on assignment; the stored form never contains
//! strings.

use docmap_core::{MappingError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Raw shard key direction as supplied by a mapping source
///
/// Untagged so that JSON-shaped inputs (`{"_id": "1"}` or `{"_id": 1}`)
/// deserialize directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShardDirection {
    /// Integer direction
    Int(i64),
    /// String direction, coerced on normalization
    Text(String),
}

impl ShardDirection {
    /// Normalize to the stored integer form
    ///
    /// Only `1` and `-1` (in either form) are accepted.
    pub fn normalize(&self, field: &str) -> Result<i32> {
        let value = match self {
            ShardDirection::Int(i) => *i,
            ShardDirection::Text(s) => match s.parse::<i64>() {
                Ok(i) => i,
                Err(_) => {
                    return Err(MappingError::InvalidShardKey {
                        field: field.to_string(),
                        value: s.clone(),
                    })
                }
            },
        };
        match value {
            1 => Ok(1),
            -1 => Ok(-1),
            other => Err(MappingError::InvalidShardKey {
                field: field.to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl From<i64> for ShardDirection {
    fn from(i: i64) -> Self {
        ShardDirection::Int(i)
    }
}

impl From<&str> for ShardDirection {
    fn from(s: &str) -> Self {
        ShardDirection::Text(s.to_string())
    }
}

impl From<String> for ShardDirection {
    fn from(s: String) -> Self {
        ShardDirection::Text(s)
    }
}

/// Store-specific sharding option value
///
/// A small scalar enum rather than an arbitrary JSON value so that the
/// snapshot stays decodable from non-self-describing encodings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShardOption {
    /// Boolean option ("unique")
    Bool(bool),
    /// Numeric option ("numInitialChunks")
    Int(i64),
    /// Textual option
    Text(String),
}

impl From<bool> for ShardOption {
    fn from(b: bool) -> Self {
        ShardOption::Bool(b)
    }
}

impl From<i64> for ShardOption {
    fn from(i: i64) -> Self {
        ShardOption::Int(i)
    }
}

impl From<&str> for ShardOption {
    fn from(s: &str) -> Self {
        ShardOption::Text(s.to_string())
    }
}

impl From<String> for ShardOption {
    fn from(s: String) -> Self {
        ShardOption::Text(s)
    }
}

/// Normalized shard key: ordered field→direction pairs plus options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShardKey {
    /// Shard key fields with normalized directions (1 or -1)
    pub keys: IndexMap<String, i32>,
    /// Store-specific sharding options, passed through untouched
    pub options: IndexMap<String, ShardOption>,
}

impl ShardKey {
    /// Check whether any shard key fields are configured
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Normalize raw key/direction pairs into a shard key
    pub fn from_raw<K, D, I>(keys: I, options: IndexMap<String, ShardOption>) -> Result<Self>
    where
        K: Into<String>,
        D: Into<ShardDirection>,
        I: IntoIterator<Item = (K, D)>,
    {
        let mut normalized = IndexMap::new();
        for (field, direction) in keys {
            let field = field.into();
            let direction = direction.into().normalize(&field)?;
            normalized.insert(field, direction);
        }
        Ok(ShardKey {
            keys: normalized,
            options,
        })
    }
}
