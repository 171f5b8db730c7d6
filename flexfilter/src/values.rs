//! The emitted key/value map.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A filter's current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Committed free text or the label of a picked option.
    Text(String),
    /// Boolean filters.
    Flag(bool),
}

impl FilterValue {
    /// The text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FilterValue::Text(text) => Some(text),
            FilterValue::Flag(_) => None,
        }
    }

    /// The flag, if this is a boolean value.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            FilterValue::Flag(flag) => Some(*flag),
            FilterValue::Text(_) => None,
        }
    }
}

impl From<&str> for FilterValue {
    fn from(text: &str) -> Self {
        FilterValue::Text(text.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(text: String) -> Self {
        FilterValue::Text(text)
    }
}

impl From<bool> for FilterValue {
    fn from(flag: bool) -> Self {
        FilterValue::Flag(flag)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Text(text) => f.write_str(text),
            FilterValue::Flag(flag) => write!(f, "{}", flag),
        }
    }
}

/// Mapping from filter key to value, serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueMap {
    entries: BTreeMap<String, FilterValue>,
}

impl ValueMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for `key`, returning the previous one.
    pub fn write(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Option<FilterValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove the value for `key`. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.entries.remove(key)
    }

    /// Value for `key`.
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.entries.get(key)
    }

    /// Whether `key` has a value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON object representation.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| {
                    let value = match v {
                        FilterValue::Text(text) => serde_json::Value::String(text.clone()),
                        FilterValue::Flag(flag) => serde_json::Value::Bool(*flag),
                    };
                    (k.clone(), value)
                })
                .collect(),
        )
    }
}
