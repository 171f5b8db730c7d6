//! Filter catalog: the host-supplied, read-only set of filter definitions.
//!
//! The JSON shape accepted here is the one hosts already produce:
//!
//! ```json
//! [
//!   { "key": "status", "label": "Status", "type": "dropdown",
//!     "options": ["Open", { "label": "Closed", "description": "resolved" }] },
//!   { "key": "name", "label": "Name", "type": "text" },
//!   { "key": "mine", "label": "Assigned to me", "type": "boolean" }
//! ]
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FlexFilterError, Result};

// =============================================================================
// Filter Kind
// =============================================================================

/// What kind of input a filter solicits once it is active.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FilterKind {
    /// Free text, written to the value map on an explicit commit.
    Text,
    /// A value chosen from the filter's option list.
    Dropdown,
    /// A flag that is set to `true` as soon as the filter is added.
    Boolean,
    /// Anything else. Such filters render no input but can still be added
    /// and removed.
    Unknown(String),
}

impl FilterKind {
    /// Whether the rendering surface shows a per-filter input for this kind.
    pub fn has_input(&self) -> bool {
        matches!(self, FilterKind::Text | FilterKind::Dropdown)
    }

    /// The name used in catalog JSON.
    pub fn as_str(&self) -> &str {
        match self {
            FilterKind::Text => "text",
            FilterKind::Dropdown => "dropdown",
            FilterKind::Boolean => "boolean",
            FilterKind::Unknown(name) => name,
        }
    }
}

impl Default for FilterKind {
    fn default() -> Self {
        FilterKind::Unknown(String::new())
    }
}

impl From<String> for FilterKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "text" => FilterKind::Text,
            "dropdown" => FilterKind::Dropdown,
            "boolean" => FilterKind::Boolean,
            _ => FilterKind::Unknown(name),
        }
    }
}

impl From<&str> for FilterKind {
    fn from(name: &str) -> Self {
        FilterKind::from(name.to_string())
    }
}

impl From<FilterKind> for String {
    fn from(kind: FilterKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Filter Option
// =============================================================================

/// An entry that can be offered in a suggestion list.
///
/// Whether an option carries a key decides what choosing it does: a keyed
/// option adds a filter to the active set, anything else is a value for the
/// filter whose input currently owns the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterOption {
    /// A bare string value.
    Value(String),
    /// A record that names a filter.
    Keyed {
        key: String,
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
        kind: Option<FilterKind>,
    },
    /// A record without a key: a structured value.
    Plain {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
        kind: Option<FilterKind>,
    },
}

impl FilterOption {
    /// Create a bare string value.
    pub fn value(text: impl Into<String>) -> Self {
        FilterOption::Value(text.into())
    }

    /// Create a keyed option of the given kind.
    pub fn keyed(key: impl Into<String>, label: impl Into<String>, kind: FilterKind) -> Self {
        FilterOption::Keyed {
            key: key.into(),
            label: label.into(),
            description: None,
            kind: Some(kind),
        }
    }

    /// Create a structured value without a key.
    pub fn plain(label: impl Into<String>) -> Self {
        FilterOption::Plain {
            label: label.into(),
            description: None,
            kind: None,
        }
    }

    /// Attach a description. Bare values are promoted to [`FilterOption::Plain`].
    pub fn with_description(self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match self {
            FilterOption::Value(label) => FilterOption::Plain {
                label,
                description: text,
                kind: None,
            },
            FilterOption::Keyed {
                key, label, kind, ..
            } => FilterOption::Keyed {
                key,
                label,
                description: text,
                kind,
            },
            FilterOption::Plain { label, kind, .. } => FilterOption::Plain {
                label,
                description: text,
                kind,
            },
        }
    }

    /// Display text, also used for matching.
    pub fn label(&self) -> &str {
        match self {
            FilterOption::Value(text) => text,
            FilterOption::Keyed { label, .. } | FilterOption::Plain { label, .. } => label,
        }
    }

    /// The filter key, if this option names a filter.
    pub fn key(&self) -> Option<&str> {
        match self {
            FilterOption::Keyed { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Secondary text shown after the label.
    pub fn description(&self) -> Option<&str> {
        match self {
            FilterOption::Value(_) => None,
            FilterOption::Keyed { description, .. } | FilterOption::Plain { description, .. } => {
                description.as_deref()
            }
        }
    }

    /// Declared kind, if any.
    pub fn kind(&self) -> Option<&FilterKind> {
        match self {
            FilterOption::Value(_) => None,
            FilterOption::Keyed { kind, .. } | FilterOption::Plain { kind, .. } => kind.as_ref(),
        }
    }
}

impl From<&str> for FilterOption {
    fn from(text: &str) -> Self {
        FilterOption::value(text)
    }
}

impl From<String> for FilterOption {
    fn from(text: String) -> Self {
        FilterOption::Value(text)
    }
}

// =============================================================================
// Filter Definition
// =============================================================================

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDefinition {
    /// Unique identifier, also the key in the emitted value map.
    pub key: String,
    /// Display text.
    pub label: String,
    /// Input kind.
    #[serde(default, rename = "type")]
    pub kind: FilterKind,
    /// Choices for [`FilterKind::Dropdown`] filters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FilterOption>,
}

impl FilterDefinition {
    /// Create a definition with no options.
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            options: Vec::new(),
        }
    }

    /// Create a text filter.
    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FilterKind::Text)
    }

    /// Create a boolean filter.
    pub fn boolean(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FilterKind::Boolean)
    }

    /// Create a dropdown filter with the given options.
    pub fn dropdown<O>(
        key: impl Into<String>,
        label: impl Into<String>,
        options: impl IntoIterator<Item = O>,
    ) -> Self
    where
        O: Into<FilterOption>,
    {
        Self {
            key: key.into(),
            label: label.into(),
            kind: FilterKind::Dropdown,
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    /// The keyed option offered for this definition in the main search.
    pub fn as_option(&self) -> FilterOption {
        FilterOption::Keyed {
            key: self.key.clone(),
            label: self.label.clone(),
            description: None,
            kind: Some(self.kind.clone()),
        }
    }
}

// =============================================================================
// Candidate
// =============================================================================

/// Anything that can be matched against a query by its display label.
pub trait Candidate {
    /// Text the query is matched against.
    fn match_label(&self) -> &str;
}

impl Candidate for FilterOption {
    fn match_label(&self) -> &str {
        self.label()
    }
}

impl Candidate for FilterDefinition {
    fn match_label(&self) -> &str {
        &self.label
    }
}

impl Candidate for String {
    fn match_label(&self) -> &str {
        self
    }
}

impl Candidate for &str {
    fn match_label(&self) -> &str {
        self
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// Ordered, immutable sequence of filter definitions with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    filters: Vec<FilterDefinition>,
}

impl Catalog {
    /// Build a catalog, rejecting empty or duplicate keys.
    pub fn new(filters: impl IntoIterator<Item = FilterDefinition>) -> Result<Self> {
        let filters: Vec<FilterDefinition> = filters.into_iter().collect();
        Self::validate(&filters)?;
        Ok(Self { filters })
    }

    fn validate(filters: &[FilterDefinition]) -> Result<()> {
        let mut seen = HashSet::with_capacity(filters.len());
        for filter in filters {
            if filter.key.is_empty() {
                return Err(FlexFilterError::EmptyKey {
                    label: filter.label.clone(),
                });
            }
            if !seen.insert(filter.key.as_str()) {
                return Err(FlexFilterError::DuplicateKey(filter.key.clone()));
            }
            if let FilterKind::Unknown(name) = &filter.kind {
                log::warn!("filter '{}' has unsupported type '{}'", filter.key, name);
            }
        }
        Ok(())
    }

    /// Parse a catalog from a JSON array of definitions.
    pub fn from_json(json: &str) -> Result<Self> {
        let filters: Vec<FilterDefinition> = serde_json::from_str(json)?;
        Self::new(filters)
    }

    /// Read and parse a catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json =
            std::fs::read_to_string(path).map_err(|e| FlexFilterError::io(path, e))?;
        Self::from_json(&json)
    }

    /// Look up a definition by key.
    pub fn get(&self, key: &str) -> Option<&FilterDefinition> {
        self.filters.iter().find(|f| f.key == key)
    }

    /// Iterate definitions in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, FilterDefinition> {
        self.filters.iter()
    }

    /// All definitions in catalog order.
    pub fn as_slice(&self) -> &[FilterDefinition] {
        &self.filters
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the catalog has no definitions.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a FilterDefinition;
    type IntoIter = std::slice::Iter<'a, FilterDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}
