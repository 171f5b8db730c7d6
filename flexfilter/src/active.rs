//! The set of filters the user has added.

use crate::catalog::{FilterDefinition, FilterKind, FilterOption};

/// A filter in the active set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    /// Key shared with the catalog and the value map.
    pub key: String,
    /// Chip text.
    pub label: String,
    /// Input kind.
    pub kind: FilterKind,
    /// Choices offered by a dropdown filter's input.
    pub options: Vec<FilterOption>,
}

impl ActiveFilter {
    /// Build an active filter for a keyed option that has no catalog entry.
    pub fn from_option(key: impl Into<String>, label: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            options: Vec::new(),
        }
    }
}

impl From<&FilterDefinition> for ActiveFilter {
    fn from(def: &FilterDefinition) -> Self {
        Self {
            key: def.key.clone(),
            label: def.label.clone(),
            kind: def.kind.clone(),
            options: def.options.clone(),
        }
    }
}

/// Ordered active filters with unique keys.
#[derive(Debug, Clone, Default)]
pub struct ActiveSet {
    filters: Vec<ActiveFilter>,
}

impl ActiveSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter. Returns `false` and leaves the set unchanged if the
    /// key is already active.
    pub fn push(&mut self, filter: ActiveFilter) -> bool {
        if self.contains(&filter.key) {
            return false;
        }
        self.filters.push(filter);
        true
    }

    /// Remove the filter with `key`.
    pub fn remove(&mut self, key: &str) -> Option<ActiveFilter> {
        let index = self.filters.iter().position(|f| f.key == key)?;
        Some(self.filters.remove(index))
    }

    /// Filter with `key`.
    pub fn get(&self, key: &str) -> Option<&ActiveFilter> {
        self.filters.iter().find(|f| f.key == key)
    }

    /// Whether `key` is active.
    pub fn contains(&self, key: &str) -> bool {
        self.filters.iter().any(|f| f.key == key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|f| f.key.as_str())
    }

    /// Filters in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ActiveFilter> {
        self.filters.iter()
    }

    /// Filters in insertion order.
    pub fn as_slice(&self) -> &[ActiveFilter] {
        &self.filters
    }

    /// Number of active filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether no filter is active.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
