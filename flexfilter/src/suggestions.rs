//! The live suggestion list and its highlighted row.

use crate::catalog::FilterOption;

/// Which pool fed the current suggestion list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SuggestionSource {
    /// The main search box, matching against the catalog.
    Global,
    /// The input of an active dropdown filter, matching its options.
    Filter(String),
}

impl SuggestionSource {
    /// The filter key that owns the list, if any.
    pub fn filter_key(&self) -> Option<&str> {
        match self {
            SuggestionSource::Global => None,
            SuggestionSource::Filter(key) => Some(key),
        }
    }
}

/// Filtered candidates shown in the dropdown, plus keyboard highlight.
///
/// The list is either closed (empty) or open with `highlighted` inside
/// `0..len`. Every [`replace`](Self::replace) produces a new list identity,
/// observable through [`generation`](Self::generation).
#[derive(Debug, Clone, Default)]
pub struct SuggestionList {
    items: Vec<FilterOption>,
    highlighted: usize,
    source: Option<SuggestionSource>,
    generation: u64,
}

impl SuggestionList {
    /// Create a closed list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents and reset the highlight to the first row.
    pub fn replace(&mut self, source: SuggestionSource, items: Vec<FilterOption>) {
        log::trace!(
            "suggestions replaced source={:?} count={}",
            source,
            items.len()
        );
        self.items = items;
        self.highlighted = 0;
        self.source = if self.items.is_empty() {
            None
        } else {
            Some(source)
        };
        self.generation = self.generation.wrapping_add(1);
    }

    /// Close the list, dropping its source.
    pub fn clear(&mut self) {
        if self.is_open() {
            self.generation = self.generation.wrapping_add(1);
        }
        self.items.clear();
        self.highlighted = 0;
        self.source = None;
    }

    /// Whether there is anything to show.
    pub fn is_open(&self) -> bool {
        !self.items.is_empty()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is closed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Rows in display order.
    pub fn items(&self) -> &[FilterOption] {
        &self.items
    }

    /// Row at `index`.
    pub fn get(&self, index: usize) -> Option<&FilterOption> {
        self.items.get(index)
    }

    /// Index of the highlighted row. Meaningless while closed.
    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// The highlighted row, if the list is open.
    pub fn highlighted_option(&self) -> Option<&FilterOption> {
        self.items.get(self.highlighted)
    }

    /// Source of the current rows; `None` while closed.
    pub fn source(&self) -> Option<&SuggestionSource> {
        self.source.as_ref()
    }

    /// Identity counter, bumped whenever the rows are replaced or closed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Move the highlight down, wrapping to the first row.
    pub fn move_down(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.highlighted = if self.highlighted + 1 >= self.items.len() {
            0
        } else {
            self.highlighted + 1
        };
    }

    /// Move the highlight up, wrapping to the last row.
    pub fn move_up(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.highlighted = if self.highlighted == 0 {
            self.items.len() - 1
        } else {
            self.highlighted - 1
        };
    }
}
