//! The filter session: the state machine behind the multi-filter input.
//!
//! A session owns everything the widget shows and emits: the active filters,
//! the value map, buffered input text, and the suggestion list. The rendering
//! surface feeds it [`Action`]s and reads its state back to draw. Handlers
//! always read the live state, so the surface never needs to capture
//! snapshots of the suggestion list.

use std::collections::HashMap;
use std::fmt;

use crate::action::{Action, EventResult, Key};
use crate::active::{ActiveFilter, ActiveSet};
use crate::catalog::{Catalog, FilterKind, FilterOption};
use crate::config::SessionConfig;
use crate::deferred::{Deferred, DeferredQueue, RenderSurface};
use crate::matching::filter_candidates;
use crate::suggestions::{SuggestionList, SuggestionSource};
use crate::values::{FilterValue, ValueMap};

/// Host callback receiving the complete value map after every change.
pub type OutputCallback = Box<dyn FnMut(&ValueMap)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Mounted,
    TornDown,
}

/// State machine for one multi-filter widget instance.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use flexfilter::{Action, Catalog, FilterDefinition, FilterSession, Key, SessionConfig};
///
/// let catalog = Catalog::new([FilterDefinition::dropdown("status", "Status", ["Open", "Closed"])])?;
/// let emitted = Rc::new(RefCell::new(Vec::new()));
/// let sink = emitted.clone();
///
/// let mut session = FilterSession::new(catalog, SessionConfig::default())
///     .on_output(move |values| sink.borrow_mut().push(values.to_json()));
/// session.mount();
///
/// session.dispatch(Action::ChangeMainSearch("sta".into()));
/// session.dispatch(Action::KeyDown(Key::Enter));
/// session.dispatch(Action::FocusFilterInput("status".into()));
/// session.dispatch(Action::KeyDown(Key::Down));
/// session.dispatch(Action::KeyDown(Key::Enter));
///
/// assert_eq!(
///     emitted.borrow().last(),
///     Some(&serde_json::json!({ "status": "Closed" }))
/// );
/// # Ok::<(), flexfilter::FlexFilterError>(())
/// ```
pub struct FilterSession {
    catalog: Catalog,
    config: SessionConfig,
    active: ActiveSet,
    values: ValueMap,
    /// Free text typed into per-filter inputs.
    inputs: HashMap<String, String>,
    main_query: String,
    suggestions: SuggestionList,
    deferred: DeferredQueue,
    on_output: Option<OutputCallback>,
    lifecycle: Lifecycle,
}

impl fmt::Debug for FilterSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSession")
            .field("catalog", &self.catalog)
            .field("config", &self.config)
            .field("active", &self.active)
            .field("values", &self.values)
            .field("inputs", &self.inputs)
            .field("main_query", &self.main_query)
            .field("suggestions", &self.suggestions)
            .field("deferred", &self.deferred)
            .field("on_output", &self.on_output.is_some())
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

impl FilterSession {
    /// Create an unmounted session over `catalog`.
    pub fn new(catalog: Catalog, config: SessionConfig) -> Self {
        Self {
            catalog,
            config,
            active: ActiveSet::new(),
            values: ValueMap::new(),
            inputs: HashMap::new(),
            main_query: String::new(),
            suggestions: SuggestionList::new(),
            deferred: DeferredQueue::new(),
            on_output: None,
            lifecycle: Lifecycle::Created,
        }
    }

    /// Set the host callback.
    pub fn on_output(mut self, callback: impl FnMut(&ValueMap) + 'static) -> Self {
        self.on_output = Some(Box::new(callback));
        self
    }

    /// Replace the host callback.
    pub fn set_on_output(&mut self, callback: impl FnMut(&ValueMap) + 'static) {
        self.on_output = Some(Box::new(callback));
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Start accepting actions and emit the initial, empty value map.
    ///
    /// Mounting twice, or after teardown, does nothing.
    pub fn mount(&mut self) {
        match self.lifecycle {
            Lifecycle::Created => {
                log::debug!("session mounted catalog_len={}", self.catalog.len());
                self.lifecycle = Lifecycle::Mounted;
                self.notify();
            }
            Lifecycle::Mounted => log::warn!("session already mounted"),
            Lifecycle::TornDown => log::warn!("cannot mount a torn down session"),
        }
    }

    /// Stop accepting actions and drop pending deferred work.
    pub fn teardown(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        log::debug!("session torn down pending={}", self.deferred.len());
        self.lifecycle = Lifecycle::TornDown;
        self.suggestions.clear();
        self.deferred.drain();
    }

    /// Whether the session currently accepts actions.
    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    // -------------------------------------------------------------------------
    // Read access for the rendering surface
    // -------------------------------------------------------------------------

    /// The catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Active filters in the order they were added.
    pub fn active(&self) -> &ActiveSet {
        &self.active
    }

    /// The current value map.
    pub fn values(&self) -> &ValueMap {
        &self.values
    }

    /// The suggestion list.
    pub fn suggestions(&self) -> &SuggestionList {
        &self.suggestions
    }

    /// Text of the main search box.
    pub fn main_query(&self) -> &str {
        &self.main_query
    }

    /// Buffered text of an active filter's input.
    pub fn input_text(&self, key: &str) -> &str {
        self.inputs.get(key).map(String::as_str).unwrap_or("")
    }

    /// Key of the active filter whose input owns the suggestion list.
    pub fn focus_context(&self) -> Option<&str> {
        self.suggestions.source().and_then(SuggestionSource::filter_key)
    }

    /// Deferred work waiting for [`settle`](Self::settle).
    pub fn pending(&self) -> &DeferredQueue {
        &self.deferred
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// Apply one primitive action.
    pub fn dispatch(&mut self, action: Action) -> EventResult {
        if !self.is_mounted() {
            log::warn!("action {:?} ignored: session not mounted", action);
            return EventResult::Ignored;
        }

        match action {
            Action::FocusMainSearch => self.focus_main_search(),
            Action::ChangeMainSearch(text) => self.change_main_search(text),
            Action::FocusFilterInput(key) => self.focus_filter_input(&key),
            Action::ChangeFilterInput { key, text } => self.change_filter_input(&key, text),
            Action::CommitFilterInput(key) => self.commit_filter_input(&key),
            Action::ClickOutside => self.click_outside(),
            Action::ClickOption(index) => self.click_option(index),
            Action::KeyDown(key) => self.key_down(key),
            Action::ClickRemove(key) => self.remove_filter(&key),
        }
    }

    fn focus_main_search(&mut self) -> EventResult {
        self.refresh_global();
        EventResult::Consumed
    }

    fn change_main_search(&mut self, text: String) -> EventResult {
        self.main_query = text;
        self.refresh_global();
        EventResult::Consumed
    }

    fn focus_filter_input(&mut self, key: &str) -> EventResult {
        let Some(kind) = self.active.get(key).map(|f| f.kind.clone()) else {
            log::warn!("focus on inactive filter '{}' ignored", key);
            return EventResult::Ignored;
        };

        match kind {
            FilterKind::Dropdown => {
                self.refresh_filter(key);
                EventResult::Consumed
            }
            FilterKind::Text => {
                // Free text has no suggestions; whatever list was open goes away.
                self.suggestions.clear();
                EventResult::Consumed
            }
            FilterKind::Boolean | FilterKind::Unknown(_) => EventResult::Ignored,
        }
    }

    fn change_filter_input(&mut self, key: &str, text: String) -> EventResult {
        let Some(filter) = self.active.get(key) else {
            log::warn!("input change on inactive filter '{}' ignored", key);
            return EventResult::Ignored;
        };
        if !filter.kind.has_input() {
            return EventResult::Ignored;
        }

        let is_dropdown = filter.kind == FilterKind::Dropdown;
        self.inputs.insert(key.to_string(), text);
        if is_dropdown {
            self.refresh_filter(key);
        }
        EventResult::Consumed
    }

    fn commit_filter_input(&mut self, key: &str) -> EventResult {
        match self.active.get(key).map(|f| f.kind.clone()) {
            Some(FilterKind::Text) => {
                let text = self.inputs.get(key).cloned().unwrap_or_default();
                self.write_value(key, FilterValue::Text(text));
                EventResult::Consumed
            }
            Some(_) => EventResult::Ignored,
            None => {
                log::warn!("commit on inactive filter '{}' ignored", key);
                EventResult::Ignored
            }
        }
    }

    fn click_outside(&mut self) -> EventResult {
        if !self.suggestions.is_open() {
            return EventResult::Ignored;
        }
        self.suggestions.clear();
        EventResult::Consumed
    }

    fn click_option(&mut self, index: usize) -> EventResult {
        match self.suggestions.get(index).cloned() {
            Some(option) => {
                self.commit(option);
                EventResult::Consumed
            }
            None => EventResult::Ignored,
        }
    }

    fn key_down(&mut self, key: Key) -> EventResult {
        if !self.suggestions.is_open() {
            return EventResult::Ignored;
        }

        match key {
            Key::Down => self.suggestions.move_down(),
            Key::Up => self.suggestions.move_up(),
            Key::Enter => {
                if let Some(option) = self.suggestions.highlighted_option().cloned() {
                    self.commit(option);
                }
            }
            Key::Other => return EventResult::Ignored,
        }
        EventResult::Consumed
    }

    /// Remove an active filter together with its buffered text and value.
    fn remove_filter(&mut self, key: &str) -> EventResult {
        if self.active.remove(key).is_none() {
            log::warn!("remove of inactive filter '{}' ignored", key);
            return EventResult::Ignored;
        }

        self.inputs.remove(key);
        self.deferred.discard_for(key);
        if self.focus_context() == Some(key) {
            self.suggestions.clear();
        }
        let removed = self.values.remove(key);
        log::debug!("filter '{}' removed value={:?}", key, removed);
        self.notify();
        EventResult::Consumed
    }

    // -------------------------------------------------------------------------
    // Deferred work
    // -------------------------------------------------------------------------

    /// Run deferred work against the rendering surface.
    ///
    /// Call after the surface has rendered the latest state and before it
    /// delivers further input. A focus task whose filter is gone, or whose
    /// input the surface cannot find, is dropped. A successful focus also
    /// applies the focus transition to the session, so the host must not
    /// dispatch a separate [`Action::FocusFilterInput`] for it.
    ///
    /// Returns the number of tasks that ran.
    pub fn settle<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> usize {
        let mut ran = 0;
        for task in self.deferred.drain() {
            if !self.is_mounted() {
                break;
            }
            match task {
                Deferred::FocusFilterInput(key) => {
                    if !self.active.contains(&key) {
                        log::debug!("deferred focus skipped: '{}' no longer active", key);
                        continue;
                    }
                    if !surface.focus_filter_input(&key) {
                        log::debug!("deferred focus skipped: no input for '{}'", key);
                        continue;
                    }
                    self.focus_filter_input(&key);
                    ran += 1;
                }
            }
        }
        ran
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Catalog entries matching the main query, minus those already active.
    fn refresh_global(&mut self) {
        let pool = self.catalog.as_slice();
        let items: Vec<FilterOption> =
            filter_candidates(&self.main_query, pool, self.config.match_mode)
                .into_iter()
                .map(|index| &pool[index])
                .filter(|def| !self.active.contains(&def.key))
                .map(|def| def.as_option())
                .collect();
        self.suggestions.replace(SuggestionSource::Global, items);
    }

    /// Options of the active filter `key` matching its buffered text.
    fn refresh_filter(&mut self, key: &str) {
        let Some(filter) = self.active.get(key) else {
            return;
        };
        let query = self.inputs.get(key).map(String::as_str).unwrap_or("");
        let items: Vec<FilterOption> =
            filter_candidates(query, &filter.options, self.config.match_mode)
                .into_iter()
                .map(|index| filter.options[index].clone())
                .collect();
        self.suggestions
            .replace(SuggestionSource::Filter(key.to_string()), items);
    }

    /// Apply a chosen option. Click and Enter both end up here.
    fn commit(&mut self, option: FilterOption) {
        let owner = self.focus_context().map(str::to_string);
        self.suggestions.clear();

        match option {
            FilterOption::Keyed {
                key, label, kind, ..
            } if !key.is_empty() => self.pick_filter(key, label, kind),
            value => self.pick_value(owner, value),
        }
    }

    fn pick_filter(&mut self, key: String, label: String, kind: Option<FilterKind>) {
        self.main_query.clear();

        let definition = self.catalog.get(&key);
        let kind = kind
            .or_else(|| definition.map(|def| def.kind.clone()))
            .unwrap_or_default();
        let filter = match definition {
            Some(def) => ActiveFilter {
                kind: kind.clone(),
                ..ActiveFilter::from(def)
            },
            None => ActiveFilter::from_option(key.clone(), label, kind.clone()),
        };

        if self.active.push(filter) {
            log::debug!("filter '{}' added kind={}", key, kind);
        } else {
            log::debug!("filter '{}' already active", key);
        }

        match kind {
            FilterKind::Boolean => self.write_value(&key, FilterValue::Flag(true)),
            FilterKind::Text | FilterKind::Dropdown => {
                self.deferred.post(Deferred::FocusFilterInput(key));
            }
            FilterKind::Unknown(_) => {}
        }
    }

    fn pick_value(&mut self, owner: Option<String>, option: FilterOption) {
        let Some(owner) = owner else {
            log::warn!("value '{}' picked with no owning filter", option.label());
            return;
        };
        if !self.active.contains(&owner) {
            log::warn!("value '{}' picked for inactive filter '{}'", option.label(), owner);
            return;
        }

        let label = option.label().to_string();
        self.inputs.insert(owner.clone(), label.clone());
        self.write_value(&owner, FilterValue::Text(label));
    }

    fn write_value(&mut self, key: &str, value: FilterValue) {
        log::debug!("value written {}={}", key, value);
        self.values.write(key, value);
        self.notify();
    }

    fn notify(&mut self) {
        if let Some(callback) = self.on_output.as_mut() {
            callback(&self.values);
        }
    }
}
