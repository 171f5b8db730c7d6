//! Primitive actions delivered by the rendering surface.

/// Keys the suggestion list reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Enter/Return
    Enter,
    /// Any other key; ignored by the suggestion list.
    Other,
}

/// One discrete input event, already resolved to the element it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// The main search box gained focus.
    FocusMainSearch,
    /// The main search text changed.
    ChangeMainSearch(String),
    /// The input of an active filter gained focus.
    FocusFilterInput(String),
    /// The text in an active filter's input changed.
    ChangeFilterInput { key: String, text: String },
    /// Enter was pressed inside a text filter's input.
    CommitFilterInput(String),
    /// A pointer interaction outside the widget.
    ClickOutside,
    /// A suggestion row was clicked (row index in the displayed list).
    ClickOption(usize),
    /// A key went down anywhere in the document.
    KeyDown(Key),
    /// The remove control of an active filter was clicked.
    ClickRemove(String),
}

/// Result of handling an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// The action did not apply in the current state.
    Ignored,
    /// The action was handled.
    Consumed,
}

impl EventResult {
    /// Check if the action was handled.
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Consumed)
    }
}
