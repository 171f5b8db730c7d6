//! Multi-filter input state machine.
//!
//! A user composes a set of active filters from a catalog of
//! [`FilterDefinition`]s, picks values for them, and the host receives the
//! resulting [`ValueMap`] every time it changes. [`FilterSession`] holds the
//! whole state; a rendering surface turns user input into [`Action`]s and
//! draws what the session exposes.

pub mod action;
pub mod active;
pub mod catalog;
pub mod config;
pub mod deferred;
pub mod error;
pub mod matching;
pub mod session;
pub mod suggestions;
pub mod values;

pub use action::{Action, EventResult, Key};
pub use active::{ActiveFilter, ActiveSet};
pub use catalog::{Candidate, Catalog, FilterDefinition, FilterKind, FilterOption};
pub use config::{SessionConfig, WidgetConfig};
pub use deferred::{Deferred, DeferredQueue, RenderSurface};
pub use error::{FlexFilterError, Result};
pub use matching::{MatchMode, filter_candidates};
pub use session::{FilterSession, OutputCallback};
pub use suggestions::{SuggestionList, SuggestionSource};
pub use values::{FilterValue, ValueMap};

pub mod prelude {
    pub use crate::action::{Action, EventResult, Key};
    pub use crate::catalog::{Catalog, FilterDefinition, FilterKind, FilterOption};
    pub use crate::config::{SessionConfig, WidgetConfig};
    pub use crate::deferred::RenderSurface;
    pub use crate::session::FilterSession;
    pub use crate::values::{FilterValue, ValueMap};
}
