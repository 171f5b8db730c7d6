//! Error types

use std::path::PathBuf;

/// Errors raised while building a filter catalog or configuration.
///
/// State transitions of a [`FilterSession`](crate::FilterSession) never fail;
/// actions that cannot apply are reported as
/// [`EventResult::Ignored`](crate::EventResult::Ignored) instead.
#[derive(Debug, thiserror::Error)]
pub enum FlexFilterError {
    /// The catalog or configuration JSON could not be parsed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A catalog or configuration file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two catalog entries share the same key.
    #[error("duplicate filter key '{0}' in catalog")]
    DuplicateKey(String),

    /// A catalog entry has an empty key.
    #[error("filter '{label}' has an empty key")]
    EmptyKey { label: String },
}

impl FlexFilterError {
    /// Creates an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for fallible catalog and configuration operations.
pub type Result<T> = std::result::Result<T, FlexFilterError>;
