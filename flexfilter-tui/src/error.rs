//! Application error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("usage: flexfilter-tui <catalog.json> [config.json] [--log-dir <dir>]")]
    Usage,
    #[error(transparent)]
    Filter(#[from] flexfilter::FlexFilterError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid color '{value}' for {field}")]
    Color { field: &'static str, value: String },
    #[error("logger error: {0}")]
    Logger(#[from] log::SetLoggerError),
}
