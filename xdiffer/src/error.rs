//! Error types for xdiffer.

use thiserror::Error;

/// Result type alias for xdiffer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing, diffing or applying changes.
#[derive(Error, Debug)]
pub enum Error {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A change does not fit the text it is applied to.
    #[error("Invalid change: {0}")]
    InvalidChange(String),

    /// Invalid display mode value.
    #[error("Invalid display mode: {0}")]
    InvalidDisplayMode(u8),

    /// A diff node handle could not be parsed.
    #[error("Invalid diff node handle: {0:?}")]
    InvalidHandle(String),
}
