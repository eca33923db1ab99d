//! Error types for payload stream handling

use thiserror::Error;

/// Result type for compression stream operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while reading a compressed delta payload
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from the underlying source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a declared field was complete
    #[error("truncated payload: expected {expected} byte(s)")]
    Truncated { expected: usize },

    /// The decoder rejected the compressed data
    #[error("corrupt compressed data: {0}")]
    Corrupt(String),
}
