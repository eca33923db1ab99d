//! Error types for RPM container reading

use thiserror::Error;

/// Result type for RPM container operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while reading an RPM lead, signature or header
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from the underlying source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file ended inside a fixed-size structure
    #[error("truncated RPM: expected {expected} byte(s)")]
    Truncated { expected: usize },

    /// Malformed package lead
    #[error("invalid RPM lead: {0}")]
    InvalidLead(String),

    /// Malformed signature or main header
    #[error("invalid RPM header: {0}")]
    InvalidHeader(String),

    /// A tag required by the caller is not present in the header
    #[error("required header tag {0} missing")]
    MissingTag(u32),

    /// The payload compressor tag names an algorithm we do not know
    #[error("unknown payload compressor: {0}")]
    UnknownCompressor(String),
}
