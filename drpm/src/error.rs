//! Error types for delta reading

use thiserror::Error;

/// Result type for delta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a DeltaRPM
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error on the delta file itself
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A magic word did not identify any known framing
    #[error("not a deltarpm: unrecognized magic {0:#010x}")]
    InvalidMagic(u32),

    /// The version magic decoded to a version outside 1..=3
    #[error("unsupported delta version {0}")]
    UnsupportedVersion(u8),

    /// A structural constraint of the format was violated
    #[error("invalid deltarpm: {0}")]
    InvalidFormat(String),

    /// The packed target compression descriptor names no known algorithm
    #[error("unknown target compression descriptor {0:#010x}")]
    UnknownCompression(u32),

    /// A declared length does not fit in addressable memory
    #[error("declared data length {0} exceeds addressable memory")]
    TooLarge(u64),

    /// Error from the RPM container reader
    #[error("RPM container error: {0}")]
    Rpm(#[from] drpm_rpm::Error),

    /// Error from the payload decompression stream
    #[error("payload stream error: {0}")]
    Stream(#[from] drpm_comp::Error),
}
