//! Compression handling for DeltaRPM payloads
//!
//! DeltaRPM files embed the bulk of the delta inside a compressed region
//! whose algorithm is never declared up front; it has to be sniffed from
//! the leading bytes. This crate provides the algorithm tag, the sniffing
//! logic, the packed algorithm+level descriptor used inside delta headers,
//! and [`DecompStream`], a pull-reader over the compressed region.

mod error;
mod stream;

pub use error::{Error, Result};
pub use stream::DecompStream;

use std::fmt;

/// Magic bytes identifying gzip compressed data.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Magic bytes identifying bzip2 compressed data.
const BZIP2_MAGIC: [u8; 3] = [b'B', b'Z', b'h'];

/// Magic bytes identifying an lzma-alone stream (default filter settings).
const LZMA_MAGIC: [u8; 3] = [0x5d, 0x00, 0x00];

/// Magic bytes identifying an xz stream.
const XZ_MAGIC: [u8; 6] = [0xfd, b'7', b'z', b'X', b'Z', 0x00];

/// Magic bytes identifying zstd compressed data.
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

/// Compression algorithm of a DeltaRPM payload or target RPM archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Uncompressed pass-through
    None,
    /// gzip (also covers the rsync-friendly gzip variant)
    Gzip,
    /// bzip2
    Bzip2,
    /// Legacy lzma-alone streams
    Lzma,
    /// xz
    Xz,
    /// Zstandard
    Zstd,
}

impl Compression {
    /// Detect the compression algorithm from the leading bytes of a
    /// stream. Unrecognized bytes mean an uncompressed payload; early
    /// deltas were written without any compression.
    pub fn from_magic(bytes: &[u8]) -> Self {
        if bytes.starts_with(&GZIP_MAGIC) {
            Self::Gzip
        } else if bytes.starts_with(&BZIP2_MAGIC) {
            Self::Bzip2
        } else if bytes.starts_with(&XZ_MAGIC) {
            Self::Xz
        } else if bytes.starts_with(&LZMA_MAGIC) {
            Self::Lzma
        } else if bytes.starts_with(&ZSTD_MAGIC) {
            Self::Zstd
        } else {
            Self::None
        }
    }

    /// Parse the algorithm name as it appears in an RPM header's payload
    /// compressor tag.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Self::None),
            "gzip" => Some(Self::Gzip),
            "bzip2" => Some(Self::Bzip2),
            "lzma" => Some(Self::Lzma),
            "xz" => Some(Self::Xz),
            "zstd" => Some(Self::Zstd),
            _ => None,
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Gzip => write!(f, "gzip"),
            Self::Bzip2 => write!(f, "bzip2"),
            Self::Lzma => write!(f, "lzma"),
            Self::Xz => write!(f, "xz"),
            Self::Zstd => write!(f, "zstd"),
        }
    }
}

/// Decode the packed 32-bit compression descriptor carried by version 2+
/// deltas into an algorithm and a compression level (0 = encoder default).
///
/// The low byte selects the algorithm, the next byte carries the level;
/// returns `None` for an unknown algorithm id or nonzero high bytes.
pub fn decode_packed(value: u32) -> Option<(Compression, u8)> {
    if value >> 16 != 0 {
        return None;
    }
    let comp = match value & 0xff {
        0 => Compression::None,
        1 | 3 => Compression::Gzip,
        2 => Compression::Bzip2,
        4 => Compression::Lzma,
        5 => Compression::Xz,
        6 => Compression::Zstd,
        _ => return None,
    };
    Some((comp, (value >> 8) as u8))
}
