//! RPM container reading for DeltaRPM processing
//!
//! A standard delta carries the target RPM's lead, signature and header
//! verbatim in front of the compressed diff. This crate parses exactly
//! those three structures (the archive itself is never read) and answers
//! the questions delta processing asks of them: the package NEVR, the
//! declared payload compressor, and the total on-disk size of the
//! container, which is where the compressed region begins.

mod error;
mod header;
mod lead;
mod package;

pub use error::{Error, Result};
pub use header::{Header, IndexEntry};
pub use lead::Lead;
pub use package::RpmPackage;

/// Magic of the RPM lead, as a big-endian word.
pub const RPM_MAGIC: u32 = 0xedab_eedb;

/// Smallest possible lead + signature: the 96-byte lead followed by an
/// empty signature header (16-byte preamble).
pub const RPM_LEADSIG_MIN_LEN: u32 = 112;

/// Package name
pub const RPMTAG_NAME: u32 = 1000;
/// Package version
pub const RPMTAG_VERSION: u32 = 1001;
/// Package release
pub const RPMTAG_RELEASE: u32 = 1002;
/// Package epoch (optional)
pub const RPMTAG_EPOCH: u32 = 1003;
/// Archive format, normally "cpio"
pub const RPMTAG_PAYLOADFORMAT: u32 = 1124;
/// Archive compressor name, absent on ancient gzip-only packages
pub const RPMTAG_PAYLOADCOMPRESSOR: u32 = 1125;
