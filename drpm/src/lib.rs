//! DeltaRPM (drpm) reading
//!
//! A DeltaRPM is a binary diff between two versions of an RPM package;
//! a consumer holding the old RPM can reconstruct the new one from it.
//! This crate decodes a drpm file into a fully populated in-memory
//! record, ready for reconstruction tooling or plain introspection.
//!
//! Two framings exist, told apart by the first four bytes:
//!
//! * **standard** deltas open with the RPM lead magic and carry the
//!   target's lead, signature and header verbatim, followed by the
//!   compressed diff;
//! * **rpm-only** deltas open with `"drpm"` and embed the target header
//!   inside the compressed diff instead.
//!
//! The compressed region's algorithm is sniffed from its leading bytes;
//! inside it live three wire versions (1 through 3) differing in field
//! presence and length widths.
//!
//! ```no_run
//! use drpm::{DeltaInfo, DeltaRpm};
//!
//! let delta = DeltaRpm::read_file("foo-1.0-1_1.1-1.x86_64.drpm")?;
//! let info = DeltaInfo::from_delta(&delta)?;
//! println!("{} -> {}", info.src_nevr, info.tgt_nevr);
//! # Ok::<(), drpm::Error>(())
//! ```

mod delta;
mod error;
mod info;
mod read;

pub use delta::{DeltaHead, DeltaRpm, DeltaType, ExternalCopy, InternalCopy, OffsetAdjustment};
pub use error::{Error, Result};
pub use info::DeltaInfo;

pub use drpm_comp::Compression;
pub use drpm_rpm::RpmPackage;

/// Leading magic of the rpm-only framing, "drpm".
pub const DRPM_MAGIC: u32 = 0x6472_706d;

/// Secondary magic of the rpm-only framing, "DLT3".
pub const DLT3_MAGIC: u32 = 0x444c_5433;

/// Length of an MD5 digest in bytes.
pub const MD5_LEN: usize = 16;
