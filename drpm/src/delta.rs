//! The in-memory representation of a parsed delta

use std::fmt;
use std::path::{Path, PathBuf};

use drpm_comp::Compression;
use drpm_rpm::RpmPackage;

use crate::Result;

/// Framing of a delta, decided by its first magic word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaType {
    /// Target lead/signature/header carried verbatim outside the diff
    Standard,
    /// Target header embedded inside the diff, no outer RPM container
    RpmOnly,
}

impl fmt::Display for DeltaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::RpmOnly => write!(f, "rpm-only"),
        }
    }
}

/// Target identification, depending on the framing.
///
/// Standard deltas parse the embedded RPM container; rpm-only deltas
/// state the target NEVR directly in their outer header.
#[derive(Debug, Clone)]
pub enum DeltaHead {
    Standard(RpmPackage),
    RpmOnly { tgt_nevr: String },
}

/// A (count, signed delta) pair adjusting file offsets in the target
/// CPIO archive during reconstruction. Version 3 only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OffsetAdjustment {
    pub count: u32,
    pub delta: i32,
}

/// A copy instruction against the internal data region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InternalCopy {
    /// External copies to apply before this one
    pub count: u32,
    /// Bytes taken from the internal data region
    pub length: u32,
}

/// A copy instruction against the external (old RPM) data region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExternalCopy {
    /// Signed adjustment of the read position
    pub offset: i32,
    /// Bytes taken from the external data region
    pub length: u32,
}

/// A fully parsed DeltaRPM.
///
/// Produced whole by [`DeltaRpm::read_file`](crate::DeltaRpm::read_file);
/// no partially populated value ever escapes the parser.
#[derive(Debug)]
pub struct DeltaRpm {
    pub(crate) filename: PathBuf,
    pub(crate) delta_type: DeltaType,
    pub(crate) version: u8,
    pub(crate) comp: Compression,
    pub(crate) src_nevr: String,
    pub(crate) sequence: Vec<u8>,
    pub(crate) tgt_md5: [u8; crate::MD5_LEN],
    pub(crate) tgt_size: u32,
    pub(crate) tgt_comp: Compression,
    pub(crate) tgt_comp_level: u8,
    pub(crate) tgt_comp_param: Vec<u8>,
    pub(crate) tgt_header_len: u32,
    pub(crate) offadj_elems: Vec<OffsetAdjustment>,
    pub(crate) tgt_leadsig: Vec<u8>,
    pub(crate) payload_fmt_off: u32,
    pub(crate) int_copies: Vec<InternalCopy>,
    pub(crate) ext_copies: Vec<ExternalCopy>,
    pub(crate) ext_data_len: u64,
    pub(crate) add_data: Vec<u8>,
    pub(crate) int_data_len: u64,
    pub(crate) int_data: Vec<u8>,
    pub(crate) head: DeltaHead,
}

impl DeltaRpm {
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn delta_type(&self) -> DeltaType {
        self.delta_type
    }

    /// Wire version, 1 through 3.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Compression of the delta's own payload region.
    pub fn compression(&self) -> Compression {
        self.comp
    }

    pub fn src_nevr(&self) -> &str {
        &self.src_nevr
    }

    /// NEVR of the target package. For standard deltas this comes out of
    /// the embedded RPM header, for rpm-only deltas out of the outer
    /// delta header.
    pub fn tgt_nevr(&self) -> Result<String> {
        match &self.head {
            DeltaHead::Standard(pkg) => Ok(pkg.nevr()?),
            DeltaHead::RpmOnly { tgt_nevr } => Ok(tgt_nevr.clone()),
        }
    }

    /// MD5 prefix plus, for standard deltas, the compressed file order.
    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }

    pub fn tgt_md5(&self) -> &[u8; crate::MD5_LEN] {
        &self.tgt_md5
    }

    /// Size of the target RPM; zero on version 1 deltas.
    pub fn tgt_size(&self) -> u32 {
        self.tgt_size
    }

    /// Compression of the target RPM's archive.
    pub fn tgt_comp(&self) -> Compression {
        self.tgt_comp
    }

    /// Target compression level, 0 meaning the encoder default.
    pub fn tgt_comp_level(&self) -> u8 {
        self.tgt_comp_level
    }

    pub fn tgt_comp_param(&self) -> &[u8] {
        &self.tgt_comp_param
    }

    /// Length of the target header embedded in the diff; zero unless
    /// version 3, always nonzero for rpm-only deltas.
    pub fn tgt_header_len(&self) -> u32 {
        self.tgt_header_len
    }

    pub fn offset_adjustments(&self) -> &[OffsetAdjustment] {
        &self.offadj_elems
    }

    /// The target's lead and signature, verbatim.
    pub fn tgt_leadsig(&self) -> &[u8] {
        &self.tgt_leadsig
    }

    pub fn payload_fmt_off(&self) -> u32 {
        self.payload_fmt_off
    }

    pub fn internal_copies(&self) -> &[InternalCopy] {
        &self.int_copies
    }

    pub fn external_copies(&self) -> &[ExternalCopy] {
        &self.ext_copies
    }

    /// Declared length of the external data region (the old RPM bytes
    /// the external copies address).
    pub fn ext_data_len(&self) -> u64 {
        self.ext_data_len
    }

    pub fn add_data(&self) -> &[u8] {
        &self.add_data
    }

    pub fn int_data_len(&self) -> u64 {
        self.int_data_len
    }

    /// The internal data region carried inside the diff.
    pub fn int_data(&self) -> &[u8] {
        &self.int_data
    }

    pub fn head(&self) -> &DeltaHead {
        &self.head
    }
}

/// Decode the wire's sign-bit+magnitude encoding into a native signed
/// value. The high bit is the sign, the low 31 bits the magnitude.
pub(crate) fn decode_signed(raw: u32) -> i32 {
    if raw & 0x8000_0000 == 0 {
        raw as i32
    } else {
        ((raw & 0x7fff_ffff).wrapping_neg()) as i32
    }
}

/// Inverse of [`decode_signed`], for values with magnitude below 2^31.
#[cfg(test)]
pub(crate) fn encode_signed(value: i32) -> u32 {
    if value >= 0 {
        value as u32
    } else {
        value.unsigned_abs() | 0x8000_0000
    }
}
