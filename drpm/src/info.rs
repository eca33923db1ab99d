//! Caller-visible projection of a parsed delta
//!
//! [`DeltaInfo`] is an independent, self-contained copy of the record:
//! binary blobs that make no sense as raw bytes in a user-facing surface
//! are rendered as lowercase hex, the pair tables are flattened to the
//! wire's word layout, and the target NEVR is resolved from whichever
//! head variant the delta carries.

use std::path::PathBuf;

use drpm_comp::Compression;

use crate::delta::{DeltaRpm, DeltaType, ExternalCopy, InternalCopy, OffsetAdjustment};
use crate::Result;

/// Introspection view of a [`DeltaRpm`].
#[derive(Debug, Clone)]
pub struct DeltaInfo {
    pub filename: PathBuf,
    pub delta_type: DeltaType,
    pub version: u8,
    /// Compression of the delta payload region
    pub comp: Compression,
    pub src_nevr: String,
    pub tgt_nevr: String,
    /// Sequence as lowercase hex
    pub sequence: String,
    /// Target MD5 as lowercase hex
    pub tgt_md5: String,
    pub tgt_size: u32,
    pub tgt_comp: Compression,
    pub tgt_comp_level: u8,
    /// Compression parameters as lowercase hex, when present
    pub tgt_comp_param: Option<String>,
    pub tgt_header_len: u32,
    /// Target lead and signature as lowercase hex
    pub tgt_leadsig: String,
    pub payload_fmt_off: u32,
    /// Offset adjustments in wire word order, deltas as two's-complement
    pub offadj_elems: Vec<u32>,
    /// Internal copies in wire word order
    pub int_copies: Vec<u32>,
    /// External copies in wire word order, offsets as two's-complement
    pub ext_copies: Vec<u32>,
    pub ext_data_len: u64,
    pub int_data_len: u64,
}

impl DeltaInfo {
    /// Build the projection. Fails only when the target NEVR cannot be
    /// assembled from a standard delta's embedded RPM header.
    pub fn from_delta(delta: &DeltaRpm) -> Result<Self> {
        let tgt_nevr = delta.tgt_nevr()?;

        Ok(Self {
            filename: delta.filename.clone(),
            delta_type: delta.delta_type,
            version: delta.version,
            comp: delta.comp,
            src_nevr: delta.src_nevr.clone(),
            tgt_nevr,
            sequence: hex::encode(&delta.sequence),
            tgt_md5: hex::encode(delta.tgt_md5),
            tgt_size: delta.tgt_size,
            tgt_comp: delta.tgt_comp,
            tgt_comp_level: delta.tgt_comp_level,
            tgt_comp_param: if delta.tgt_comp_param.is_empty() {
                None
            } else {
                Some(hex::encode(&delta.tgt_comp_param))
            },
            tgt_header_len: delta.tgt_header_len,
            tgt_leadsig: hex::encode(&delta.tgt_leadsig),
            payload_fmt_off: delta.payload_fmt_off,
            offadj_elems: flatten_offadj(&delta.offadj_elems),
            int_copies: flatten_internal(&delta.int_copies),
            ext_copies: flatten_external(&delta.ext_copies),
            ext_data_len: delta.ext_data_len,
            int_data_len: delta.int_data_len,
        })
    }
}

fn flatten_offadj(elems: &[OffsetAdjustment]) -> Vec<u32> {
    let mut words = Vec::with_capacity(elems.len() * 2);
    for elem in elems {
        words.push(elem.count);
        words.push(elem.delta as u32);
    }
    words
}

fn flatten_internal(copies: &[InternalCopy]) -> Vec<u32> {
    let mut words = Vec::with_capacity(copies.len() * 2);
    for copy in copies {
        words.push(copy.count);
        words.push(copy.length);
    }
    words
}

fn flatten_external(copies: &[ExternalCopy]) -> Vec<u32> {
    let mut words = Vec::with_capacity(copies.len() * 2);
    for copy in copies {
        words.push(copy.offset as u32);
        words.push(copy.length);
    }
    words
}
