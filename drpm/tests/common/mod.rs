//! Builders for synthetic delta files
//!
//! Tests assemble complete wire images: a delta body (the contents of
//! the compressed region), a compression wrapper, and one of the two
//! outer framings, plus a minimal RPM container for standard deltas.

#![allow(dead_code)]

use std::io::Write;

use tempfile::NamedTempFile;

/// Uncompressed image of a delta body, encoded on demand.
pub struct DeltaBody {
    pub version: u8,
    pub src_nevr: String,
    pub sequence: Vec<u8>,
    pub tgt_md5: [u8; 16],
    pub tgt_size: u32,
    pub packed_comp: u32,
    pub tgt_comp_param: Vec<u8>,
    pub tgt_header_len: u32,
    /// raw wire words: (count, sign-magnitude encoded delta)
    pub offadj: Vec<(u32, u32)>,
    pub leadsig: Vec<u8>,
    pub payload_fmt_off: u32,
    pub int_copies: Vec<(u32, u32)>,
    /// raw wire words: (sign-magnitude encoded offset, length)
    pub ext_copies: Vec<(u32, u32)>,
    pub ext_data_len: u64,
    pub add_data: Vec<u8>,
    pub int_data: Vec<u8>,
}

impl DeltaBody {
    pub fn v3() -> Self {
        Self {
            version: 3,
            src_nevr: "bar-0.9-1.x86_64".into(),
            sequence: (0..16).collect(),
            tgt_md5: [0; 16],
            tgt_size: 0x100,
            packed_comp: 1, // gzip, default level
            tgt_comp_param: Vec::new(),
            tgt_header_len: 0x50,
            offadj: Vec::new(),
            leadsig: vec![0xAA; 112],
            payload_fmt_off: 0,
            int_copies: Vec::new(),
            ext_copies: Vec::new(),
            ext_data_len: 0,
            add_data: Vec::new(),
            int_data: Vec::new(),
        }
    }

    pub fn v2() -> Self {
        Self {
            version: 2,
            ..Self::v3()
        }
    }

    pub fn v1() -> Self {
        Self {
            version: 1,
            ..Self::v3()
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"DLT");
        out.push(b'0' + self.version);

        out.extend_from_slice(&(self.src_nevr.len() as u32).to_be_bytes());
        out.extend_from_slice(self.src_nevr.as_bytes());

        out.extend_from_slice(&(self.sequence.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.sequence);

        out.extend_from_slice(&self.tgt_md5);

        if self.version >= 2 {
            out.extend_from_slice(&self.tgt_size.to_be_bytes());
            out.extend_from_slice(&self.packed_comp.to_be_bytes());
            out.extend_from_slice(&(self.tgt_comp_param.len() as u32).to_be_bytes());
            out.extend_from_slice(&self.tgt_comp_param);

            if self.version == 3 {
                out.extend_from_slice(&self.tgt_header_len.to_be_bytes());
                out.extend_from_slice(&(self.offadj.len() as u32).to_be_bytes());
                // column-major: all counts first, then all deltas
                for &(count, _) in &self.offadj {
                    out.extend_from_slice(&count.to_be_bytes());
                }
                for &(_, delta) in &self.offadj {
                    out.extend_from_slice(&delta.to_be_bytes());
                }
            }
        }

        out.extend_from_slice(&(self.leadsig.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.leadsig);

        out.extend_from_slice(&self.payload_fmt_off.to_be_bytes());
        out.extend_from_slice(&(self.int_copies.len() as u32).to_be_bytes());
        out.extend_from_slice(&(self.ext_copies.len() as u32).to_be_bytes());

        for &(count, _) in &self.int_copies {
            out.extend_from_slice(&count.to_be_bytes());
        }
        for &(_, length) in &self.int_copies {
            out.extend_from_slice(&length.to_be_bytes());
        }

        for &(offset, _) in &self.ext_copies {
            out.extend_from_slice(&offset.to_be_bytes());
        }
        for &(_, length) in &self.ext_copies {
            out.extend_from_slice(&length.to_be_bytes());
        }

        if self.version == 3 {
            out.extend_from_slice(&self.ext_data_len.to_be_bytes());
        } else {
            out.extend_from_slice(&(self.ext_data_len as u32).to_be_bytes());
        }

        out.extend_from_slice(&(self.add_data.len() as u32).to_be_bytes());
        out.extend_from_slice(&self.add_data);

        if self.version == 3 {
            out.extend_from_slice(&(self.int_data.len() as u64).to_be_bytes());
        } else {
            out.extend_from_slice(&(self.int_data.len() as u32).to_be_bytes());
        }
        out.extend_from_slice(&self.int_data);

        out
    }
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

pub fn bzip2(data: &[u8]) -> Vec<u8> {
    let mut enc = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

pub fn zstd(data: &[u8]) -> Vec<u8> {
    ::zstd::encode_all(data, 0).unwrap()
}

/// Wrap a compressed region in the rpm-only framing.
pub fn rpmonly_file(tgt_nevr: &str, add_data: &[u8], region: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"drpm");
    out.extend_from_slice(b"DLT3");
    out.extend_from_slice(&(tgt_nevr.len() as u32).to_be_bytes());
    out.extend_from_slice(tgt_nevr.as_bytes());
    out.extend_from_slice(&(add_data.len() as u32).to_be_bytes());
    out.extend_from_slice(add_data);
    out.extend_from_slice(region);
    out
}

/// Wrap a compressed region in the standard framing: the RPM container
/// verbatim, region immediately after.
pub fn standard_file(rpm: &[u8], region: &[u8]) -> Vec<u8> {
    let mut out = rpm.to_vec();
    out.extend_from_slice(region);
    out
}

const TYPE_STRING: u32 = 6;
const TYPE_INT32: u32 = 4;

fn rpm_header(entries: &[(u32, u32, &[u8])], aligned: bool) -> Vec<u8> {
    let mut index = Vec::new();
    let mut data = Vec::new();
    for &(tag, ty, value) in entries {
        if ty == TYPE_INT32 {
            while data.len() % 4 != 0 {
                data.push(0);
            }
        }
        index.push((tag, ty, data.len() as u32));
        data.extend_from_slice(value);
        if ty == TYPE_STRING {
            data.push(0);
        }
    }

    let mut out = vec![0x8e, 0xad, 0xe8, 0x01, 0, 0, 0, 0];
    out.extend_from_slice(&(entries.len() as u32).to_be_bytes());
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    for (tag, ty, off) in index {
        out.extend_from_slice(&tag.to_be_bytes());
        out.extend_from_slice(&ty.to_be_bytes());
        out.extend_from_slice(&off.to_be_bytes());
        out.extend_from_slice(&1u32.to_be_bytes());
    }
    let data_len = data.len();
    out.extend_from_slice(&data);
    if aligned {
        out.extend_from_slice(&vec![0u8; (8 - data_len % 8) % 8]);
    }
    out
}

/// A syntactically complete RPM container: lead, empty signature
/// header, and a main header naming foo-1.0-1.
pub fn minimal_rpm(compressor: Option<&str>) -> Vec<u8> {
    let mut out = vec![0u8; 96];
    out[..4].copy_from_slice(&[0xed, 0xab, 0xee, 0xdb]);
    out[4] = 3;
    out[10..20].copy_from_slice(b"foo-1.0-1\0");
    out[78..80].copy_from_slice(&5u16.to_be_bytes());

    out.extend_from_slice(&rpm_header(&[], true));

    let mut entries: Vec<(u32, u32, &[u8])> = vec![
        (1000, TYPE_STRING, b"foo"),
        (1001, TYPE_STRING, b"1.0"),
        (1002, TYPE_STRING, b"1"),
    ];
    if let Some(compressor) = compressor {
        entries.push((1125, TYPE_STRING, compressor.as_bytes()));
    }
    out.extend_from_slice(&rpm_header(&entries, false));
    out
}

/// Land the image in a real file for the path-based entry point.
pub fn temp_drpm(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}
