//! RPM header structures
//!
//! Signature and main header share one layout: a 16-byte preamble
//! (3-byte magic, version, 4 reserved bytes, entry count, data size),
//! an index of 16-byte entries, and a data section the entries point
//! into. On disk the signature header is additionally padded to an
//! 8-byte boundary; the main header is not.

use std::io::{ErrorKind, Read};

use byteorder::{BigEndian, ReadBytesExt};
use tracing::trace;

use crate::{Error, Result};

const HEADER_MAGIC: [u8; 3] = [0x8e, 0xad, 0xe8];
const HEADER_VERSION: u8 = 0x01;

const PREAMBLE_LEN: usize = 16;
const ENTRY_LEN: u64 = 16;

// Sanity limits in the spirit of librpm's header blob checks; a header
// beyond these is corrupt long before it is too big.
const MAX_ENTRIES: u32 = 0xffff;
const MAX_DATA_LEN: u32 = 0x1000_0000;

/// 32-bit integer entries
pub const TYPE_INT32: u32 = 4;
/// NUL-terminated string entries
pub const TYPE_STRING: u32 = 6;
/// Localized string entries; the first value is the C locale one
pub const TYPE_I18NSTRING: u32 = 9;

/// One 16-byte slot of the header index.
#[derive(Debug, Clone, Copy)]
pub struct IndexEntry {
    pub tag: u32,
    pub entry_type: u32,
    pub offset: u32,
    pub count: u32,
}

/// A parsed signature or main header.
#[derive(Debug, Clone)]
pub struct Header {
    entries: Vec<IndexEntry>,
    data: Vec<u8>,
    padding: u64,
}

fn read_exact_or(reader: &mut impl Read, buf: &mut [u8]) -> Result<()> {
    let expected = buf.len();
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            Error::Truncated { expected }
        } else {
            Error::Io(e)
        }
    })
}

impl Header {
    /// Read a header from `reader`. `aligned` selects the signature
    /// header's trailing pad to the next 8-byte boundary.
    pub fn read<R: Read>(reader: &mut R, aligned: bool) -> Result<Self> {
        let mut preamble = [0u8; PREAMBLE_LEN];
        read_exact_or(reader, &mut preamble)?;

        if preamble[..3] != HEADER_MAGIC {
            return Err(Error::InvalidHeader(format!(
                "bad magic {:02x}{:02x}{:02x}",
                preamble[0], preamble[1], preamble[2]
            )));
        }
        if preamble[3] != HEADER_VERSION {
            return Err(Error::InvalidHeader(format!(
                "unsupported header version {}",
                preamble[3]
            )));
        }

        let entry_count = u32::from_be_bytes([preamble[8], preamble[9], preamble[10], preamble[11]]);
        let data_len = u32::from_be_bytes([preamble[12], preamble[13], preamble[14], preamble[15]]);

        if entry_count > MAX_ENTRIES {
            return Err(Error::InvalidHeader(format!(
                "implausible entry count {entry_count}"
            )));
        }
        if data_len > MAX_DATA_LEN {
            return Err(Error::InvalidHeader(format!(
                "implausible data section size {data_len}"
            )));
        }

        trace!("header: {} entries, {} data byte(s)", entry_count, data_len);

        let mut entries = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            let tag = reader.read_u32::<BigEndian>().map_err(map_int_err)?;
            let entry_type = reader.read_u32::<BigEndian>().map_err(map_int_err)?;
            let offset = reader.read_u32::<BigEndian>().map_err(map_int_err)?;
            let count = reader.read_u32::<BigEndian>().map_err(map_int_err)?;
            entries.push(IndexEntry {
                tag,
                entry_type,
                offset,
                count,
            });
        }

        let mut data = vec![0u8; data_len as usize];
        read_exact_or(reader, &mut data)?;

        let padding = if aligned {
            (8 - u64::from(data_len) % 8) % 8
        } else {
            0
        };
        if padding > 0 {
            let mut pad = [0u8; 7];
            read_exact_or(reader, &mut pad[..padding as usize])?;
        }

        Ok(Self {
            entries,
            data,
            padding,
        })
    }

    /// Bytes this header occupies on disk, padding included.
    pub fn on_disk_len(&self) -> u64 {
        PREAMBLE_LEN as u64 + self.entries.len() as u64 * ENTRY_LEN + self.data.len() as u64
            + self.padding
    }

    pub fn entry(&self, tag: u32) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.tag == tag)
    }

    /// Look up a string tag (plain or localized first-value).
    pub fn get_string(&self, tag: u32) -> Option<&str> {
        let entry = self.entry(tag)?;
        if entry.entry_type != TYPE_STRING && entry.entry_type != TYPE_I18NSTRING {
            return None;
        }
        let tail = self.data.get(entry.offset as usize..)?;
        let end = tail.iter().position(|&b| b == 0)?;
        std::str::from_utf8(&tail[..end]).ok()
    }

    /// Look up the first value of a 32-bit integer tag.
    pub fn get_u32(&self, tag: u32) -> Option<u32> {
        let entry = self.entry(tag)?;
        if entry.entry_type != TYPE_INT32 || entry.count == 0 {
            return None;
        }
        let off = entry.offset as usize;
        let raw = self.data.get(off..off + 4)?;
        Some(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }
}

fn map_int_err(e: std::io::Error) -> Error {
    if e.kind() == ErrorKind::UnexpectedEof {
        Error::Truncated { expected: 4 }
    } else {
        Error::Io(e)
    }
}
