//! The 96-byte package lead
//!
//! The lead opens every RPM package. Most of its fields were superseded
//! by the header decades ago; delta processing only needs it parsed far
//! enough to size and identify the container.

use std::io::{ErrorKind, Read};

use crate::{Error, Result};

/// On-disk size of the lead.
pub const LEAD_LEN: usize = 96;

const LEAD_MAGIC: [u8; 4] = [0xed, 0xab, 0xee, 0xdb];

/// A parsed package lead.
#[derive(Debug, Clone)]
pub struct Lead {
    pub major: u8,
    pub minor: u8,
    pub package_type: u16,
    pub archnum: u16,
    pub name: String,
    pub osnum: u16,
    pub signature_type: u16,
}

impl Lead {
    /// Read and validate a lead from `reader`.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buf = [0u8; LEAD_LEN];
        reader.read_exact(&mut buf).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                Error::Truncated { expected: LEAD_LEN }
            } else {
                Error::Io(e)
            }
        })?;

        if buf[..4] != LEAD_MAGIC {
            return Err(Error::InvalidLead(format!(
                "bad magic {:02x}{:02x}{:02x}{:02x}",
                buf[0], buf[1], buf[2], buf[3]
            )));
        }

        let name_field = &buf[10..76];
        let name_len = name_field
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::InvalidLead("package name not NUL-terminated".into()))?;
        let name = String::from_utf8(name_field[..name_len].to_vec())
            .map_err(|_| Error::InvalidLead("package name is not valid UTF-8".into()))?;

        Ok(Self {
            major: buf[4],
            minor: buf[5],
            package_type: u16::from_be_bytes([buf[6], buf[7]]),
            archnum: u16::from_be_bytes([buf[8], buf[9]]),
            name,
            osnum: u16::from_be_bytes([buf[76], buf[77]]),
            signature_type: u16::from_be_bytes([buf[78], buf[79]]),
        })
    }
}
