//! The lead + signature + header view of an RPM package

use std::io::Read;

use drpm_comp::Compression;
use tracing::debug;

use crate::lead::{Lead, LEAD_LEN};
use crate::{
    Error, Header, Result, RPMTAG_EPOCH, RPMTAG_NAME, RPMTAG_PAYLOADCOMPRESSOR, RPMTAG_RELEASE,
    RPMTAG_VERSION,
};

/// An RPM package read up to (and not including) its archive.
#[derive(Debug, Clone)]
pub struct RpmPackage {
    lead: Lead,
    signature: Header,
    header: Header,
}

impl RpmPackage {
    /// Read lead, signature header and main header from `reader`,
    /// leaving it positioned at the first byte of the archive.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let lead = Lead::read(reader)?;
        let signature = Header::read(reader, true)?;
        let header = Header::read(reader, false)?;

        let pkg = Self {
            lead,
            signature,
            header,
        };
        debug!(
            "read RPM container for {} ({} byte(s))",
            pkg.lead.name,
            pkg.size_full()
        );
        Ok(pkg)
    }

    /// Total on-disk size of lead, signature (with padding) and header.
    /// The archive, and in a standard delta the compressed region,
    /// starts at exactly this offset.
    pub fn size_full(&self) -> u64 {
        LEAD_LEN as u64 + self.signature.on_disk_len() + self.header.on_disk_len()
    }

    /// The package NEVR, `name-[epoch:]version-release`.
    pub fn nevr(&self) -> Result<String> {
        let name = self
            .header
            .get_string(RPMTAG_NAME)
            .ok_or(Error::MissingTag(RPMTAG_NAME))?;
        let version = self
            .header
            .get_string(RPMTAG_VERSION)
            .ok_or(Error::MissingTag(RPMTAG_VERSION))?;
        let release = self
            .header
            .get_string(RPMTAG_RELEASE)
            .ok_or(Error::MissingTag(RPMTAG_RELEASE))?;

        Ok(match self.header.get_u32(RPMTAG_EPOCH) {
            Some(epoch) => format!("{name}-{epoch}:{version}-{release}"),
            None => format!("{name}-{version}-{release}"),
        })
    }

    /// The archive compressor declared in the header; packages predating
    /// the tag are always gzip.
    pub fn payload_compressor(&self) -> Result<Compression> {
        match self.header.get_string(RPMTAG_PAYLOADCOMPRESSOR) {
            None => Ok(Compression::Gzip),
            Some(name) => {
                Compression::from_name(name).ok_or_else(|| Error::UnknownCompressor(name.into()))
            }
        }
    }

    pub fn lead(&self) -> &Lead {
        &self.lead
    }

    pub fn signature(&self) -> &Header {
        &self.signature
    }

    pub fn header(&self) -> &Header {
        &self.header
    }
}
