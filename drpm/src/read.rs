//! Reading a delta from disk
//!
//! The entry point dispatches on the leading magic word to one of two
//! header-phase parsers, then hands the file to the body parser, which
//! reads everything else through the auto-detected decompression stream.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt};
use drpm_comp::{Compression, DecompStream};
use drpm_rpm::{RpmPackage, RPM_LEADSIG_MIN_LEN, RPM_MAGIC};
use tracing::{debug, trace};

use crate::delta::{decode_signed, DeltaHead, DeltaRpm, DeltaType, ExternalCopy, InternalCopy, OffsetAdjustment};
use crate::{Error, Result, DLT3_MAGIC, DRPM_MAGIC, MD5_LEN};

/// High 24 bits of the in-stream version magic, "DLT".
const DLT_PREFIX: u32 = 0x0044_4c54;

/// Everything the header phase decides before the compressed region.
struct HeaderPhase {
    delta_type: DeltaType,
    head: DeltaHead,
    /// rpm-only deltas deliver their additional data before the stream
    add_data: Vec<u8>,
    /// target compression for version 1 deltas, which do not carry
    /// their own descriptor; overridden by the descriptor on v2+
    tgt_comp: Compression,
}

impl DeltaRpm {
    /// Read and fully parse the deltarpm at `path`.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] when the file cannot be opened or read,
    /// [`Error::InvalidMagic`] when it is not a deltarpm, and the
    /// format/version/overflow variants for malformed contents. No
    /// partially parsed record is ever returned.
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("reading deltarpm {}", path.display());

        let mut file = File::open(path)?;
        let magic = read_be32(&mut file)?;

        let phase = match magic {
            DRPM_MAGIC => read_rpmonly_header(&mut file)?,
            RPM_MAGIC => read_standard_header(&mut file)?,
            other => return Err(Error::InvalidMagic(other)),
        };

        read_delta_body(file, path, phase)
    }
}

/// Header phase of the rpm-only framing: secondary magic, target NEVR,
/// and the additional data delivered ahead of the compressed region.
fn read_rpmonly_header(file: &mut File) -> Result<HeaderPhase> {
    let magic = read_be32(file)?;
    if magic != DLT3_MAGIC {
        return Err(Error::InvalidMagic(magic));
    }

    let tgt_nevr_len = read_be32(file)?;
    let tgt_nevr = string_from(read_vec(file, tgt_nevr_len as usize)?, "target NEVR")?;
    trace!("rpm-only delta targeting {}", tgt_nevr);

    let add_data_len = read_be32(file)?;
    let add_data = read_vec(file, add_data_len as usize)?;

    Ok(HeaderPhase {
        delta_type: DeltaType::RpmOnly,
        head: DeltaHead::RpmOnly { tgt_nevr },
        add_data,
        tgt_comp: Compression::Gzip,
    })
}

/// Header phase of the standard framing: parse the embedded RPM
/// container and position the file at its declared end, where the
/// compressed region begins.
fn read_standard_header(file: &mut File) -> Result<HeaderPhase> {
    file.seek(SeekFrom::Start(0))?;
    let pkg = RpmPackage::read(file)?;

    // v1 deltas state no target compression of their own; the embedded
    // header's declared compressor stands in
    let tgt_comp = pkg.payload_compressor()?;

    file.seek(SeekFrom::Start(pkg.size_full()))?;

    Ok(HeaderPhase {
        delta_type: DeltaType::Standard,
        head: DeltaHead::Standard(pkg),
        add_data: Vec::new(),
        tgt_comp,
    })
}

/// Body parser: everything inside the compressed region, which is laid
/// out identically for both framings.
fn read_delta_body<R: Read>(source: R, filename: &Path, phase: HeaderPhase) -> Result<DeltaRpm> {
    let mut stream = DecompStream::new(source)?;
    let comp = stream.compression();

    let version_magic = stream.read_u32_be()?;
    if version_magic >> 8 != DLT_PREFIX {
        return Err(Error::InvalidMagic(version_magic));
    }
    let version = (version_magic as u8).wrapping_sub(b'0');
    if !(1..=3).contains(&version) {
        return Err(Error::UnsupportedVersion(version));
    }
    if phase.delta_type == DeltaType::RpmOnly && version < 3 {
        // rpm-only deltas only exist since version 3
        return Err(Error::InvalidFormat(format!(
            "rpm-only delta with version {version}"
        )));
    }
    debug!("{} delta, version {}, {} payload", phase.delta_type, version, comp);

    let src_nevr_len = stream.read_u32_be()?;
    let src_nevr = string_from(stream.read_bytes(src_nevr_len as usize)?, "source NEVR")?;

    // the sequence is an MD5 digest plus, for standard deltas, the
    // compressed order of the header's files in the archive
    let sequence_len = stream.read_u32_be()?;
    if (sequence_len as usize) < MD5_LEN {
        return Err(Error::InvalidFormat(format!(
            "sequence of {sequence_len} byte(s)"
        )));
    }
    if phase.delta_type == DeltaType::RpmOnly && sequence_len as usize != MD5_LEN {
        return Err(Error::InvalidFormat(
            "rpm-only sequence must be a bare MD5 digest".into(),
        ));
    }
    let sequence = stream.read_bytes(sequence_len as usize)?;

    let mut tgt_md5 = [0u8; MD5_LEN];
    stream.read_exact_buf(&mut tgt_md5)?;

    let mut tgt_size = 0u32;
    let mut tgt_comp = phase.tgt_comp;
    let mut tgt_comp_level = 0u8;
    let mut tgt_comp_param = Vec::new();
    let mut tgt_header_len = 0u32;
    let mut offadj_elems = Vec::new();

    if version >= 2 {
        tgt_size = stream.read_u32_be()?;

        let packed = stream.read_u32_be()?;
        (tgt_comp, tgt_comp_level) =
            drpm_comp::decode_packed(packed).ok_or(Error::UnknownCompression(packed))?;

        let param_len = stream.read_u32_be()?;
        if param_len > 0 {
            tgt_comp_param = stream.read_bytes(param_len as usize)?;
        }

        if version == 3 {
            tgt_header_len = stream.read_u32_be()?;

            let count = stream.read_u32_be()?;
            offadj_elems = vec![OffsetAdjustment::default(); count as usize];
            // column-major on the wire: all counts, then all deltas
            for elem in &mut offadj_elems {
                elem.count = stream.read_u32_be()?;
            }
            for elem in &mut offadj_elems {
                elem.delta = decode_signed(stream.read_u32_be()?);
            }
        }
    }

    if phase.delta_type == DeltaType::RpmOnly && tgt_header_len == 0 {
        // rpm-only deltas embed the target header in the diff
        return Err(Error::InvalidFormat(
            "rpm-only delta without a target header".into(),
        ));
    }

    let tgt_leadsig_len = stream.read_u32_be()?;
    if tgt_leadsig_len < RPM_LEADSIG_MIN_LEN {
        return Err(Error::InvalidFormat(format!(
            "target lead/signature of {tgt_leadsig_len} byte(s)"
        )));
    }
    let tgt_leadsig = stream.read_bytes(tgt_leadsig_len as usize)?;

    let payload_fmt_off = stream.read_u32_be()?;
    let int_copies_count = stream.read_u32_be()?;
    let ext_copies_count = stream.read_u32_be()?;
    trace!(
        "{} internal and {} external copies",
        int_copies_count,
        ext_copies_count
    );

    let mut int_copies = vec![InternalCopy::default(); int_copies_count as usize];
    for copy in &mut int_copies {
        copy.count = stream.read_u32_be()?;
    }
    for copy in &mut int_copies {
        copy.length = stream.read_u32_be()?;
    }

    let mut ext_copies = vec![ExternalCopy::default(); ext_copies_count as usize];
    for copy in &mut ext_copies {
        copy.offset = decode_signed(stream.read_u32_be()?);
    }
    for copy in &mut ext_copies {
        copy.length = stream.read_u32_be()?;
    }

    let ext_data_len = if version == 3 {
        stream.read_u64_be()?
    } else {
        u64::from(stream.read_u32_be()?)
    };

    let add_data_len = stream.read_u32_be()?;
    let add_data = if add_data_len > 0 {
        if phase.delta_type == DeltaType::RpmOnly {
            // already delivered ahead of the stream
            return Err(Error::InvalidFormat(
                "rpm-only delta with additional data inside the diff".into(),
            ));
        }
        stream.read_bytes(add_data_len as usize)?
    } else {
        phase.add_data
    };

    let int_data_len = if version == 3 {
        stream.read_u64_be()?
    } else {
        u64::from(stream.read_u32_be()?)
    };
    let int_data_size = usize::try_from(int_data_len).map_err(|_| Error::TooLarge(int_data_len))?;
    let int_data = stream.read_bytes(int_data_size)?;

    validate_internal_copies(&int_copies, int_data_len)?;
    validate_external_copies(&ext_copies, ext_data_len)?;

    Ok(DeltaRpm {
        filename: filename.to_path_buf(),
        delta_type: phase.delta_type,
        version,
        comp,
        src_nevr,
        sequence,
        tgt_md5,
        tgt_size,
        tgt_comp,
        tgt_comp_level,
        tgt_comp_param,
        tgt_header_len,
        offadj_elems,
        tgt_leadsig,
        payload_fmt_off,
        int_copies,
        ext_copies,
        ext_data_len,
        add_data,
        int_data_len,
        int_data,
        head: phase.head,
    })
}

/// Every internal copy consumes its length from the internal data
/// region; the running total may never pass the declared end.
fn validate_internal_copies(copies: &[InternalCopy], int_data_len: u64) -> Result<()> {
    let mut off: u64 = 0;
    for copy in copies {
        off = off
            .checked_add(u64::from(copy.length))
            .filter(|&off| off <= int_data_len)
            .ok_or_else(|| {
                Error::InvalidFormat(format!(
                    "internal copies pass the end of {int_data_len} byte(s) of internal data"
                ))
            })?;
    }
    Ok(())
}

/// External copies seek (signed) and then consume (unsigned) within the
/// external data region; the position may never leave `0..=len` and
/// must be strictly positive after each complete instruction.
fn validate_external_copies(copies: &[ExternalCopy], ext_data_len: u64) -> Result<()> {
    let limit = i128::from(ext_data_len);
    let mut off: i128 = 0;
    for copy in copies {
        off += i128::from(copy.offset);
        if off < 0 || off > limit {
            return Err(Error::InvalidFormat(format!(
                "external copy seeks outside {ext_data_len} byte(s) of external data"
            )));
        }
        off += i128::from(copy.length);
        if off == 0 || off > limit {
            return Err(Error::InvalidFormat(format!(
                "external copy reads outside {ext_data_len} byte(s) of external data"
            )));
        }
    }
    Ok(())
}

/// Read a big-endian 32-bit word from the raw file. Hitting EOF here
/// means a truncated delta, not an I/O failure.
fn read_be32(reader: &mut impl Read) -> Result<u32> {
    reader.read_u32::<BigEndian>().map_err(map_file_err)
}

/// Read an exact-length blob from the raw file, with the same EOF rule.
fn read_vec(reader: &mut impl Read, len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).map_err(map_file_err)?;
    Ok(buf)
}

fn map_file_err(e: std::io::Error) -> Error {
    if e.kind() == ErrorKind::UnexpectedEof {
        Error::InvalidFormat("unexpected end of file".into())
    } else {
        Error::Io(e)
    }
}

fn string_from(bytes: Vec<u8>, what: &str) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| Error::InvalidFormat(format!("{what} is not valid UTF-8")))
}
