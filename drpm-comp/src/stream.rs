//! Streaming decompression of the delta payload
//!
//! The compressed region of a delta carries no algorithm declaration, so
//! [`DecompStream`] sniffs the algorithm from the first bytes of the
//! source and then serves exact-length reads from the matching decoder.

use std::io::{BufReader, Chain, Cursor, ErrorKind, Read};

use byteorder::{BigEndian, ReadBytesExt};
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use tracing::{debug, trace};
use xz2::read::XzDecoder;

use crate::{Compression, Error, Result};

/// Longest magic prefix we need to see (the xz magic).
const DETECT_LEN: usize = 6;

/// The sniffed prefix chained back in front of the rest of the source.
type Source<R> = Chain<Cursor<Vec<u8>>, R>;

enum Decoder<R: Read> {
    Plain(Source<R>),
    Gzip(GzDecoder<Source<R>>),
    Bzip2(BzDecoder<Source<R>>),
    Lzma(XzDecoder<Source<R>>),
    Xz(XzDecoder<Source<R>>),
    Zstd(zstd::stream::read::Decoder<'static, BufReader<Source<R>>>),
}

/// A decompression stream over a delta's compressed region.
///
/// Construction detects the algorithm; reads pull decompressed bytes.
/// A short read from the decoder is a truncation of the delta, not an
/// I/O failure, and is reported as such.
pub struct DecompStream<R: Read> {
    decoder: Decoder<R>,
    comp: Compression,
}

impl<R: Read> DecompStream<R> {
    /// Sniff the compression algorithm from `source` and build the
    /// matching decoder over it.
    pub fn new(mut source: R) -> Result<Self> {
        let mut magic = [0u8; DETECT_LEN];
        let mut filled = 0;
        while filled < DETECT_LEN {
            match source.read(&mut magic[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Io(e)),
            }
        }

        let comp = Compression::from_magic(&magic[..filled]);
        debug!("detected {} compression in delta payload", comp);

        let source = Cursor::new(magic[..filled].to_vec()).chain(source);
        let decoder = match comp {
            Compression::None => Decoder::Plain(source),
            Compression::Gzip => Decoder::Gzip(GzDecoder::new(source)),
            Compression::Bzip2 => Decoder::Bzip2(BzDecoder::new(source)),
            Compression::Lzma => {
                let raw = xz2::stream::Stream::new_lzma_decoder(u64::MAX)
                    .map_err(|e| Error::Corrupt(format!("lzma decoder setup failed: {e}")))?;
                Decoder::Lzma(XzDecoder::new_stream(source, raw))
            }
            Compression::Xz => Decoder::Xz(XzDecoder::new(source)),
            Compression::Zstd => Decoder::Zstd(zstd::stream::read::Decoder::new(source)?),
        };

        Ok(Self { decoder, comp })
    }

    /// The algorithm detected at construction.
    pub fn compression(&self) -> Compression {
        self.comp
    }

    fn reader(&mut self) -> &mut dyn Read {
        match &mut self.decoder {
            Decoder::Plain(r) => r,
            Decoder::Gzip(r) => r,
            Decoder::Bzip2(r) => r,
            Decoder::Lzma(r) => r,
            Decoder::Xz(r) => r,
            Decoder::Zstd(r) => r,
        }
    }

    /// Read exactly `buf.len()` decompressed bytes.
    pub fn read_exact_buf(&mut self, buf: &mut [u8]) -> Result<()> {
        let expected = buf.len();
        self.reader()
            .read_exact(buf)
            .map_err(|e| map_read_err(e, expected))
    }

    /// Read exactly `len` decompressed bytes into a fresh buffer.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        trace!("reading {} byte(s) from payload stream", len);
        let mut buf = vec![0u8; len];
        self.read_exact_buf(&mut buf)?;
        Ok(buf)
    }

    /// Read a big-endian 32-bit unsigned integer.
    pub fn read_u32_be(&mut self) -> Result<u32> {
        self.reader()
            .read_u32::<BigEndian>()
            .map_err(|e| map_read_err(e, 4))
    }

    /// Read a big-endian 64-bit unsigned integer.
    pub fn read_u64_be(&mut self) -> Result<u64> {
        self.reader()
            .read_u64::<BigEndian>()
            .map_err(|e| map_read_err(e, 8))
    }
}

fn map_read_err(e: std::io::Error, expected: usize) -> Error {
    match e.kind() {
        ErrorKind::UnexpectedEof => Error::Truncated { expected },
        ErrorKind::InvalidData | ErrorKind::InvalidInput => Error::Corrupt(e.to_string()),
        _ => Error::Io(e),
    }
}
