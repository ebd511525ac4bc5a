//! Native gzip extraction (RFC 1952 container, RFC 1951 DEFLATE).
//!
//! The one strategy with no external dependency: the DEFLATE bitstream is
//! decoded here, bit by bit, rather than delegated to a library or a
//! command. Slow, but always available.

pub mod bit_reader;
pub mod header;
pub mod huffman;
pub mod inflate;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;

use crate::error::{Error, Result};
use crate::filesystem::{Filesystem, LocalFilesystem};
use crate::format::Format;
use crate::method::{ExtractionMethod, SpeedLevel};

use bit_reader::BitReader;
use header::FileHeader;

/// Extraction strategy backed by the in-crate DEFLATE decoder.
pub struct GzipExtractor<F: Filesystem = LocalFilesystem> {
    filesystem: F,
}

impl GzipExtractor<LocalFilesystem> {
    pub fn new() -> Self {
        Self {
            filesystem: LocalFilesystem,
        }
    }
}

impl Default for GzipExtractor<LocalFilesystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Filesystem> GzipExtractor<F> {
    /// Use a custom filesystem collaborator (tests, dry runs).
    pub fn with_filesystem(filesystem: F) -> Self {
        Self { filesystem }
    }

    /// Decode one gzip member from `input`, returning the header and the
    /// uncompressed payload. The trailer CRC32 and size are verified.
    pub fn decode<R: Read>(&self, input: R) -> Result<(FileHeader, Bytes)> {
        let mut bits = BitReader::new(input);

        let file_header = FileHeader::parse(&mut bits)?;
        debug!(
            filename = file_header.filename.as_deref(),
            flags = file_header.flags,
            "parsed gzip header"
        );

        let payload = inflate::decode_stream(&mut bits)?;
        verify_trailer(&mut bits, &payload)?;
        debug!(size = payload.len(), "decode finished");

        Ok((file_header, payload.freeze()))
    }
}

impl<F: Filesystem> ExtractionMethod for GzipExtractor<F> {
    fn is_supported(&self) -> bool {
        // No external binary or library involved.
        true
    }

    fn supports_format(&self, format: Format) -> bool {
        format == Format::Gzip
    }

    fn speed_level(&self) -> SpeedLevel {
        SpeedLevel::Lowest
    }

    fn extract(&self, file: &Path, target: &Path, format: Format) -> Result<PathBuf> {
        if !self.supports_format(format) {
            return Err(Error::UnsupportedFormat);
        }

        let input = BufReader::new(File::open(file)?);
        let (file_header, payload) = self.decode(input)?;

        // Output is flushed only after a fully successful decode.
        let output_path = target.join(file_header.output_name(file));
        self.filesystem.create_dir_all(target)?;
        self.filesystem.write_file(&output_path, &payload)?;
        debug!(path = %output_path.display(), "wrote extracted file");

        Ok(output_path)
    }
}

/// Verify the 4-byte CRC32 and 4-byte uncompressed-size trailer that
/// follows the final block. Bytes after the trailer (further gzip
/// members) are ignored.
fn verify_trailer<R: Read>(bits: &mut BitReader<R>, payload: &[u8]) -> Result<()> {
    bits.align_to_byte();
    let stored_crc = bits.read_u32_le()?;
    let stored_size = bits.read_u32_le()?;

    let actual_crc = crc32fast::hash(payload);
    if stored_crc != actual_crc {
        return Err(Error::corrupted(
            bits.position(),
            format!("CRC32 mismatch: stored {stored_crc:#010x}, computed {actual_crc:#010x}"),
        ));
    }
    let actual_size = payload.len() as u32;
    if stored_size != actual_size {
        return Err(Error::corrupted(
            bits.position(),
            format!("size mismatch: stored {stored_size}, decoded {actual_size}"),
        ));
    }
    Ok(())
}
