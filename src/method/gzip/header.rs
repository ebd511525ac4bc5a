//! Gzip container header (RFC 1952).

use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::method::gzip::bit_reader::BitReader;

/// First two bytes of every gzip stream.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compression method byte for DEFLATE, the only method in use.
pub const METHOD_DEFLATE: u8 = 8;

/// Header flag bits.
pub mod flags {
    pub const FTEXT: u8 = 0x01;
    pub const FHCRC: u8 = 0x02;
    pub const FEXTRA: u8 = 0x04;
    pub const FNAME: u8 = 0x08;
    pub const FCOMMENT: u8 = 0x10;
}

/// Parsed gzip header. Constructed once per stream, immutable afterward.
///
/// Only the magic, method, flags, and the optional original filename
/// matter downstream; the remaining fields are read to keep the stream
/// cursor correct.
#[derive(Debug, Clone)]
pub struct FileHeader {
    pub method: u8,
    pub flags: u8,
    pub mtime: u32,
    pub extra_flags: u8,
    pub os: u8,
    pub filename: Option<String>,
}

impl FileHeader {
    /// Parse the header off the front of the stream.
    ///
    /// The conditional fields are read in the order mandated by RFC 1952:
    /// extra field, filename, comment, header CRC.
    pub fn parse<R: Read>(bits: &mut BitReader<R>) -> Result<FileHeader> {
        let mut magic = [0u8; 2];
        bits.read_exact(&mut magic)?;
        if magic != GZIP_MAGIC {
            return Err(Error::corrupted(0, "bad gzip magic number"));
        }

        let method = bits.read_byte()?;
        if method != METHOD_DEFLATE {
            return Err(Error::UnsupportedMethod { method });
        }

        let header_flags = bits.read_byte()?;
        let mtime = bits.read_u32_le()?;
        let extra_flags = bits.read_byte()?;
        let os = bits.read_byte()?;

        if header_flags & flags::FEXTRA != 0 {
            let extra_len = bits.read_u16_le()? as usize;
            bits.skip(extra_len)?;
        }

        let filename = if header_flags & flags::FNAME != 0 {
            Some(read_nul_terminated(bits)?)
        } else {
            None
        };

        if header_flags & flags::FCOMMENT != 0 {
            read_nul_terminated(bits)?;
        }

        if header_flags & flags::FHCRC != 0 {
            // CRC16 over the header; consumed but not verified.
            bits.skip(2)?;
        }

        Ok(FileHeader {
            method,
            flags: header_flags,
            mtime,
            extra_flags,
            os,
            filename,
        })
    }

    /// Name for the extracted file: the recorded original filename,
    /// reduced to its final path component, or a default derived from the
    /// input path when the header carries none.
    pub fn output_name(&self, input: &Path) -> String {
        match self.filename.as_deref() {
            Some(name) => sanitize_name(name),
            None => default_output_name(input),
        }
    }
}

fn read_nul_terminated<R: Read>(bits: &mut BitReader<R>) -> Result<String> {
    let mut raw = Vec::new();
    loop {
        match bits.read_byte()? {
            0 => break,
            b => raw.push(b),
        }
    }
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

/// Keep only the final path component so a hostile header cannot place
/// output outside the target directory.
fn sanitize_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "extracted".to_string())
}

/// gzip convention: `foo.gz` uncompresses to `foo`.
fn default_output_name(input: &Path) -> String {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "extracted".to_string());
    match name.strip_suffix(".gz") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}
