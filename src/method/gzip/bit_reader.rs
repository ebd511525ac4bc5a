//! Bit-level reader over a byte stream.
//!
//! DEFLATE packs two kinds of data into the same byte stream: multi-bit
//! integer fields, filled least-significant-bit first, and Huffman codes,
//! whose bits arrive most-significant first. This reader exposes both —
//! `read_bits` for fields, `read_bit` for code accumulation — plus
//! byte-aligned reads for the container header, stored blocks, and the
//! trailer.

use std::io::Read;

use crate::error::{Error, Result};

/// Stateful bit cursor over an underlying byte source.
///
/// The cursor always points at the next unread bit of the buffered byte;
/// when a byte is exhausted the next one is pulled from the stream.
pub struct BitReader<R: Read> {
    inner: R,
    current: u8,
    /// Next unread bit of `current`, 0-7. 8 means no byte is buffered.
    cursor: u8,
    /// Bytes consumed from the underlying stream, for error reporting.
    position: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            current: 0,
            cursor: 8,
            position: 0,
        }
    }

    /// Bytes consumed from the underlying stream so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    fn next_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => {
                    return Err(Error::corrupted(self.position, "unexpected end of stream"))
                }
                Ok(_) => {
                    self.position += 1;
                    return Ok(buf[0]);
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Read a single bit.
    pub fn read_bit(&mut self) -> Result<u8> {
        if self.cursor == 8 {
            self.current = self.next_byte()?;
            self.cursor = 0;
        }
        let bit = (self.current >> self.cursor) & 1;
        self.cursor += 1;
        Ok(bit)
    }

    /// Read an `n`-bit unsigned field, `0 <= n <= 32`, packed LSB-first.
    pub fn read_bits(&mut self, n: u8) -> Result<u32> {
        debug_assert!(n <= 32);
        let mut value = 0u32;
        for i in 0..n {
            value |= (self.read_bit()? as u32) << i;
        }
        Ok(value)
    }

    /// Discard any partially consumed byte, landing on a byte boundary.
    pub fn align_to_byte(&mut self) {
        self.cursor = 8;
    }

    /// Read one whole byte. Only valid on a byte boundary.
    pub fn read_byte(&mut self) -> Result<u8> {
        debug_assert!(self.cursor == 8, "byte read while mid-byte");
        self.next_byte()
    }

    /// Read a little-endian u16. Only valid on a byte boundary.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let lo = self.read_byte()? as u16;
        let hi = self.read_byte()? as u16;
        Ok(lo | (hi << 8))
    }

    /// Read a little-endian u32. Only valid on a byte boundary.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let lo = self.read_u16_le()? as u32;
        let hi = self.read_u16_le()? as u32;
        Ok(lo | (hi << 16))
    }

    /// Fill `buf` with whole bytes. Only valid on a byte boundary.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        for slot in buf.iter_mut() {
            *slot = self.read_byte()?;
        }
        Ok(())
    }

    /// Skip `n` whole bytes. Only valid on a byte boundary.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.read_byte()?;
        }
        Ok(())
    }
}
