//! Canonical Huffman decoding (RFC 1951 section 3.2.2).
//!
//! A code table is fully determined by the code length of each symbol:
//! shorter codes sort before longer ones, and within a length codes are
//! assigned in ascending symbol order. Decoding accumulates bits
//! most-significant first and re-tests the growing prefix after every bit.

use std::io::Read;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::method::gzip::bit_reader::BitReader;

/// Longest representable code, per RFC 1951.
pub const MAX_CODE_BITS: u8 = 15;

/// A canonical prefix code, stored as one row of `(code, symbol)` pairs
/// per code length. Rows are sorted by construction, so a prefix probe is
/// a binary search.
#[derive(Debug)]
pub struct HuffmanTree {
    rows: Vec<Vec<(u16, u16)>>,
    max_len: u8,
}

impl HuffmanTree {
    /// Build the decoding table from per-symbol code lengths.
    ///
    /// `lengths[symbol]` is the code length for that symbol; zero means
    /// the symbol does not participate. Length sets that claim more codes
    /// than a prefix code can hold are rejected as corruption.
    pub fn from_lengths(lengths: &[u8]) -> Result<Self> {
        let mut count = [0u16; MAX_CODE_BITS as usize + 1];
        let mut max_len = 0u8;
        for &len in lengths {
            if len > MAX_CODE_BITS {
                return Err(Error::corrupted(0, format!("code length {len} exceeds 15")));
            }
            count[len as usize] += 1;
            max_len = max_len.max(len);
        }
        count[0] = 0;

        // Numeric starting code per length: (start + count of the shorter
        // length) shifted left by one. Wider than u16 so corrupt length
        // sets overflow the range check, not the arithmetic.
        let mut next_code = [0u32; MAX_CODE_BITS as usize + 1];
        let mut code = 0u32;
        for len in 1..=max_len as usize {
            code = (code + u32::from(count[len - 1])) << 1;
            next_code[len] = code;
        }

        let mut rows = vec![Vec::new(); max_len as usize];
        for (symbol, &len) in lengths.iter().enumerate() {
            if len == 0 {
                continue;
            }
            let assigned = next_code[len as usize];
            if assigned >= (1u32 << len) {
                return Err(Error::corrupted(0, "over-subscribed code lengths"));
            }
            rows[len as usize - 1].push((assigned as u16, symbol as u16));
            next_code[len as usize] += 1;
        }

        Ok(Self { rows, max_len })
    }

    /// Look up a candidate prefix of `len` bits. Returns the symbol if the
    /// prefix is exactly one of the assigned codes.
    pub fn lookup(&self, len: u8, code: u16) -> Option<u16> {
        if len == 0 || len > self.max_len {
            return None;
        }
        let row = &self.rows[len as usize - 1];
        row.binary_search_by_key(&code, |&(c, _)| c)
            .ok()
            .map(|i| row[i].1)
    }

    /// Decode one symbol from the bit stream.
    ///
    /// Bits are accumulated MSB-first and the prefix is re-tested after
    /// every bit; a prefix that never matches within 15 bits is a
    /// corruption fault.
    pub fn read_symbol<R: Read>(&self, bits: &mut BitReader<R>) -> Result<u16> {
        let mut code = 0u16;
        for len in 1..=MAX_CODE_BITS {
            code = (code << 1) | bits.read_bit()? as u16;
            if let Some(symbol) = self.lookup(len, code) {
                return Ok(symbol);
            }
        }
        Err(Error::corrupted(
            bits.position(),
            "no Huffman code matched within 15 bits",
        ))
    }
}

/// Fixed-Huffman literal/length and distance trees (RFC 1951 section
/// 3.2.6), built once per process and shared read-only.
pub fn fixed_trees() -> &'static (HuffmanTree, HuffmanTree) {
    static FIXED: OnceLock<(HuffmanTree, HuffmanTree)> = OnceLock::new();
    FIXED.get_or_init(|| {
        let mut literal_lengths = [8u8; 288];
        literal_lengths[144..256].fill(9);
        literal_lengths[256..280].fill(7);
        let distance_lengths = [5u8; 32];
        (
            HuffmanTree::from_lengths(&literal_lengths).expect("fixed literal table is well formed"),
            HuffmanTree::from_lengths(&distance_lengths)
                .expect("fixed distance table is well formed"),
        )
    })
}
