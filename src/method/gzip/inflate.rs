//! DEFLATE bitstream decoding (RFC 1951).
//!
//! The stream is a sequence of blocks, each tagged with a final-block bit
//! and a 2-bit type: stored, fixed-Huffman, or dynamic-Huffman. Fixed and
//! dynamic blocks share one symbol loop; they differ only in where their
//! literal/length and distance trees come from.

use std::io::Read;

use bytes::{BufMut, BytesMut};
use tracing::trace;

use crate::error::{CodeKind, Error, Result};
use crate::method::gzip::bit_reader::BitReader;
use crate::method::gzip::huffman::{fixed_trees, HuffmanTree};

const BLOCK_STORED: u32 = 0;
const BLOCK_FIXED: u32 = 1;
const BLOCK_DYNAMIC: u32 = 2;

/// End-of-block marker in the literal/length alphabet.
const END_OF_BLOCK: u16 = 256;

/// Minimum match length per length code 257-285.
const LENGTH_BASE: [u16; 29] = [
    3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19, 23, 27, 31, 35, 43, 51, 59, 67, 83, 99, 115, 131,
    163, 195, 227, 258,
];

/// Minimum match distance per distance code 0-29.
const DISTANCE_BASE: [u16; 30] = [
    1, 2, 3, 4, 5, 7, 9, 13, 17, 25, 33, 49, 65, 97, 129, 193, 257, 385, 513, 769, 1025, 1537,
    2049, 3073, 4097, 6145, 8193, 12289, 16385, 24577,
];

/// Order in which the dynamic-header code-length-alphabet lengths arrive.
const CODE_LENGTH_ORDER: [usize; 19] = [
    16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15,
];

/// Decode a complete DEFLATE stream: read blocks until one declares
/// itself final, appending each block's output to a single buffer.
pub fn decode_stream<R: Read>(bits: &mut BitReader<R>) -> Result<BytesMut> {
    let mut out = BytesMut::new();
    loop {
        let is_final = bits.read_bit()? == 1;
        let block_type = bits.read_bits(2)?;
        match block_type {
            BLOCK_STORED => stored_block(bits, &mut out)?,
            BLOCK_FIXED => {
                let (literals, distances) = fixed_trees();
                compressed_block(bits, literals, distances, &mut out)?;
            }
            BLOCK_DYNAMIC => {
                let (literals, distances) = dynamic_trees(bits)?;
                compressed_block(bits, &literals, &distances, &mut out)?;
            }
            _ => {
                return Err(Error::corrupted(
                    bits.position(),
                    "reserved block type 3",
                ))
            }
        }
        trace!(block_type, is_final, out_len = out.len(), "decoded block");
        if is_final {
            break;
        }
    }
    Ok(out)
}

/// Stored block: byte-aligned LEN/NLEN header, then LEN raw bytes.
/// NLEN is consumed to keep the stream aligned but not validated.
fn stored_block<R: Read>(bits: &mut BitReader<R>, out: &mut BytesMut) -> Result<()> {
    bits.align_to_byte();
    let len = bits.read_u16_le()? as usize;
    let _nlen = bits.read_u16_le()?;
    let start = out.len();
    out.resize(start + len, 0);
    bits.read_exact(&mut out[start..])?;
    Ok(())
}

/// Shared symbol loop for fixed and dynamic blocks.
fn compressed_block<R: Read>(
    bits: &mut BitReader<R>,
    literals: &HuffmanTree,
    distances: &HuffmanTree,
    out: &mut BytesMut,
) -> Result<()> {
    loop {
        let symbol = literals.read_symbol(bits)?;
        if symbol == END_OF_BLOCK {
            return Ok(());
        }
        if symbol < END_OF_BLOCK {
            out.put_u8(symbol as u8);
            continue;
        }
        let length = match_length(symbol, bits)?;
        let distance_code = distances.read_symbol(bits)?;
        let distance = match_distance(distance_code, bits)?;
        copy_match(out, length, distance, bits.position())?;
    }
}

/// Resolve a length code into an exact match length: base value plus the
/// code's extra bits. Codes 257-260 and 285 carry no extra bits; 261-284
/// carry `((code - 257) >> 2) - 1`.
fn match_length<R: Read>(code: u16, bits: &mut BitReader<R>) -> Result<usize> {
    let extra_bits = match code {
        257..=260 | 285 => 0,
        261..=284 => (((code - 257) >> 2) - 1) as u8,
        _ => return Err(Error::invalid_code(CodeKind::Length, code)),
    };
    let base = LENGTH_BASE[(code - 257) as usize] as usize;
    Ok(base + bits.read_bits(extra_bits)? as usize)
}

/// Resolve a distance code into an exact match distance. Codes 0-1 carry
/// no extra bits; 2-29 carry `(code >> 1) - 1`.
fn match_distance<R: Read>(code: u16, bits: &mut BitReader<R>) -> Result<usize> {
    let extra_bits = match code {
        0..=1 => 0,
        2..=29 => ((code >> 1) - 1) as u8,
        _ => return Err(Error::invalid_code(CodeKind::Distance, code)),
    };
    let base = DISTANCE_BASE[code as usize] as usize;
    Ok(base + bits.read_bits(extra_bits)? as usize)
}

/// Copy `length` bytes from `distance` behind the end of the output, byte
/// by byte in order, so a copy longer than its distance re-reads bytes it
/// has itself just appended.
fn copy_match(out: &mut BytesMut, length: usize, distance: usize, offset: u64) -> Result<()> {
    if distance > out.len() {
        return Err(Error::corrupted(
            offset,
            "back-reference reaches behind start of output",
        ));
    }
    let mut from = out.len() - distance;
    for _ in 0..length {
        let byte = out[from];
        out.put_u8(byte);
        from += 1;
    }
    Ok(())
}

/// Read a dynamic block's tree definitions: HLIT/HDIST/HCLEN, the
/// code-length-alphabet tree, then the run-length-coded lengths for the
/// combined literal/length + distance alphabet.
fn dynamic_trees<R: Read>(bits: &mut BitReader<R>) -> Result<(HuffmanTree, HuffmanTree)> {
    let hlit = bits.read_bits(5)? as usize + 257;
    let hdist = bits.read_bits(5)? as usize + 1;
    let hclen = bits.read_bits(4)? as usize + 4;

    let mut code_lengths = [0u8; 19];
    for i in 0..hclen {
        code_lengths[CODE_LENGTH_ORDER[i]] = bits.read_bits(3)? as u8;
    }
    let code_length_tree = HuffmanTree::from_lengths(&code_lengths)?;

    let total = hlit + hdist;
    let mut lengths = Vec::with_capacity(total);
    let mut previous = 0u8;
    while lengths.len() < total {
        let symbol = code_length_tree.read_symbol(bits)?;
        let (value, times) = match symbol {
            0..=15 => {
                previous = symbol as u8;
                (symbol as u8, 1)
            }
            16 => (previous, 3 + bits.read_bits(2)? as usize),
            17 => (0, 3 + bits.read_bits(3)? as usize),
            18 => (0, 11 + bits.read_bits(7)? as usize),
            _ => return Err(Error::invalid_code(CodeKind::Length, symbol)),
        };
        if lengths.len() + times > total {
            return Err(Error::corrupted(
                bits.position(),
                "code length repeat overruns the alphabet",
            ));
        }
        for _ in 0..times {
            lengths.push(value);
        }
    }

    Ok((
        HuffmanTree::from_lengths(&lengths[..hlit])?,
        HuffmanTree::from_lengths(&lengths[hlit..])?,
    ))
}
