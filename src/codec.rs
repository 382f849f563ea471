//! Bit packing, tree walking, and the in-memory compress/decompress pair.

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use tracing::debug;

use crate::error::{HuffError, Result};
use crate::format::{self, Archive};
use crate::frequency::FrequencyTable;
use crate::tree::{CodeTable, HuffmanTree, Node};

/// Concatenated codes, packed MSB first with the final byte zero padded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedPayload {
    pub bit_len: u64,
    pub bytes: Vec<u8>,
}

impl EncodedPayload {
    /// Bytes the packed region must occupy for `bit_len` bits.
    pub fn packed_len(bit_len: u64) -> u64 {
        bit_len.div_ceil(8)
    }
}

/// Replaces every byte of `data` with its code.
pub fn encode_bits(data: &[u8], codes: &CodeTable) -> Result<EncodedPayload> {
    let mut writer = BitWriter::endian(Vec::with_capacity(data.len() / 2), BigEndian);
    let mut bit_len = 0u64;

    for &byte in data {
        let code = codes.get(byte).ok_or(HuffError::UnknownSymbol(byte))?;
        for &bit in code.bits() {
            writer.write_bit(bit)?;
        }
        bit_len += code.len() as u64;
    }

    writer.byte_align()?;
    Ok(EncodedPayload {
        bit_len,
        bytes: writer.into_writer(),
    })
}

/// Walks `tree` over the first `payload.bit_len` bits, emitting a symbol at
/// every leaf and restarting from the root.
///
/// `tree` is `None` only for an empty frequency table, in which case any bit
/// at all is corruption.
pub fn decode_bits(tree: Option<&HuffmanTree>, payload: &EncodedPayload) -> Result<Vec<u8>> {
    let expected_bits = payload.bit_len;
    let available_bits = payload.bytes.len() as u64 * 8;
    if available_bits < expected_bits {
        return Err(HuffError::IncompleteSequence {
            available_bits,
            expected_bits,
        });
    }

    let Some(tree) = tree else {
        if expected_bits > 0 {
            return Err(HuffError::Corrupt { bit_offset: 0 });
        }
        return Ok(Vec::new());
    };

    let root = tree.root();
    let mut reader = BitReader::endian(payload.bytes.as_slice(), BigEndian);
    let mut current = root;
    // every symbol costs at least one bit, so the header's totals cannot
    // reserve more than the payload could fill
    let capacity = tree.node(root).weight().min(expected_bits);
    let mut out = Vec::with_capacity(capacity.try_into().unwrap_or(0));

    for bit_offset in 0..expected_bits {
        let bit = reader.read_bit()?;
        let next = tree
            .step(current, bit)
            .ok_or(HuffError::Corrupt { bit_offset })?;

        match tree.node(next) {
            Node::Leaf { symbol, .. } => {
                out.push(*symbol);
                current = root;
            }
            Node::Internal { .. } => current = next,
        }
    }

    if current != root {
        return Err(HuffError::IncompleteSequence {
            available_bits: expected_bits,
            expected_bits,
        });
    }
    Ok(out)
}

// Public API

/// Frequency table and packed payload for `data`, not yet serialised.
pub fn encode(data: &[u8]) -> Result<Archive> {
    let table = FrequencyTable::from_bytes(data);
    let codes = CodeTable::from_frequencies(&table);
    let payload = encode_bits(data, &codes)?;
    debug!(
        input = data.len(),
        symbols = table.len(),
        bits = payload.bit_len,
        "encoded payload"
    );
    Ok(Archive { table, payload })
}

/// Compresses `data` into a complete archive.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    encode(data)?.to_bytes()
}

/// Restores the original bytes from an archive produced by [`compress`].
pub fn decompress(archive: &[u8]) -> Result<Vec<u8>> {
    let Archive { table, payload } = format::read_archive(archive)?;
    decode_archive(&table, &payload)
}

/// Rebuilds the tree from the stored frequencies and decodes the payload.
pub fn decode_archive(table: &FrequencyTable, payload: &EncodedPayload) -> Result<Vec<u8>> {
    let tree = HuffmanTree::build(table);
    let out = decode_bits(tree.as_ref(), payload)?;

    let expected = table.total();
    if out.len() as u64 != expected {
        return Err(HuffError::LengthMismatch {
            expected,
            actual: out.len() as u64,
        });
    }
    debug!(output = out.len(), "decoded payload");
    Ok(out)
}
