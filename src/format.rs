//! On-disk layout of a compressed file.
//!
//! All integers are unsigned 32-bit little-endian:
//!
//! ```text
//! [u32 symbol_count]
//! symbol_count x [u8 symbol][u32 frequency]    ascending symbol order
//! [u32 bit_len]
//! ceil(bit_len / 8) x [u8 packed]              MSB first, zero padded
//! ```
//!
//! The tree itself is never stored; the decoder rebuilds it from the
//! frequencies.

use std::io::{self, Read, Write};

use bincode::Options;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::codec::EncodedPayload;
use crate::error::{HuffError, Result};
use crate::frequency::FrequencyTable;

/// Size of one `[symbol][frequency]` record.
pub const RECORD_LEN: usize = 1 + 4;

const MAX_SYMBOLS: u32 = 256;

#[derive(Serialize, Deserialize)]
struct SymbolRecord {
    symbol: u8,
    frequency: u32,
}

/// Header fields, everything before the packed bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub table: FrequencyTable,
    pub bit_len: u64,
}

impl Header {
    pub fn packed_len(&self) -> u64 {
        EncodedPayload::packed_len(self.bit_len)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    pub table: FrequencyTable,
    pub payload: EncodedPayload,
}

impl Archive {
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(header_len(&self.table) + self.payload.bytes.len());
        write_archive(&mut out, &self.table, &self.payload)?;
        Ok(out)
    }
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
}

fn map_bincode(err: bincode::Error) -> HuffError {
    match *err {
        bincode::ErrorKind::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            HuffError::format("header is truncated")
        }
        bincode::ErrorKind::Io(e) => HuffError::Io(e),
        other => HuffError::format(other.to_string()),
    }
}

fn to_u32(what: &'static str, value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| HuffError::TooLarge { what, value })
}

/// Byte length of the header for `table`: count, records, bit length.
pub fn header_len(table: &FrequencyTable) -> usize {
    4 + table.len() * RECORD_LEN + 4
}

pub fn write_header<W: Write>(mut writer: W, table: &FrequencyTable, bit_len: u64) -> Result<()> {
    let count = to_u32("symbol count", table.len() as u64)?;
    options()
        .serialize_into(&mut writer, &count)
        .map_err(map_bincode)?;

    for (symbol, count) in table.iter() {
        let record = SymbolRecord {
            symbol,
            frequency: to_u32("frequency", count)?,
        };
        options()
            .serialize_into(&mut writer, &record)
            .map_err(map_bincode)?;
    }

    let bit_len = to_u32("bit length", bit_len)?;
    options()
        .serialize_into(&mut writer, &bit_len)
        .map_err(map_bincode)?;
    Ok(())
}

pub fn read_header<R: Read>(mut reader: R) -> Result<Header> {
    let count: u32 = options().deserialize_from(&mut reader).map_err(map_bincode)?;
    if count > MAX_SYMBOLS {
        return Err(HuffError::format(format!(
            "symbol count {count} exceeds {MAX_SYMBOLS}"
        )));
    }

    let mut pairs = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let record: SymbolRecord = options().deserialize_from(&mut reader).map_err(map_bincode)?;
        pairs.push((record.symbol, u64::from(record.frequency)));
    }
    let table = FrequencyTable::from_pairs(pairs)?;

    let bit_len: u32 = options().deserialize_from(&mut reader).map_err(map_bincode)?;
    Ok(Header {
        table,
        bit_len: u64::from(bit_len),
    })
}

pub fn write_archive<W: Write>(
    mut writer: W,
    table: &FrequencyTable,
    payload: &EncodedPayload,
) -> Result<()> {
    write_header(&mut writer, table, payload.bit_len)?;
    writer.write_all(&payload.bytes)?;
    Ok(())
}

/// Splits `data` into header and packed bits.
///
/// A short packed region is passed through as is so the decoder can report
/// it; bytes past the packed region are dropped.
pub fn read_archive(data: &[u8]) -> Result<Archive> {
    let mut rest = data;
    let Header { table, bit_len } = read_header(&mut rest)?;

    let packed_len = usize::try_from(EncodedPayload::packed_len(bit_len)).unwrap_or(usize::MAX);
    if rest.len() > packed_len {
        warn!(
            trailing = rest.len() - packed_len,
            "ignoring bytes after packed payload"
        );
    }
    let bytes = rest[..rest.len().min(packed_len)].to_vec();

    Ok(Archive {
        table,
        payload: EncodedPayload { bit_len, bytes },
    })
}
