// src/driver.rs

use crate::codec;
use crate::error::{HuffError, Result};
use crate::format::{self, Header};
use crate::frequency::FrequencyTable;
use crate::tree::CodeTable;
use sha2::{Digest, Sha256};
use std::{
    ffi::OsString,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub const ARCHIVE_EXT: &str = "huff";
const RESTORED_EXT: &str = "out";

#[derive(Debug, Clone, Copy, Default)]
pub struct CompressOptions {
    /// Decode the archive in memory and compare digests before writing it.
    pub verify: bool,
}

/// Outcome of one compress or decompress run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub plain_bytes: u64,
    pub archive_bytes: u64,
    pub distinct_symbols: usize,
    pub payload_bits: u64,
    /// SHA-256 of the plain bytes, lowercase hex.
    pub digest: String,
}

impl Report {
    /// Archive size over plain size; 0 for empty plain input.
    pub fn ratio(&self) -> f64 {
        if self.plain_bytes == 0 {
            0.0
        } else {
            self.archive_bytes as f64 / self.plain_bytes as f64
        }
    }
}

/// Header summary of an archive, without decoding the payload.
#[derive(Debug, Clone)]
pub struct Inspection {
    pub header: Header,
    pub header_bytes: usize,
    pub packed_bytes: u64,
    pub codes: CodeTable,
}

impl Inspection {
    /// Whether the file holds at least the packed bytes the header declares.
    pub fn is_complete(&self) -> bool {
        self.packed_bytes >= self.header.packed_len()
    }
}

fn load_file(path: &Path) -> Result<Vec<u8>> {
    if path.exists() {
        Ok(fs::read(path)?)
    } else {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Cannot open input file: {}", path.display()),
        )
        .into())
    }
}

// Writes through a uniquely named temp file in the destination directory, so a
// failed run never leaves a partial output. The temp file is removed on drop
// unless persisted.
fn save_file(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(data)?;
    temp.persist(path).map_err(|e| e.error)?;
    debug!(path = %path.display(), bytes = data.len(), "output written");
    Ok(())
}

fn file_hash(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

/// `<input>.huff`
pub fn compressed_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".");
    name.push(ARCHIVE_EXT);
    PathBuf::from(name)
}

/// Strips a trailing `.huff`, or appends `.out` when there is none.
pub fn restored_path(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == ARCHIVE_EXT) {
        input.with_extension("")
    } else {
        let mut name = OsString::from(input.as_os_str());
        name.push(".");
        name.push(RESTORED_EXT);
        PathBuf::from(name)
    }
}

pub fn compress_file(input: &Path, output: &Path, options: CompressOptions) -> Result<Report> {
    let data = load_file(input)?;
    let encoded = codec::encode(&data)?;
    let archive = encoded.to_bytes()?;
    let digest = file_hash(&data);

    if options.verify {
        let restored = codec::decompress(&archive)?;
        let restored_digest = file_hash(&restored);
        if restored_digest != digest {
            return Err(HuffError::VerificationFailed {
                expected: digest,
                actual: restored_digest,
            });
        }
        debug!(%digest, "round trip verified");
    }

    save_file(output, &archive)?;

    let report = Report {
        plain_bytes: data.len() as u64,
        archive_bytes: archive.len() as u64,
        distinct_symbols: encoded.table.len(),
        payload_bits: encoded.payload.bit_len,
        digest,
    };
    info!(
        input = %input.display(),
        output = %output.display(),
        plain = report.plain_bytes,
        archive = report.archive_bytes,
        "compressed"
    );
    Ok(report)
}

pub fn decompress_file(input: &Path, output: &Path) -> Result<Report> {
    let archive = load_file(input)?;
    let format::Archive { table, payload } = format::read_archive(&archive)?;
    let restored = codec::decode_archive(&table, &payload)?;
    save_file(output, &restored)?;

    let report = Report {
        plain_bytes: restored.len() as u64,
        archive_bytes: archive.len() as u64,
        distinct_symbols: table.len(),
        payload_bits: payload.bit_len,
        digest: file_hash(&restored),
    };
    info!(
        input = %input.display(),
        output = %output.display(),
        archive = report.archive_bytes,
        plain = report.plain_bytes,
        "decompressed"
    );
    Ok(report)
}

pub fn inspect_file(archive: &Path) -> Result<Inspection> {
    let data = load_file(archive)?;
    let header = format::read_header(data.as_slice())?;
    let header_bytes = format::header_len(&header.table);
    let packed_bytes = data.len().saturating_sub(header_bytes) as u64;
    let codes = CodeTable::from_frequencies(&header.table);

    Ok(Inspection {
        header,
        header_bytes,
        packed_bytes,
        codes,
    })
}

/// Frequencies and codes a plain file would be compressed with.
pub fn code_table_for(input: &Path) -> Result<(FrequencyTable, CodeTable)> {
    let data = load_file(input)?;
    let table = FrequencyTable::from_bytes(&data);
    let codes = CodeTable::from_frequencies(&table);
    Ok((table, codes))
}
