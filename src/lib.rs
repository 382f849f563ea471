//! # huffpack
//!
//! Lossless single-file compression with static Huffman coding.
//!
//! The pipeline is frequency table, tree, codes, packed bits. Decoding reads
//! the stored frequencies back, rebuilds the same tree and walks it bit by bit.
//!
//! ```rust
//! let archive = huffpack::compress(b"aaabbc")?;
//! assert_eq!(huffpack::decompress(&archive)?, b"aaabbc");
//! # Ok::<(), huffpack::HuffError>(())
//! ```

pub mod codec;
pub mod driver;
pub mod error;
pub mod format;
pub mod frequency;
pub mod logger;
pub mod min_heap;
pub mod tree;

pub use codec::{EncodedPayload, compress, decompress};
pub use driver::{CompressOptions, Report, compress_file, decompress_file};
pub use error::{HuffError, Result};
pub use frequency::FrequencyTable;
pub use tree::{Code, CodeTable, HuffmanTree};
