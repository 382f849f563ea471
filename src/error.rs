//! Error type shared by every stage of the pipeline.

use thiserror::Error;

/// Everything that can go wrong while compressing or decompressing.
#[derive(Error, Debug)]
pub enum HuffError {
    /// Source missing or unreadable, destination unwritable.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The decode walk asked for a child the tree does not have.
    #[error("corrupt payload: no branch for bit at offset {bit_offset}")]
    Corrupt {
        /// Offset of the offending bit within the payload
        bit_offset: u64,
    },

    /// The bit stream ended in the middle of a code.
    #[error("incomplete sequence: stream ends mid-code after {available_bits} of {expected_bits} bits")]
    IncompleteSequence {
        /// Bits that were actually available
        available_bits: u64,
        /// Bits the header promised
        expected_bits: u64,
    },

    /// The archive header cannot be parsed.
    #[error("invalid archive: {message}")]
    Format {
        /// What was wrong with it
        message: String,
    },

    /// Decoded output length disagrees with the stored frequencies.
    #[error("length mismatch: expected {expected} bytes, decoded {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    /// Decoding a fresh archive did not reproduce its input.
    #[error("verification failed: input digest {expected}, restored digest {actual}")]
    VerificationFailed { expected: String, actual: String },

    #[error("byte {0:#04x} has no code")]
    UnknownSymbol(u8),

    /// A value does not fit its 32-bit field in the archive.
    #[error("{what} of {value} does not fit in 32 bits")]
    TooLarge { what: &'static str, value: u64 },
}

impl HuffError {
    pub fn format<S: Into<String>>(message: S) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// True for the two errors a damaged payload produces during the tree walk.
    pub fn is_payload_damage(&self) -> bool {
        matches!(
            self,
            Self::Corrupt { .. } | Self::IncompleteSequence { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, HuffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert() {
        let err: HuffError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, HuffError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn payload_damage_classification() {
        assert!(HuffError::Corrupt { bit_offset: 3 }.is_payload_damage());
        assert!(
            HuffError::IncompleteSequence {
                available_bits: 1,
                expected_bits: 2
            }
            .is_payload_damage()
        );
        assert!(!HuffError::format("bad").is_payload_damage());
    }

    #[test]
    fn verification_failure_names_both_digests() {
        let err = HuffError::VerificationFailed {
            expected: "aa".into(),
            actual: "bb".into(),
        };
        assert_eq!(
            err.to_string(),
            "verification failed: input digest aa, restored digest bb"
        );
        assert!(!err.is_payload_damage());
    }
}
