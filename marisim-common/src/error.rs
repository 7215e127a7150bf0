//! Error types for marisim

use thiserror::Error;

/// Error types for the marisim library.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed sentence framing (missing `$`/`!` prefix or `*CK` suffix).
    #[error("Sentence format error: {0}")]
    Format(String),

    /// Sentence checksum does not match the computed XOR.
    #[error("Checksum mismatch: expected {expected}, computed {computed}")]
    Checksum {
        /// Checksum carried by the sentence.
        expected: String,
        /// Checksum computed over the sentence body.
        computed: String,
    },

    /// The 3-letter sentence identifier is not in the supported set.
    #[error("Unsupported sentence type: {0}")]
    UnknownSentenceType(String),

    /// A value does not fit the AIS schema field it is destined for.
    #[error("AIS schema mismatch: {0}")]
    SchemaMismatch(String),

    /// An AIS payload ended before the schema was fully consumed.
    #[error("Truncated AIS payload: needed {needed} bits, {available} available")]
    TruncatedPayload {
        /// Bits the schema still required.
        needed: usize,
        /// Bits left in the payload.
        available: usize,
    },

    /// A character outside the AIS 6-bit armor alphabet.
    #[error("Invalid AIS armor character: {0:?}")]
    InvalidArmorCharacter(char),

    /// Latitude/longitude outside the valid range.
    #[error("Invalid position: {0}")]
    Position(String),

    /// Transport I/O errors (file, TCP, UDP, serial).
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// Invalid or missing configuration, surfaced before simulation start.
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML parsing errors.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}
