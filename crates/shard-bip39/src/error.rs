//! Error types for phrase parsing and conversion.

use shard_primitives::PrimitivesError;
use thiserror::Error;

/// Errors raised by phrase encoding, decoding, and the secret bridge.
#[derive(Error, Debug)]
pub enum Bip39Error {
    /// The phrase's embedded checksum bits do not match its entropy.
    #[error("mnemonic checksum is invalid")]
    ChecksumInvalid,

    /// A word is not in the 2048-word list.
    #[error("word not in the mnemonic list: {word}")]
    InvalidWord {
        /// The offending word as supplied.
        word: String,
    },

    /// Only 12- and 24-word phrases are supported.
    #[error("unsupported mnemonic length: {0} words")]
    UnsupportedWordCount(usize),

    /// Entropy must be 16 or 32 bytes.
    #[error("entropy length {0} is not 16 or 32 bytes")]
    InvalidEntropyLength(usize),

    /// Error from the primitives layer.
    #[error(transparent)]
    Primitives(#[from] PrimitivesError),
}
