//! Error types for SeedShard primitives.

use thiserror::Error;

/// Errors that can occur in primitive operations.
#[derive(Error, Debug)]
pub enum PrimitivesError {
    /// A hex string could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A Base58 string contained characters outside the Bitcoin alphabet.
    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    /// A checksummed Base58 string was shorter than its 4-byte checksum.
    #[error("base58 payload too short: {0} bytes")]
    PayloadTooShort(usize),

    /// A checksummed Base58 string failed checksum verification.
    #[error("checksum mismatch")]
    ChecksumMismatch,

    /// A master secret was not one of the supported lengths.
    #[error("invalid secret length: expected 16 or 32 bytes, got {0}")]
    InvalidSecretLength(usize),

    /// A stretched seed was not 64 bytes.
    #[error("invalid seed length: expected 64 bytes, got {0}")]
    InvalidSeedLength(usize),
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
