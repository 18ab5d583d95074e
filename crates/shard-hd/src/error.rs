//! Error types for path parsing, key derivation, and address encoding.

use shard_primitives::PrimitivesError;
use thiserror::Error;

/// Errors raised by the derivation engine.
#[derive(Error, Debug)]
pub enum HdError {
    /// The derivation path string is malformed.
    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    /// The coin identifier is not in the registry.
    #[error("unsupported coin: {0}")]
    UnsupportedCoin(String),

    /// Seed material must be between 16 and 64 bytes.
    #[error("seed length {0} is not between 16 and 64 bytes")]
    InvalidSeedLength(usize),

    /// The derived child key fell outside the curve order; retry with
    /// the next index.
    #[error("derived child key is invalid for this index")]
    InvalidChildKey,

    /// Hardened derivation needs the private key.
    #[error("cannot derive a hardened child from a public key")]
    HardenedFromPublic,

    /// A serialized extended key failed to parse.
    #[error("invalid extended key: {0}")]
    InvalidExtendedKey(String),

    /// An address could not be encoded.
    #[error("address encoding failed: {0}")]
    AddressEncoding(String),

    /// Error from the primitives layer.
    #[error(transparent)]
    Primitives(#[from] PrimitivesError),
}
