//! Error types for export blob encoding and decryption.

use shard_primitives::PrimitivesError;
use thiserror::Error;

/// Errors raised while sealing or opening an export blob.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The authentication tag did not verify: wrong passphrase or a
    /// corrupted blob. Always surfaced, never silent.
    #[error("authentication failed: wrong passphrase or corrupted blob")]
    AuthenticationFailed,

    /// The blob structure is malformed.
    #[error("malformed export blob: {0}")]
    InvalidBlob(String),

    /// The blob was produced by an unknown format version.
    #[error("unsupported export format version {0}")]
    UnsupportedVersion(u8),

    /// The blob names a key derivation function this build cannot run.
    #[error("unsupported key derivation function {0}")]
    UnsupportedKdf(u8),

    /// The cipher rejected the payload.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Error from the primitives layer.
    #[error(transparent)]
    Primitives(#[from] PrimitivesError),
}
