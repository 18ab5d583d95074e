//! Error types for share splitting and recovery.

use shard_primitives::PrimitivesError;
use thiserror::Error;

/// Errors that can occur when splitting a secret, encoding or decoding
/// share mnemonics, or recombining a share set.
#[derive(Error, Debug)]
pub enum Slip39Error {
    /// Division by zero in GF(256).
    #[error("division by zero in GF(256)")]
    DivisionByZero,

    /// A split parameter violated its bounds.
    #[error("invalid split parameters: {0}")]
    InvalidParameters(String),

    /// The strengthening passphrase contained bytes outside printable ASCII.
    #[error("passphrase must be printable ASCII")]
    InvalidPassphrase,

    /// Not enough shares or groups to meet a threshold.
    #[error("insufficient shares for recovery: need {threshold}, got {got}")]
    InsufficientShares {
        /// Shares (or groups) required by the threshold.
        threshold: usize,
        /// Shares (or groups) actually supplied.
        got: usize,
    },

    /// Shares mix identifiers, iteration exponents, or group parameters,
    /// or conflict on a member index.
    #[error("inconsistent share set: {0}")]
    InconsistentShareSet(String),

    /// The digest share recomputed from the recovered secret did not match.
    #[error("share digest mismatch")]
    DigestMismatch,

    /// The RS1024 checksum over the share words failed.
    #[error("invalid share checksum")]
    InvalidChecksum,

    /// A word is not in the 1024-word share list.
    #[error("invalid share word: {word}")]
    InvalidWord {
        /// The offending word as supplied.
        word: String,
    },

    /// A share mnemonic had fewer words than the minimum share length.
    #[error("share too short: {got} words, minimum {min}")]
    ShareTooShort {
        /// Words supplied.
        got: usize,
        /// Minimum word count for a share.
        min: usize,
    },

    /// Nonzero bits in the share value padding.
    #[error("invalid share padding")]
    InvalidPadding,

    /// The share value decoded to a length other than 16 or 32 bytes.
    #[error("unsupported share value length: {0} bytes")]
    UnsupportedValueLength(usize),

    /// A lower-level primitive failure.
    #[error(transparent)]
    Primitives(#[from] PrimitivesError),
}
