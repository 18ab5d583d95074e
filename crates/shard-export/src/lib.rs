#![deny(missing_docs)]

//! SeedShard SDK - Encrypted export of derived private keys.
//!
//! Seals one derived private key under a passphrase into a versioned,
//! self-describing Base58Check blob, and opens it back. Wrong
//! passphrases are always detected here, unlike the deliberately
//! silent wrong-passphrase paths of share recombination and seed
//! stretching.

mod error;

pub mod encrypted;

pub use encrypted::{EncryptedExport, DEFAULT_ITERATIONS};
pub use error::ExportError;
