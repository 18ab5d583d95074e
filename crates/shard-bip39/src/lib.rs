//! SeedShard SDK - Single-phrase bridge between master secrets and
//! conventional 12/24-word recovery phrases.
//!
//! Converts phrases to the raw secret consumed by share splitting and
//! back, and stretches a phrase plus optional passphrase into the
//! 64-byte seed hierarchical derivation starts from.

mod error;
mod mnemonic;
mod wordlist;

pub use error::Bip39Error;
pub use mnemonic::Mnemonic;
