//! SeedShard SDK - Two-level threshold sharing of master secrets.
//!
//! Splits a 16- or 32-byte master secret into groups of mnemonic shares
//! over GF(256), with a passphrase strengthening layer and a three-word
//! Reed-Solomon checksum on every mnemonic:
//! - Group layouts from a flat k-of-n up to 16 groups of 16 members
//! - 1024-word mnemonic encoding with typo-detecting checksums
//! - Share-set inspection for guided recovery flows

pub mod gf256;
pub mod share;

mod cipher;
mod error;
mod rs1024;
mod scheme;
mod shamir;
mod wordlist;

pub use error::Slip39Error;
pub use scheme::{
    combine, split, split_random, summarize, GroupSpec, GroupStatus, ShareSetSummary, SplitSpec,
};
pub use share::Share;

/// Domain separation string shared by the strengthening KDF salt and the
/// mnemonic checksum.
pub(crate) const CUSTOMIZATION: &[u8] = b"shamir";
