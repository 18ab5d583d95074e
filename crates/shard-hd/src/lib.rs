#![deny(missing_docs)]

//! SeedShard SDK - Hierarchical deterministic derivation over secp256k1.
//!
//! Stretches a seed into a master key, walks hardened and normal
//! derivation paths, and renders per-coin accounts: addresses, WIF
//! strings, account-level extended public keys, and payment URIs for
//! the closed set of supported coins.

mod error;

pub mod account;
pub mod address;
pub mod coin;
pub mod path;
pub mod xkey;

pub use account::{derive, derive_default, Account};
pub use coin::{AddressKind, Coin, CoinProfile};
pub use error::HdError;
pub use path::{ChildNumber, DerivationPath, HARDENED_OFFSET};
pub use xkey::{ExtendedPrivateKey, ExtendedPublicKey};
