//! SeedShard SDK - shared cryptographic primitives.
//!
//! This crate provides the foundational building blocks for the SeedShard SDK:
//! - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160, Keccak-256, HMAC, PBKDF2)
//! - Base58 encoding/decoding with checksummed forms
//! - Zeroize-on-drop buffers for master secrets and stretched seeds

pub mod base58;
pub mod hash;
pub mod secret;

mod error;
pub use error::PrimitivesError;
pub use secret::{Secret, Seed};
