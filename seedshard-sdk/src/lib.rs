#![deny(missing_docs)]

//! SeedShard SDK - Complete SDK.
//!
//! Re-exports all SeedShard components for convenient single-crate
//! usage: threshold sharing of master secrets, the 12/24-word phrase
//! bridge, multi-coin HD derivation, and encrypted key export.

pub use shard_primitives as primitives;
pub use shard_slip39 as slip39;
pub use shard_bip39 as bip39;
pub use shard_hd as hd;
pub use shard_export as export;
