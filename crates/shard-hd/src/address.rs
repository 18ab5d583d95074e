//! Address rendering for the supported coin profiles.

use bech32::{Fe32, Hrp};
use shard_primitives::base58;
use shard_primitives::hash::keccak256;

use crate::coin::AddressKind;
use crate::xkey::ExtendedPublicKey;
use crate::HdError;

/// Render a public key as an address of the given kind.
pub fn render(kind: AddressKind, key: &ExtendedPublicKey) -> Result<String, HdError> {
    match kind {
        AddressKind::P2wpkh { hrp } => p2wpkh(hrp, &key.hash160()),
        AddressKind::P2pkh { version } => Ok(p2pkh(version, &key.hash160())),
        AddressKind::Eip55 => Ok(ethereum(&key.uncompressed())),
    }
}

/// Native SegWit version-0 address for a 20-byte public key hash.
pub fn p2wpkh(hrp: &str, key_hash: &[u8; 20]) -> Result<String, HdError> {
    let hrp = Hrp::parse(hrp).map_err(|e| HdError::AddressEncoding(e.to_string()))?;
    bech32::segwit::encode(hrp, Fe32::Q, key_hash)
        .map_err(|e| HdError::AddressEncoding(e.to_string()))
}

/// Legacy Base58Check address for a 20-byte public key hash.
pub fn p2pkh(version: u8, key_hash: &[u8; 20]) -> String {
    let mut payload = Vec::with_capacity(21);
    payload.push(version);
    payload.extend_from_slice(key_hash);
    base58::check_encode(&payload)
}

/// EVM address for an uncompressed SEC1 public key: the trailing twenty
/// bytes of the Keccak-256 of the raw curve point, checksum-cased.
pub fn ethereum(uncompressed: &[u8; 65]) -> String {
    let digest = keccak256(&uncompressed[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    eip55(&address)
}

/// Mixed-case checksum encoding of a raw 20-byte EVM address.
///
/// Each hex letter is uppercased when the matching nibble of the
/// Keccak-256 of the lowercase hex string is 8 or more.
pub fn eip55(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let digest = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (digest[i / 2] >> (4 * (1 - i % 2))) & 0x0F;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}
