//! Extended private and public keys with chained child derivation.
//!
//! A master pair is stretched from seed bytes with HMAC-SHA512; children
//! derive by tweaking the parent scalar (or point) with the half of a
//! further HMAC keyed by the chain code. Hardened steps mix in the
//! private key and are therefore unavailable on the public side.

use std::fmt;

use k256::ecdsa::{SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::elliptic_curve::{Group, PrimeField, ScalarPrimitive};
use k256::{AffinePoint, ProjectivePoint, Scalar, Secp256k1};
use shard_primitives::base58;
use shard_primitives::hash::{hash160, sha512_hmac};
use zeroize::Zeroize;

use crate::path::{ChildNumber, DerivationPath};
use crate::HdError;

/// HMAC key fixed by the derivation standard for master key stretching.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Serialized extended key payload length before the checksum.
const EXTENDED_KEY_LEN: usize = 78;

/// A private key with chain code and position metadata, able to derive
/// hardened and normal children.
#[derive(Clone)]
pub struct ExtendedPrivateKey {
    key: SigningKey,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: u32,
}

impl ExtendedPrivateKey {
    /// Stretch seed bytes into the master key.
    ///
    /// # Arguments
    /// * `seed` - 16 to 64 bytes of seed material.
    ///
    /// # Returns
    /// The depth-0 master key, or `InvalidSeedLength`.
    pub fn master(seed: &[u8]) -> Result<Self, HdError> {
        if seed.len() < 16 || seed.len() > 64 {
            return Err(HdError::InvalidSeedLength(seed.len()));
        }
        let mut stretched = sha512_hmac(MASTER_HMAC_KEY, seed);
        let (key_half, chain_half) = stretched.split_at(32);

        let key = SigningKey::from_bytes(key_half.into())
            .map_err(|_| HdError::InvalidChildKey)?;
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(chain_half);
        stretched.zeroize();

        Ok(ExtendedPrivateKey {
            key,
            chain_code,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_number: 0,
        })
    }

    /// Derive one child, hardened or normal.
    ///
    /// # Arguments
    /// * `step` - The child index.
    ///
    /// # Returns
    /// The child key, or `InvalidChildKey` in the statistically
    /// negligible case that the tweak falls outside the curve order.
    pub fn derive_child(&self, step: ChildNumber) -> Result<Self, HdError> {
        let depth = self
            .depth
            .checked_add(1)
            .ok_or_else(|| HdError::InvalidPath("derivation deeper than 255 levels".to_string()))?;

        // Hardened children commit to the private key, normal children
        // to the compressed public key.
        let mut data = Vec::with_capacity(37);
        if step.is_hardened() {
            data.push(0);
            data.extend_from_slice(&self.key.to_bytes());
        } else {
            data.extend_from_slice(&self.compressed_public());
        }
        data.extend_from_slice(&step.raw().to_be_bytes());

        let mut stretched = sha512_hmac(&self.chain_code, &data);
        data.zeroize();
        let (tweak_half, chain_half) = stretched.split_at(32);

        let tweak = scalar_from_slice(tweak_half)?;
        let parent = *self.key.as_nonzero_scalar().as_ref();
        let child = tweak + parent;

        let child_primitive: ScalarPrimitive<Secp256k1> = child.into();
        let mut child_bytes = child_primitive.to_bytes();
        let key = SigningKey::from_bytes(&child_bytes).map_err(|_| HdError::InvalidChildKey)?;
        child_bytes.zeroize();

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(chain_half);
        stretched.zeroize();

        Ok(ExtendedPrivateKey {
            key,
            chain_code,
            depth,
            parent_fingerprint: self.fingerprint(),
            child_number: step.raw(),
        })
    }

    /// Derive along a whole path from this key.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, HdError> {
        let mut node = self.clone();
        for &step in path.components() {
            node = node.derive_child(step)?;
        }
        Ok(node)
    }

    /// The matching extended public key.
    pub fn to_public(&self) -> ExtendedPublicKey {
        ExtendedPublicKey {
            key: *self.key.verifying_key(),
            chain_code: self.chain_code,
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
        }
    }

    /// The private key scalar as 32 big-endian bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.key.to_bytes());
        out
    }

    /// The compressed public key for this node.
    pub fn compressed_public(&self) -> [u8; 33] {
        let point = self.key.verifying_key().to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// First four bytes of the hash160 of the compressed public key.
    pub fn fingerprint(&self) -> [u8; 4] {
        fingerprint_of(&self.compressed_public())
    }

    /// The chain code.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Levels below the master key.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Fingerprint of the parent node, zero for the master key.
    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// Raw child number this node was derived with.
    pub fn child_number(&self) -> u32 {
        self.child_number
    }

    /// Wallet-import-format encoding of the bare private key with the
    /// given prefix byte, always flagged as compressed.
    pub fn to_wif(&self, prefix: u8) -> String {
        let mut payload = Vec::with_capacity(34);
        payload.push(prefix);
        payload.extend_from_slice(&self.key.to_bytes());
        payload.push(0x01);

        let encoded = base58::check_encode(&payload);
        payload.zeroize();
        encoded
    }

    /// Serialize with the given version bytes as Base58Check.
    pub fn to_base58(&self, version: [u8; 4]) -> String {
        let mut payload = Vec::with_capacity(EXTENDED_KEY_LEN);
        payload.extend_from_slice(&version);
        payload.push(self.depth);
        payload.extend_from_slice(&self.parent_fingerprint);
        payload.extend_from_slice(&self.child_number.to_be_bytes());
        payload.extend_from_slice(&self.chain_code);
        payload.push(0);
        payload.extend_from_slice(&self.key.to_bytes());

        let encoded = base58::check_encode(&payload);
        payload.zeroize();
        encoded
    }

    /// Parse a Base58Check extended private key.
    ///
    /// # Arguments
    /// * `text` - The serialized key.
    /// * `version` - The version bytes the key must carry.
    pub fn from_base58(text: &str, version: [u8; 4]) -> Result<Self, HdError> {
        let mut payload = base58::check_decode(text)?;
        if payload.len() != EXTENDED_KEY_LEN {
            payload.zeroize();
            return Err(HdError::InvalidExtendedKey(format!(
                "expected {} payload bytes, got {}",
                EXTENDED_KEY_LEN,
                payload.len()
            )));
        }
        if payload[..4] != version {
            payload.zeroize();
            return Err(HdError::InvalidExtendedKey(
                "version bytes do not match".to_string(),
            ));
        }
        if payload[45] != 0 {
            payload.zeroize();
            return Err(HdError::InvalidExtendedKey(
                "missing private key marker".to_string(),
            ));
        }

        let depth = payload[4];
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&payload[5..9]);
        let child_number = u32::from_be_bytes([payload[9], payload[10], payload[11], payload[12]]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&payload[13..45]);

        let key = SigningKey::from_bytes(payload[46..78].into())
            .map_err(|e| HdError::InvalidExtendedKey(e.to_string()))?;
        payload.zeroize();

        Ok(ExtendedPrivateKey {
            key,
            chain_code,
            depth,
            parent_fingerprint,
            child_number,
        })
    }
}

impl Drop for ExtendedPrivateKey {
    fn drop(&mut self) {
        let mut bytes = self.key.to_bytes();
        bytes.zeroize();
        self.chain_code.zeroize();
    }
}

impl PartialEq for ExtendedPrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.key.to_bytes() == other.key.to_bytes()
            && self.chain_code == other.chain_code
            && self.depth == other.depth
            && self.parent_fingerprint == other.parent_fingerprint
            && self.child_number == other.child_number
    }
}

impl Eq for ExtendedPrivateKey {}

impl fmt::Debug for ExtendedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExtendedPrivateKey(depth {}, child {})",
            self.depth, self.child_number
        )
    }
}

/// A public key with chain code, able to derive normal children without
/// any private material.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPublicKey {
    key: VerifyingKey,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: u32,
}

impl ExtendedPublicKey {
    /// Derive one normal child.
    ///
    /// # Arguments
    /// * `step` - The child index; hardened steps are refused.
    ///
    /// # Returns
    /// The child key, `HardenedFromPublic` for a hardened step, or
    /// `InvalidChildKey` in the negligible out-of-range case.
    pub fn derive_child(&self, step: ChildNumber) -> Result<Self, HdError> {
        if step.is_hardened() {
            return Err(HdError::HardenedFromPublic);
        }
        let depth = self
            .depth
            .checked_add(1)
            .ok_or_else(|| HdError::InvalidPath("derivation deeper than 255 levels".to_string()))?;

        let mut data = Vec::with_capacity(37);
        data.extend_from_slice(&self.compressed());
        data.extend_from_slice(&step.raw().to_be_bytes());

        let stretched = sha512_hmac(&self.chain_code, &data);
        let (tweak_half, chain_half) = stretched.split_at(32);

        let tweak = scalar_from_slice(tweak_half)?;
        let parent_point = self.to_projective_point()?;
        let child_point = ProjectivePoint::GENERATOR * tweak + parent_point;
        if bool::from(child_point.is_identity()) {
            return Err(HdError::InvalidChildKey);
        }

        let encoded = child_point.to_affine().to_encoded_point(true);
        let key = VerifyingKey::from_sec1_bytes(encoded.as_bytes())
            .map_err(|_| HdError::InvalidChildKey)?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(chain_half);

        Ok(ExtendedPublicKey {
            key,
            chain_code,
            depth,
            parent_fingerprint: self.fingerprint(),
            child_number: step.raw(),
        })
    }

    /// Derive along a path of normal steps.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, HdError> {
        let mut node = self.clone();
        for &step in path.components() {
            node = node.derive_child(step)?;
        }
        Ok(node)
    }

    /// The compressed SEC1 public key.
    pub fn compressed(&self) -> [u8; 33] {
        let point = self.key.to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// The uncompressed SEC1 public key.
    pub fn uncompressed(&self) -> [u8; 65] {
        let point = self.key.to_encoded_point(false);
        let mut out = [0u8; 65];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Hash160 of the compressed public key.
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.compressed())
    }

    /// First four bytes of the hash160.
    pub fn fingerprint(&self) -> [u8; 4] {
        fingerprint_of(&self.compressed())
    }

    /// The chain code.
    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Levels below the master key.
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Fingerprint of the parent node, zero for the master key.
    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// Raw child number this node was derived with.
    pub fn child_number(&self) -> u32 {
        self.child_number
    }

    /// Serialize with the given version bytes as Base58Check.
    pub fn to_base58(&self, version: [u8; 4]) -> String {
        let mut payload = Vec::with_capacity(EXTENDED_KEY_LEN);
        payload.extend_from_slice(&version);
        payload.push(self.depth);
        payload.extend_from_slice(&self.parent_fingerprint);
        payload.extend_from_slice(&self.child_number.to_be_bytes());
        payload.extend_from_slice(&self.chain_code);
        payload.extend_from_slice(&self.compressed());
        base58::check_encode(&payload)
    }

    /// Parse a Base58Check extended public key.
    ///
    /// # Arguments
    /// * `text` - The serialized key.
    /// * `version` - The version bytes the key must carry.
    pub fn from_base58(text: &str, version: [u8; 4]) -> Result<Self, HdError> {
        let payload = base58::check_decode(text)?;
        if payload.len() != EXTENDED_KEY_LEN {
            return Err(HdError::InvalidExtendedKey(format!(
                "expected {} payload bytes, got {}",
                EXTENDED_KEY_LEN,
                payload.len()
            )));
        }
        if payload[..4] != version {
            return Err(HdError::InvalidExtendedKey(
                "version bytes do not match".to_string(),
            ));
        }

        let depth = payload[4];
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&payload[5..9]);
        let child_number = u32::from_be_bytes([payload[9], payload[10], payload[11], payload[12]]);
        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&payload[13..45]);

        let key = VerifyingKey::from_sec1_bytes(&payload[45..78])
            .map_err(|e| HdError::InvalidExtendedKey(e.to_string()))?;

        Ok(ExtendedPublicKey {
            key,
            chain_code,
            depth,
            parent_fingerprint,
            child_number,
        })
    }

    fn to_projective_point(&self) -> Result<ProjectivePoint, HdError> {
        let encoded = self.key.to_encoded_point(false);
        let maybe_point = AffinePoint::from_encoded_point(&encoded);
        if bool::from(maybe_point.is_some()) {
            Ok(ProjectivePoint::from(maybe_point.unwrap()))
        } else {
            Err(HdError::InvalidChildKey)
        }
    }
}

/// Parse a 32-byte big-endian scalar, rejecting values at or beyond the
/// curve order rather than reducing them.
fn scalar_from_slice(bytes: &[u8]) -> Result<Scalar, HdError> {
    let mut repr = [0u8; 32];
    repr.copy_from_slice(bytes);
    let maybe_scalar: Option<Scalar> = Scalar::from_repr(repr.into()).into();
    maybe_scalar.ok_or(HdError::InvalidChildKey)
}

fn fingerprint_of(compressed: &[u8; 33]) -> [u8; 4] {
    let digest = hash160(compressed);
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest[..4]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const XPRV_VERSION: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];
    const XPUB_VERSION: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];

    #[test]
    fn test_master_seed_bounds() {
        assert!(ExtendedPrivateKey::master(&[0u8; 16]).is_ok());
        assert!(ExtendedPrivateKey::master(&[0u8; 64]).is_ok());
        assert!(matches!(
            ExtendedPrivateKey::master(&[0u8; 15]),
            Err(HdError::InvalidSeedLength(15))
        ));
        assert!(matches!(
            ExtendedPrivateKey::master(&[0u8; 65]),
            Err(HdError::InvalidSeedLength(65))
        ));
    }

    #[test]
    fn test_public_matches_private_derivation() {
        let seed = [0x42u8; 32];
        let master = ExtendedPrivateKey::master(&seed).unwrap();
        let path = DerivationPath::from_str("m/3/7/11").unwrap();

        let via_private = master.derive_path(&path).unwrap().to_public();
        let via_public = master.to_public().derive_path(&path).unwrap();
        assert_eq!(via_private, via_public);
    }

    #[test]
    fn test_hardened_from_public_refused() {
        let master = ExtendedPrivateKey::master(&[7u8; 32]).unwrap();
        let step = ChildNumber::hardened(0).unwrap();
        assert!(matches!(
            master.to_public().derive_child(step),
            Err(HdError::HardenedFromPublic)
        ));
    }

    #[test]
    fn test_base58_roundtrip() {
        let master = ExtendedPrivateKey::master(&[9u8; 32]).unwrap();
        let node = master
            .derive_path(&DerivationPath::from_str("m/44'/0'/0'").unwrap())
            .unwrap();

        let xprv = node.to_base58(XPRV_VERSION);
        let parsed = ExtendedPrivateKey::from_base58(&xprv, XPRV_VERSION).unwrap();
        assert_eq!(parsed, node);

        let xpub = node.to_public().to_base58(XPUB_VERSION);
        let parsed_pub = ExtendedPublicKey::from_base58(&xpub, XPUB_VERSION).unwrap();
        assert_eq!(parsed_pub, node.to_public());

        // Version bytes are enforced on parse.
        assert!(matches!(
            ExtendedPrivateKey::from_base58(&xprv, XPUB_VERSION),
            Err(HdError::InvalidExtendedKey(_))
        ));
        assert!(ExtendedPrivateKey::from_base58(&xpub, XPRV_VERSION).is_err());
    }

    #[test]
    fn test_tampered_serialization_rejected() {
        let master = ExtendedPrivateKey::master(&[1u8; 32]).unwrap();
        let xprv = master.to_base58(XPRV_VERSION);
        let mut chars: Vec<char> = xprv.chars().collect();
        let mid = chars.len() / 2;
        chars[mid] = if chars[mid] == '2' { '3' } else { '2' };
        let tampered: String = chars.into_iter().collect();
        assert!(ExtendedPrivateKey::from_base58(&tampered, XPRV_VERSION).is_err());
    }

    #[test]
    fn test_depth_and_lineage_metadata() {
        let master = ExtendedPrivateKey::master(&[3u8; 64]).unwrap();
        assert_eq!(master.depth(), 0);
        assert_eq!(master.parent_fingerprint(), [0u8; 4]);
        assert_eq!(master.child_number(), 0);

        let step = ChildNumber::hardened(5).unwrap();
        let child = master.derive_child(step).unwrap();
        assert_eq!(child.depth(), 1);
        assert_eq!(child.parent_fingerprint(), master.fingerprint());
        assert_eq!(child.child_number(), 5 | crate::path::HARDENED_OFFSET);
    }

    // ---- published vectors ----

    #[test]
    fn test_derivation_vectors() {
        let vectors_json = include_str!("testdata/bip32_vectors.json");
        let vectors: serde_json::Value = serde_json::from_str(vectors_json).unwrap();

        for (i, v) in vectors["vectors"].as_array().unwrap().iter().enumerate() {
            let seed = hex::decode(v["seed"].as_str().unwrap()).unwrap();
            let master = ExtendedPrivateKey::master(&seed)
                .unwrap_or_else(|e| panic!("vector #{}: master: {}", i + 1, e));

            for step in v["chain"].as_array().unwrap() {
                let path_str = step["path"].as_str().unwrap();
                let path = DerivationPath::from_str(path_str)
                    .unwrap_or_else(|e| panic!("vector #{}: parse {}: {}", i + 1, path_str, e));
                let node = master
                    .derive_path(&path)
                    .unwrap_or_else(|e| panic!("vector #{}: derive {}: {}", i + 1, path_str, e));

                assert_eq!(
                    node.to_base58(XPRV_VERSION),
                    step["xprv"].as_str().unwrap(),
                    "vector #{} {}: xprv",
                    i + 1,
                    path_str
                );
                assert_eq!(
                    node.to_public().to_base58(XPUB_VERSION),
                    step["xpub"].as_str().unwrap(),
                    "vector #{} {}: xpub",
                    i + 1,
                    path_str
                );
                assert_eq!(
                    hex::encode(node.fingerprint()),
                    step["fingerprint"].as_str().unwrap(),
                    "vector #{} {}: fingerprint",
                    i + 1,
                    path_str
                );

                let reparsed =
                    ExtendedPrivateKey::from_base58(step["xprv"].as_str().unwrap(), XPRV_VERSION)
                        .unwrap();
                assert_eq!(reparsed, node, "vector #{} {}: reparse", i + 1, path_str);
            }
        }
    }
}
