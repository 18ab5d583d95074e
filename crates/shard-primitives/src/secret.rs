//! Zeroize-on-drop buffers for master secrets and stretched seeds.
//!
//! `Secret` holds the 16- or 32-byte master secret that share splitting
//! and the phrase bridge operate on. `Seed` holds the 64-byte output of
//! PBKDF2 seed stretching that account derivation starts from. Both wipe
//! their memory on drop and keep their contents out of `Debug` output.

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use crate::PrimitivesError;

/// Length in bytes of a short (128-bit) master secret.
pub const SECRET_LEN_SHORT: usize = 16;

/// Length in bytes of a long (256-bit) master secret.
pub const SECRET_LEN_LONG: usize = 32;

/// Length in bytes of a stretched seed.
pub const SEED_LEN: usize = 64;

/// A wallet master secret of 16 or 32 bytes.
///
/// This is the value that gets split into shares, encoded as a backup
/// phrase, and stretched into a derivation seed. The buffer is wiped
/// on drop.
#[derive(Clone)]
pub struct Secret {
    /// The secret bytes, always 16 or 32 of them.
    bytes: Vec<u8>,
}

impl Secret {
    /// Generate a new random master secret using the OS random number generator.
    ///
    /// # Arguments
    /// * `len` - The secret length in bytes, 16 or 32.
    ///
    /// # Returns
    /// `Ok(Secret)` with `len` random bytes, or an error for an
    /// unsupported length.
    pub fn generate(len: usize) -> Result<Self, PrimitivesError> {
        if len != SECRET_LEN_SHORT && len != SECRET_LEN_LONG {
            return Err(PrimitivesError::InvalidSecretLength(len));
        }
        let mut bytes = vec![0u8; len];
        OsRng.fill_bytes(&mut bytes);
        Ok(Secret { bytes })
    }

    /// Create a master secret from raw bytes.
    ///
    /// # Arguments
    /// * `bytes` - A 16- or 32-byte slice.
    ///
    /// # Returns
    /// `Ok(Secret)` on success, or an error for an unsupported length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != SECRET_LEN_SHORT && bytes.len() != SECRET_LEN_LONG {
            return Err(PrimitivesError::InvalidSecretLength(bytes.len()));
        }
        Ok(Secret {
            bytes: bytes.to_vec(),
        })
    }

    /// Create a master secret from a hexadecimal string.
    ///
    /// # Arguments
    /// * `hex_str` - A 32- or 64-character hex string.
    ///
    /// # Returns
    /// `Ok(Secret)` on success, or an error if the hex is invalid or
    /// the decoded length is unsupported.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Access the secret bytes.
    ///
    /// # Returns
    /// A slice of the 16 or 32 secret bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The secret length in bytes.
    ///
    /// # Returns
    /// 16 or 32.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the secret is empty. Always false for a constructed secret.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Serialize the secret as a lowercase hexadecimal string.
    ///
    /// # Returns
    /// A 32- or 64-character hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(&self.bytes, &other.bytes)
    }
}

impl Eq for Secret {}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret({} bytes)", self.bytes.len())
    }
}

/// A 64-byte stretched seed, the root of account derivation.
///
/// Produced by PBKDF2 seed stretching from a backup phrase and
/// consumed by the HD engine's master-key derivation. Wiped on drop.
#[derive(Clone)]
pub struct Seed {
    /// The 64 seed bytes.
    bytes: [u8; SEED_LEN],
}

impl Seed {
    /// Create a seed from a 64-byte array.
    ///
    /// # Arguments
    /// * `bytes` - The 64 seed bytes.
    ///
    /// # Returns
    /// A new `Seed`.
    pub fn new(bytes: [u8; SEED_LEN]) -> Self {
        Seed { bytes }
    }

    /// Create a seed from a byte slice.
    ///
    /// # Arguments
    /// * `bytes` - A 64-byte slice.
    ///
    /// # Returns
    /// `Ok(Seed)` on success, or an error for any other length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != SEED_LEN {
            return Err(PrimitivesError::InvalidSeedLength(bytes.len()));
        }
        let mut out = [0u8; SEED_LEN];
        out.copy_from_slice(bytes);
        Ok(Seed { bytes: out })
    }

    /// Access the seed bytes.
    ///
    /// # Returns
    /// A reference to the 64 seed bytes.
    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.bytes
    }

    /// Serialize the seed as a lowercase hexadecimal string.
    ///
    /// # Returns
    /// A 128-character hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl Drop for Seed {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl PartialEq for Seed {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(&self.bytes, &other.bytes)
    }
}

impl Eq for Seed {}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seed(64 bytes)")
    }
}

/// Constant-time comparison of two byte slices.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for i in 0..a.len() {
        diff |= a[i] ^ b[i];
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_generate_lengths() {
        let short = Secret::generate(16).unwrap();
        assert_eq!(short.len(), 16);
        let long = Secret::generate(32).unwrap();
        assert_eq!(long.len(), 32);

        assert!(Secret::generate(0).is_err());
        assert!(Secret::generate(24).is_err());
        assert!(Secret::generate(64).is_err());
    }

    #[test]
    fn test_secret_hex_roundtrip() {
        let secret = Secret::from_hex("404142434445464748494a4b4c4d4e4f").unwrap();
        assert_eq!(secret.to_hex(), "404142434445464748494a4b4c4d4e4f");
        assert_eq!(secret.as_bytes()[0], 0x40);

        let back = Secret::from_hex(&secret.to_hex()).unwrap();
        assert_eq!(secret, back);
    }

    #[test]
    fn test_secret_rejects_bad_input() {
        assert!(matches!(
            Secret::from_bytes(&[0u8; 17]),
            Err(PrimitivesError::InvalidSecretLength(17))
        ));
        assert!(Secret::from_hex("zzzz").is_err());
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = Secret::from_bytes(&[0xAAu8; 16]).unwrap();
        let debug = format!("{:?}", secret);
        assert_eq!(debug, "Secret(16 bytes)");
        assert!(!debug.contains("aa"));
    }

    #[test]
    fn test_seed_from_bytes() {
        let seed = Seed::from_bytes(&[7u8; 64]).unwrap();
        assert_eq!(seed.as_bytes().len(), 64);
        assert!(matches!(
            Seed::from_bytes(&[7u8; 63]),
            Err(PrimitivesError::InvalidSeedLength(63))
        ));
        assert_eq!(format!("{:?}", seed), "Seed(64 bytes)");
    }
}
