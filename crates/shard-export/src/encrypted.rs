//! Versioned, passphrase-encrypted private key blobs.
//!
//! A blob carries a self-describing header (format version, KDF
//! identifier, iteration count, salt), followed by the AES-256-GCM
//! ciphertext of one 32-byte private key and its authentication tag.
//! The header doubles as associated data, so any tampering with the
//! embedded parameters fails authentication.
//!
//! The salt is the first eight bytes of the double-SHA-256 of the
//! key's compressed public key, which makes sealing deterministic:
//! equal key and passphrase always produce an identical blob.

use std::fmt;
use std::str::FromStr;

use aes_gcm::aead::{Aead, Payload};
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce};
use shard_hd::Account;
use shard_primitives::base58;
use shard_primitives::hash::{pbkdf2_hmac_sha256, sha256d};
use zeroize::Zeroizing;

use crate::ExportError;

/// Current export format version.
const FORMAT_VERSION: u8 = 1;

/// KDF identifier for PBKDF2-HMAC-SHA256.
const KDF_PBKDF2_SHA256: u8 = 0;

/// PBKDF2 iteration count written by `seal`.
pub const DEFAULT_ITERATIONS: u32 = 65_536;

const SALT_LEN: usize = 8;
const HEADER_LEN: usize = 2 + 4 + SALT_LEN;
const KEY_LEN: usize = 32;
const TAG_LEN: usize = 16;
const BLOB_LEN: usize = HEADER_LEN + KEY_LEN + TAG_LEN;

/// Every derived key is encrypted at most once per (passphrase, salt)
/// pair, so a fixed nonce cannot repeat under the same cipher key.
const NONCE: [u8; 12] = [0u8; 12];

/// An encrypted private key export.
///
/// Render with `Display` for the Base58Check text form; parse it back
/// with `FromStr`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedExport {
    version: u8,
    kdf: u8,
    iterations: u32,
    salt: [u8; SALT_LEN],
    ciphertext: Vec<u8>,
}

impl EncryptedExport {
    /// Encrypt a private key under a passphrase.
    ///
    /// # Arguments
    /// * `private_key` - The 32-byte key to protect.
    /// * `public_key` - Its compressed public key, which seeds the salt.
    /// * `passphrase` - The encryption passphrase, any UTF-8.
    ///
    /// # Returns
    /// The sealed blob, deterministic in its inputs.
    pub fn seal(
        private_key: &[u8; 32],
        public_key: &[u8; 33],
        passphrase: &str,
    ) -> Result<Self, ExportError> {
        let digest = sha256d(public_key);
        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&digest[..SALT_LEN]);

        let header = encode_header(FORMAT_VERSION, KDF_PBKDF2_SHA256, DEFAULT_ITERATIONS, &salt);
        let key = Zeroizing::new(pbkdf2_hmac_sha256(
            passphrase.as_bytes(),
            &salt,
            DEFAULT_ITERATIONS,
            KEY_LEN,
        ));

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
        let ciphertext = cipher
            .encrypt(
                Nonce::from_slice(&NONCE),
                Payload {
                    msg: &private_key[..],
                    aad: &header,
                },
            )
            .map_err(|_| ExportError::Encryption("AES-GCM rejected the payload".to_string()))?;

        Ok(EncryptedExport {
            version: FORMAT_VERSION,
            kdf: KDF_PBKDF2_SHA256,
            iterations: DEFAULT_ITERATIONS,
            salt,
            ciphertext,
        })
    }

    /// Encrypt a derived account's private key under a passphrase.
    pub fn seal_account(account: &Account, passphrase: &str) -> Result<Self, ExportError> {
        Self::seal(account.private_key(), account.public_key(), passphrase)
    }

    /// Decrypt the blob back into the private key.
    ///
    /// # Arguments
    /// * `passphrase` - The passphrase the blob was sealed with.
    ///
    /// # Returns
    /// The key in a zeroizing buffer, or `AuthenticationFailed` for a
    /// wrong passphrase or any tampering.
    pub fn open(&self, passphrase: &str) -> Result<Zeroizing<[u8; 32]>, ExportError> {
        let header = encode_header(self.version, self.kdf, self.iterations, &self.salt);
        let key = Zeroizing::new(pbkdf2_hmac_sha256(
            passphrase.as_bytes(),
            &self.salt,
            self.iterations,
            KEY_LEN,
        ));

        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&key));
        let plaintext = Zeroizing::new(
            cipher
                .decrypt(
                    Nonce::from_slice(&NONCE),
                    Payload {
                        msg: self.ciphertext.as_slice(),
                        aad: &header,
                    },
                )
                .map_err(|_| ExportError::AuthenticationFailed)?,
        );

        // Parsing fixed the ciphertext length, so the plaintext is
        // exactly one key.
        let mut recovered = Zeroizing::new([0u8; KEY_LEN]);
        recovered.copy_from_slice(&plaintext);
        Ok(recovered)
    }

    /// The embedded PBKDF2 iteration count.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// The embedded salt.
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// The format version the blob was written with.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// The raw blob: header, ciphertext, and tag.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(BLOB_LEN);
        out.extend_from_slice(&encode_header(
            self.version,
            self.kdf,
            self.iterations,
            &self.salt,
        ));
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Parse a raw blob.
    ///
    /// # Returns
    /// The export, or `InvalidBlob` / `UnsupportedVersion` /
    /// `UnsupportedKdf` when the header cannot be honored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExportError> {
        if bytes.len() != BLOB_LEN {
            return Err(ExportError::InvalidBlob(format!(
                "expected {} bytes, got {}",
                BLOB_LEN,
                bytes.len()
            )));
        }

        let version = bytes[0];
        if version != FORMAT_VERSION {
            return Err(ExportError::UnsupportedVersion(version));
        }
        let kdf = bytes[1];
        if kdf != KDF_PBKDF2_SHA256 {
            return Err(ExportError::UnsupportedKdf(kdf));
        }
        let iterations = u32::from_be_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]);
        if iterations == 0 {
            return Err(ExportError::InvalidBlob("zero KDF iterations".to_string()));
        }

        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&bytes[6..HEADER_LEN]);

        Ok(EncryptedExport {
            version,
            kdf,
            iterations,
            salt,
            ciphertext: bytes[HEADER_LEN..].to_vec(),
        })
    }
}

impl fmt::Display for EncryptedExport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base58::check_encode(&self.to_bytes()))
    }
}

impl FromStr for EncryptedExport {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = base58::check_decode(s)?;
        Self::from_bytes(&bytes)
    }
}

fn encode_header(version: u8, kdf: u8, iterations: u32, salt: &[u8; SALT_LEN]) -> [u8; HEADER_LEN] {
    let mut out = [0u8; HEADER_LEN];
    out[0] = version;
    out[1] = kdf;
    out[2..6].copy_from_slice(&iterations.to_be_bytes());
    out[6..].copy_from_slice(salt);
    out
}
