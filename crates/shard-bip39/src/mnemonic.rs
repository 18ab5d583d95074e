//! 12/24-word phrase encoding and the bridge to `Secret` and `Seed`.
//!
//! A phrase encodes 128 or 256 bits of entropy followed by the leading
//! bits of the entropy's SHA-256 digest, 11 bits per word over a fixed
//! 2048-word list. Seed stretching runs the whole phrase through
//! PBKDF2-HMAC-SHA512 with a passphrase-salted "mnemonic" salt; a wrong
//! passphrase yields a different, equally valid seed with no error.

use std::fmt;

use shard_primitives::hash::{pbkdf2_hmac_sha512, sha256};
use shard_primitives::secret::{SECRET_LEN_LONG, SECRET_LEN_SHORT};
use shard_primitives::{Secret, Seed};
use zeroize::Zeroize;

use crate::wordlist::WORDS;
use crate::Bip39Error;

/// Bits carried by one word.
const WORD_BITS: u32 = 11;

/// PBKDF2 rounds for seed stretching.
const SEED_ROUNDS: u32 = 2048;

/// A validated phrase, stored as its raw entropy.
///
/// Words and checksum bits are recomputed on demand, so a `Mnemonic`
/// never holds an invalid phrase. The entropy is wiped on drop.
#[derive(Clone)]
pub struct Mnemonic {
    entropy: Vec<u8>,
}

impl Mnemonic {
    /// Wrap 16 or 32 bytes of entropy.
    ///
    /// # Arguments
    /// * `entropy` - The raw entropy bytes.
    ///
    /// # Returns
    /// The mnemonic, or `InvalidEntropyLength` for other lengths.
    pub fn from_entropy(entropy: &[u8]) -> Result<Self, Bip39Error> {
        if entropy.len() != SECRET_LEN_SHORT && entropy.len() != SECRET_LEN_LONG {
            return Err(Bip39Error::InvalidEntropyLength(entropy.len()));
        }
        Ok(Mnemonic {
            entropy: entropy.to_vec(),
        })
    }

    /// Wrap a master secret as a phrase of matching entropy length.
    pub fn from_secret(secret: &Secret) -> Self {
        // Secret lengths are already restricted to 16 or 32 bytes.
        Mnemonic {
            entropy: secret.as_bytes().to_vec(),
        }
    }

    /// Parse and validate a phrase.
    ///
    /// # Arguments
    /// * `phrase` - Whitespace-separated words.
    ///
    /// # Returns
    /// The mnemonic, or `UnsupportedWordCount` / `InvalidWord` /
    /// `ChecksumInvalid` in that order of checks.
    pub fn from_phrase(phrase: &str) -> Result<Self, Bip39Error> {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        if words.len() != 12 && words.len() != 24 {
            return Err(Bip39Error::UnsupportedWordCount(words.len()));
        }

        let mut indices = Vec::with_capacity(words.len());
        for word in words {
            let index = WORDS.binary_search(&word).map_err(|_| Bip39Error::InvalidWord {
                word: word.to_string(),
            })?;
            indices.push(index as u16);
        }

        let entropy = entropy_from_indices(&indices)?;
        Ok(Mnemonic { entropy })
    }

    /// The raw entropy bytes.
    pub fn entropy(&self) -> &[u8] {
        &self.entropy
    }

    /// Number of words in the phrase, 12 or 24.
    pub fn word_count(&self) -> usize {
        self.entropy.len() * 3 / 4
    }

    /// The phrase as individual words.
    pub fn words(&self) -> Vec<&'static str> {
        word_indices(&self.entropy)
            .iter()
            .map(|&index| WORDS[index as usize])
            .collect()
    }

    /// The phrase as a single space-separated string.
    pub fn phrase(&self) -> String {
        self.words().join(" ")
    }

    /// The entropy as a master secret for share splitting.
    pub fn to_secret(&self) -> Result<Secret, Bip39Error> {
        Ok(Secret::from_bytes(&self.entropy)?)
    }

    /// Stretch the phrase into a 64-byte derivation seed.
    ///
    /// # Arguments
    /// * `passphrase` - Extra salt material, used byte-for-byte; empty
    ///   for none. Any UTF-8 string is accepted and any value yields a
    ///   structurally valid seed.
    pub fn to_seed(&self, passphrase: &str) -> Seed {
        let mut phrase = self.phrase();
        let mut salt = Vec::with_capacity(8 + passphrase.len());
        salt.extend_from_slice(b"mnemonic");
        salt.extend_from_slice(passphrase.as_bytes());

        let seed = pbkdf2_hmac_sha512(phrase.as_bytes(), &salt, SEED_ROUNDS);
        phrase.zeroize();
        salt.zeroize();
        Seed::new(seed)
    }
}

impl Drop for Mnemonic {
    fn drop(&mut self) {
        self.entropy.zeroize();
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic({} words)", self.word_count())
    }
}

/// Word indices for entropy plus its leading checksum bits.
fn word_indices(entropy: &[u8]) -> Vec<u16> {
    let digest = sha256(entropy);
    let checksum_bits = (entropy.len() / 4) as u32;
    let total_words = (entropy.len() * 8 + checksum_bits as usize) / WORD_BITS as usize;

    let mut indices = Vec::with_capacity(total_words);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    for &byte in entropy {
        acc = (acc << 8) | u32::from(byte);
        bits += 8;
        while bits >= WORD_BITS {
            bits -= WORD_BITS;
            indices.push(((acc >> bits) & 0x7FF) as u16);
        }
    }

    acc = (acc << checksum_bits) | u32::from(digest[0] >> (8 - checksum_bits));
    bits += checksum_bits;
    while bits >= WORD_BITS {
        bits -= WORD_BITS;
        indices.push(((acc >> bits) & 0x7FF) as u16);
    }
    indices
}

/// Recover entropy from word indices, verifying the checksum bits.
fn entropy_from_indices(indices: &[u16]) -> Result<Vec<u8>, Bip39Error> {
    let total_bits = indices.len() * WORD_BITS as usize;
    let entropy_bits = total_bits * 32 / 33;
    let checksum_bits = (total_bits - entropy_bits) as u32;
    let entropy_len = entropy_bits / 8;

    let mut entropy = Vec::with_capacity(entropy_len);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    for &index in indices {
        acc = (acc << WORD_BITS) | u32::from(index);
        bits += WORD_BITS;
        while bits >= 8 && entropy.len() < entropy_len {
            bits -= 8;
            entropy.push(((acc >> bits) & 0xFF) as u8);
        }
    }

    // The trailing `checksum_bits` bits must match the entropy digest.
    let supplied = (acc & ((1 << bits) - 1)) as u8;
    let expected = sha256(&entropy)[0] >> (8 - checksum_bits);
    if supplied != expected {
        entropy.zeroize();
        return Err(Bip39Error::ChecksumInvalid);
    }
    Ok(entropy)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_zero_entropy_phrase() {
        let mnemonic = Mnemonic::from_entropy(&[0u8; 16]).unwrap();
        assert_eq!(mnemonic.word_count(), 12);
        assert_eq!(mnemonic.phrase(), ZERO_PHRASE);

        let parsed = Mnemonic::from_phrase(ZERO_PHRASE).unwrap();
        assert_eq!(parsed.entropy(), &[0u8; 16][..]);
    }

    #[test]
    fn test_long_phrase_word_count() {
        let mnemonic = Mnemonic::from_entropy(&[0x7Fu8; 32]).unwrap();
        assert_eq!(mnemonic.word_count(), 24);
        assert_eq!(mnemonic.words().len(), 24);

        let parsed = Mnemonic::from_phrase(&mnemonic.phrase()).unwrap();
        assert_eq!(parsed.entropy(), &[0x7Fu8; 32][..]);
    }

    #[test]
    fn test_known_seed() {
        // Zero entropy, passphrase "TREZOR".
        let mnemonic = Mnemonic::from_phrase(ZERO_PHRASE).unwrap();
        let seed = mnemonic.to_seed("TREZOR");
        assert_eq!(
            seed.to_hex(),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn test_wrong_passphrase_changes_seed_silently() {
        let mnemonic = Mnemonic::from_phrase(ZERO_PHRASE).unwrap();
        assert_ne!(
            mnemonic.to_seed("TREZOR").as_bytes(),
            mnemonic.to_seed("trezor").as_bytes()
        );
    }

    #[test]
    fn test_secret_bridge_roundtrip() {
        let secret = Secret::from_bytes(&[0xA5u8; 32]).unwrap();
        let mnemonic = Mnemonic::from_secret(&secret);
        assert_eq!(mnemonic.to_secret().unwrap(), secret);

        let reparsed = Mnemonic::from_phrase(&mnemonic.phrase()).unwrap();
        assert_eq!(reparsed.to_secret().unwrap(), secret);
    }

    #[test]
    fn test_rejects_malformed_phrases() {
        let thirteen = format!("{} abandon", ZERO_PHRASE);
        assert!(matches!(
            Mnemonic::from_phrase(&thirteen),
            Err(Bip39Error::UnsupportedWordCount(13))
        ));

        let unknown = ZERO_PHRASE.replace("about", "zzzz");
        match Mnemonic::from_phrase(&unknown) {
            Err(Bip39Error::InvalidWord { word }) => assert_eq!(word, "zzzz"),
            other => panic!("expected InvalidWord, got {:?}", other),
        }

        let tampered = ZERO_PHRASE.replace("about", "zoo");
        assert!(matches!(
            Mnemonic::from_phrase(&tampered),
            Err(Bip39Error::ChecksumInvalid)
        ));
    }

    #[test]
    fn test_rejects_bad_entropy_lengths() {
        assert!(matches!(
            Mnemonic::from_entropy(&[0u8; 20]),
            Err(Bip39Error::InvalidEntropyLength(20))
        ));
        assert!(Mnemonic::from_entropy(&[]).is_err());
    }

    #[test]
    fn test_debug_redacts_entropy() {
        let mnemonic = Mnemonic::from_entropy(&[1u8; 16]).unwrap();
        assert_eq!(format!("{:?}", mnemonic), "Mnemonic(12 words)");
    }

    // ---- published vectors ----

    #[test]
    fn test_phrase_vectors() {
        let vectors_json = include_str!("testdata/bip39_vectors.json");
        let vectors: serde_json::Value = serde_json::from_str(vectors_json).unwrap();

        for (i, v) in vectors["valid"].as_array().unwrap().iter().enumerate() {
            let entropy = hex::decode(v["entropy"].as_str().unwrap()).unwrap();
            let phrase = v["mnemonic"].as_str().unwrap();
            let passphrase = v["passphrase"].as_str().unwrap();
            let seed = v["seed"].as_str().unwrap();

            let mnemonic = Mnemonic::from_entropy(&entropy)
                .unwrap_or_else(|e| panic!("vector #{}: from entropy: {}", i + 1, e));
            assert_eq!(mnemonic.phrase(), phrase, "vector #{}: phrase", i + 1);

            let parsed = Mnemonic::from_phrase(phrase)
                .unwrap_or_else(|e| panic!("vector #{}: parse phrase: {}", i + 1, e));
            assert_eq!(parsed.entropy(), &entropy[..], "vector #{}: entropy", i + 1);
            assert_eq!(
                parsed.to_seed(passphrase).to_hex(),
                seed,
                "vector #{}: seed",
                i + 1
            );
        }
    }

    #[test]
    fn test_phrase_vectors_invalid() {
        let vectors_json = include_str!("testdata/bip39_vectors.json");
        let vectors: serde_json::Value = serde_json::from_str(vectors_json).unwrap();

        for (i, v) in vectors["invalid"].as_array().unwrap().iter().enumerate() {
            let phrase = v["mnemonic"].as_str().unwrap();
            let expected = v["error"].as_str().unwrap();

            let err = Mnemonic::from_phrase(phrase)
                .err()
                .unwrap_or_else(|| panic!("vector #{}: phrase accepted", i + 1));
            let name = match err {
                Bip39Error::ChecksumInvalid => "ChecksumInvalid",
                Bip39Error::InvalidWord { .. } => "InvalidWord",
                Bip39Error::UnsupportedWordCount(_) => "UnsupportedWordCount",
                other => panic!("vector #{}: unexpected error {}", i + 1, other),
            };
            assert_eq!(name, expected, "vector #{}", i + 1);
        }
    }
}
