//! Base58 encoding and decoding with optional checksum support.
//!
//! Provides raw Base58 encode/decode and Base58Check encode/decode
//! (with a double-SHA-256 checksum). Base58Check carries every
//! checksummed string in the SDK: extended keys, WIF private keys,
//! legacy addresses, and encrypted key-export blobs.

use crate::hash::sha256d;
use crate::PrimitivesError;

/// Encode a byte slice to a Base58 string.
///
/// Uses Bitcoin's modified Base58 alphabet (no 0, O, I, l). Leading
/// zero bytes are encoded as leading '1' characters.
///
/// # Arguments
/// * `data` - The bytes to encode.
///
/// # Returns
/// A Base58-encoded string.
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data).with_alphabet(bs58::Alphabet::BITCOIN).into_string()
}

/// Decode a Base58 string to a byte vector.
///
/// Leading '1' characters decode to leading zero bytes.
///
/// # Arguments
/// * `s` - The Base58 string to decode.
///
/// # Returns
/// `Ok(Vec<u8>)` on success, or an error for characters outside the alphabet.
pub fn decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    bs58::decode(s)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| PrimitivesError::InvalidBase58(e.to_string()))
}

/// Encode a byte slice with a 4-byte double-SHA-256 checksum appended (Base58Check).
///
/// The checksum is the first 4 bytes of SHA-256d(data). The result
/// is `encode(data || checksum)`.
///
/// # Arguments
/// * `data` - The bytes to encode, version prefix included by the caller.
///
/// # Returns
/// A Base58Check-encoded string.
pub fn check_encode(data: &[u8]) -> String {
    let checksum = sha256d(data);
    let mut payload = data.to_vec();
    payload.extend_from_slice(&checksum[..4]);
    encode(&payload)
}

/// Decode a Base58Check string, verifying the 4-byte checksum.
///
/// Strips and validates the trailing 4-byte double-SHA-256 checksum.
///
/// # Arguments
/// * `s` - The Base58Check string to decode.
///
/// # Returns
/// `Ok(Vec<u8>)` of the payload (checksum stripped, version prefix kept)
/// on success, or an error for invalid encoding or checksum mismatch.
pub fn check_decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    let decoded = decode(s)?;
    if decoded.len() < 4 {
        return Err(PrimitivesError::PayloadTooShort(decoded.len()));
    }
    let (payload, checksum) = decoded.split_at(decoded.len() - 4);
    let expected = sha256d(payload);
    if checksum != &expected[..4] {
        return Err(PrimitivesError::ChecksumMismatch);
    }
    Ok(payload.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Raw Base58 ----

    #[test]
    fn test_base58_empty_string() {
        assert_eq!(encode(&[]), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_base58_known_strings() {
        let cases: &[(&[u8], &str)] = &[
            (b"Hello World!", "2NEpo7TZRRrLZSi2U"),
            (&[0x61], "2g"),
            (&[0x62, 0x62, 0x62], "a3gV"),
            (&[0x51, 0x6b, 0x6f, 0xcd, 0x0f], "ABnLTmg"),
        ];
        for (input, expected) in cases {
            assert_eq!(encode(input), *expected);
            assert_eq!(decode(expected).unwrap(), *input);
        }
    }

    #[test]
    fn test_base58_leading_zeros() {
        let input = [0u8, 0, 0, 0];
        assert_eq!(encode(&input), "1111");
        assert_eq!(decode("1111").unwrap(), input);
    }

    #[test]
    fn test_base58_decode_invalid_character() {
        // 0, O, I, l are excluded from the alphabet.
        assert!(decode("0OIl").is_err());
        assert!(decode("seed!shard").is_err());
    }

    // ---- Base58Check ----

    #[test]
    fn test_base58_check_known_addresses() {
        // Hash160 of the compressed public key for private key 1, with
        // the Bitcoin (0x00) and Dogecoin (0x1e) version prefixes.
        let hash = hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap();

        let mut payload = vec![0x00];
        payload.extend_from_slice(&hash);
        assert_eq!(check_encode(&payload), "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
        assert_eq!(check_decode("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH").unwrap(), payload);

        payload[0] = 0x1e;
        assert_eq!(check_encode(&payload), "DFpN6QqFfUm3gKNaxN6tNcab1FArL9cZLE");
    }

    #[test]
    fn test_base58_check_roundtrip() {
        let payload = hex::decode("0488ade4000102030405").unwrap();
        let encoded = check_encode(&payload);
        assert_eq!(check_decode(&encoded).unwrap(), payload);
    }

    #[test]
    fn test_base58_check_bad_checksum() {
        // Encode then tamper with the last character.
        let payload = vec![0x80, 0x01, 0x02, 0x03];
        let mut encoded = check_encode(&payload);
        let last = encoded.pop().unwrap();
        let replacement = if last == '1' { '2' } else { '1' };
        encoded.push(replacement);
        assert!(matches!(
            check_decode(&encoded),
            Err(PrimitivesError::ChecksumMismatch) | Err(PrimitivesError::InvalidBase58(_))
        ));
    }

    #[test]
    fn test_base58_check_too_short() {
        // "1" decodes to a single zero byte, shorter than the checksum.
        assert!(matches!(
            check_decode("1"),
            Err(PrimitivesError::PayloadTooShort(1))
        ));
    }
}
