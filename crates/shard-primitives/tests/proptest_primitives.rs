use proptest::prelude::*;

use shard_primitives::base58;
use shard_primitives::hash::sha256d;
use shard_primitives::Secret;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn base58_roundtrip(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let encoded = base58::encode(&bytes);
        let decoded = base58::decode(&encoded).unwrap();
        prop_assert_eq!(decoded, bytes);
    }

    #[test]
    fn base58_check_roundtrip(bytes in prop::collection::vec(any::<u8>(), 1..64)) {
        let encoded = base58::check_encode(&bytes);
        let decoded = base58::check_decode(&encoded).unwrap();
        prop_assert_eq!(decoded, bytes);
    }

    #[test]
    fn base58_check_detects_payload_tampering(
        bytes in prop::collection::vec(any::<u8>(), 4..32),
        flip_byte in 0usize..4,
        flip_bit in 0u8..8
    ) {
        let mut tampered = bytes.clone();
        tampered[flip_byte] ^= 1 << flip_bit;
        // Re-encode the tampered payload with the original checksum.
        let checksum = &sha256d(&bytes)[..4];
        let mut wire = tampered;
        wire.extend_from_slice(checksum);
        let encoded = base58::encode(&wire);
        prop_assert!(base58::check_decode(&encoded).is_err());
    }

    #[test]
    fn secret_hex_roundtrip(bytes in prop::array::uniform32(any::<u8>())) {
        let secret = Secret::from_bytes(&bytes).unwrap();
        let back = Secret::from_hex(&secret.to_hex()).unwrap();
        prop_assert_eq!(secret, back);
    }
}
