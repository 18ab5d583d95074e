//! RS1024 checksum over 10-bit share words.
//!
//! A Reed-Solomon code over GF(1024) guaranteeing detection of any error
//! touching at most three words. The checksum is three words long and is
//! computed over the customization string "shamir" followed by all data
//! words of the share.

use crate::CUSTOMIZATION;

/// Generator constants for the RS1024 polymod.
const GEN: [u32; 10] = [
    0x00E0_E040,
    0x01C1_C080,
    0x0383_8100,
    0x0707_0200,
    0x0E0E_0009,
    0x1C0C_2412,
    0x3808_6C24,
    0x3090_FC48,
    0x21B1_F890,
    0x03F3_F120,
];

/// Number of checksum words appended to a share.
pub(crate) const CHECKSUM_WORDS: usize = 3;

fn polymod(values: impl IntoIterator<Item = u16>) -> u32 {
    let mut chk: u32 = 1;
    for v in values {
        let b = chk >> 20;
        chk = ((chk & 0xF_FFFF) << 10) ^ u32::from(v);
        for (i, g) in GEN.iter().enumerate() {
            if (b >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn customization_values() -> impl Iterator<Item = u16> {
    CUSTOMIZATION.iter().map(|&b| u16::from(b))
}

/// Compute the three checksum words for a run of data words.
///
/// # Arguments
/// * `data` - The share's data words (metadata + padded value).
///
/// # Returns
/// The three checksum words to append.
pub(crate) fn create_checksum(data: &[u16]) -> [u16; CHECKSUM_WORDS] {
    let values = customization_values()
        .chain(data.iter().copied())
        .chain([0u16; CHECKSUM_WORDS]);
    let residue = polymod(values) ^ 1;
    let mut checksum = [0u16; CHECKSUM_WORDS];
    for (i, word) in checksum.iter_mut().enumerate() {
        *word = ((residue >> (10 * (CHECKSUM_WORDS - 1 - i))) & 1023) as u16;
    }
    checksum
}

/// Verify the checksum of a full word sequence (data plus checksum words).
///
/// # Arguments
/// * `words` - All share words including the trailing checksum.
///
/// # Returns
/// `true` if the checksum holds.
pub(crate) fn verify_checksum(words: &[u16]) -> bool {
    polymod(customization_values().chain(words.iter().copied())) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_roundtrip() {
        let data: Vec<u16> = (0u16..17).map(|i| (i * 37) % 1024).collect();
        let checksum = create_checksum(&data);
        let mut full = data.clone();
        full.extend_from_slice(&checksum);
        assert!(verify_checksum(&full));
    }

    #[test]
    fn test_checksum_detects_word_flip() {
        let data: Vec<u16> = vec![5, 500, 1023, 0, 77, 308, 511, 12, 900];
        let checksum = create_checksum(&data);
        let mut full = data;
        full.extend_from_slice(&checksum);

        for i in 0..full.len() {
            let mut tampered = full.clone();
            tampered[i] ^= 1;
            assert!(!verify_checksum(&tampered), "flip at word {} undetected", i);
        }
    }

    #[test]
    fn test_checksum_detects_adjacent_swap() {
        let data: Vec<u16> = vec![10, 20, 30, 40, 50, 60, 70];
        let checksum = create_checksum(&data);
        let mut full = data;
        full.extend_from_slice(&checksum);

        for i in 0..full.len() - 1 {
            if full[i] == full[i + 1] {
                continue;
            }
            let mut swapped = full.clone();
            swapped.swap(i, i + 1);
            assert!(!verify_checksum(&swapped), "swap at {} undetected", i);
        }
    }
}
