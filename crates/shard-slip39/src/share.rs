//! Share value objects and their word encoding.
//!
//! A share is a point on the sharing polynomial plus the metadata needed
//! to regroup a pile of shares: identifier, iteration exponent, group and
//! member coordinates, and thresholds. On the wire a share is a sequence
//! of 10-bit words over the 1024-word list:
//!
//! ```text
//! identifier(15) | iteration_exponent(5) |
//! group_index(4) | group_threshold-1(4) | group_count-1(4) |
//! member_index(4) | member_threshold-1(4) |
//! padded value | checksum(30)
//! ```
//!
//! A 16-byte value makes a 20-word share, a 32-byte value a 33-word share.

use std::fmt;
use std::str::FromStr;

use crate::rs1024::{self, CHECKSUM_WORDS};
use crate::wordlist::WORDS;
use crate::Slip39Error;

/// Bits carried per share word.
const RADIX_BITS: usize = 10;

/// Bits in the share-set identifier.
pub(crate) const ID_BITS: u32 = 15;

/// Bits in the iteration exponent field.
const ITER_EXP_BITS: u32 = 5;

/// Words of metadata before the value: two identifier/exponent words and
/// two coordinate words.
const PREAMBLE_WORDS: usize = 4;

/// Minimum words in a share: metadata, 16-byte value, checksum.
const MIN_MNEMONIC_WORDS: usize = PREAMBLE_WORDS + 13 + CHECKSUM_WORDS;

/// One mnemonic share of a split.
///
/// Immutable; construct by splitting a secret or by parsing a mnemonic
/// string. Thresholds and counts are carried in actual form (`1..=16`),
/// not the wire's `-1` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    identifier: u16,
    iteration_exponent: u8,
    group_index: u8,
    group_threshold: u8,
    group_count: u8,
    member_index: u8,
    member_threshold: u8,
    value: Vec<u8>,
}

impl Share {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        identifier: u16,
        iteration_exponent: u8,
        group_index: u8,
        group_threshold: u8,
        group_count: u8,
        member_index: u8,
        member_threshold: u8,
        value: Vec<u8>,
    ) -> Self {
        Share {
            identifier,
            iteration_exponent,
            group_index,
            group_threshold,
            group_count,
            member_index,
            member_threshold,
            value,
        }
    }

    /// The random 15-bit identifier shared by every share of one split.
    pub fn identifier(&self) -> u16 {
        self.identifier
    }

    /// The iteration exponent the master secret was strengthened with.
    pub fn iteration_exponent(&self) -> u8 {
        self.iteration_exponent
    }

    /// Which group this share belongs to, `0..group_count`.
    pub fn group_index(&self) -> u8 {
        self.group_index
    }

    /// How many groups must be represented to recombine.
    pub fn group_threshold(&self) -> u8 {
        self.group_threshold
    }

    /// How many groups the split produced.
    pub fn group_count(&self) -> u8 {
        self.group_count
    }

    /// This share's member index within its group.
    pub fn member_index(&self) -> u8 {
        self.member_index
    }

    /// How many members of this group must be present.
    pub fn member_threshold(&self) -> u8 {
        self.member_threshold
    }

    /// The share value, same length as the master secret.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Encode the share as its word sequence.
    ///
    /// # Returns
    /// 20 words for a 16-byte value, 33 for a 32-byte value.
    pub fn words(&self) -> Vec<&'static str> {
        self.word_indices()
            .into_iter()
            .map(|i| WORDS[i as usize])
            .collect()
    }

    /// Encode the share as a space-separated mnemonic string.
    pub fn to_mnemonic(&self) -> String {
        self.words().join(" ")
    }

    /// Parse a share from a space-separated mnemonic string.
    ///
    /// # Arguments
    /// * `mnemonic` - Whitespace-separated share words.
    ///
    /// # Returns
    /// The decoded share, or a typed error: `InvalidWord` for a word
    /// outside the list, `ShareTooShort`, `InvalidChecksum`,
    /// `InvalidPadding`, or `UnsupportedValueLength`.
    pub fn from_mnemonic(mnemonic: &str) -> Result<Self, Slip39Error> {
        let mut indices = Vec::new();
        for word in mnemonic.split_whitespace() {
            let index = WORDS
                .binary_search(&word)
                .map_err(|_| Slip39Error::InvalidWord {
                    word: word.to_string(),
                })?;
            indices.push(index as u16);
        }

        if indices.len() < MIN_MNEMONIC_WORDS {
            return Err(Slip39Error::ShareTooShort {
                got: indices.len(),
                min: MIN_MNEMONIC_WORDS,
            });
        }
        if !rs1024::verify_checksum(&indices) {
            return Err(Slip39Error::InvalidChecksum);
        }

        let prefix = (u32::from(indices[0]) << RADIX_BITS) | u32::from(indices[1]);
        let identifier = (prefix >> ITER_EXP_BITS) as u16;
        let iteration_exponent = (prefix & ((1 << ITER_EXP_BITS) - 1)) as u8;

        let body = (u32::from(indices[2]) << RADIX_BITS) | u32::from(indices[3]);
        let group_index = ((body >> 16) & 15) as u8;
        let group_threshold = ((body >> 12) & 15) as u8 + 1;
        let group_count = ((body >> 8) & 15) as u8 + 1;
        let member_index = ((body >> 4) & 15) as u8;
        let member_threshold = (body & 15) as u8 + 1;

        let value_words = &indices[PREAMBLE_WORDS..indices.len() - CHECKSUM_WORDS];
        let value = words_to_value(value_words)?;
        if value.len() != 16 && value.len() != 32 {
            return Err(Slip39Error::UnsupportedValueLength(value.len()));
        }

        Ok(Share {
            identifier,
            iteration_exponent,
            group_index,
            group_threshold,
            group_count,
            member_index,
            member_threshold,
            value,
        })
    }

    fn word_indices(&self) -> Vec<u16> {
        let prefix =
            (u32::from(self.identifier) << ITER_EXP_BITS) | u32::from(self.iteration_exponent);
        let body = (u32::from(self.group_index) << 16)
            | (u32::from(self.group_threshold - 1) << 12)
            | (u32::from(self.group_count - 1) << 8)
            | (u32::from(self.member_index) << 4)
            | u32::from(self.member_threshold - 1);

        let mut data = vec![
            ((prefix >> RADIX_BITS) & 1023) as u16,
            (prefix & 1023) as u16,
            ((body >> RADIX_BITS) & 1023) as u16,
            (body & 1023) as u16,
        ];
        data.extend(value_to_words(&self.value));
        let checksum = rs1024::create_checksum(&data);
        data.extend_from_slice(&checksum);
        data
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_mnemonic())
    }
}

impl FromStr for Share {
    type Err = Slip39Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Share::from_mnemonic(s)
    }
}

/// Pack value bytes into 10-bit words, zero-padded at the front.
fn value_to_words(value: &[u8]) -> Vec<u16> {
    let n_words = (value.len() * 8 + RADIX_BITS - 1) / RADIX_BITS;
    let pad_bits = n_words * RADIX_BITS - value.len() * 8;

    let mut words = Vec::with_capacity(n_words);
    let mut acc: u32 = 0;
    let mut bits = pad_bits as u32;
    for &byte in value {
        acc = (acc << 8) | u32::from(byte);
        bits += 8;
        while bits >= RADIX_BITS as u32 {
            words.push(((acc >> (bits - RADIX_BITS as u32)) & 1023) as u16);
            bits -= RADIX_BITS as u32;
            acc &= (1 << bits) - 1;
        }
    }
    words
}

/// Unpack 10-bit value words back into bytes, rejecting nonzero padding.
fn words_to_value(words: &[u16]) -> Result<Vec<u8>, Slip39Error> {
    let n_bits = words.len() * RADIX_BITS;
    let n_bytes = (n_bits / 16) * 2;
    let pad_bits = n_bits - n_bytes * 8;
    if pad_bits >= RADIX_BITS {
        return Err(Slip39Error::InvalidPadding);
    }
    if pad_bits > 0 && (words[0] >> (RADIX_BITS - pad_bits)) != 0 {
        return Err(Slip39Error::InvalidPadding);
    }

    let mut out = Vec::with_capacity(n_bytes);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    for (i, &word) in words.iter().enumerate() {
        let take = if i == 0 {
            RADIX_BITS - pad_bits
        } else {
            RADIX_BITS
        } as u32;
        acc = (acc << take) | (u32::from(word) & ((1 << take) - 1));
        bits += take;
        while bits >= 8 {
            out.push(((acc >> (bits - 8)) & 0xFF) as u8);
            bits -= 8;
            acc &= (1 << bits) - 1;
        }
    }
    Ok(out)
}
