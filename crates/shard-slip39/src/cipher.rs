//! Passphrase strengthening of the master secret.
//!
//! Before splitting, the master secret passes through a four-round Feistel
//! network keyed by the passphrase. Round keys come from PBKDF2-HMAC-SHA256
//! with the salt bound to the share identifier, so shares from different
//! splits never strengthen alike. Decrypting with a wrong passphrase
//! produces a different, equally plausible secret; that silence is a
//! deliberate property of the scheme and must not be "fixed" here.

use shard_primitives::hash::pbkdf2_hmac_sha256;
use zeroize::Zeroizing;

use crate::{Slip39Error, CUSTOMIZATION};

/// Total PBKDF2 iterations before exponent scaling.
const BASE_ITERATIONS: u32 = 10_000;

/// Feistel round count. The iteration budget is spread evenly across rounds.
const ROUNDS: u8 = 4;

/// Largest iteration exponent whose per-round cost fits PBKDF2's u32
/// iteration parameter. The wire field can carry up to 31; decoded shares
/// past this bound are rejected by `round_iterations`.
pub(crate) const MAX_ITERATION_EXPONENT: u8 = 20;

/// Per-round PBKDF2 iteration count for an iteration exponent.
///
/// The 5-bit wire field admits exponents the u32 iteration parameter of
/// PBKDF2 cannot express; those are rejected rather than truncated.
fn round_iterations(iteration_exponent: u8) -> Result<u32, Slip39Error> {
    let total = u64::from(BASE_ITERATIONS) << iteration_exponent;
    u32::try_from(total / u64::from(ROUNDS)).map_err(|_| {
        Slip39Error::InvalidParameters(format!(
            "iteration exponent {} exceeds the supported KDF cost",
            iteration_exponent
        ))
    })
}

fn round_key(
    round: u8,
    passphrase: &[u8],
    salt: &[u8],
    iterations: u32,
    half_len: usize,
) -> Zeroizing<Vec<u8>> {
    let mut password = Zeroizing::new(Vec::with_capacity(1 + passphrase.len()));
    password.push(round);
    password.extend_from_slice(passphrase);
    Zeroizing::new(pbkdf2_hmac_sha256(&password, salt, iterations, half_len))
}

fn feistel(
    input: &[u8],
    passphrase: &[u8],
    identifier: u16,
    iteration_exponent: u8,
    rounds: impl Iterator<Item = u8>,
) -> Result<Vec<u8>, Slip39Error> {
    let iterations = round_iterations(iteration_exponent)?;
    let half = input.len() / 2;

    // Salt prefix: customization string || big-endian identifier.
    let mut salt_prefix = Vec::with_capacity(CUSTOMIZATION.len() + 2);
    salt_prefix.extend_from_slice(CUSTOMIZATION);
    salt_prefix.extend_from_slice(&identifier.to_be_bytes());

    let mut left = Zeroizing::new(input[..half].to_vec());
    let mut right = Zeroizing::new(input[half..].to_vec());
    for round in rounds {
        let mut salt = Zeroizing::new(Vec::with_capacity(salt_prefix.len() + half));
        salt.extend_from_slice(&salt_prefix);
        salt.extend_from_slice(&right);
        let key = round_key(round, passphrase, &salt, iterations, half);
        let mixed = Zeroizing::new(
            left.iter().zip(key.iter()).map(|(l, k)| l ^ k).collect::<Vec<u8>>(),
        );
        left = right;
        right = mixed;
    }

    // The halves come out swapped.
    let mut output = Vec::with_capacity(input.len());
    output.extend_from_slice(&right);
    output.extend_from_slice(&left);
    Ok(output)
}

/// Strengthen a master secret for splitting.
///
/// # Arguments
/// * `master` - The 16- or 32-byte master secret.
/// * `passphrase` - The strengthening passphrase bytes.
/// * `identifier` - The 15-bit share-set identifier the salt binds to.
/// * `iteration_exponent` - KDF cost scaling; exponents past 20 are rejected.
///
/// # Returns
/// The strengthened secret, same length as the input.
pub(crate) fn encrypt(
    master: &[u8],
    passphrase: &[u8],
    identifier: u16,
    iteration_exponent: u8,
) -> Result<Vec<u8>, Slip39Error> {
    feistel(master, passphrase, identifier, iteration_exponent, 0..ROUNDS)
}

/// Invert [`encrypt`] on a recovered strengthened secret.
///
/// A wrong passphrase yields a different valid secret, silently.
///
/// # Arguments
/// * `strengthened` - The recovered strengthened secret.
/// * `passphrase` - The passphrase bytes.
/// * `identifier` - The share-set identifier.
/// * `iteration_exponent` - KDF cost scaling; exponents past 20 are rejected.
///
/// # Returns
/// The master secret the passphrase implies.
pub(crate) fn decrypt(
    strengthened: &[u8],
    passphrase: &[u8],
    identifier: u16,
    iteration_exponent: u8,
) -> Result<Vec<u8>, Slip39Error> {
    feistel(
        strengthened,
        passphrase,
        identifier,
        iteration_exponent,
        (0..ROUNDS).rev(),
    )
}
