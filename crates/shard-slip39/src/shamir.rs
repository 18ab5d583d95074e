//! Single-level secret splitting with a digest share.
//!
//! Implements the split/recover primitive that runs once at the group
//! level and once per group at the member level. Shares are points on a
//! random polynomial of degree `threshold - 1`; two x-coordinates are
//! reserved: 255 holds the secret and 254 holds a digest share binding
//! the set together, `HMAC-SHA256(random_part, secret)[..4] || random_part`.

use rand::rngs::OsRng;
use rand::RngCore;
use shard_primitives::hash::sha256_hmac;
use zeroize::{Zeroize, Zeroizing};

use crate::gf256::interpolate;
use crate::Slip39Error;

/// Reserved x-coordinate of the digest share.
const DIGEST_INDEX: u8 = 254;

/// Reserved x-coordinate of the secret.
const SECRET_INDEX: u8 = 255;

/// Leading digest bytes kept in the digest share.
const DIGEST_LEN: usize = 4;

/// Largest share count (and threshold) at one level.
pub(crate) const MAX_SHARE_COUNT: u8 = 16;

fn share_digest(random_part: &[u8], secret: &[u8]) -> [u8; DIGEST_LEN] {
    let mac = sha256_hmac(random_part, secret);
    let mut digest = [0u8; DIGEST_LEN];
    digest.copy_from_slice(&mac[..DIGEST_LEN]);
    digest
}

/// Split a secret into `count` shares, any `threshold` of which recover it.
///
/// With `threshold == 1` every share is a plain copy of the secret, the
/// scheme's degenerate case. Otherwise `threshold - 2` shares are drawn
/// at random and the rest are interpolated through them, the digest share,
/// and the secret.
///
/// # Arguments
/// * `threshold` - Shares required for recovery, `1..=count`.
/// * `count` - Shares produced, `threshold..=16`.
/// * `secret` - The even-length secret of at least 16 bytes.
///
/// # Returns
/// `count` pairs of `(index, value)` with indices `0..count`.
pub(crate) fn split_secret(
    threshold: u8,
    count: u8,
    secret: &[u8],
) -> Result<Vec<(u8, Vec<u8>)>, Slip39Error> {
    if threshold == 0 || threshold > count || count > MAX_SHARE_COUNT {
        return Err(Slip39Error::InvalidParameters(format!(
            "threshold {} of {} shares is out of range",
            threshold, count
        )));
    }
    if secret.len() < 16 || secret.len() % 2 != 0 {
        return Err(Slip39Error::InvalidParameters(format!(
            "secret length {} is not an even number of bytes >= 16",
            secret.len()
        )));
    }

    if threshold == 1 {
        return Ok((0..count).map(|i| (i, secret.to_vec())).collect());
    }

    let mut shares: Vec<(u8, Vec<u8>)> = Vec::with_capacity(count as usize);
    for i in 0..threshold - 2 {
        let mut value = vec![0u8; secret.len()];
        OsRng.fill_bytes(&mut value);
        shares.push((i, value));
    }

    let mut random_part = Zeroizing::new(vec![0u8; secret.len() - DIGEST_LEN]);
    OsRng.fill_bytes(random_part.as_mut_slice());
    let mut digest_share = Zeroizing::new(Vec::with_capacity(secret.len()));
    digest_share.extend_from_slice(&share_digest(&random_part, secret));
    digest_share.extend_from_slice(&random_part);

    let mut base = shares.clone();
    base.push((DIGEST_INDEX, digest_share.to_vec()));
    base.push((SECRET_INDEX, secret.to_vec()));

    for i in threshold - 2..count {
        shares.push((i, interpolate(&base, i)?));
    }

    // The fixed points must not leak through the return value.
    for (_, value) in base.iter_mut() {
        value.zeroize();
    }

    Ok(shares)
}

/// Recover a secret from at least `threshold` shares.
///
/// With `threshold >= 2` the digest share is recomputed from the recovered
/// secret and must match, otherwise the share set mixes material from
/// different splits.
///
/// # Arguments
/// * `threshold` - The member or group threshold the shares were split with.
/// * `shares` - `(index, value)` pairs, distinct indices, equal lengths.
///
/// # Returns
/// The recovered secret, or `DigestMismatch` when the set is corrupt.
pub(crate) fn recover_secret(
    threshold: u8,
    shares: &[(u8, Vec<u8>)],
) -> Result<Vec<u8>, Slip39Error> {
    if shares.len() < threshold as usize {
        return Err(Slip39Error::InsufficientShares {
            threshold: threshold as usize,
            got: shares.len(),
        });
    }
    if threshold == 1 {
        return Ok(shares[0].1.clone());
    }

    let secret = interpolate(shares, SECRET_INDEX)?;
    let digest_share = Zeroizing::new(interpolate(shares, DIGEST_INDEX)?);
    let (digest, random_part) = digest_share.split_at(DIGEST_LEN);
    if digest != share_digest(random_part, &secret) {
        return Err(Slip39Error::DigestMismatch);
    }
    Ok(secret)
}
