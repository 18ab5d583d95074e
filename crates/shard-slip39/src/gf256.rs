//! GF(256) arithmetic for the sharing polynomial.
//!
//! The field is GF(2^8) under the irreducible polynomial
//! x^8 + x^4 + x^3 + x + 1 (0x11B). Addition is XOR; multiplication and
//! division go through log/exp tables built over the generator x+1 (0x03).
//! The tables are computed at compile time and shared process-wide.

use crate::Slip39Error;

/// Exponent and log tables for the generator 0x03.
///
/// `EXP[i]` is the generator raised to the i-th power; `LOG` inverts it
/// (`LOG[0]` is unused, zero has no logarithm).
const TABLES: ([u8; 255], [u8; 256]) = build_tables();

const EXP: [u8; 255] = TABLES.0;
const LOG: [u8; 256] = TABLES.1;

const fn build_tables() -> ([u8; 255], [u8; 256]) {
    let mut exp = [0u8; 255];
    let mut log = [0u8; 256];
    let mut value: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = value as u8;
        log[value as usize] = i as u8;
        // Multiply by the generator x+1: shift-and-add, then reduce.
        value = (value << 1) ^ value;
        if value > 255 {
            value ^= 0x11B;
        }
        i += 1;
    }
    (exp, log)
}

/// Add two field elements. Addition in GF(2^8) is XOR.
#[inline]
pub fn add(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Multiply two field elements.
///
/// # Arguments
/// * `a` - Left operand.
/// * `b` - Right operand.
///
/// # Returns
/// The product in GF(256).
pub fn mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_sum = (LOG[a as usize] as usize + LOG[b as usize] as usize) % 255;
    EXP[log_sum]
}

/// Divide one field element by another.
///
/// # Arguments
/// * `a` - Dividend.
/// * `b` - Divisor.
///
/// # Returns
/// `Ok(a / b)` in GF(256), or `DivisionByZero` for a zero divisor.
pub fn div(a: u8, b: u8) -> Result<u8, Slip39Error> {
    if b == 0 {
        return Err(Slip39Error::DivisionByZero);
    }
    if a == 0 {
        return Ok(0);
    }
    let log_diff =
        (LOG[a as usize] as usize + 255 - LOG[b as usize] as usize) % 255;
    Ok(EXP[log_diff])
}

/// Evaluate the Lagrange interpolation polynomial through `points` at `x`.
///
/// Each point pairs an x-coordinate with a byte string; interpolation runs
/// byte-wise across the strings. This single routine serves both sharing
/// levels: evaluating the split polynomial at share indices and recovering
/// the values at the reserved secret and digest indices.
///
/// # Arguments
/// * `points` - Distinct x-coordinates with equal-length byte values.
/// * `x` - The x-coordinate to evaluate at.
///
/// # Returns
/// The interpolated byte string, or `DivisionByZero` if two points share
/// an x-coordinate.
pub fn interpolate(points: &[(u8, Vec<u8>)], x: u8) -> Result<Vec<u8>, Slip39Error> {
    // Exact hit: the value is already known.
    if let Some((_, value)) = points.iter().find(|(xi, _)| *xi == x) {
        return Ok(value.clone());
    }

    let len = points.first().map_or(0, |(_, v)| v.len());
    let mut result = vec![0u8; len];
    for (i, (xi, yi)) in points.iter().enumerate() {
        let mut num = 1u8;
        let mut den = 1u8;
        for (j, (xj, _)) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            num = mul(num, add(x, *xj));
            den = mul(den, add(*xi, *xj));
        }
        // Duplicate x-coordinates zero the denominator and fail here.
        let coefficient = div(num, den)?;
        for (r, y) in result.iter_mut().zip(yi.iter()) {
            *r = add(*r, mul(coefficient, *y));
        }
    }
    Ok(result)
}
