//! Splitting of 64-bit values into a bucket key (upper half) and a bucket member
//! (lower half), and the inverse composition.
//!
//! Ascending order of `u64` values is the lexicographic order of their
//! `(high, low)` pairs, which is what makes bucket-by-bucket traversal globally sorted.
//! Signed identifiers are handled through their two's complement bit pattern
//! (`value as u64`).

/// Upper 32 bits of `value`: the bucket key.
#[inline]
pub const fn high_bits(value: u64) -> u32 {
    (value >> 32) as u32
}

/// Lower 32 bits of `value`: the member stored inside the bucket.
#[inline]
pub const fn low_bits(value: u64) -> u32 {
    value as u32
}

/// Splits `value` into `(high_bits, low_bits)`.
#[inline]
pub const fn split(value: u64) -> (u32, u32) {
    (high_bits(value), low_bits(value))
}

/// Inverse of [`split`].
#[inline]
pub const fn compose(high: u32, low: u32) -> u64 {
    ((high as u64) << 32) | low as u64
}
