use std::{collections::HashMap, hash::Hasher};

/// A HashMap keyed by primitive integers, hashed with a single multiplicative mix.
///
/// Bucket keys of a 64-bit bitmap are the upper halves of the stored values and tend
/// to be clustered in small, dense ranges (often starting at zero). An identity hash
/// would leave the top bits of every hash at zero, which SwissTable uses for its
/// control bytes. `IntHasher` spreads such keys across the whole 64-bit hash space
/// at the cost of one multiplication.
///
/// # Examples
///
/// ```
/// use bitmap64_collections::int_hash::IntHashMap;
///
/// let mut map: IntHashMap<u32, &str> = IntHashMap::default();
/// map.insert(42, "value");
/// assert_eq!(map.get(&42), Some(&"value"));
/// ```
pub type IntHashMap<K, V> = HashMap<K, V, std::hash::BuildHasherDefault<IntHasher>>;

/// A hasher for primitive integers: the value multiplied by a 64-bit odd constant
/// (the golden-ratio multiplier of Fibonacci hashing).
///
/// # Important
///
/// This hasher should only be used with primitive integer types (`u8`, `u16`, `u32`,
/// `u64`, `usize` and their signed counterparts). Hashing anything that writes raw
/// bytes will panic.
///
/// # Examples
///
/// ```
/// use std::hash::{Hash, Hasher};
/// use bitmap64_collections::int_hash::IntHasher;
///
/// let mut a = IntHasher::default();
/// 1u32.hash(&mut a);
/// let mut b = IntHasher::default();
/// 2u32.hash(&mut b);
/// assert_ne!(a.finish() >> 57, b.finish() >> 57);
/// ```
#[derive(Default)]
pub struct IntHasher(u64);

impl IntHasher {
    const MULTIPLIER: u64 = 0x9e37_79b9_7f4a_7c15;

    #[inline]
    fn mix(&mut self, i: u64) {
        self.0 = i.wrapping_mul(Self::MULTIPLIER);
    }
}

impl Hasher for IntHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline]
    fn write(&mut self, _: &[u8]) {
        unimplemented!(
            "IntHasher is only implemented for primitive integer types: u8, u16, u32, u64, usize, i8, i16, i32, i64, isize"
        );
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.mix(i as u64);
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.mix(i as u64);
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.mix(i as u64);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.mix(i);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.mix(i as u64);
    }

    #[inline]
    fn write_i8(&mut self, i: i8) {
        self.write_u8(i as u8)
    }

    #[inline]
    fn write_i16(&mut self, i: i16) {
        self.write_u16(i as u16)
    }

    #[inline]
    fn write_i32(&mut self, i: i32) {
        self.write_u32(i as u32)
    }

    #[inline]
    fn write_i64(&mut self, i: i64) {
        self.write_u64(i as u64)
    }

    #[inline]
    fn write_isize(&mut self, i: isize) {
        self.write_usize(i as usize)
    }
}
