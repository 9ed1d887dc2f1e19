//! Set of arbitrary u64 values, sharded by their upper 32 bits.
//!
//! Representation
//! - Every value `v` is split into a bucket key `high = v >> 32` and a member
//!   `low = v as u32` (see [`partition`](crate::partition)).
//! - `buckets` maps each key to a 32-bit container holding the members with that
//!   prefix.
//! - `bucket_index` is a 32-bit container holding exactly the keys of `buckets`. It
//!   drives bucket selection in the set-algebra operations and gives the ascending key
//!   order used by iteration, which the hash map cannot provide.
//!
//! Invariants
//! - `bucket_index` contains `k` iff `buckets[k]` exists, and no empty container is
//!   ever retained in `buckets`.
//! - `v` is a member iff `buckets[high(v)]` exists and contains `low(v)`.
//!
//! Every public operation preserves both invariants; [`Bitmap64::check_invariants`]
//! verifies them in tests.
//!
//! Concurrency
//! - Mutating operations take `&mut self`: an instance has a single writer at a time.
//! - The set-algebra operations fan the per-bucket work out to a caller-supplied
//!   [`TaskPool`](bitmap64_workflow::TaskPool) and block until it completes (see
//!   [`set_ops`](crate::set_ops)).

use bitmap64_collections::int_hash::IntHashMap;
use roaring::RoaringBitmap;

use crate::{
    bitmap32::Bitmap32,
    partition::{compose, split},
};

/// A set of `u64` values stored as 32-bit containers keyed by the upper half of each
/// value.
///
/// The container type defaults to [`RoaringBitmap`]; any [`Bitmap32`] works.
#[derive(Clone, Default)]
pub struct Bitmap64<B: Bitmap32 = RoaringBitmap> {
    pub(crate) buckets: IntHashMap<u32, B>,
    pub(crate) bucket_index: B,
}

impl Bitmap64 {
    /// Creates an empty set backed by [`RoaringBitmap`] containers.
    pub fn new() -> Bitmap64 {
        Bitmap64::default()
    }

    /// Builds a set from an arbitrary sequence of values.
    ///
    /// Duplicates are ignored and the input order does not affect the result.
    pub fn from_values(values: impl IntoIterator<Item = u64>) -> Bitmap64 {
        values.into_iter().collect()
    }
}

impl<B: Bitmap32> Bitmap64<B> {
    /// Inserts `value`. Returns `true` if it was not already present.
    pub fn add(&mut self, value: u64) -> bool {
        let (high, low) = split(value);
        let added = self.buckets.entry(high).or_insert_with(B::create).add(low);
        self.bucket_index.add(high);
        added
    }

    /// Removes `value`. Returns `true` if it was present.
    ///
    /// A bucket emptied by the removal is dropped together with its index entry.
    pub fn remove(&mut self, value: u64) -> bool {
        let (high, low) = split(value);
        let Some(bucket) = self.buckets.get_mut(&high) else {
            return false;
        };
        let removed = bucket.remove(low);
        if bucket.is_empty() {
            self.buckets.remove(&high);
            self.bucket_index.remove(high);
        }
        removed
    }

    /// Tests membership of `value`.
    pub fn contains(&self, value: u64) -> bool {
        let (high, low) = split(value);
        self.buckets
            .get(&high)
            .map(|bucket| bucket.contains(low))
            .unwrap_or(false)
    }

    /// Number of values in the set. O(number of buckets).
    pub fn cardinality(&self) -> u64 {
        self.buckets.values().map(|bucket| bucket.cardinality()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.bucket_index = B::create();
    }

    /// Smallest value in the set.
    pub fn min(&self) -> Option<u64> {
        let high = self.bucket_index.min()?;
        let low = self.buckets.get(&high)?.min()?;
        Some(compose(high, low))
    }

    /// Largest value in the set.
    pub fn max(&self) -> Option<u64> {
        let high = self.bucket_index.max()?;
        let low = self.buckets.get(&high)?.max()?;
        Some(compose(high, low))
    }

    /// Compute summary statistics about the set and its bucket layout.
    pub fn compute_stats(&self) -> Bitmap64Stats {
        let mut stats = Bitmap64Stats {
            bucket_count: self.buckets.len(),
            ..Default::default()
        };
        for bucket in self.buckets.values() {
            let n = bucket.cardinality();
            stats.cardinality += n;
            stats.min_bucket_cardinality = if stats.min_bucket_cardinality == 0 {
                n
            } else {
                stats.min_bucket_cardinality.min(n)
            };
            stats.max_bucket_cardinality = stats.max_bucket_cardinality.max(n);
        }
        stats
    }

    /// Internal consistency checks for debug/testing.
    ///
    /// Ensures that:
    /// - the summary index holds exactly the bucket keys;
    /// - no bucket is empty.
    ///
    /// Panics: if an invariant is violated.
    pub fn check_invariants(&self) {
        assert_eq!(
            self.bucket_index.cardinality(),
            self.buckets.len() as u64,
            "bucket index size"
        );
        for key in self.bucket_index.iter() {
            let bucket = self
                .buckets
                .get(&key)
                .unwrap_or_else(|| panic!("indexed bucket {key} is missing"));
            assert!(!bucket.is_empty(), "bucket {key} is empty");
        }
    }

    /// Replaces the whole content with the given `(key, bucket)` pairs, skipping
    /// empty buckets, and rebuilds the summary index from the surviving keys.
    pub(crate) fn replace_buckets(&mut self, buckets: impl IntoIterator<Item = (u32, B)>) {
        let (buckets, bucket_index) = Self::collect_buckets(buckets);
        self.buckets = buckets;
        self.bucket_index = bucket_index;
    }

    /// Overwrites the given buckets in place. An empty bucket is dropped together with
    /// its index entry; keys not listed are left as they are.
    pub(crate) fn install_buckets(&mut self, buckets: impl IntoIterator<Item = (u32, B)>) {
        for (key, bucket) in buckets {
            if bucket.is_empty() {
                self.buckets.remove(&key);
                self.bucket_index.remove(key);
            } else {
                self.bucket_index.add(key);
                self.buckets.insert(key, bucket);
            }
        }
    }

    pub(crate) fn from_buckets(buckets: impl IntoIterator<Item = (u32, B)>) -> Self {
        let (buckets, bucket_index) = Self::collect_buckets(buckets);
        Bitmap64 {
            buckets,
            bucket_index,
        }
    }

    fn collect_buckets(buckets: impl IntoIterator<Item = (u32, B)>) -> (IntHashMap<u32, B>, B) {
        let mut map = IntHashMap::default();
        let mut index = B::create();
        for (key, bucket) in buckets {
            if !bucket.is_empty() {
                index.add(key);
                map.insert(key, bucket);
            }
        }
        (map, index)
    }
}

/// Two sets are equal iff they hold the same values.
impl<B: Bitmap32> PartialEq for Bitmap64<B> {
    fn eq(&self, other: &Self) -> bool {
        self.bucket_index == other.bucket_index && self.buckets == other.buckets
    }
}

impl<B: Bitmap32> Eq for Bitmap64<B> {}

impl<B: Bitmap32> FromIterator<u64> for Bitmap64<B> {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        let mut set = Bitmap64::default();
        set.extend(iter);
        set
    }
}

impl<B: Bitmap32> Extend<u64> for Bitmap64<B> {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

/// Summary statistics for a Bitmap64 and its bucket layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitmap64Stats {
    /// Number of non-empty buckets.
    pub bucket_count: usize,
    /// Total number of values.
    pub cardinality: u64,
    /// Size of the smallest bucket, 0 for an empty set.
    pub min_bucket_cardinality: u64,
    /// Size of the largest bucket, 0 for an empty set.
    pub max_bucket_cardinality: u64,
}
