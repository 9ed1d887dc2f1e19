//! The 32-bit container seam.
//!
//! A [`Bitmap64`](crate::Bitmap64) stores its members as a two-level structure whose
//! leaves are compressed sets of `u32`. The container itself (its encoding, container
//! selection and the set-algebra kernels) lives outside this crate; `Bitmap32` is the
//! narrow contract the 64-bit layer relies on. The default container is
//! [`roaring::RoaringBitmap`].

use roaring::RoaringBitmap;

/// A set of `u32` values that can serve as a bucket or as the summary index of a
/// [`Bitmap64`](crate::Bitmap64).
///
/// Implementations must iterate in ascending order and must never report an empty set
/// as non-empty.
pub trait Bitmap32: Clone + Default + PartialEq + Send + Sync {
    /// Ascending iterator over the members.
    type Iter<'a>: Iterator<Item = u32>
    where
        Self: 'a;

    /// Creates an empty container.
    fn create() -> Self {
        Self::default()
    }

    /// Inserts `value`. Returns `true` if it was not already present.
    fn add(&mut self, value: u32) -> bool;

    /// Removes `value`. Returns `true` if it was present.
    fn remove(&mut self, value: u32) -> bool;

    fn contains(&self, value: u32) -> bool;

    /// Intersection of `a` and `b`, as a new container.
    fn and(a: &Self, b: &Self) -> Self;

    /// Union of `a` and `b`, as a new container.
    fn or(a: &Self, b: &Self) -> Self;

    /// Members of `a` that are not in `b`, as a new container.
    fn and_not(a: &Self, b: &Self) -> Self;

    fn is_empty(&self) -> bool;

    /// Number of members.
    fn cardinality(&self) -> u64;

    fn min(&self) -> Option<u32>;

    fn max(&self) -> Option<u32>;

    fn iter(&self) -> Self::Iter<'_>;

    /// Members in ascending order.
    fn to_vec(&self) -> Vec<u32> {
        self.iter().collect()
    }
}

impl Bitmap32 for RoaringBitmap {
    type Iter<'a> = roaring::bitmap::Iter<'a>;

    #[inline]
    fn add(&mut self, value: u32) -> bool {
        self.insert(value)
    }

    #[inline]
    fn remove(&mut self, value: u32) -> bool {
        RoaringBitmap::remove(self, value)
    }

    #[inline]
    fn contains(&self, value: u32) -> bool {
        RoaringBitmap::contains(self, value)
    }

    fn and(a: &Self, b: &Self) -> Self {
        a & b
    }

    fn or(a: &Self, b: &Self) -> Self {
        a | b
    }

    fn and_not(a: &Self, b: &Self) -> Self {
        a - b
    }

    #[inline]
    fn is_empty(&self) -> bool {
        RoaringBitmap::is_empty(self)
    }

    #[inline]
    fn cardinality(&self) -> u64 {
        self.len()
    }

    fn min(&self) -> Option<u32> {
        RoaringBitmap::min(self)
    }

    fn max(&self) -> Option<u32> {
        RoaringBitmap::max(self)
    }

    fn iter(&self) -> Self::Iter<'_> {
        RoaringBitmap::iter(self)
    }
}
