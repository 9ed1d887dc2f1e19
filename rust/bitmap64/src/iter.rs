//! Ordered enumeration of a [`Bitmap64`].

use std::{fmt, iter::FusedIterator};

use crate::{bitmap32::Bitmap32, bitmap64::Bitmap64, partition::compose};

impl<B: Bitmap32> Bitmap64<B> {
    /// Returns an iterator over all values in ascending unsigned order.
    ///
    /// Bucket keys are taken from the summary index, whose iterator is sorted; within
    /// a bucket the container yields its members in ascending order. Each call starts
    /// a fresh traversal.
    pub fn iter(&self) -> Iter<'_, B> {
        Iter {
            bitmap: self,
            keys: self.bucket_index.iter(),
            current: None,
            remaining: self.cardinality(),
        }
    }

    /// All values in ascending order. The length equals [`cardinality`](Self::cardinality).
    pub fn to_vec(&self) -> Vec<u64> {
        let mut values = Vec::with_capacity(usize::try_from(self.cardinality()).unwrap_or(0));
        values.extend(self.iter());
        values
    }
}

/// Iterator over the values of a [`Bitmap64`], in ascending order.
pub struct Iter<'a, B: Bitmap32 + 'a> {
    bitmap: &'a Bitmap64<B>,
    keys: B::Iter<'a>,
    current: Option<(u32, B::Iter<'a>)>,
    remaining: u64,
}

impl<'a, B: Bitmap32 + 'a> Iterator for Iter<'a, B> {
    type Item = u64;

    #[inline]
    fn next(&mut self) -> Option<u64> {
        loop {
            if let Some((high, lows)) = &mut self.current {
                if let Some(low) = lows.next() {
                    self.remaining = self.remaining.saturating_sub(1);
                    return Some(compose(*high, low));
                }
                self.current = None;
            }

            let high = self.keys.next()?;
            self.current = self
                .bitmap
                .buckets
                .get(&high)
                .map(|bucket| (high, bucket.iter()));
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl<'a, B: Bitmap32 + 'a> ExactSizeIterator for Iter<'a, B> {}

impl<'a, B: Bitmap32 + 'a> FusedIterator for Iter<'a, B> where B::Iter<'a>: FusedIterator {}

impl<'a, B: Bitmap32 + 'a> IntoIterator for &'a Bitmap64<B> {
    type Item = u64;
    type IntoIter = Iter<'a, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Formats the set as `{v1,v2,...}` in ascending order, `{}` when empty.
impl<B: Bitmap32> fmt::Display for Bitmap64<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("}")
    }
}

impl<B: Bitmap32> fmt::Debug for Bitmap64<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
