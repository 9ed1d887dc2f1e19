//! Set algebra (AND, OR, ANDNOT) over two [`Bitmap64`] instances.
//!
//! Each operation works in three phases:
//! 1. Select the candidate bucket keys by combining the summary indexes (or, for
//!    ANDNOT, by taking the receiver's own keys).
//! 2. Compute the new content of every candidate bucket as an independent task on the
//!    supplied [`TaskPool`]. Tasks only read the receiver and the operand and produce
//!    fresh containers; nothing shared is written while the batch runs.
//! 3. Once the whole batch has succeeded, swap the results into the receiver and bring
//!    the summary index up to date.
//!
//! Because the receiver is only written in phase 3, a failing task leaves it exactly as
//! it was before the call, for all three operations.

use bitmap64_common::{Result, error::Error};
use bitmap64_workflow::TaskPool;

use crate::{bitmap32::Bitmap32, bitmap64::Bitmap64};

const AND: &str = "AND";
const OR: &str = "OR";
const AND_NOT: &str = "ANDNOT";

impl<B: Bitmap32> Bitmap64<B> {
    /// In-place intersection. The receiver keeps only the values also present in
    /// `other`; `other` is not modified.
    ///
    /// Blocks until all bucket tasks have completed.
    ///
    /// # Errors
    ///
    /// Returns a `ConcurrentTaskFailure` error if a bucket task fails. The receiver is
    /// left unchanged in that case.
    pub fn and(&mut self, other: &Bitmap64<B>, pool: &TaskPool) -> Result<()> {
        let buckets = self.and_buckets(other, pool)?;
        self.replace_buckets(buckets);
        Ok(())
    }

    /// In-place union. The receiver gains every value of `other`; `other` is not
    /// modified.
    ///
    /// Blocks until all bucket tasks have completed.
    ///
    /// # Errors
    ///
    /// Returns a `ConcurrentTaskFailure` error if a bucket task fails. The receiver is
    /// left unchanged in that case.
    pub fn or(&mut self, other: &Bitmap64<B>, pool: &TaskPool) -> Result<()> {
        let keys = B::or(&self.bucket_index, &other.bucket_index);
        log::trace!("{OR}: {} candidate buckets", keys.cardinality());

        let merged = log_failure(
            OR,
            pool.try_map(OR, keys.to_vec(), |key| {
                match (self.buckets.get(&key), other.buckets.get(&key)) {
                    (Some(left), Some(right)) => Ok(Some((key, B::or(left, right)))),
                    (None, Some(right)) => Ok(Some((key, right.clone()))),
                    // Receiver-only buckets stay where they are.
                    (Some(_), None) => Ok(None),
                    (None, None) => Err(Error::invalid_operation(format!(
                        "bucket {key} is indexed but present in neither operand"
                    ))),
                }
            }),
        )?;

        self.bucket_index = keys;
        self.install_buckets(merged.into_iter().flatten());
        log::debug!("{OR}: {} buckets after merge", self.buckets.len());
        Ok(())
    }

    /// In-place difference. Removes from the receiver every value present in `other`;
    /// `other` is not modified.
    ///
    /// Only the receiver's buckets are visited. Buckets that share a key with `other`
    /// are recomputed into new containers and swapped in after the batch succeeds, so
    /// containers cloned from the receiver earlier never observe the update.
    ///
    /// # Errors
    ///
    /// Returns a `ConcurrentTaskFailure` error if a bucket task fails. The receiver is
    /// left unchanged in that case.
    pub fn and_not(&mut self, other: &Bitmap64<B>, pool: &TaskPool) -> Result<()> {
        let keys = self.bucket_index.to_vec();
        log::trace!("{AND_NOT}: {} candidate buckets", keys.len());

        let updated = log_failure(
            AND_NOT,
            pool.try_map(AND_NOT, keys, |key| {
                let Some(right) = other.buckets.get(&key) else {
                    return Ok(None);
                };
                let left = self.bucket(key)?;
                Ok(Some((key, B::and_not(left, right))))
            }),
        )?;

        self.install_buckets(updated.into_iter().flatten());
        log::debug!("{AND_NOT}: {} buckets left", self.buckets.len());
        Ok(())
    }

    /// Intersection as a new set; both inputs are left unchanged.
    pub fn intersection(&self, other: &Bitmap64<B>, pool: &TaskPool) -> Result<Bitmap64<B>> {
        Ok(Bitmap64::from_buckets(self.and_buckets(other, pool)?))
    }

    /// Union as a new set; both inputs are left unchanged.
    pub fn union(&self, other: &Bitmap64<B>, pool: &TaskPool) -> Result<Bitmap64<B>> {
        let mut result = self.clone();
        result.or(other, pool)?;
        Ok(result)
    }

    /// Difference (`self \ other`) as a new set; both inputs are left unchanged.
    pub fn difference(&self, other: &Bitmap64<B>, pool: &TaskPool) -> Result<Bitmap64<B>> {
        let mut result = self.clone();
        result.and_not(other, pool)?;
        Ok(result)
    }

    /// Computes the intersected buckets without touching the receiver. Empty results
    /// are kept here and dropped by the caller when the buckets are installed.
    fn and_buckets(&self, other: &Bitmap64<B>, pool: &TaskPool) -> Result<Vec<(u32, B)>> {
        let keys = B::and(&self.bucket_index, &other.bucket_index);
        log::trace!("{AND}: {} candidate buckets", keys.cardinality());

        let buckets = log_failure(
            AND,
            pool.try_map(AND, keys.to_vec(), |key| {
                Ok((key, B::and(self.bucket(key)?, other.bucket(key)?)))
            }),
        )?;
        log::debug!(
            "{AND}: {} of {} candidate buckets survived",
            buckets.iter().filter(|(_, b)| !b.is_empty()).count(),
            buckets.len()
        );
        Ok(buckets)
    }

    /// Looks up a bucket that the summary index claims to exist.
    fn bucket(&self, key: u32) -> Result<&B> {
        self.buckets.get(&key).ok_or_else(|| {
            Error::invalid_operation(format!("bucket {key} is indexed but missing"))
        })
    }
}

fn log_failure<T>(operation: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        log::error!("Unable to do {operation} operation: {e}");
    }
    result
}
