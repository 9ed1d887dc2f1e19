//! Sets of arbitrary u64 values built from 32-bit compressed bitmaps.
//!
//! A [`Bitmap64`] shards its values by their upper 32 bits into buckets of 32-bit
//! containers and keeps a summary index of the populated buckets. Intersection, union
//! and difference combine the summary indexes to pick the affected buckets and then
//! process those buckets in parallel on a caller-supplied [`TaskPool`].
//!
//! ```
//! use bitmap64::{Bitmap64, TaskPool};
//!
//! let pool = TaskPool::with_threads(2).unwrap();
//! let mut a = Bitmap64::from_values([1, 1 << 40, u64::MAX]);
//! let b = Bitmap64::from_values([1 << 40, 7]);
//! a.or(&b, &pool).unwrap();
//! assert_eq!(a.to_vec(), vec![1, 7, 1 << 40, u64::MAX]);
//! ```

pub mod bitmap32;
pub mod bitmap64;
pub mod iter;
pub mod partition;
pub mod set_ops;
#[cfg(test)]
mod tests;

pub use bitmap32::Bitmap32;
pub use bitmap64::{Bitmap64, Bitmap64Stats};
pub use bitmap64_common::{Result, error::Error, error::ErrorKind};
pub use bitmap64_workflow::{TaskPool, TaskPoolConfig};
