//! Workflow execution utilities for the bitmap64 crates.
//!
//! # Key Components
//!
//! - [`task_pool::TaskPool`] - A fixed-size worker pool, passed explicitly to every
//!   operation that fans work out, with a lazily created process-wide default
//! - [`config::TaskPoolConfig`] - Pool size, worker naming and per-batch parallelism cap
//!
//! Batches submitted to a pool are synchronous: the caller blocks until every task has
//! resolved, and a failing or panicking task fails the whole batch with a single error.

pub mod config;
pub mod task_pool;

pub use config::TaskPoolConfig;
pub use task_pool::TaskPool;
