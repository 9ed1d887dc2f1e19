//! Fixed-size worker pool that executes batches of independent tasks and blocks the
//! caller until the whole batch resolves.

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::{Arc, OnceLock},
};

use bitmap64_common::{Result, error::Error};
use rayon::prelude::*;

use crate::config::TaskPoolConfig;

static GLOBAL_POOL: OnceLock<Arc<TaskPool>> = OnceLock::new();

/// Fixed-size worker pool for data-parallel batches.
///
/// A `TaskPool` is an explicitly passed execution context: callers size it for their
/// own concurrency budget and hand it to every operation that fans work out. Pools are
/// independent of each other, so tests and embedding applications can isolate their
/// workloads. A lazily created process-wide pool is available via [`TaskPool::global`].
///
/// Every batch is synchronous: [`try_map`](Self::try_map) returns only after all of its
/// tasks have finished, and either yields every result or a single error.
pub struct TaskPool {
    /// The underlying thread pool that executes the tasks.
    thread_pool: rayon::ThreadPool,
    /// Per-batch parallelism cap.
    max_degree: usize,
}

impl TaskPool {
    /// Builds a new pool from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the worker threads
    /// cannot be spawned.
    pub fn new(config: TaskPoolConfig) -> Result<TaskPool> {
        config.validate()?;
        let prefix = config.thread_name_prefix.clone();
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .thread_name(move |i| format!("{prefix}_{i}"))
            .build()?;
        log::debug!(
            "started task pool '{}' with {} threads",
            config.thread_name_prefix,
            config.num_threads
        );
        Ok(TaskPool {
            thread_pool,
            max_degree: config.max_degree.unwrap_or(usize::MAX),
        })
    }

    /// Builds a pool with `num_threads` workers and default settings otherwise.
    pub fn with_threads(num_threads: usize) -> Result<TaskPool> {
        Self::new(TaskPoolConfig::with_threads(num_threads))
    }

    /// Returns the process-wide shared pool.
    ///
    /// The pool is lazily initialized on first call with [`TaskPoolConfig::default`],
    /// unless [`init_global`](Self::init_global) configured it earlier.
    pub fn global() -> Arc<TaskPool> {
        GLOBAL_POOL
            .get_or_init(|| {
                Arc::new(TaskPool::new(TaskPoolConfig::default()).expect("global task pool"))
            })
            .clone()
    }

    /// Configures the process-wide shared pool. Must be called before the first call
    /// to [`global`](Self::global).
    ///
    /// # Errors
    ///
    /// Returns an error if the global pool already exists or cannot be built.
    pub fn init_global(config: TaskPoolConfig) -> Result<Arc<TaskPool>> {
        let pool = Arc::new(TaskPool::new(config)?);
        GLOBAL_POOL
            .set(pool.clone())
            .map_err(|_| Error::invalid_operation("global task pool is already initialized"))?;
        Ok(pool)
    }

    /// Number of worker threads in this pool.
    pub fn thread_count(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    /// Upper bound on the number of workers a single batch may occupy.
    pub fn max_degree(&self) -> usize {
        self.max_degree.min(self.thread_count())
    }

    /// Applies `f` to every item, in parallel, and collects the results in input order.
    ///
    /// The calling thread blocks until every task has finished. Batches of at most one
    /// item, or pools restricted to a degree of one, run sequentially on the calling
    /// thread.
    ///
    /// # Arguments
    ///
    /// * `operation` - Name of the operation submitting the batch, used in errors.
    /// * `items` - The inputs, one task per item.
    /// * `f` - The task body. It must not rely on the order in which items are processed.
    ///
    /// # Errors
    ///
    /// If any task returns an error or panics, the whole batch fails with a single
    /// `ConcurrentTaskFailure` error and no partial results are returned.
    pub fn try_map<T, R, F>(&self, operation: &str, items: Vec<T>, f: F) -> Result<Vec<R>>
    where
        T: Send,
        R: Send,
        F: Fn(T) -> Result<R> + Send + Sync,
    {
        let max_degree = self.max_degree();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            if items.len() <= 1 || max_degree <= 1 {
                items.into_iter().map(&f).collect::<Result<Vec<_>>>()
            } else {
                let min_len = items.len().div_ceil(max_degree);
                self.thread_pool.install(|| {
                    items
                        .into_par_iter()
                        .with_min_len(min_len)
                        .map(&f)
                        .collect::<Result<Vec<_>>>()
                })
            }
        }));

        match outcome {
            Ok(Ok(results)) => Ok(results),
            Ok(Err(e)) if e.is_task_failure() => Err(e),
            Ok(Err(e)) => Err(Error::task_failure_from(operation, e)),
            Err(payload) => Err(Error::task_failure(operation, panic_message(&*payload))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}
