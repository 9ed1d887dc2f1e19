use bitmap64_common::{Result, verify_arg};

/// Default prefix of the worker thread names.
const DEFAULT_THREAD_NAME_PREFIX: &str = "bitmap64_worker";

/// Worker count used when the available parallelism cannot be queried.
const FALLBACK_NUM_THREADS: usize = 4;

/// Configuration of a [`TaskPool`](crate::task_pool::TaskPool).
///
/// The pool size is fixed once the pool is built; batches submitted to the pool
/// never grow or shrink it.
#[derive(Debug, Clone)]
pub struct TaskPoolConfig {
    /// Number of worker threads.
    pub num_threads: usize,

    /// Worker thread names are `{thread_name_prefix}_{index}`.
    pub thread_name_prefix: String,

    /// Upper bound on the number of workers a single batch may occupy.
    /// `None` allows the whole pool, `Some(1)` forces sequential execution
    /// on the calling thread.
    pub max_degree: Option<usize>,
}

impl Default for TaskPoolConfig {
    fn default() -> Self {
        TaskPoolConfig {
            num_threads: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(FALLBACK_NUM_THREADS),
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
            max_degree: None,
        }
    }
}

impl TaskPoolConfig {
    /// Creates a configuration for a pool with exactly `num_threads` workers.
    pub fn with_threads(num_threads: usize) -> Self {
        TaskPoolConfig {
            num_threads,
            ..Default::default()
        }
    }

    /// Sets the worker thread name prefix.
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Caps the number of workers a single batch may occupy.
    pub fn max_degree(mut self, max_degree: usize) -> Self {
        self.max_degree = Some(max_degree);
        self
    }

    /// Checks the configuration before a pool is built from it.
    pub fn validate(&self) -> Result<()> {
        verify_arg!(num_threads, self.num_threads > 0);
        verify_arg!(
            max_degree,
            self.max_degree.map(|degree| degree > 0).unwrap_or(true)
        );
        Ok(())
    }
}
