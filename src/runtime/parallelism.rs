//! Thread and chunking configuration for CPU kernels

/// Minimum number of lanes handed to one rayon task when no chunk size is set
pub(crate) const DEFAULT_MIN_LANES_PER_TASK: usize = 64;

/// Parallelism settings applied to a client with `with_parallelism`
///
/// - `num_threads`: size of a dedicated thread pool. `None` runs on the
///   global rayon pool.
/// - `chunk_size`: minimum number of independent lanes per parallel task.
///   `None` uses a built-in default.
///
/// # Example
///
/// ```
/// use topkr::prelude::*;
///
/// let device = CpuDevice::new();
/// let client = CpuRuntime::default_client(&device)
///     .with_parallelism(ParallelismConfig::new(Some(2), Some(16)));
/// assert_eq!(client.parallelism().num_threads(), Some(2));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParallelismConfig {
    num_threads: Option<usize>,
    chunk_size: Option<usize>,
}

impl ParallelismConfig {
    /// Create a configuration
    ///
    /// Zero values are treated as unset.
    pub fn new(num_threads: Option<usize>, chunk_size: Option<usize>) -> Self {
        Self {
            num_threads: num_threads.filter(|&n| n > 0),
            chunk_size: chunk_size.filter(|&n| n > 0),
        }
    }

    /// Run everything on the calling thread
    pub fn single_threaded() -> Self {
        Self::new(Some(1), None)
    }

    /// Requested thread count, if any
    #[inline]
    pub fn num_threads(&self) -> Option<usize> {
        self.num_threads
    }

    /// Requested minimum lanes per task, if any
    #[inline]
    pub fn chunk_size(&self) -> Option<usize> {
        self.chunk_size
    }

    /// Effective minimum lanes per task
    #[inline]
    pub fn min_len(&self) -> usize {
        self.chunk_size.unwrap_or(DEFAULT_MIN_LANES_PER_TASK)
    }
}
