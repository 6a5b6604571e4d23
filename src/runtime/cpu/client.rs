//! CPU client implementation

use super::device::CpuDevice;
use super::runtime::CpuRuntime;
use crate::runtime::{ParallelismConfig, RuntimeClient};

#[cfg(feature = "rayon")]
use std::sync::Arc;

/// CPU client for operation dispatch
///
/// The client is the execution context of every CPU operation. It is cheap to
/// clone; clones share the same thread pool.
#[derive(Clone, Debug)]
pub struct CpuClient {
    pub(crate) device: CpuDevice,
    parallelism: ParallelismConfig,
    #[cfg(feature = "rayon")]
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl CpuClient {
    /// Create a new CPU client running on the global rayon pool
    pub fn new(device: CpuDevice) -> Self {
        Self {
            device,
            parallelism: ParallelismConfig::default(),
            #[cfg(feature = "rayon")]
            pool: None,
        }
    }

    /// Return a client using the given parallelism settings
    ///
    /// A requested thread count builds a dedicated pool. If the pool cannot be
    /// built, the client keeps running on the global pool.
    pub fn with_parallelism(self, config: ParallelismConfig) -> Self {
        #[cfg(feature = "rayon")]
        let pool = config.num_threads().and_then(|threads| {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("topkr-cpu-{i}"))
                .build()
            {
                Ok(pool) => Some(Arc::new(pool)),
                Err(err) => {
                    tracing::warn!(
                        threads,
                        error = %err,
                        "failed to build thread pool, using the global pool"
                    );
                    None
                }
            }
        });

        Self {
            device: self.device,
            parallelism: config,
            #[cfg(feature = "rayon")]
            pool,
        }
    }

    /// Current parallelism settings
    #[inline]
    pub fn parallelism(&self) -> &ParallelismConfig {
        &self.parallelism
    }

    /// Minimum number of lanes per rayon task
    #[inline]
    pub fn rayon_min_len(&self) -> usize {
        self.parallelism.min_len()
    }

    /// Whether kernels may split work across threads
    #[inline]
    pub fn is_parallel(&self) -> bool {
        cfg!(feature = "rayon") && self.parallelism.num_threads() != Some(1)
    }

    /// Run `f` inside the client's thread pool
    #[cfg(feature = "rayon")]
    pub fn install_parallelism<T, F>(&self, f: F) -> T
    where
        F: FnOnce() -> T + Send,
        T: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}

impl RuntimeClient<CpuRuntime> for CpuClient {
    fn device(&self) -> &CpuDevice {
        &self.device
    }

    fn synchronize(&self) {
        // CPU operations are synchronous, nothing to do
    }
}
