use log::debug;
use rayon::{Scope, ThreadPool, ThreadPoolBuilder};

use crate::core::constants::pool;
use crate::core::error::Result;

/// Computes how wide the worker pool should be for a batch.
///
/// A batch of `n > 0` files gets `n * workers_per_file` workers, an empty
/// batch gets `min_width`. The result never drops below `min_width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSizing {
    workers_per_file: usize,
    min_width: usize,
}

impl Default for PoolSizing {
    fn default() -> Self {
        Self::new(pool::WORKERS_PER_FILE, pool::MIN_POOL_WIDTH)
    }
}

impl PoolSizing {
    pub fn new(workers_per_file: usize, min_width: usize) -> Self {
        Self {
            workers_per_file,
            min_width: min_width.max(1),
        }
    }

    pub fn width_for(&self, file_count: usize) -> usize {
        if file_count > 0 {
            file_count
                .saturating_mul(self.workers_per_file)
                .max(self.min_width)
        } else {
            self.min_width
        }
    }
}

/// Fixed-width pool shared by every file and line of one batch.
pub struct WorkerPool {
    pool: ThreadPool,
    width: usize,
}

impl WorkerPool {
    pub fn new(width: usize) -> Result<Self> {
        let width = width.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(width)
            .thread_name(|i| format!("urlsweep-worker-{i}"))
            .build()?;
        debug!("Started worker pool with {width} threads");

        Ok(Self { pool, width })
    }

    /// Build a pool sized for `file_count` files.
    pub fn for_batch(sizing: &PoolSizing, file_count: usize) -> Result<Self> {
        Self::new(sizing.width_for(file_count))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Run `op` on the calling thread with a scope whose spawns run on the pool.
    ///
    /// Returns once every task spawned in the scope has finished. The caller
    /// blocks without stealing work, so it should not be a pool worker.
    pub fn in_place_scope<'scope, OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce(&Scope<'scope>) -> R,
    {
        self.pool.in_place_scope(op)
    }
}
