//! Worker pool sizing.
//!
//! Every clustering pass runs on its own fixed-size rayon pool that is built,
//! used, and dropped before the pass returns.

use rayon::{ThreadPool, ThreadPoolBuilder};

/// Total worker budget: the configured count, or detected hardware concurrency.
pub(crate) fn total_threads(configured: Option<usize>) -> usize {
    configured
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
        .max(1)
}

/// Half the budget, at least one. Used by the grid path and by each sweep pass.
#[inline]
pub(crate) fn half_threads(configured: Option<usize>) -> usize {
    (total_threads(configured) / 2).max(1)
}

/// A fixed set of worker threads owned by one clustering pass.
///
/// If the OS refuses to spawn the pool, work runs on the calling thread with
/// the same partitioning; results are identical, only slower.
pub(crate) struct WorkerPool {
    pool: Option<ThreadPool>,
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize, name: &'static str) -> Self {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(move |i| format!("{name}-{i}"))
            .build();
        match pool {
            Ok(pool) => Self {
                pool: Some(pool),
                workers,
            },
            Err(err) => {
                log::warn!("could not start {} {} workers ({}); running inline", workers, name, err);
                Self { pool: None, workers }
            }
        }
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `op` with this pool as the rayon context for nested parallel iterators.
    pub fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    /// Run `work(worker_id, workers)` once per worker and wait for all of them.
    pub fn broadcast<F>(&self, work: F)
    where
        F: Fn(usize, usize) + Sync,
    {
        match &self.pool {
            Some(pool) => {
                pool.broadcast(|ctx| work(ctx.index(), ctx.num_threads()));
            }
            None => {
                for id in 0..self.workers {
                    work(id, self.workers);
                }
            }
        }
    }
}

/// Contiguous `[start, end)` share of `0..len` for worker `id` of `workers`.
///
/// The first `len % workers` workers take one extra element, so the ranges
/// tile `0..len` exactly.
#[inline]
pub(crate) fn contiguous_range(len: usize, id: usize, workers: usize) -> (usize, usize) {
    let base = len / workers;
    let extra = len % workers;
    let start = id * base + id.min(extra);
    let end = start + base + usize::from(id < extra);
    (start, end)
}
