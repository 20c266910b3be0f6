//! Fixed-size worker pool shared by every storm and phase.

use std::ops::Range;
use std::sync::Barrier;

use crate::error::SimulationError;

/// One participant of a pool broadcast.
///
/// Every worker of a broadcast must reach each [`Worker::wait`] call the same
/// number of times, even when its share of a range is empty.
pub struct Worker<'a> {
    index: usize,
    count: usize,
    barrier: &'a Barrier,
}

impl Worker<'_> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// This worker's contiguous share of `range`.
    pub fn share(&self, range: Range<usize>) -> Range<usize> {
        partition(range, self.index, self.count)
    }

    /// Blocks until every worker of the broadcast has arrived.
    pub fn wait(&self) {
        self.barrier.wait();
    }
}

/// Splits `range` into `workers` contiguous, disjoint shares and returns share `index`.
///
/// The first `len % workers` shares are one cell longer.
pub fn partition(range: Range<usize>, index: usize, workers: usize) -> Range<usize> {
    debug_assert!(index < workers);
    let len = range.end.saturating_sub(range.start);
    let base = len / workers;
    let extra = len % workers;
    let start = range.start + index * base + index.min(extra);
    let end = start + base + usize::from(index < extra);
    start..end
}

pub struct WorkerPool {
    workers: usize,
    // None for a single worker: everything runs on the caller.
    pool: Option<rayon::ThreadPool>,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self, SimulationError> {
        let pool = if workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("storm-worker-{}", i))
                .build()
                .map_err(|e| SimulationError::WorkerPool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };
        Ok(Self { workers, pool })
    }

    /// Runs `job` once on every pool thread and waits for all of them.
    pub fn broadcast<F>(&self, job: F)
    where
        F: Fn(Worker<'_>) + Sync,
    {
        match &self.pool {
            Some(pool) => {
                let barrier = Barrier::new(self.workers);
                pool.broadcast(|ctx| {
                    job(Worker {
                        index: ctx.index(),
                        count: ctx.num_threads(),
                        barrier: &barrier,
                    })
                });
            }
            None => Self::run_inline(job),
        }
    }

    /// Runs `job` on the calling thread as the only worker of a full-range share.
    pub fn run_inline<F>(job: F)
    where
        F: Fn(Worker<'_>),
    {
        let barrier = Barrier::new(1);
        job(Worker {
            index: 0,
            count: 1,
            barrier: &barrier,
        });
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers)
            .finish()
    }
}
