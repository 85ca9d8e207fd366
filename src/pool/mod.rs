//! Worker pools that execute skill work.
//!
//! A skill never runs its work on the caller's thread: `use_skill` hands a
//! [`Job`] to the pool it was constructed with and returns immediately. The
//! pool is injected into every skill instead of being looked up globally, so
//! one process can run several pools and tests can substitute a
//! [`ManualWorkerPool`] that only runs jobs when asked.

pub mod manual;
pub mod tokio_pool;

use std::fmt;

pub use manual::ManualWorkerPool;
pub use tokio_pool::TokioWorkerPool;

/// A unit of work submitted to a pool.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Facility that runs skill work off the caller's thread.
///
/// Implementations must not block in [`submit`](Self::submit) and may run
/// jobs on any thread, in any order relative to other skills' jobs.
pub trait WorkerPool: Send + Sync + fmt::Debug {
    /// Schedule `job` for execution.
    fn submit(&self, job: Job);

    /// Short name used in logs.
    fn name(&self) -> &str;
}
