//! A pool that runs jobs only when told to.

use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;

use super::{Job, WorkerPool};

/// Holds submitted jobs until [`run_next`](Self::run_next) or
/// [`run_pending`](Self::run_pending) is called on the current thread.
///
/// Useful for driving the request/completion protocol step by step.
#[derive(Default)]
pub struct ManualWorkerPool {
    jobs: Mutex<VecDeque<Job>>,
}

impl fmt::Debug for ManualWorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualWorkerPool")
            .field("pending", &self.pending())
            .finish()
    }
}

impl ManualWorkerPool {
    /// An idle pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Jobs waiting to run.
    pub fn pending(&self) -> usize {
        self.jobs.lock().len()
    }

    /// Run the oldest job. Returns `false` if there was none.
    pub fn run_next(&self) -> bool {
        // Lock released before running: jobs may submit more jobs.
        let job = self.jobs.lock().pop_front();
        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Run jobs until none are left, including jobs submitted while
    /// running. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }

    /// Drop every waiting job without running it.
    pub fn discard(&self) -> usize {
        let mut jobs = self.jobs.lock();
        let discarded = jobs.len();
        jobs.clear();
        discarded
    }
}

impl WorkerPool for ManualWorkerPool {
    fn submit(&self, job: Job) {
        self.jobs.lock().push_back(job);
    }

    fn name(&self) -> &str {
        "manual"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_jobs_wait_until_run() {
        let pool = ManualWorkerPool::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        pool.submit(Box::new(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(pool.pending(), 1);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(pool.run_next());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(!pool.run_next());
    }

    #[test]
    fn test_run_pending_follows_chained_jobs() {
        let pool = Arc::new(ManualWorkerPool::new());
        let order = Arc::new(Mutex::new(Vec::new()));

        let inner_pool = Arc::clone(&pool);
        let inner_order = Arc::clone(&order);
        pool.submit(Box::new(move || {
            inner_order.lock().push(1);
            let again = Arc::clone(&inner_order);
            inner_pool.submit(Box::new(move || again.lock().push(2)));
        }));

        assert_eq!(pool.run_pending(), 2);
        assert_eq!(*order.lock(), vec![1, 2]);
    }

    #[test]
    fn test_discard() {
        let pool = ManualWorkerPool::new();
        pool.submit(Box::new(|| panic!("discarded job ran")));
        assert_eq!(pool.discard(), 1);
        assert_eq!(pool.run_pending(), 0);
    }
}
