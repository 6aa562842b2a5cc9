//! Synchronous pool that runs each task inside `submit`.

use async_trait::async_trait;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use super::traits::{Task, WorkerPool};
use super::{PoolError, PoolStatus};

/// Executes tasks immediately on the calling thread.
///
/// Useful in tests and for callers that want deterministic, sequential
/// conversion. `shutdown_and_wait` has nothing to wait for.
#[derive(Debug, Default)]
pub struct InlinePool {
    closed: AtomicBool,
    completed: AtomicU64,
    panicked: AtomicU64,
}

impl InlinePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current counters.
    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            active: 0,
            queued: 0,
            completed: self.completed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            max_concurrent: 1,
        }
    }
}

#[async_trait]
impl WorkerPool for InlinePool {
    fn name(&self) -> &str {
        "inline"
    }

    fn submit(&self, task: Task) -> Result<(), PoolError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PoolError::Closed);
        }

        match catch_unwind(AssertUnwindSafe(task)) {
            Ok(()) => {
                self.completed.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.panicked.fetch_add(1, Ordering::Relaxed);
                tracing::error!("Inline task panicked");
            }
        }
        Ok(())
    }

    async fn shutdown_and_wait(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn test_runs_task_during_submit() {
        let pool = InlinePool::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let inner = Arc::clone(&counter);
        pool.submit(Box::new(move || {
            inner.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(pool.status().completed, 1);
    }

    #[test]
    fn test_shutdown_closes_pool() {
        let pool = InlinePool::new();
        tokio_test::block_on(pool.shutdown_and_wait());

        assert!(matches!(pool.submit(Box::new(|| {})), Err(PoolError::Closed)));
    }

    #[test]
    fn test_panic_is_contained() {
        let pool = InlinePool::new();
        pool.submit(Box::new(|| panic!("boom"))).unwrap();
        assert_eq!(pool.status().panicked, 1);
    }
}
