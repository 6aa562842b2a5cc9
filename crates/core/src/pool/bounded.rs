//! Semaphore-bounded pool on top of Tokio's blocking thread pool.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::traits::{Task, WorkerPool};
use super::{PoolError, PoolStatus, DEFAULT_MAX_CONCURRENCY};

/// Tracks statistics for the pool.
#[derive(Default)]
struct PoolStats {
    active: AtomicU64,
    queued: AtomicU64,
    completed: AtomicU64,
    panicked: AtomicU64,
}

/// Runs at most `max_concurrency` tasks at a time on blocking threads.
///
/// `submit` must be called from within a Tokio runtime. Dropping the pool
/// without calling [`shutdown_and_wait`](WorkerPool::shutdown_and_wait)
/// abandons queued tasks; tasks already running finish in the background.
pub struct BoundedPool {
    max_concurrent: usize,
    semaphore: Arc<Semaphore>,
    // `None` once shut down.
    tasks: Mutex<Option<JoinSet<()>>>,
    stats: Arc<PoolStats>,
}

impl Default for BoundedPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENCY)
    }
}

impl BoundedPool {
    /// Creates a new pool. A concurrency of 0 is treated as 1.
    pub fn new(max_concurrency: usize) -> Self {
        let max_concurrent = max_concurrency.max(1);
        Self {
            max_concurrent,
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            tasks: Mutex::new(Some(JoinSet::new())),
            stats: Arc::new(PoolStats::default()),
        }
    }

    /// Returns the current counters.
    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            active: self.stats.active.load(Ordering::Relaxed) as usize,
            queued: self.stats.queued.load(Ordering::Relaxed) as usize,
            completed: self.stats.completed.load(Ordering::Relaxed),
            panicked: self.stats.panicked.load(Ordering::Relaxed),
            max_concurrent: self.max_concurrent,
        }
    }
}

#[async_trait]
impl WorkerPool for BoundedPool {
    fn name(&self) -> &str {
        "bounded"
    }

    fn submit(&self, task: Task) -> Result<(), PoolError> {
        let handle = Handle::try_current().map_err(|_| PoolError::NoRuntime)?;
        let mut guard = self.tasks.lock();
        let tasks = guard.as_mut().ok_or(PoolError::Closed)?;

        let semaphore = Arc::clone(&self.semaphore);
        let stats = Arc::clone(&self.stats);
        stats.queued.fetch_add(1, Ordering::Relaxed);

        tasks.spawn_on(
            async move {
                // The semaphore is never closed, so acquiring cannot fail.
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                stats.queued.fetch_sub(1, Ordering::Relaxed);
                stats.active.fetch_add(1, Ordering::Relaxed);

                let result = tokio::task::spawn_blocking(task).await;

                stats.active.fetch_sub(1, Ordering::Relaxed);
                match result {
                    Ok(()) => {
                        stats.completed.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => {
                        stats.panicked.fetch_add(1, Ordering::Relaxed);
                        tracing::error!(error = %e, "Worker task panicked");
                    }
                }
            },
            &handle,
        );
        Ok(())
    }

    async fn shutdown_and_wait(&self) {
        let tasks = self.tasks.lock().take();
        let Some(mut tasks) = tasks else {
            return;
        };

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::warn!(error = %e, "Worker task did not finish");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_runs_all_tasks() {
        let pool = BoundedPool::new(3);
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..20 {
            let counter = Arc::clone(&counter);
            pool.submit(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        }
        pool.shutdown_and_wait().await;

        assert_eq!(counter.load(Ordering::SeqCst), 20);
        let status = pool.status();
        assert_eq!(status.completed, 20);
        assert_eq!(status.active, 0);
        assert_eq!(status.queued, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_never_exceeds_max_concurrency() {
        let pool = BoundedPool::new(2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        for _ in 0..10 {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            pool.submit(Box::new(move || {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(20));
                running.fetch_sub(1, Ordering::SeqCst);
            }))
            .unwrap();
        }
        pool.shutdown_and_wait().await;

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_submit_after_shutdown_is_rejected() {
        let pool = BoundedPool::default();
        pool.shutdown_and_wait().await;

        let result = pool.submit(Box::new(|| {}));
        assert!(matches!(result, Err(PoolError::Closed)));
    }

    #[tokio::test]
    async fn test_panicking_task_is_contained() {
        let pool = BoundedPool::new(1);
        let counter = Arc::new(AtomicUsize::new(0));

        pool.submit(Box::new(|| panic!("boom"))).unwrap();
        let after = Arc::clone(&counter);
        pool.submit(Box::new(move || {
            after.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();
        pool.shutdown_and_wait().await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(pool.status().panicked, 1);
        assert_eq!(pool.status().completed, 1);
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        assert_eq!(BoundedPool::new(0).status().max_concurrent, 1);
    }

    #[test]
    fn test_submit_without_runtime() {
        let pool = BoundedPool::new(1);
        let result = pool.submit(Box::new(|| {}));
        assert!(matches!(result, Err(PoolError::NoRuntime)));
    }
}
