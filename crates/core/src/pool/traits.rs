//! Trait definitions for the pool module.

use async_trait::async_trait;

use super::PoolError;

/// A unit of work. Tasks report their results through whatever they capture.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Schedules tasks with some concurrency policy.
#[async_trait]
pub trait WorkerPool: Send + Sync {
    /// Returns the name of this pool implementation.
    fn name(&self) -> &str;

    /// Enqueues a task. Never blocks on the task itself.
    fn submit(&self, task: Task) -> Result<(), PoolError>;

    /// Stops accepting tasks and waits until every task submitted before
    /// this call has finished. Completion order is unspecified.
    async fn shutdown_and_wait(&self);
}
