//! Bounded worker pools for conversion tasks.
//!
//! The [`WorkerPool`] trait is the seam between the directory walker and the
//! scheduling policy: [`BoundedPool`] runs tasks on blocking threads with a
//! concurrency cap, [`InlinePool`] runs them synchronously inside `submit`.

mod bounded;
mod inline;
mod traits;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use bounded::BoundedPool;
pub use inline::InlinePool;
pub use traits::{Task, WorkerPool};

/// Default number of parallel workers.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Errors returned when submitting work.
#[derive(Debug, Error)]
pub enum PoolError {
    /// `shutdown_and_wait` was already called.
    #[error("Worker pool is shut down")]
    Closed,

    /// The pool needs a Tokio runtime to schedule tasks.
    #[error("No Tokio runtime available to run tasks")]
    NoRuntime,
}

/// Snapshot of a pool's counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Tasks currently executing.
    pub active: usize,
    /// Tasks submitted but waiting for a worker.
    pub queued: usize,
    /// Tasks that ran to completion.
    pub completed: u64,
    /// Tasks that panicked.
    pub panicked: u64,
    /// Concurrency cap.
    pub max_concurrent: usize,
}
