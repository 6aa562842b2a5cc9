//! Directory walking and batch dispatch.
//!
//! [`DirectoryWalker`] enumerates a directory tree on a blocking thread,
//! filters files by source format and submits one conversion per eligible
//! file to a [`WorkerPool`](crate::pool::WorkerPool). Per-file failures end
//! up in the [`WalkReport`]; only problems with the root itself are fatal.

mod directory;
mod error;
mod types;

pub use directory::DirectoryWalker;
pub use error::WalkError;
pub use types::{FileOutcome, WalkOptions, WalkReport};
