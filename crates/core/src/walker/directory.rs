//! Directory walker implementation.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::error::WalkError;
use super::types::{FileOutcome, WalkOptions, WalkReport};
use crate::converter::{ConversionEngine, ImageCodec, ImageRsCodec};
use crate::file::EXTENSION_SEPARATOR;
use crate::format::{format_for_extension, ImageFormat};
use crate::pool::{BoundedPool, WorkerPool};

/// Walks a directory tree and converts every eligible file.
pub struct DirectoryWalker<C: ImageCodec = ImageRsCodec> {
    engine: ConversionEngine<C>,
}

impl DirectoryWalker<ImageRsCodec> {
    /// Creates a walker backed by the `image` crate.
    pub fn with_defaults() -> Self {
        Self::new(ConversionEngine::with_defaults())
    }
}

/// Counters of the enumeration phase.
#[derive(Debug, Default)]
struct Enumerated {
    submitted: usize,
    skipped_entries: usize,
}

impl<C: ImageCodec + 'static> DirectoryWalker<C> {
    pub fn new(engine: ConversionEngine<C>) -> Self {
        Self { engine }
    }

    /// Returns the engine used for single conversions.
    pub fn engine(&self) -> &ConversionEngine<C> {
        &self.engine
    }

    /// Walks `root` on a fresh [`BoundedPool`] sized by
    /// `options.max_concurrency`.
    pub async fn run(&self, root: &Path, options: &WalkOptions) -> Result<WalkReport, WalkError> {
        let pool = Arc::new(BoundedPool::new(options.max_concurrency));
        self.walk_and_convert(root, options, pool).await
    }

    /// Enumerates `root` and submits one conversion per eligible file to
    /// `pool`, then shuts the pool down and collects the outcomes.
    ///
    /// Enumeration runs on a blocking thread, so conversions start while
    /// the tree is still being listed, on any runtime flavor. Per-file
    /// errors never abort the walk; only a missing, non-directory or
    /// unreadable root and a pool that refuses work are fatal. The pool is
    /// always drained before this returns.
    pub async fn walk_and_convert(
        &self,
        root: &Path,
        options: &WalkOptions,
        pool: Arc<dyn WorkerPool>,
    ) -> Result<WalkReport, WalkError> {
        let start = Instant::now();

        let metadata = match tokio::fs::metadata(root).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(WalkError::RootNotFound {
                    path: root.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(WalkError::RootUnreadable {
                    path: root.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };
        if !metadata.is_dir() {
            return Err(WalkError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        info!(
            root = %root.display(),
            source_format = ?options.source_format,
            target_format = %options.target_format,
            recursive = options.recursive,
            pool = pool.name(),
            "Starting directory conversion"
        );

        let (tx, mut rx) = mpsc::unbounded_channel::<FileOutcome>();
        let enumeration = {
            let root = root.to_path_buf();
            let options = *options;
            let engine = self.engine.clone();
            let pool = Arc::clone(&pool);
            tokio::task::spawn_blocking(move || {
                enumerate_and_submit(&root, &options, &engine, pool.as_ref(), tx)
            })
        };
        let enumerated = enumeration.await;

        // Drain before looking at the enumeration result, so no submitted
        // conversion outlives the walk.
        pool.shutdown_and_wait().await;

        let enumerated = match enumerated {
            Ok(Ok(enumerated)) => enumerated,
            Ok(Err(e)) => {
                warn!(root = %root.display(), error = %e, "Directory conversion aborted");
                return Err(e);
            }
            Err(e) => {
                return Err(WalkError::EnumerationAborted {
                    path: root.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        let mut outcomes = Vec::with_capacity(enumerated.submitted);
        while let Ok(outcome) = rx.try_recv() {
            if let Err(e) = &outcome.result {
                if e.is_skip() {
                    info!(path = %outcome.source.display(), "Skipping: {}", e);
                } else {
                    warn!(path = %outcome.source.display(), kind = e.kind(), "Conversion failed: {}", e);
                }
            }
            outcomes.push(outcome);
        }

        let report = WalkReport {
            outcomes,
            skipped_entries: enumerated.skipped_entries,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            root = %root.display(),
            submitted = enumerated.submitted,
            converted = report.success_count(),
            failed = report.failure_count() - report.skipped_count(),
            skipped = report.skipped_count(),
            unreadable = enumerated.skipped_entries,
            duration_ms = report.duration_ms,
            "Directory conversion finished"
        );

        Ok(report)
    }
}

/// Lists `root` and submits a conversion per eligible file. Runs on a
/// blocking thread; returns at the first fatal error.
fn enumerate_and_submit<C: ImageCodec + 'static>(
    root: &Path,
    options: &WalkOptions,
    engine: &ConversionEngine<C>,
    pool: &dyn WorkerPool,
    tx: UnboundedSender<FileOutcome>,
) -> Result<Enumerated, WalkError> {
    // Sorting makes walkdir read each directory completely when it is
    // opened, so targets written by running conversions are never picked
    // up as new sources.
    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    if !options.recursive {
        walker = walker.max_depth(1);
    }

    let mut enumerated = Enumerated::default();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(WalkError::RootUnreadable {
                    path: root.to_path_buf(),
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                enumerated.skipped_entries += 1;
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let source = entry.into_path();
        if let Some(filter) = options.source_format {
            if !is_eligible(&source, filter) {
                debug!(path = %source.display(), "Skipping ineligible file");
                continue;
            }
        }

        let engine = engine.clone();
        let tx = tx.clone();
        let WalkOptions {
            target_format,
            quality,
            overwrite,
            ..
        } = *options;

        pool.submit(Box::new(move || {
            let result = engine.convert(&source, target_format, quality, overwrite);
            // The receiver outlives the pool, so this only fails if the
            // walk itself was dropped.
            let _ = tx.send(FileOutcome { source, result });
        }))?;
        enumerated.submitted += 1;
    }

    Ok(enumerated)
}

/// Whether the file's extension maps to `format`.
fn is_eligible(path: &Path, format: ImageFormat) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split_once(EXTENSION_SEPARATOR))
        .map(|(_, ext)| format_for_extension(ext) == format)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::ConvertError;
    use crate::pool::InlinePool;
    use crate::testing::MockCodec;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, b"stub").unwrap();
        path
    }

    #[test]
    fn test_is_eligible() {
        assert!(is_eligible(Path::new("/p/a.tiff"), ImageFormat::Tiff));
        assert!(is_eligible(Path::new("/p/a.TIF"), ImageFormat::Tiff));
        assert!(!is_eligible(Path::new("/p/a.png"), ImageFormat::Tiff));
        assert!(!is_eligible(Path::new("/p/README"), ImageFormat::Tiff));
        assert!(!is_eligible(Path::new("/p/scan.v2.tiff"), ImageFormat::Tiff));
    }

    #[tokio::test]
    async fn test_filter_selects_matching_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.tiff");
        touch(dir.path(), "b.tif");
        touch(dir.path(), "c.png");
        touch(dir.path(), "notes.txt");

        let codec = MockCodec::new();
        let walker = DirectoryWalker::new(ConversionEngine::new(codec.clone()));
        let report = walker
            .walk_and_convert(dir.path(), &WalkOptions::default(), Arc::new(InlinePool::new()))
            .await
            .unwrap();

        assert_eq!(report.success_count(), 2);
        assert_eq!(report.failure_count(), 0);
        assert_eq!(codec.decode_count(), 2);
        assert!(dir.path().join("a.jpg").exists());
        assert!(dir.path().join("b.jpg").exists());
        assert!(!dir.path().join("c.jpg").exists());
    }

    #[tokio::test]
    async fn test_no_filter_attempts_every_file() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.tiff");
        touch(dir.path(), "notes.txt");

        let codec = MockCodec::new();
        codec.fail_decode_for(dir.path().join("notes.txt"));
        let walker = DirectoryWalker::new(ConversionEngine::new(codec));
        let options = WalkOptions {
            source_format: None,
            ..Default::default()
        };
        let report = walker
            .walk_and_convert(dir.path(), &options, Arc::new(InlinePool::new()))
            .await
            .unwrap();

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.success_count(), 1);
        let notes = report.outcome_for(&dir.path().join("notes.txt")).unwrap();
        assert!(matches!(
            notes.result,
            Err(ConvertError::ConversionFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_non_recursive_ignores_subdirectories() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.tiff");
        touch(dir.path(), "sub/c.tiff");

        let codec = MockCodec::new();
        let walker = DirectoryWalker::new(ConversionEngine::new(codec.clone()));
        let options = WalkOptions {
            recursive: false,
            ..Default::default()
        };
        let report = walker
            .walk_and_convert(dir.path(), &options, Arc::new(InlinePool::new()))
            .await
            .unwrap();

        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(codec.decoded_paths(), vec![dir.path().join("a.tiff")]);
        assert!(!dir.path().join("sub/c.jpg").exists());
    }

    #[tokio::test]
    async fn test_recursive_converts_nested_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "sub/deeper/c.tiff");

        let walker = DirectoryWalker::new(ConversionEngine::new(MockCodec::new()));
        let report = walker
            .walk_and_convert(dir.path(), &WalkOptions::default(), Arc::new(InlinePool::new()))
            .await
            .unwrap();

        let converted: Vec<_> = report.succeeded().map(|o| o.target_path.clone()).collect();
        assert_eq!(converted, vec![dir.path().join("sub/deeper/c.jpg")]);
    }

    #[tokio::test]
    async fn test_existing_target_is_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.tiff");
        touch(dir.path(), "a.jpg");
        touch(dir.path(), "b.tiff");

        let walker = DirectoryWalker::new(ConversionEngine::new(MockCodec::new()));
        let report = walker
            .walk_and_convert(dir.path(), &WalkOptions::default(), Arc::new(InlinePool::new()))
            .await
            .unwrap();

        assert_eq!(report.success_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(std::fs::read(dir.path().join("a.jpg")).unwrap(), b"stub");
    }

    #[tokio::test]
    async fn test_missing_root_is_fatal() {
        let walker = DirectoryWalker::new(ConversionEngine::new(MockCodec::new()));
        let err = walker
            .walk_and_convert(
                Path::new("/nonexistent/rasterbatch/root"),
                &WalkOptions::default(),
                Arc::new(InlinePool::new()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WalkError::RootNotFound { .. }));
    }

    #[tokio::test]
    async fn test_file_root_is_fatal() {
        let dir = TempDir::new().unwrap();
        let file = touch(dir.path(), "a.tiff");

        let walker = DirectoryWalker::new(ConversionEngine::new(MockCodec::new()));
        let err = walker
            .walk_and_convert(&file, &WalkOptions::default(), Arc::new(InlinePool::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, WalkError::NotADirectory { .. }));
    }

    #[tokio::test]
    async fn test_closed_pool_is_fatal() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.tiff");

        let pool = Arc::new(InlinePool::new());
        pool.shutdown_and_wait().await;

        let walker = DirectoryWalker::new(ConversionEngine::new(MockCodec::new()));
        let err = walker
            .walk_and_convert(dir.path(), &WalkOptions::default(), pool)
            .await
            .unwrap_err();
        assert!(matches!(err, WalkError::Pool(_)));
    }

    /// Accepts a fixed number of tasks, then reports itself closed.
    struct FillingPool {
        inner: BoundedPool,
        capacity: usize,
        accepted: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl WorkerPool for FillingPool {
        fn name(&self) -> &str {
            "filling"
        }

        fn submit(&self, task: crate::pool::Task) -> Result<(), crate::pool::PoolError> {
            let accepted = self
                .accepted
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if accepted >= self.capacity {
                return Err(crate::pool::PoolError::Closed);
            }
            self.inner.submit(task)
        }

        async fn shutdown_and_wait(&self) {
            self.inner.shutdown_and_wait().await;
        }
    }

    #[tokio::test]
    async fn test_pool_error_mid_walk_drains_submitted_tasks() {
        let dir = TempDir::new().unwrap();
        for name in ["a.tiff", "b.tiff", "c.tiff", "d.tiff"] {
            touch(dir.path(), name);
        }

        let codec = MockCodec::new();
        codec.set_decode_delay(std::time::Duration::from_millis(20));
        let pool = Arc::new(FillingPool {
            inner: BoundedPool::new(2),
            capacity: 2,
            accepted: Default::default(),
        });

        let walker = DirectoryWalker::new(ConversionEngine::new(codec.clone()));
        let err = walker
            .walk_and_convert(dir.path(), &WalkOptions::default(), pool.clone())
            .await
            .unwrap_err();

        assert!(matches!(err, WalkError::Pool(_)));
        assert_eq!(pool.inner.status().completed, 2);
        assert_eq!(codec.decode_count(), 2);
        assert!(dir.path().join("a.jpg").exists());
        assert!(dir.path().join("b.jpg").exists());
        assert!(!dir.path().join("c.jpg").exists());
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let walker = DirectoryWalker::new(ConversionEngine::new(MockCodec::new()));
        let report = walker.run(dir.path(), &WalkOptions::default()).await.unwrap();

        assert!(report.outcomes.is_empty());
        assert_eq!(report.skipped_entries, 0);
    }
}
