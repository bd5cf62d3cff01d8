//! File-copy job

use crate::cancel::CancellationToken;
use crate::error::{Result, TransferError};
use crate::fs::{self, CopyOptions, TransferStats};
use crate::observer::TransferObserver;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Per-job listener for file-copy lifecycle events
pub trait FileCopyListener: Send + Sync {
    /// The copy started; `total_bytes` is the source size
    fn on_started(&self, _source: &Path, _target: &Path, _total_bytes: u64) {}

    /// One chunk was copied
    fn on_progress(&self, _source: &Path, _target: &Path, _bytes_copied: u64, _total_bytes: u64) {}

    /// The copy finished; `stats` carries byte count and throughput
    fn on_finished(&self, _source: &Path, _target: &Path, _stats: &TransferStats) {}

    /// The copy failed
    fn on_error(&self, _source: &Path, _target: &Path, _error: &TransferError) {}
}

/// Job payload that copies one file
#[derive(Clone)]
pub struct FileCopyJob {
    source: PathBuf,
    target: PathBuf,
    options: CopyOptions,
    listeners: Vec<Arc<dyn FileCopyListener>>,
}

impl FileCopyJob {
    /// Create a job copying `source` to `target` with default options
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            options: CopyOptions::default(),
            listeners: Vec::new(),
        }
    }

    /// Replace the copy options
    pub fn with_options(mut self, options: CopyOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach a listener for this job's narrow lifecycle
    pub fn add_listener(&mut self, listener: Arc<dyn FileCopyListener>) {
        self.listeners.push(listener);
    }

    /// Source file
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Target file
    pub fn target(&self) -> &Path {
        &self.target
    }

    pub(crate) fn run(
        &self,
        cancel: &CancellationToken,
        observer: &dyn TransferObserver,
    ) -> Result<()> {
        let result = self.run_inner(cancel, observer);
        if let Err(err) = &result {
            observer.on_file_copy_error(&self.source, &self.target, err);
            for listener in &self.listeners {
                listener.on_error(&self.source, &self.target, err);
            }
        }
        result
    }

    fn run_inner(
        &self,
        cancel: &CancellationToken,
        observer: &dyn TransferObserver,
    ) -> Result<()> {
        let total = std::fs::metadata(&self.source)
            .map_err(|e| fs::map_io_error(&self.source, e))?
            .len();
        observer.on_file_copy_started(&self.source, &self.target, total);
        for listener in &self.listeners {
            listener.on_started(&self.source, &self.target, total);
        }

        let stats = fs::copy_file_chunked(
            &self.source,
            &self.target,
            &self.options,
            cancel,
            |copied, total| {
                observer.on_file_copy_progress(&self.source, &self.target, copied, total);
                for listener in &self.listeners {
                    listener.on_progress(&self.source, &self.target, copied, total);
                }
            },
        )?;

        observer.on_file_copy_finished(&self.source, &self.target, &stats);
        for listener in &self.listeners {
            listener.on_finished(&self.source, &self.target, &stats);
        }
        Ok(())
    }
}

impl std::fmt::Debug for FileCopyJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileCopyJob")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("options", &self.options)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NullObserver;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct ThroughputListener {
        stats: Mutex<Option<TransferStats>>,
    }

    impl FileCopyListener for ThroughputListener {
        fn on_finished(&self, _source: &Path, _target: &Path, stats: &TransferStats) {
            *self.stats.lock().unwrap() = Some(stats.clone());
        }
    }

    #[test]
    fn test_copies_file_and_reports_stats() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src.bin");
        let target = dir.path().join("dst.bin");
        let payload = vec![0x11u8; 300 * 1024];
        std::fs::write(&source, &payload).unwrap();

        let listener = Arc::new(ThroughputListener::default());
        let mut job = FileCopyJob::new(&source, &target);
        job.add_listener(listener.clone());

        job.run(&CancellationToken::new(), &NullObserver).unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), payload);
        let stats = listener.stats.lock().unwrap().clone().unwrap();
        assert_eq!(stats.bytes, payload.len() as u64);
    }

    #[test]
    fn test_missing_source_reaches_error_listener() {
        let dir = TempDir::new().unwrap();

        #[derive(Default)]
        struct ErrorListener {
            errors: Mutex<Vec<String>>,
        }
        impl FileCopyListener for ErrorListener {
            fn on_error(&self, _s: &Path, _t: &Path, error: &TransferError) {
                self.errors.lock().unwrap().push(error.to_string());
            }
        }

        let listener = Arc::new(ErrorListener::default());
        let mut job = FileCopyJob::new(dir.path().join("absent"), dir.path().join("dst"));
        job.add_listener(listener.clone());

        let err = job.run(&CancellationToken::new(), &NullObserver).unwrap_err();

        assert!(matches!(err, TransferError::NotFound(_)));
        assert_eq!(listener.errors.lock().unwrap().len(), 1);
    }
}
