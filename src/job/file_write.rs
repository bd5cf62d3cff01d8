//! File-write job

use crate::cancel::CancellationToken;
use crate::error::{Result, TransferError};
use crate::fs::{self, TransferStats, WriteOptions};
use crate::observer::TransferObserver;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Per-job listener for file-write lifecycle events
pub trait FileWriteListener: Send + Sync {
    /// The write started; `total_bytes` is the payload size
    fn on_started(&self, _path: &Path, _total_bytes: u64) {}

    /// One chunk was written
    fn on_progress(&self, _path: &Path, _bytes_written: u64, _total_bytes: u64) {}

    /// The write finished
    fn on_finished(&self, _path: &Path, _stats: &TransferStats) {}

    /// The write failed
    fn on_error(&self, _path: &Path, _error: &TransferError) {}
}

/// Job payload that writes an in-memory payload to one file
#[derive(Clone)]
pub struct FileWriteJob {
    path: PathBuf,
    contents: Arc<Vec<u8>>,
    options: WriteOptions,
    listeners: Vec<Arc<dyn FileWriteListener>>,
}

impl FileWriteJob {
    /// Create a job writing `contents` to `path` with default options
    pub fn new(path: impl Into<PathBuf>, contents: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            contents: Arc::new(contents),
            options: WriteOptions::default(),
            listeners: Vec::new(),
        }
    }

    /// Replace the write options
    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach a listener for this job's narrow lifecycle
    pub fn add_listener(&mut self, listener: Arc<dyn FileWriteListener>) {
        self.listeners.push(listener);
    }

    /// Target file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn run(
        &self,
        cancel: &CancellationToken,
        observer: &dyn TransferObserver,
    ) -> Result<()> {
        let result = self.run_inner(cancel, observer);
        if let Err(err) = &result {
            observer.on_file_write_error(&self.path, err);
            for listener in &self.listeners {
                listener.on_error(&self.path, err);
            }
        }
        result
    }

    fn run_inner(
        &self,
        cancel: &CancellationToken,
        observer: &dyn TransferObserver,
    ) -> Result<()> {
        let total = self.contents.len() as u64;
        observer.on_file_write_started(&self.path, total);
        for listener in &self.listeners {
            listener.on_started(&self.path, total);
        }

        let stats = fs::write_file_chunked(
            &self.path,
            &self.contents,
            &self.options,
            cancel,
            |written, total| {
                observer.on_file_write_progress(&self.path, written, total);
                for listener in &self.listeners {
                    listener.on_progress(&self.path, written, total);
                }
            },
        )?;

        observer.on_file_write_finished(&self.path, &stats);
        for listener in &self.listeners {
            listener.on_finished(&self.path, &stats);
        }
        Ok(())
    }
}

impl std::fmt::Debug for FileWriteJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriteJob")
            .field("path", &self.path)
            .field("bytes", &self.contents.len())
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
    struct ProgressListener {
        updates: Mutex<Vec<u64>>,
        finished: Mutex<bool>,
    }

    impl FileWriteListener for ProgressListener {
        fn on_progress(&self, _path: &Path, bytes_written: u64, _total: u64) {
            self.updates.lock().unwrap().push(bytes_written);
        }
        fn on_finished(&self, _path: &Path, _stats: &TransferStats) {
            *self.finished.lock().unwrap() = true;
        }
    }

    #[test]
    fn test_writes_payload_with_progress() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.bin");
        let payload = vec![0x7Fu8; 128 * 1024];

        let listener = Arc::new(ProgressListener::default());
        let mut job = FileWriteJob::new(&path, payload.clone()).with_options(WriteOptions {
            overwrite: false,
            chunk_size: 32 * 1024,
        });
        job.add_listener(listener.clone());

        job.run(&CancellationToken::new(), &NullObserver).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), payload);
        assert!(*listener.finished.lock().unwrap());
        let updates = listener.updates.lock().unwrap();
        assert_eq!(updates.len(), 4);
        assert_eq!(*updates.last().unwrap(), payload.len() as u64);
    }

    #[test]
    fn test_refuses_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"old").unwrap();

        let job = FileWriteJob::new(&path, b"new".to_vec());
        let err = job.run(&CancellationToken::new(), &NullObserver).unwrap_err();

        assert!(matches!(err, TransferError::AlreadyExists(_)));
    }
}
