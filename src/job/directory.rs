//! Directory-creation job

use crate::cancel::CancellationToken;
use crate::error::{Result, TransferError};
use crate::fs;
use crate::observer::TransferObserver;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Per-job listener for directory-creation lifecycle events
///
/// Directory jobs carry no byte-level progress; the lifecycle is just
/// creating/created/error.
pub trait DirectoryListener: Send + Sync {
    /// The directory is about to be created
    fn on_creating(&self, _path: &Path) {}

    /// The directory was created
    fn on_created(&self, _path: &Path) {}

    /// Creation failed
    fn on_error(&self, _path: &Path, _error: &TransferError) {}
}

/// Job payload that creates one directory
#[derive(Clone)]
pub struct DirectoryCreationJob {
    path: PathBuf,
    recursive: bool,
    listeners: Vec<Arc<dyn DirectoryListener>>,
}

impl DirectoryCreationJob {
    /// Create a job for `path`; with `recursive`, missing parents are created too
    pub fn new(path: impl Into<PathBuf>, recursive: bool) -> Self {
        Self {
            path: path.into(),
            recursive,
            listeners: Vec::new(),
        }
    }

    /// Attach a listener for this job's narrow lifecycle
    pub fn add_listener(&mut self, listener: Arc<dyn DirectoryListener>) {
        self.listeners.push(listener);
    }

    /// Target directory
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
            observer.on_directory_error(&self.path, err);
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
        if cancel.is_cancelled() {
            return Err(TransferError::Cancelled);
        }

        observer.on_directory_creating(&self.path);
        for listener in &self.listeners {
            listener.on_creating(&self.path);
        }

        fs::ensure_directory(&self.path, self.recursive)?;

        observer.on_directory_created(&self.path);
        for listener in &self.listeners {
            listener.on_created(&self.path);
        }
        Ok(())
    }
}

impl std::fmt::Debug for DirectoryCreationJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryCreationJob")
            .field("path", &self.path)
            .field("recursive", &self.recursive)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
