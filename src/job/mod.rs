//! Job abstraction
//!
//! A [`Job`] is one schedulable unit of file-system work: a priority, a
//! retry counter, a cooperative cancellation token, an optional reference to
//! the shared observer, and a kind-specific payload supplying the execution
//! body. The kinds are a closed sum type; each payload fires its own narrow
//! listener set in addition to the shared observer.

mod directory;
mod file_copy;
mod file_write;

pub use directory::{DirectoryCreationJob, DirectoryListener};
pub use file_copy::{FileCopyJob, FileCopyListener};
pub use file_write::{FileWriteJob, FileWriteListener};

use crate::cancel::CancellationToken;
use crate::error::Result;
use crate::fs::{CopyOptions, WriteOptions};
use crate::observer::{NullObserver, TransferObserver};
use chrono::Utc;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_JOB_ID: AtomicU64 = AtomicU64::new(1);

/// Discriminant of a job kind, used in observer notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKindName {
    /// Directory-creation job
    DirectoryCreation,
    /// File-write job
    FileWrite,
    /// File-copy job
    FileCopy,
}

impl fmt::Display for JobKindName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DirectoryCreation => "directory-creation",
            Self::FileWrite => "file-write",
            Self::FileCopy => "file-copy",
        };
        f.write_str(name)
    }
}

/// Kind-specific payload of a job
#[derive(Debug, Clone)]
pub enum JobKind {
    /// Create one directory
    DirectoryCreation(DirectoryCreationJob),
    /// Write an in-memory payload to one file
    FileWrite(FileWriteJob),
    /// Copy one file
    FileCopy(FileCopyJob),
}

impl JobKind {
    fn name(&self) -> JobKindName {
        match self {
            Self::DirectoryCreation(_) => JobKindName::DirectoryCreation,
            Self::FileWrite(_) => JobKindName::FileWrite,
            Self::FileCopy(_) => JobKindName::FileCopy,
        }
    }

    fn target(&self) -> PathBuf {
        match self {
            Self::DirectoryCreation(job) => job.path().to_path_buf(),
            Self::FileWrite(job) => job.path().to_path_buf(),
            Self::FileCopy(job) => job.target().to_path_buf(),
        }
    }
}

/// Cheap snapshot of a job, handed to observer notifications
#[derive(Debug, Clone)]
pub struct JobInfo {
    /// Process-unique job id
    pub id: u64,
    /// Kind discriminant
    pub kind: JobKindName,
    /// Path the job produces (target path for copies)
    pub target: PathBuf,
    /// Scheduling priority; higher is served first
    pub priority: i32,
    /// Execution attempts that have failed so far
    pub retries: u32,
}

/// One schedulable unit of file-system work
pub struct Job {
    id: u64,
    priority: i32,
    retry_count: u32,
    cancel: CancellationToken,
    observer: Option<Arc<dyn TransferObserver>>,
    kind: JobKind,
}

impl Job {
    /// Create a job from a kind payload with priority 0 and a fresh token
    pub fn new(kind: JobKind) -> Self {
        Self {
            id: NEXT_JOB_ID.fetch_add(1, Ordering::Relaxed),
            priority: 0,
            retry_count: 0,
            cancel: CancellationToken::new(),
            observer: None,
            kind,
        }
    }

    /// Create a directory-creation job
    pub fn directory_creation(path: impl Into<PathBuf>, recursive: bool) -> Self {
        Self::new(JobKind::DirectoryCreation(DirectoryCreationJob::new(
            path, recursive,
        )))
    }

    /// Create a file-write job
    pub fn file_write(path: impl Into<PathBuf>, contents: Vec<u8>, options: WriteOptions) -> Self {
        Self::new(JobKind::FileWrite(
            FileWriteJob::new(path, contents).with_options(options),
        ))
    }

    /// Create a file-copy job
    pub fn file_copy(
        source: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
        options: CopyOptions,
    ) -> Self {
        Self::new(JobKind::FileCopy(
            FileCopyJob::new(source, target).with_options(options),
        ))
    }

    /// Set the scheduling priority; higher values are served first
    ///
    /// The priority is fixed once the job has been enqueued.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Share a cancellation token with this job
    ///
    /// Typically a clone of
    /// [`TransferService::cancel_token`](crate::core::service::TransferService::cancel_token),
    /// so the caller can abort individual jobs cooperatively.
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Set the shared observer explicitly
    ///
    /// [`TransferService::enqueue`](crate::core::service::TransferService::enqueue)
    /// injects its own observer into jobs that have none.
    pub fn with_observer(mut self, observer: Arc<dyn TransferObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Process-unique job id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Scheduling priority
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Failed execution attempts so far
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// This job's cancellation token
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Snapshot for observer notifications
    pub fn info(&self) -> JobInfo {
        JobInfo {
            id: self.id,
            kind: self.kind.name(),
            target: self.kind.target(),
            priority: self.priority,
            retries: self.retry_count,
        }
    }

    pub(crate) fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    pub(crate) fn set_observer(&mut self, observer: Arc<dyn TransferObserver>) {
        self.observer = Some(observer);
    }

    /// Record one failed attempt; called by the worker pool, never by the job
    pub(crate) fn record_failure(&mut self) {
        self.retry_count += 1;
    }

    /// Execute the job's body once
    ///
    /// Notifies the shared observer of run-started before the body runs and
    /// of run-ended (with both timestamps) on success. Any error from the
    /// body is reported as a run-error notification and re-raised to the
    /// caller; the job itself never retries.
    pub fn execute(&self) -> Result<()> {
        let observer: &dyn TransferObserver = match &self.observer {
            Some(observer) => observer.as_ref(),
            None => &NullObserver,
        };
        let info = self.info();

        let started_at = Utc::now();
        observer.on_job_run_started(&info, started_at);

        let result = match &self.kind {
            JobKind::DirectoryCreation(job) => job.run(&self.cancel, observer),
            JobKind::FileWrite(job) => job.run(&self.cancel, observer),
            JobKind::FileCopy(job) => job.run(&self.cancel, observer),
        };

        match result {
            Ok(()) => {
                observer.on_job_run_ended(&info, started_at, Utc::now());
                Ok(())
            }
            Err(err) => {
                observer.on_job_run_error(&info, &err);
                Err(err)
            }
        }
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("kind", &self.kind.name())
            .field("priority", &self.priority)
            .field("retry_count", &self.retry_count)
            .finish()
    }
}

impl From<DirectoryCreationJob> for Job {
    fn from(job: DirectoryCreationJob) -> Self {
        Self::new(JobKind::DirectoryCreation(job))
    }
}

impl From<FileWriteJob> for Job {
    fn from(job: FileWriteJob) -> Self {
        Self::new(JobKind::FileWrite(job))
    }
}

impl From<FileCopyJob> for Job {
    fn from(job: FileCopyJob) -> Self {
        Self::new(JobKind::FileCopy(job))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransferError;
    use crate::observer::{EventSender, TransferEvent};
    use tempfile::TempDir;

    #[test]
    fn test_job_ids_are_unique() {
        let a = Job::directory_creation("/tmp/a", true);
        let b = Job::directory_creation("/tmp/b", true);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_execute_notifies_run_lifecycle() {
        let dir = TempDir::new().unwrap();
        let (sender, events) = EventSender::unbounded();

        let job = Job::directory_creation(dir.path().join("made"), true)
            .with_observer(Arc::new(sender));
        job.execute().unwrap();

        let events: Vec<_> = events.try_iter().collect();
        assert!(matches!(events[0], TransferEvent::JobRunStarted { .. }));
        assert!(events
            .iter()
            .any(|e| matches!(e, TransferEvent::DirectoryCreated { .. })));
        assert!(matches!(
            events.last().unwrap(),
            TransferEvent::JobRunEnded { .. }
        ));
    }

    #[test]
    fn test_execute_reraises_and_notifies_error() {
        let dir = TempDir::new().unwrap();
        let (sender, events) = EventSender::unbounded();

        // Copy from a missing source always fails
        let job = Job::file_copy(
            dir.path().join("absent"),
            dir.path().join("dst"),
            Default::default(),
        )
        .with_observer(Arc::new(sender));

        let err = job.execute().unwrap_err();
        assert!(matches!(err, TransferError::NotFound(_)));

        let events: Vec<_> = events.try_iter().collect();
        assert!(events
            .iter()
            .any(|e| matches!(e, TransferEvent::FileCopyError { .. })));
        assert!(matches!(
            events.last().unwrap(),
            TransferEvent::JobRunError { .. }
        ));
    }

    #[test]
    fn test_cancelled_token_aborts_execution() {
        let dir = TempDir::new().unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let job = Job::file_write(
            dir.path().join("out.bin"),
            vec![0u8; 1024],
            Default::default(),
        )
        .with_cancel_token(token);

        let err = job.execute().unwrap_err();
        assert!(matches!(err, TransferError::Cancelled));
    }
}
