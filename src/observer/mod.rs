//! Lifecycle notification sink
//!
//! A single [`TransferObserver`] receives every notification from jobs, the
//! queue, the workers and the service. All methods are fire-and-forget with
//! default no-op bodies, so implementors subscribe to exactly the events they
//! care about. Observer implementations must never panic; the scheduler does
//! not guard against a misbehaving sink.

mod events;
mod logging;

pub use events::{EventSender, TransferEvent};
pub use logging::LoggingObserver;

use crate::error::TransferError;
use crate::fs::TransferStats;
use crate::job::JobInfo;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Notification sink for every lifecycle event in the scheduler
pub trait TransferObserver: Send + Sync {
    // --- job run lifecycle ---

    /// A job's execution body is about to run
    fn on_job_run_started(&self, _job: &JobInfo, _started_at: DateTime<Utc>) {}

    /// A job's execution body returned successfully
    fn on_job_run_ended(
        &self,
        _job: &JobInfo,
        _started_at: DateTime<Utc>,
        _ended_at: DateTime<Utc>,
    ) {
    }

    /// A job's execution body raised an error (the worker will apply retry policy)
    fn on_job_run_error(&self, _job: &JobInfo, _error: &TransferError) {}

    // --- directory lifecycle ---

    /// A directory is about to be created
    fn on_directory_creating(&self, _path: &Path) {}

    /// A directory was created
    fn on_directory_created(&self, _path: &Path) {}

    /// Directory creation failed
    fn on_directory_error(&self, _path: &Path, _error: &TransferError) {}

    // --- file-write lifecycle ---

    /// A file write started
    fn on_file_write_started(&self, _path: &Path, _total_bytes: u64) {}

    /// A chunk of a file write completed
    fn on_file_write_progress(&self, _path: &Path, _bytes_written: u64, _total_bytes: u64) {}

    /// A file write finished
    fn on_file_write_finished(&self, _path: &Path, _stats: &TransferStats) {}

    /// A file write failed
    fn on_file_write_error(&self, _path: &Path, _error: &TransferError) {}

    // --- file-copy lifecycle ---

    /// A file copy started
    fn on_file_copy_started(&self, _source: &Path, _target: &Path, _total_bytes: u64) {}

    /// A chunk of a file copy completed
    fn on_file_copy_progress(
        &self,
        _source: &Path,
        _target: &Path,
        _bytes_copied: u64,
        _total_bytes: u64,
    ) {
    }

    /// A file copy finished
    fn on_file_copy_finished(&self, _source: &Path, _target: &Path, _stats: &TransferStats) {}

    /// A file copy failed
    fn on_file_copy_error(&self, _source: &Path, _target: &Path, _error: &TransferError) {}

    // --- queue lifecycle ---

    /// A job was added to the queue
    fn on_job_enqueued(&self, _job: &JobInfo) {}

    /// A job was executed to completion and left the scheduler
    fn on_job_completed(&self, _job: &JobInfo) {}

    /// A failed job was pushed back into the queue for another attempt
    fn on_job_requeued(&self, _job: &JobInfo) {}

    /// A job exhausted its retry budget and was abandoned
    fn on_retry_exhausted(&self, _job: &JobInfo, _error: &TransferError) {}

    // --- worker lifecycle ---

    /// A worker slot was allocated in the pool
    fn on_worker_created(&self, _worker_id: usize) {}

    /// A worker thread began running its consumer loop
    fn on_worker_started(&self, _worker_id: usize) {}

    /// A worker found the queue empty and is blocking for new work
    fn on_worker_waiting(&self, _worker_id: usize) {}

    /// A blocked worker was woken by an enqueue or a shutdown signal
    fn on_worker_woke_up(&self, _worker_id: usize) {}

    /// A worker took a job off the queue and is about to execute it
    fn on_worker_picked_job(&self, _worker_id: usize, _job: &JobInfo) {}

    /// A worker left its consumer loop
    fn on_worker_shutdown(&self, _worker_id: usize) {}

    // --- service lifecycle ---

    /// `complete_adding()` was called; no further jobs will ever arrive
    fn on_adding_completed(&self) {}

    /// `cancel()` was called; workers stop picking new work
    fn on_cancellation_requested(&self) {}
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl TransferObserver for NullObserver {}
