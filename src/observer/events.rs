//! Observer that publishes notifications onto a channel
//!
//! Instead of implementing a sink, callers can consume the scheduler's
//! lifecycle as a stream of [`TransferEvent`] values from a crossbeam
//! channel. This is also the observer the scenario tests are written
//! against.

use super::TransferObserver;
use crate::error::TransferError;
use crate::fs::TransferStats;
use crate::job::JobInfo;
use chrono::{DateTime, Utc};
use crossbeam::channel::{unbounded, Receiver, Sender};
use std::path::{Path, PathBuf};

/// One scheduler lifecycle event, with owned payloads
///
/// Error payloads are carried as rendered strings because
/// [`TransferError`] holds a non-clonable `std::io::Error`.
#[derive(Debug, Clone)]
pub enum TransferEvent {
    /// A job's execution body started
    JobRunStarted {
        /// Job snapshot
        job: JobInfo,
        /// Start timestamp
        started_at: DateTime<Utc>,
    },
    /// A job's execution body succeeded
    JobRunEnded {
        /// Job snapshot
        job: JobInfo,
        /// Start timestamp
        started_at: DateTime<Utc>,
        /// End timestamp
        ended_at: DateTime<Utc>,
    },
    /// A job's execution body failed
    JobRunError {
        /// Job snapshot
        job: JobInfo,
        /// Rendered error
        error: String,
    },
    /// A directory is about to be created
    DirectoryCreating {
        /// Target directory
        path: PathBuf,
    },
    /// A directory was created
    DirectoryCreated {
        /// Target directory
        path: PathBuf,
    },
    /// Directory creation failed
    DirectoryError {
        /// Target directory
        path: PathBuf,
        /// Rendered error
        error: String,
    },
    /// A file write started
    FileWriteStarted {
        /// Target file
        path: PathBuf,
        /// Payload size
        total_bytes: u64,
    },
    /// A file write progressed by one chunk
    FileWriteProgress {
        /// Target file
        path: PathBuf,
        /// Bytes written so far
        bytes_written: u64,
        /// Payload size
        total_bytes: u64,
    },
    /// A file write finished
    FileWriteFinished {
        /// Target file
        path: PathBuf,
        /// Transfer statistics
        stats: TransferStats,
    },
    /// A file write failed
    FileWriteError {
        /// Target file
        path: PathBuf,
        /// Rendered error
        error: String,
    },
    /// A file copy started
    FileCopyStarted {
        /// Source file
        source: PathBuf,
        /// Target file
        target: PathBuf,
        /// Source size
        total_bytes: u64,
    },
    /// A file copy progressed by one chunk
    FileCopyProgress {
        /// Source file
        source: PathBuf,
        /// Target file
        target: PathBuf,
        /// Bytes copied so far
        bytes_copied: u64,
        /// Source size
        total_bytes: u64,
    },
    /// A file copy finished
    FileCopyFinished {
        /// Source file
        source: PathBuf,
        /// Target file
        target: PathBuf,
        /// Transfer statistics
        stats: TransferStats,
    },
    /// A file copy failed
    FileCopyError {
        /// Source file
        source: PathBuf,
        /// Target file
        target: PathBuf,
        /// Rendered error
        error: String,
    },
    /// A job entered the queue
    JobEnqueued {
        /// Job snapshot
        job: JobInfo,
    },
    /// A job completed and left the scheduler
    JobCompleted {
        /// Job snapshot
        job: JobInfo,
    },
    /// A failed job went back into the queue
    JobRequeued {
        /// Job snapshot (retries already incremented)
        job: JobInfo,
    },
    /// A job exhausted its retry budget
    RetryExhausted {
        /// Job snapshot
        job: JobInfo,
        /// Rendered error of the final attempt
        error: String,
    },
    /// A worker slot was allocated
    WorkerCreated {
        /// Worker identity
        worker_id: usize,
    },
    /// A worker thread started
    WorkerStarted {
        /// Worker identity
        worker_id: usize,
    },
    /// A worker is blocking for work
    WorkerWaiting {
        /// Worker identity
        worker_id: usize,
    },
    /// A blocked worker woke up
    WorkerWokeUp {
        /// Worker identity
        worker_id: usize,
    },
    /// A worker took a job off the queue
    WorkerPickedJob {
        /// Worker identity
        worker_id: usize,
        /// Job snapshot
        job: JobInfo,
    },
    /// A worker exited its loop
    WorkerShutdown {
        /// Worker identity
        worker_id: usize,
    },
    /// No further jobs will be accepted
    AddingCompleted,
    /// Cancellation was requested
    CancellationRequested,
}

/// Observer that forwards every notification as a [`TransferEvent`]
///
/// Sends never block; if the receiving side is gone the events are dropped.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<TransferEvent>,
}

impl EventSender {
    /// Create an event-sending observer and the receiver for its stream
    pub fn unbounded() -> (Self, Receiver<TransferEvent>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    fn emit(&self, event: TransferEvent) {
        let _ = self.tx.send(event);
    }
}

impl TransferObserver for EventSender {
    fn on_job_run_started(&self, job: &JobInfo, started_at: DateTime<Utc>) {
        self.emit(TransferEvent::JobRunStarted {
            job: job.clone(),
            started_at,
        });
    }

    fn on_job_run_ended(&self, job: &JobInfo, started_at: DateTime<Utc>, ended_at: DateTime<Utc>) {
        self.emit(TransferEvent::JobRunEnded {
            job: job.clone(),
            started_at,
            ended_at,
        });
    }

    fn on_job_run_error(&self, job: &JobInfo, error: &TransferError) {
        self.emit(TransferEvent::JobRunError {
            job: job.clone(),
            error: error.to_string(),
        });
    }

    fn on_directory_creating(&self, path: &Path) {
        self.emit(TransferEvent::DirectoryCreating {
            path: path.to_path_buf(),
        });
    }

    fn on_directory_created(&self, path: &Path) {
        self.emit(TransferEvent::DirectoryCreated {
            path: path.to_path_buf(),
        });
    }

    fn on_directory_error(&self, path: &Path, error: &TransferError) {
        self.emit(TransferEvent::DirectoryError {
            path: path.to_path_buf(),
            error: error.to_string(),
        });
    }

    fn on_file_write_started(&self, path: &Path, total_bytes: u64) {
        self.emit(TransferEvent::FileWriteStarted {
            path: path.to_path_buf(),
            total_bytes,
        });
    }

    fn on_file_write_progress(&self, path: &Path, bytes_written: u64, total_bytes: u64) {
        self.emit(TransferEvent::FileWriteProgress {
            path: path.to_path_buf(),
            bytes_written,
            total_bytes,
        });
    }

    fn on_file_write_finished(&self, path: &Path, stats: &TransferStats) {
        self.emit(TransferEvent::FileWriteFinished {
            path: path.to_path_buf(),
            stats: stats.clone(),
        });
    }

    fn on_file_write_error(&self, path: &Path, error: &TransferError) {
        self.emit(TransferEvent::FileWriteError {
            path: path.to_path_buf(),
            error: error.to_string(),
        });
    }

    fn on_file_copy_started(&self, source: &Path, target: &Path, total_bytes: u64) {
        self.emit(TransferEvent::FileCopyStarted {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            total_bytes,
        });
    }

    fn on_file_copy_progress(&self, source: &Path, target: &Path, bytes_copied: u64, total_bytes: u64) {
        self.emit(TransferEvent::FileCopyProgress {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            bytes_copied,
            total_bytes,
        });
    }

    fn on_file_copy_finished(&self, source: &Path, target: &Path, stats: &TransferStats) {
        self.emit(TransferEvent::FileCopyFinished {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            stats: stats.clone(),
        });
    }

    fn on_file_copy_error(&self, source: &Path, target: &Path, error: &TransferError) {
        self.emit(TransferEvent::FileCopyError {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            error: error.to_string(),
        });
    }

    fn on_job_enqueued(&self, job: &JobInfo) {
        self.emit(TransferEvent::JobEnqueued { job: job.clone() });
    }

    fn on_job_completed(&self, job: &JobInfo) {
        self.emit(TransferEvent::JobCompleted { job: job.clone() });
    }

    fn on_job_requeued(&self, job: &JobInfo) {
        self.emit(TransferEvent::JobRequeued { job: job.clone() });
    }

    fn on_retry_exhausted(&self, job: &JobInfo, error: &TransferError) {
        self.emit(TransferEvent::RetryExhausted {
            job: job.clone(),
            error: error.to_string(),
        });
    }

    fn on_worker_created(&self, worker_id: usize) {
        self.emit(TransferEvent::WorkerCreated { worker_id });
    }

    fn on_worker_started(&self, worker_id: usize) {
        self.emit(TransferEvent::WorkerStarted { worker_id });
    }

    fn on_worker_waiting(&self, worker_id: usize) {
        self.emit(TransferEvent::WorkerWaiting { worker_id });
    }

    fn on_worker_woke_up(&self, worker_id: usize) {
        self.emit(TransferEvent::WorkerWokeUp { worker_id });
    }

    fn on_worker_picked_job(&self, worker_id: usize, job: &JobInfo) {
        self.emit(TransferEvent::WorkerPickedJob {
            worker_id,
            job: job.clone(),
        });
    }

    fn on_worker_shutdown(&self, worker_id: usize) {
        self.emit(TransferEvent::WorkerShutdown { worker_id });
    }

    fn on_adding_completed(&self) {
        self.emit(TransferEvent::AddingCompleted);
    }

    fn on_cancellation_requested(&self) {
        self.emit(TransferEvent::CancellationRequested);
    }
}
