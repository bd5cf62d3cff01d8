//! Observer that renders every notification through `tracing`

use super::TransferObserver;
use crate::error::TransferError;
use crate::fs::TransferStats;
use crate::job::JobInfo;
use chrono::{DateTime, Utc};
use humansize::{format_size, BINARY};
use std::path::Path;

/// Observer that logs every lifecycle event
///
/// Progress events log at `trace` level, routine lifecycle at `debug`,
/// completions at `info`, and failures at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl LoggingObserver {
    /// Create a new logging observer
    pub fn new() -> Self {
        Self
    }
}

impl TransferObserver for LoggingObserver {
    fn on_job_run_started(&self, job: &JobInfo, started_at: DateTime<Utc>) {
        tracing::debug!(
            job = job.id,
            kind = %job.kind,
            target = %job.target.display(),
            %started_at,
            "job run started"
        );
    }

    fn on_job_run_ended(&self, job: &JobInfo, started_at: DateTime<Utc>, ended_at: DateTime<Utc>) {
        let elapsed = ended_at - started_at;
        tracing::debug!(job = job.id, kind = %job.kind, %elapsed, "job run ended");
    }

    fn on_job_run_error(&self, job: &JobInfo, error: &TransferError) {
        tracing::warn!(job = job.id, kind = %job.kind, %error, "job run failed");
    }

    fn on_directory_creating(&self, path: &Path) {
        tracing::debug!(path = %path.display(), "creating directory");
    }

    fn on_directory_created(&self, path: &Path) {
        tracing::info!(path = %path.display(), "directory created");
    }

    fn on_directory_error(&self, path: &Path, error: &TransferError) {
        tracing::warn!(path = %path.display(), %error, "directory creation failed");
    }

    fn on_file_write_started(&self, path: &Path, total_bytes: u64) {
        tracing::debug!(
            path = %path.display(),
            size = %format_size(total_bytes, BINARY),
            "file write started"
        );
    }

    fn on_file_write_progress(&self, path: &Path, bytes_written: u64, total_bytes: u64) {
        tracing::trace!(
            path = %path.display(),
            written = bytes_written,
            total = total_bytes,
            "file write progress"
        );
    }

    fn on_file_write_finished(&self, path: &Path, stats: &TransferStats) {
        tracing::info!(
            path = %path.display(),
            size = %format_size(stats.bytes, BINARY),
            throughput = %format!("{}/s", format_size(stats.throughput as u64, BINARY)),
            "file write finished"
        );
    }

    fn on_file_write_error(&self, path: &Path, error: &TransferError) {
        tracing::warn!(path = %path.display(), %error, "file write failed");
    }

    fn on_file_copy_started(&self, source: &Path, target: &Path, total_bytes: u64) {
        tracing::debug!(
            source = %source.display(),
            target = %target.display(),
            size = %format_size(total_bytes, BINARY),
            "file copy started"
        );
    }

    fn on_file_copy_progress(&self, source: &Path, _target: &Path, bytes_copied: u64, total_bytes: u64) {
        tracing::trace!(
            source = %source.display(),
            copied = bytes_copied,
            total = total_bytes,
            "file copy progress"
        );
    }

    fn on_file_copy_finished(&self, source: &Path, target: &Path, stats: &TransferStats) {
        tracing::info!(
            source = %source.display(),
            target = %target.display(),
            size = %format_size(stats.bytes, BINARY),
            throughput = %format!("{}/s", format_size(stats.throughput as u64, BINARY)),
            "file copy finished"
        );
    }

    fn on_file_copy_error(&self, source: &Path, target: &Path, error: &TransferError) {
        tracing::warn!(
            source = %source.display(),
            target = %target.display(),
            %error,
            "file copy failed"
        );
    }

    fn on_job_enqueued(&self, job: &JobInfo) {
        tracing::debug!(job = job.id, priority = job.priority, "job enqueued");
    }

    fn on_job_completed(&self, job: &JobInfo) {
        tracing::info!(job = job.id, kind = %job.kind, "job completed");
    }

    fn on_job_requeued(&self, job: &JobInfo) {
        tracing::debug!(job = job.id, retries = job.retries, "job requeued for retry");
    }

    fn on_retry_exhausted(&self, job: &JobInfo, error: &TransferError) {
        tracing::warn!(
            job = job.id,
            retries = job.retries,
            %error,
            "retry budget exhausted, job abandoned"
        );
    }

    fn on_worker_created(&self, worker_id: usize) {
        tracing::debug!(worker = worker_id, "worker created");
    }

    fn on_worker_started(&self, worker_id: usize) {
        tracing::debug!(worker = worker_id, "worker started");
    }

    fn on_worker_waiting(&self, worker_id: usize) {
        tracing::trace!(worker = worker_id, "worker waiting for work");
    }

    fn on_worker_woke_up(&self, worker_id: usize) {
        tracing::trace!(worker = worker_id, "worker woke up");
    }

    fn on_worker_picked_job(&self, worker_id: usize, job: &JobInfo) {
        tracing::debug!(worker = worker_id, job = job.id, "worker picked job");
    }

    fn on_worker_shutdown(&self, worker_id: usize) {
        tracing::debug!(worker = worker_id, "worker shutdown");
    }

    fn on_adding_completed(&self) {
        tracing::info!("adding completed, no further jobs will be accepted");
    }

    fn on_cancellation_requested(&self) {
        tracing::info!("cancellation requested");
    }
}
