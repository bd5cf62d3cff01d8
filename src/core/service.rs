//! Transfer service
//!
//! The orchestrator owning the job queue and the worker pool. Callers
//! enqueue jobs, start the pool once, and finish with either
//! `complete_adding` (drain everything, then stop) or `cancel` (stop as soon
//! as in-flight executions return).

use super::pool::{PoolShared, WorkerPool};
use super::queue::JobQueue;
use crate::cancel::CancellationToken;
use crate::config::TransferConfig;
use crate::error::{Result, TransferError};
use crate::job::Job;
use crate::observer::{NullObserver, TransferObserver};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Concurrent job-execution service for bulk file-system transfers
pub struct TransferService {
    config: TransferConfig,
    queue: Arc<JobQueue>,
    pool: WorkerPool,
    shared: Arc<PoolShared>,
    started: AtomicBool,
    cancel_token: CancellationToken,
}

impl TransferService {
    /// Create a service with no observer attached
    pub fn new(config: TransferConfig) -> Self {
        Self::with_observer(config, Arc::new(NullObserver))
    }

    /// Create a service reporting every lifecycle event to `observer`
    pub fn with_observer(config: TransferConfig, observer: Arc<dyn TransferObserver>) -> Self {
        let shared = Arc::new(PoolShared {
            adding_completed: AtomicBool::new(false),
            cancel_requested: AtomicBool::new(false),
            active_workers: AtomicUsize::new(0),
            max_retries: config.max_retries,
            observer: Arc::clone(&observer),
        });
        let queue = Arc::new(JobQueue::new(observer));
        let pool = WorkerPool::new(Arc::clone(&queue), Arc::clone(&shared));

        Self {
            config,
            queue,
            pool,
            shared,
            started: AtomicBool::new(false),
            cancel_token: CancellationToken::new(),
        }
    }

    /// Start the worker pool
    ///
    /// Spawns `worker_count` workers, or the configured default when 0 is
    /// passed. Can only be called once; a second call returns
    /// [`TransferError::AlreadyStarted`].
    pub fn start(&self, worker_count: usize) -> Result<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(TransferError::AlreadyStarted);
        }

        let count = if worker_count == 0 {
            self.config.workers
        } else {
            worker_count
        };
        tracing::debug!(workers = count, "starting transfer service");
        self.pool.spawn_workers(count);
        Ok(())
    }

    /// Enqueue a job for execution
    ///
    /// Fails with [`TransferError::AddingCompleted`] once `complete_adding`
    /// has been called. Jobs without an observer of their own inherit the
    /// service's observer so run notifications reach the shared sink.
    pub fn enqueue(&self, mut job: Job) -> Result<()> {
        if self.shared.adding_completed.load(Ordering::SeqCst) {
            return Err(TransferError::AddingCompleted);
        }

        if !job.has_observer() {
            job.set_observer(Arc::clone(&self.shared.observer));
        }
        self.queue.enqueue(Box::new(job));
        Ok(())
    }

    /// Declare that no further jobs will ever be enqueued
    ///
    /// Any worker that next finds the queue empty terminates instead of
    /// waiting; the pool drains naturally.
    pub fn complete_adding(&self) {
        if !self.shared.adding_completed.swap(true, Ordering::SeqCst) {
            self.shared.observer.on_adding_completed();
        }
        self.queue.wake_all();
    }

    /// Request a service-wide stop
    ///
    /// Workers stop picking new work; one sentinel per still-active worker
    /// wakes any blocked worker so it can observe the flag. In-flight job
    /// executions are allowed to finish; cancellation of a running body
    /// happens only through that job's own token.
    pub fn cancel(&self) {
        if !self.shared.cancel_requested.swap(true, Ordering::SeqCst) {
            self.shared.observer.on_cancellation_requested();
        }
        for _ in 0..self.pool.active_count() {
            self.queue.enqueue_sentinel();
        }
    }

    /// Grow the pool by `count` workers
    pub fn add_workers(&self, count: usize) {
        self.pool.spawn_workers(count);
    }

    /// Shrink the pool by marking `count` workers for removal
    ///
    /// Each marked worker exits at the top of its consumer loop, never
    /// mid-job.
    pub fn remove_workers(&self, count: usize) {
        self.pool.remove_workers(count);
    }

    /// Number of real jobs currently queued
    pub fn queue_depth(&self) -> usize {
        self.queue.depth()
    }

    /// Number of workers still running their consumer loop
    pub fn worker_count(&self) -> usize {
        self.pool.active_count()
    }

    /// Token callers can share with jobs for cooperative per-job cancellation
    ///
    /// The service never trips this token itself; `cancel()` only stops
    /// workers from picking new work.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Wait for every worker to exit
    ///
    /// Call after `complete_adding()` or `cancel()`; joining a pool that is
    /// still accepting work blocks until one of the two is signaled.
    pub fn join(&self) {
        self.pool.join();
    }
}
