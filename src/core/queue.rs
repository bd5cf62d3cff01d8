//! Priority-ordered job queue
//!
//! One exclusive lock guards the entry sequence; a condition variable wakes
//! idle workers on enqueue and shutdown signals. Entries are either real
//! jobs, kept sorted by descending priority with a stable sort, or
//! sentinels, which always trail real jobs and terminate exactly one worker
//! each.

use super::order;
use crate::job::Job;
use crate::observer::TransferObserver;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// One slot in the queue: a real job or a stop marker for one worker
pub(crate) enum QueueEntry {
    Job(Box<Job>),
    Sentinel,
}

pub(crate) struct JobQueue {
    entries: Mutex<Vec<QueueEntry>>,
    available: Condvar,
    observer: Arc<dyn TransferObserver>,
}

impl JobQueue {
    pub(crate) fn new(observer: Arc<dyn TransferObserver>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            available: Condvar::new(),
            observer,
        }
    }

    // A worker that panics mid-notification must not wedge the queue, so
    // poisoning is ignored and the guard recovered.
    fn lock(&self) -> MutexGuard<'_, Vec<QueueEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a job, re-sort the whole sequence, and wake one waiter
    pub(crate) fn enqueue(&self, job: Box<Job>) {
        let info = job.info();
        let mut entries = self.lock();
        entries.push(QueueEntry::Job(job));
        entries.sort_by(order::compare);
        self.observer.on_job_enqueued(&info);
        self.available.notify_one();
    }

    /// Append a sentinel that will terminate exactly one worker
    pub(crate) fn enqueue_sentinel(&self) {
        let mut entries = self.lock();
        entries.push(QueueEntry::Sentinel);
        self.available.notify_one();
    }

    /// Reinsert a job that failed but still has retry budget
    ///
    /// The job is placed ahead of any pending sentinel so shutdown signals
    /// only fire once all outstanding work, retried work included, has been
    /// attempted; the stable re-sort then restores the priority order.
    pub(crate) fn requeue_after_failure(&self, job: Box<Job>) {
        let mut entries = self.lock();
        let slot = entries
            .iter()
            .position(|entry| matches!(entry, QueueEntry::Sentinel))
            .unwrap_or(entries.len());
        entries.insert(slot, QueueEntry::Job(job));
        entries.sort_by(order::compare);
        self.available.notify_one();
    }

    /// Number of real jobs currently queued (sentinels excluded)
    pub(crate) fn depth(&self) -> usize {
        self.lock()
            .iter()
            .filter(|entry| matches!(entry, QueueEntry::Job(_)))
            .count()
    }

    /// Wake every blocked worker so it can re-check the service flags
    pub(crate) fn wake_all(&self) {
        // Taking the lock orders the wake after any in-progress wait entry,
        // so a flag flip between a worker's emptiness check and its wait
        // cannot be missed.
        let _entries = self.lock();
        self.available.notify_all();
    }

    /// Lock the entry sequence; used by the worker consumer loop
    pub(crate) fn guard(&self) -> MutexGuard<'_, Vec<QueueEntry>> {
        self.lock()
    }

    /// Block on the condition variable, releasing and re-acquiring the lock
    pub(crate) fn wait<'a>(
        &'a self,
        guard: MutexGuard<'a, Vec<QueueEntry>>,
    ) -> MutexGuard<'a, Vec<QueueEntry>> {
        self.available
            .wait(guard)
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Remove and return the head entry, the highest-priority real job or a
    /// sentinel once only sentinels remain
    pub(crate) fn take_highest(entries: &mut Vec<QueueEntry>) -> Option<QueueEntry> {
        if entries.is_empty() {
            None
        } else {
            Some(entries.remove(0))
        }
    }
}
