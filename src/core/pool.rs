//! Worker pool and consumer loop
//!
//! Each worker is one OS thread running the consumer loop: take the
//! highest-priority entry, execute it outside the queue lock, apply the
//! retry policy on failure. Workers terminate on a service-wide cancel, on
//! an individual removal mark, on adding-completed with an empty queue, or
//! on taking a sentinel.

use super::queue::{JobQueue, QueueEntry};
use crate::observer::TransferObserver;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

/// State shared between the service and every worker thread
pub(crate) struct PoolShared {
    pub(crate) adding_completed: AtomicBool,
    pub(crate) cancel_requested: AtomicBool,
    pub(crate) active_workers: AtomicUsize,
    pub(crate) max_retries: u32,
    pub(crate) observer: Arc<dyn TransferObserver>,
}

struct WorkerHandle {
    id: usize,
    remove: Arc<AtomicBool>,
    thread: thread::JoinHandle<()>,
}

pub(crate) struct WorkerPool {
    queue: Arc<JobQueue>,
    shared: Arc<PoolShared>,
    workers: Mutex<Vec<WorkerHandle>>,
    next_worker_id: AtomicUsize,
}

impl WorkerPool {
    pub(crate) fn new(queue: Arc<JobQueue>, shared: Arc<PoolShared>) -> Self {
        Self {
            queue,
            shared,
            workers: Mutex::new(Vec::new()),
            next_worker_id: AtomicUsize::new(0),
        }
    }

    /// Spawn `count` new workers; identities are never reused
    pub(crate) fn spawn_workers(&self, count: usize) {
        for _ in 0..count {
            self.spawn_one();
        }
    }

    fn spawn_one(&self) {
        let id = self.next_worker_id.fetch_add(1, Ordering::SeqCst);
        let remove = Arc::new(AtomicBool::new(false));

        self.shared.observer.on_worker_created(id);
        // Counted before the thread runs so cancel() never under-counts
        // sentinels for a worker that has not reached its loop yet.
        self.shared.active_workers.fetch_add(1, Ordering::SeqCst);

        let queue = Arc::clone(&self.queue);
        let shared = Arc::clone(&self.shared);
        let remove_flag = Arc::clone(&remove);
        let thread = thread::spawn(move || worker_loop(id, queue, shared, remove_flag));

        self.workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(WorkerHandle { id, remove, thread });
    }

    /// Mark `count` workers for removal and wake all waiters
    ///
    /// Removal is honored at the top of each marked worker's loop, so no job
    /// is abandoned mid-execution. The most recently spawned unmarked
    /// workers are chosen.
    pub(crate) fn remove_workers(&self, count: usize) {
        {
            let workers = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
            let mut remaining = count;
            for handle in workers.iter().rev() {
                if remaining == 0 {
                    break;
                }
                // A worker that already exited (sentinel, drained queue) still
                // has its handle here until join(); marking it would consume
                // the removal without shrinking the pool.
                if handle.thread.is_finished() {
                    continue;
                }
                if !handle.remove.swap(true, Ordering::SeqCst) {
                    tracing::debug!(worker = handle.id, "worker marked for removal");
                    remaining -= 1;
                }
            }
        }
        self.queue.wake_all();
    }

    /// Number of workers that have not yet left their consumer loop
    pub(crate) fn active_count(&self) -> usize {
        self.shared.active_workers.load(Ordering::SeqCst)
    }

    /// Wait for every spawned worker thread to exit
    pub(crate) fn join(&self) {
        let handles: Vec<WorkerHandle> = {
            let mut workers = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
            workers.drain(..).collect()
        };
        for handle in handles {
            if handle.thread.join().is_err() {
                tracing::error!(worker = handle.id, "worker thread panicked");
            }
        }
    }
}

fn worker_loop(
    id: usize,
    queue: Arc<JobQueue>,
    shared: Arc<PoolShared>,
    remove: Arc<AtomicBool>,
) {
    let observer = shared.observer.as_ref();
    observer.on_worker_started(id);
    tracing::debug!(worker = id, "worker started");

    'consume: loop {
        let mut entries = queue.guard();

        // Find an entry to take, or a reason to stop, while holding the lock
        let entry = loop {
            if shared.cancel_requested.load(Ordering::SeqCst) || remove.load(Ordering::SeqCst) {
                drop(entries);
                break 'consume;
            }

            if entries.is_empty() {
                if shared.adding_completed.load(Ordering::SeqCst) {
                    drop(entries);
                    break 'consume;
                }
                observer.on_worker_waiting(id);
                entries = queue.wait(entries);
                observer.on_worker_woke_up(id);
                // A racing worker may have taken the only item; re-check
                // the stop conditions and emptiness from the top.
                continue;
            }

            match JobQueue::take_highest(&mut entries) {
                Some(entry) => break entry,
                None => continue,
            }
        };
        drop(entries);

        match entry {
            QueueEntry::Sentinel => break 'consume,
            QueueEntry::Job(mut job) => {
                observer.on_worker_picked_job(id, &job.info());

                // Execution happens outside the queue lock so other workers
                // keep draining during I/O.
                match job.execute() {
                    Ok(()) => {
                        observer.on_job_completed(&job.info());
                    }
                    Err(err) => {
                        job.record_failure();
                        let info = job.info();
                        if job.retry_count() >= shared.max_retries {
                            tracing::warn!(
                                worker = id,
                                job = info.id,
                                attempts = info.retries,
                                "retry budget exhausted"
                            );
                            observer.on_retry_exhausted(&info, &err);
                        } else {
                            observer.on_job_requeued(&info);
                            queue.requeue_after_failure(job);
                        }
                    }
                }
            }
        }
    }

    shared.active_workers.fetch_sub(1, Ordering::SeqCst);
    observer.on_worker_shutdown(id);
    tracing::debug!(worker = id, "worker shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{DirectoryCreationJob, DirectoryListener, Job};
    use crate::observer::NullObserver;
    use crossbeam::channel::{unbounded, Receiver, Sender};
    use std::path::Path;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    const DEADLINE: Duration = Duration::from_secs(5);

    fn pool() -> WorkerPool {
        let observer: Arc<dyn TransferObserver> = Arc::new(NullObserver);
        let queue = Arc::new(JobQueue::new(Arc::clone(&observer)));
        let shared = Arc::new(PoolShared {
            adding_completed: AtomicBool::new(false),
            cancel_requested: AtomicBool::new(false),
            active_workers: AtomicUsize::new(0),
            max_retries: 3,
            observer,
        });
        WorkerPool::new(queue, shared)
    }

    fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < DEADLINE {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        cond()
    }

    // Listener that parks its worker inside execute() until released, so a
    // test can pin down exactly which workers are busy and which are idle.
    struct GateListener {
        entered: Sender<()>,
        release: Receiver<()>,
    }

    impl DirectoryListener for GateListener {
        fn on_creating(&self, _path: &Path) {
            let _ = self.entered.send(());
            let _ = self.release.recv();
        }
    }

    #[test]
    fn test_remove_workers_skips_already_exited_handles() {
        let dir = TempDir::new().unwrap();
        let pool = pool();

        let (entered_tx, entered_rx) = unbounded();
        let (release_tx, release_rx) = unbounded();
        let gate = Arc::new(GateListener {
            entered: entered_tx,
            release: release_rx,
        });

        for i in 0..2 {
            let mut payload = DirectoryCreationJob::new(dir.path().join(format!("d{i}")), true);
            payload.add_listener(gate.clone());
            pool.queue.enqueue(Box::new(Job::from(payload)));
        }

        // Two workers take the gated jobs and park inside execute()
        pool.spawn_workers(2);
        entered_rx.recv_timeout(DEADLINE).unwrap();
        entered_rx.recv_timeout(DEADLINE).unwrap();

        // Two more workers go idle, then exit by consuming sentinels; their
        // handles stay in the pool until join() and are the newest entries
        pool.spawn_workers(2);
        pool.queue.enqueue_sentinel();
        pool.queue.enqueue_sentinel();
        assert!(wait_until(|| {
            pool.active_count() == 2
                && pool
                    .workers
                    .lock()
                    .unwrap()
                    .iter()
                    .skip(2)
                    .all(|h| h.thread.is_finished())
        }));

        // The marks must land on the two live workers, not the dead handles
        pool.remove_workers(2);
        release_tx.send(()).unwrap();
        release_tx.send(()).unwrap();

        assert!(wait_until(|| pool.active_count() == 0));
        pool.join();
        assert!(dir.path().join("d0").is_dir());
        assert!(dir.path().join("d1").is_dir());
    }
}
