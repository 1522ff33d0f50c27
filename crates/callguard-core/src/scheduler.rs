//! Deferred execution of retry attempts.
//!
//! [`TimerScheduler`] keeps a due-ordered queue of tasks and a small pool of
//! worker threads that run each task once its delay has elapsed. Tasks due at
//! the same instant run in submission order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Stand-in due time for delays past what `Instant` can represent.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Runs a zero-argument task after a delay. Shared by every dispatched call.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task);
}

struct Entry {
    due: Instant,
    seq: u64,
    task: Task,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so BinaryHeap pops the earliest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Default)]
struct Queue {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
    shutdown: bool,
}

#[derive(Default)]
struct Shared {
    queue: Mutex<Queue>,
    wake: Condvar,
}

/// Thread-pool backed [`Scheduler`].
///
/// Dropping the scheduler stops the workers; tasks still queued are dropped
/// without running.
pub struct TimerScheduler {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl TimerScheduler {
    /// Starts `threads` workers (at least one).
    pub fn new(threads: usize) -> Self {
        let shared = Arc::new(Shared::default());
        let workers = (0..threads.max(1))
            .map(|i| {
                let shared = Arc::clone(&shared);
                thread::Builder::new()
                    .name(format!("callguard-sched-{}", i))
                    .spawn(move || worker_loop(&shared))
            })
            .filter_map(|spawned| match spawned {
                Ok(h) => Some(h),
                Err(e) => {
                    tracing::error!("failed to spawn scheduler worker: {}", e);
                    None
                }
            })
            .collect();
        Self { shared, workers }
    }

    /// Number of tasks waiting for their delay to elapse.
    pub fn pending(&self) -> usize {
        self.shared
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .heap
            .len()
    }
}

impl Scheduler for TimerScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let mut q = self.shared.queue.lock().unwrap_or_else(PoisonError::into_inner);
        if q.shutdown {
            tracing::warn!("scheduler shut down; dropping task");
            return;
        }
        let now = Instant::now();
        let due = now
            .checked_add(delay)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        let seq = q.next_seq;
        q.next_seq += 1;
        q.heap.push(Entry {
            due,
            seq,
            task,
        });
        self.shared.wake.notify_all();
    }
}

impl Drop for TimerScheduler {
    fn drop(&mut self) {
        let pending = {
            let mut q = self.shared.queue.lock().unwrap_or_else(PoisonError::into_inner);
            q.shutdown = true;
            std::mem::take(&mut q.heap)
        };
        self.shared.wake.notify_all();
        // Dropped outside the lock: a dropped task may resolve its call.
        drop(pending);
        let current = thread::current().id();
        for handle in self.workers.drain(..) {
            // The last handle can be released by a task running on a worker.
            if handle.thread().id() != current {
                let _ = handle.join();
            }
        }
    }
}

fn worker_loop(shared: &Shared) {
    let mut q = shared.queue.lock().unwrap_or_else(PoisonError::into_inner);
    loop {
        if q.shutdown {
            return;
        }
        let now = Instant::now();
        match q.heap.peek().map(|e| e.due) {
            Some(due) if due <= now => {
                if let Some(entry) = q.heap.pop() {
                    drop(q);
                    if panic::catch_unwind(AssertUnwindSafe(entry.task)).is_err() {
                        tracing::error!("scheduled task panicked");
                    }
                    q = shared.queue.lock().unwrap_or_else(PoisonError::into_inner);
                }
            }
            Some(due) => {
                q = shared
                    .wake
                    .wait_timeout(q, due - now)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0;
            }
            None => {
                q = shared.wake.wait(q).unwrap_or_else(PoisonError::into_inner);
            }
        }
    }
}
