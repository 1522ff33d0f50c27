//! Single-assignment result slot with a blocking wait.

use crate::control::CancelToken;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

/// How often a blocked waiter re-checks its cancel token.
const CANCEL_POLL: Duration = Duration::from_millis(50);

/// Resolves at most once; observed by exactly one waiter.
pub(crate) struct ResultCell<T> {
    resolved: AtomicBool,
    value: Mutex<Option<T>>,
    ready: Condvar,
}

impl<T> ResultCell<T> {
    pub(crate) fn new() -> Self {
        Self {
            resolved: AtomicBool::new(false),
            value: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    /// Stores `value` and wakes the waiter. Returns false (and drops `value`)
    /// if the cell was already resolved.
    pub(crate) fn resolve(&self, value: T) -> bool {
        if self.resolved.swap(true, Ordering::AcqRel) {
            tracing::warn!("result already resolved; ignoring second resolution");
            return false;
        }
        let mut slot = self.value.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(value);
        self.ready.notify_all();
        true
    }

    pub(crate) fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::Acquire)
    }

    /// Blocks until the cell is resolved and takes the value. Returns `None`
    /// if `cancel` is set before a value arrives; a value that is already
    /// present wins over cancellation.
    pub(crate) fn wait(&self, cancel: &CancelToken) -> Option<T> {
        let mut slot = self.value.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(v) = slot.take() {
                return Some(v);
            }
            if cancel.is_cancelled() {
                return None;
            }
            slot = self
                .ready
                .wait_timeout(slot, CANCEL_POLL)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}
