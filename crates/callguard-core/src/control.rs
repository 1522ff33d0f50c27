//! Cooperative cancellation for in-flight calls.
//!
//! A `CancelToken` is shared between the thread waiting on a call and the
//! scheduler thread running its attempts. Setting it stops the wait, aborts
//! an in-progress transfer, and stays set afterwards so the caller can see
//! that it was interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
