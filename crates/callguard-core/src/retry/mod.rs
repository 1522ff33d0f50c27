//! Status classification, retry budget and the per-call attempt loop.
//!
//! `classify` maps a status code to an outcome, `policy` decides whether a
//! retryable outcome gets another attempt, and `run` drives one call through
//! its attempts on the shared scheduler.

mod classify;
mod policy;
mod run;

pub use classify::{classify_status, parse_retry_after, Classification};
pub use policy::{RetryDecision, RetryPolicy};
pub(crate) use run::{Caller, Failure, PendingCall};
