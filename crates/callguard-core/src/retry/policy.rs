use std::time::Duration;

/// Decision returned by the retry policy once an attempt asked to be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry budget exhausted.
    GiveUp,
    /// Schedule the next attempt after the given delay.
    RetryAfter(Duration),
}

/// Attempt budget, per-attempt timeout and retry delays for dispatched calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Timeout for a single HTTP exchange.
    pub timeout: Duration,
    /// Fixed wait after 202/503 ("still processing" / unavailable).
    pub busy_delay: Duration,
    /// Upper bound applied to a server's `Retry-After`. `None` trusts the server.
    pub max_retry_after: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            timeout: Duration::from_secs(30),
            busy_delay: Duration::from_secs(5),
            max_retry_after: None,
        }
    }
}

impl RetryPolicy {
    /// `attempt` is 1-based and is the attempt that just asked for a retry;
    /// `delay` is the wait that attempt computed.
    pub fn decide(&self, attempt: u32, delay: Duration) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::GiveUp;
        }
        RetryDecision::RetryAfter(delay)
    }

    /// Delay for a 429 response carrying `Retry-After: secs`.
    pub fn retry_after_delay(&self, secs: u64) -> Duration {
        let requested = Duration::from_secs(secs);
        match self.max_retry_after {
            Some(cap) => requested.min(cap),
            None => requested,
        }
    }
}
