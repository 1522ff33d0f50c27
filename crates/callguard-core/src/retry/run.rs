//! Attempt loop for one dispatched call.
//!
//! A [`Caller`] performs one attempt, classifies the response, and then either
//! resolves the call's result cell or moves itself into a task on the shared
//! scheduler to run the next attempt after the computed delay. Attempts for a
//! call are strictly sequential, so its state needs no locking: ownership is
//! handed from attempt to attempt through the scheduler.

use super::classify::{classify_status, parse_retry_after, Classification};
use super::policy::{RetryDecision, RetryPolicy};
use crate::control::CancelToken;
use crate::error::ApiError;
use crate::error_body::{parse_error_body, ErrorBody};
use crate::http::{HttpClient, Request, Response, TransportError};
use crate::oneshot::ResultCell;
use crate::scheduler::Scheduler;
use std::sync::Arc;
use std::time::Duration;

const AUTHORIZATION_HEADER: &str = "Authorization";

/// Builds the request for each attempt from the shared client.
pub(crate) type RequestBuilder = dyn Fn(&dyn HttpClient) -> Request + Send;

/// Failure stored in a call's result cell.
#[derive(Debug)]
pub(crate) enum Failure {
    /// Already typed; handed to the caller unchanged.
    Api(ApiError),
    /// No usable response; wrapped by the dispatcher.
    Transport(TransportError),
}

pub(crate) type CallResult = Result<Response, Failure>;

/// State of one logical request in flight.
pub(crate) struct PendingCall {
    builder: Box<RequestBuilder>,
    authorization: String,
    attempts: u32,
    delay: Duration,
}

impl PendingCall {
    pub(crate) fn new(builder: Box<RequestBuilder>, authorization: &str) -> Self {
        Self {
            builder,
            authorization: authorization.to_string(),
            attempts: 0,
            delay: Duration::ZERO,
        }
    }
}

enum Step {
    Done(CallResult),
    Retry,
}

pub(crate) struct Caller {
    call: PendingCall,
    client: Arc<dyn HttpClient>,
    scheduler: Arc<dyn Scheduler>,
    policy: RetryPolicy,
    result: Arc<ResultCell<CallResult>>,
    cancel: CancelToken,
}

impl Caller {
    pub(crate) fn new(
        call: PendingCall,
        client: Arc<dyn HttpClient>,
        scheduler: Arc<dyn Scheduler>,
        policy: RetryPolicy,
        result: Arc<ResultCell<CallResult>>,
        cancel: CancelToken,
    ) -> Self {
        Self {
            call,
            client,
            scheduler,
            policy,
            result,
            cancel,
        }
    }

    /// Runs one attempt. The first attempt runs on the dispatching thread;
    /// retries run on a scheduler worker.
    pub(crate) fn run(mut self) {
        self.call.attempts += 1;

        let step = if self.cancel.is_cancelled() {
            Step::Done(Err(Failure::Transport(TransportError::Interrupted)))
        } else {
            match self.send() {
                Ok(response) => self.process_response(response),
                Err(e) => {
                    tracing::debug!("attempt {} failed: {}", self.call.attempts, e);
                    if matches!(e, TransportError::Interrupted) {
                        self.cancel.cancel();
                    }
                    Step::Done(Err(Failure::Transport(e)))
                }
            }
        };

        match step {
            Step::Done(result) => {
                self.result.resolve(result);
            }
            Step::Retry => match self.policy.decide(self.call.attempts, self.call.delay) {
                RetryDecision::RetryAfter(delay) => {
                    tracing::debug!(
                        "web API call attempt {}; retrying in {}s",
                        self.call.attempts,
                        delay.as_secs()
                    );
                    let scheduler = Arc::clone(&self.scheduler);
                    scheduler.schedule(delay, Box::new(move || self.run()));
                }
                RetryDecision::GiveUp => {
                    tracing::warn!("giving up on web API call; check network connectivity");
                    self.result.resolve(Err(Failure::Api(ApiError::api(format!(
                        "Could not reach the web API after {} retries.",
                        self.call.attempts
                    )))));
                }
            },
        }
    }

    fn send(&self) -> Result<Response, TransportError> {
        let mut request = (self.call.builder)(self.client.as_ref());
        request.set_header(AUTHORIZATION_HEADER, &self.call.authorization);
        self.client.send(&request, self.policy.timeout, &self.cancel)
    }

    /// Sets `delay` for retryable statuses; everything else resolves the call.
    fn process_response(&mut self, response: Response) -> Step {
        let status = response.status();
        tracing::debug!("response code: {}", status);
        tracing::trace!("response data: {}", response.body());

        match classify_status(status) {
            Classification::Success => Step::Done(Ok(response)),
            Classification::Busy => {
                tracing::debug!(
                    "web API returned {}: request accepted but not processed yet",
                    status
                );
                self.call.delay = self.policy.busy_delay;
                Step::Retry
            }
            Classification::BadRequest | Classification::NotFound => {
                let e = parse_error_body(&response).into_error(ApiError::api);
                Step::Done(Err(Failure::Api(e)))
            }
            Classification::Unauthorized => {
                let e = parse_error_body(&response).into_error(ApiError::Authorization);
                Step::Done(Err(Failure::Api(e)))
            }
            Classification::RateLimited => {
                match parse_retry_after(response.header("Retry-After")) {
                    Ok(secs) => {
                        tracing::debug!(
                            "web API rate limit exceeded; retry after {} seconds",
                            secs
                        );
                        self.call.delay = self.policy.retry_after_delay(secs);
                        Step::Retry
                    }
                    Err(msg) => Step::Done(Err(Failure::Api(ApiError::api(msg)))),
                }
            }
            Classification::Forbidden => {
                // Parsed for logging only; the response goes back to the caller.
                match parse_error_body(&response) {
                    ErrorBody::Message(m) => tracing::debug!("forbidden: {}", m),
                    other => tracing::debug!("ignoring authorization error on 403: {:?}", other),
                }
                Step::Done(Ok(response))
            }
            Classification::ServerError(code) => Step::Done(Err(Failure::Api(ApiError::api(
                format!("Web API returned with error status: {}", code),
            )))),
        }
    }
}

impl Drop for Caller {
    // A caller dropped unresolved (e.g. its retry task discarded by a
    // scheduler shutdown) must still release the waiter.
    fn drop(&mut self) {
        if !self.result.is_resolved() {
            self.result.resolve(Err(Failure::Api(ApiError::api(
                "call abandoned before completion",
            ))));
        }
    }
}
