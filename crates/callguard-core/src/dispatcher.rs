//! Blocking entry point for web API calls.
//!
//! [`Dispatcher::request`] runs the first attempt on the calling thread, hands
//! any retries to the shared scheduler, and blocks until the call is resolved.
//! Every failure comes back as an [`ApiError`].

use crate::config::DispatchConfig;
use crate::control::CancelToken;
use crate::error::ApiError;
use crate::http::{CurlClient, HttpClient, Request, Response};
use crate::oneshot::ResultCell;
use crate::retry::{Caller, Failure, PendingCall, RetryPolicy};
use crate::scheduler::{Scheduler, TimerScheduler};
use std::sync::Arc;

/// Shared by any number of threads; each `request` is an independent call.
#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn HttpClient>,
    scheduler: Arc<dyn Scheduler>,
    policy: RetryPolicy,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn HttpClient>, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            client,
            scheduler,
            policy: RetryPolicy::default(),
        }
    }

    /// libcurl client and a timer scheduler sized from `cfg`.
    pub fn from_config(cfg: &DispatchConfig) -> Self {
        Self::new(
            Arc::new(CurlClient::new().with_connect_timeout(cfg.connect_timeout())),
            Arc::new(TimerScheduler::new(cfg.scheduler_threads)),
        )
        .with_policy(cfg.to_policy())
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Performs a call and returns the raw response.
    ///
    /// `builder` constructs the request from the client and is invoked once
    /// per attempt; `authorization` is sent as the `Authorization` header.
    /// A 403 response is returned as success; callers must inspect it.
    pub fn request<F>(&self, builder: F, authorization: &str) -> Result<Response, ApiError>
    where
        F: Fn(&dyn HttpClient) -> Request + Send + 'static,
    {
        self.request_with_cancel(builder, authorization, &CancelToken::new())
    }

    /// Like [`Dispatcher::request`], but stops waiting once `cancel` is set.
    /// The token is left set so the caller can observe the interruption.
    pub fn request_with_cancel<F>(
        &self,
        builder: F,
        authorization: &str,
        cancel: &CancelToken,
    ) -> Result<Response, ApiError>
    where
        F: Fn(&dyn HttpClient) -> Request + Send + 'static,
    {
        if authorization.trim().is_empty() {
            return Err(ApiError::api("authorization must not be empty"));
        }

        let result = Arc::new(ResultCell::new());
        Caller::new(
            PendingCall::new(Box::new(builder), authorization),
            Arc::clone(&self.client),
            Arc::clone(&self.scheduler),
            self.policy,
            Arc::clone(&result),
            cancel.clone(),
        )
        .run();

        match result.wait(cancel) {
            None => Err(ApiError::api("Thread interrupted")),
            Some(Ok(response)) => Ok(response),
            Some(Err(Failure::Api(e))) => Err(e),
            Some(Err(Failure::Transport(e))) => Err(ApiError::api_with_source(e.to_string(), e)),
        }
    }
}
