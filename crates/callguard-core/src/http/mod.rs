//! HTTP request/response contract consumed by the dispatcher.
//!
//! The dispatcher only sees the [`HttpClient`] trait; [`CurlClient`] is the
//! libcurl-backed implementation used outside of tests.

mod curl_client;
mod parse;

pub use curl_client::CurlClient;

use crate::control::CancelToken;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl std::str::FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            other => Err(format!("unsupported HTTP method: {}", other)),
        }
    }
}

/// A fully built, unsent request.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Sets a header, replacing any existing header with the same name
    /// (case-insensitive).
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Status, headers and body text of a completed exchange.
#[derive(Debug, Clone)]
pub struct Response {
    status: u32,
    headers: Vec<(String, String)>,
    body: String,
}

impl Response {
    pub fn new(status: u32, headers: Vec<(String, String)>, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u32 {
        self.status
    }

    /// Case-insensitive header lookup; first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Failure below the HTTP status level: no usable response was received.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("request interrupted")]
    Interrupted,
    #[error("transport error: {0}")]
    Curl(#[from] curl::Error),
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sends built requests. Shared by every dispatched call, so implementations
/// must be safe for concurrent use.
pub trait HttpClient: Send + Sync {
    /// Starting point for request builders.
    fn request(&self, method: Method, url: &str) -> Request {
        Request::new(method, url)
    }

    /// Sends `request`, giving up after `timeout`. Implementations should stop
    /// early with [`TransportError::Interrupted`] once `cancel` is set.
    fn send(
        &self,
        request: &Request,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<Response, TransportError>;
}
