//! libcurl-backed [`HttpClient`].
//!
//! One `Easy` handle per send, so a single client can be shared by any number
//! of concurrently dispatched calls.

use super::{parse, HttpClient, Method, Request, Response, TransportError};
use crate::control::CancelToken;
use std::str;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CurlClient {
    connect_timeout: Duration,
    user_agent: String,
}

impl Default for CurlClient {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            user_agent: format!("callguard/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CurlClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

impl HttpClient for CurlClient {
    fn send(
        &self,
        request: &Request,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<Response, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Interrupted);
        }

        let mut easy = curl::easy::Easy::new();
        easy.url(request.url())?;
        match request.method() {
            Method::Get => easy.get(true)?,
            Method::Post => easy.post(true)?,
            m => easy.custom_request(m.as_str())?,
        }
        match request.body_bytes() {
            Some(body) if request.method() != Method::Get => easy.post_fields_copy(body)?,
            _ if request.method() == Method::Post => easy.post_field_size(0)?,
            _ => {}
        }
        easy.useragent(&self.user_agent)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(timeout)?;
        // Needed for the progress callback to fire.
        easy.progress(true)?;

        let mut list = curl::easy::List::new();
        for (k, v) in request.headers() {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        easy.http_headers(list)?;

        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();
        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.progress_function(|_, _, _, _| !cancel.is_cancelled())?;
            transfer.perform()
        };

        if let Err(e) = performed {
            if e.is_aborted_by_callback() && cancel.is_cancelled() {
                return Err(TransportError::Interrupted);
            }
            if e.is_operation_timedout() {
                return Err(TransportError::Timeout(timeout));
            }
            return Err(e.into());
        }

        let status = easy.response_code()?;
        let headers = parse::parse_header_lines(&header_lines);
        tracing::trace!("{} {} -> {}", request.method().as_str(), request.url(), status);
        Ok(Response::new(
            status,
            headers,
            String::from_utf8_lossy(&body).into_owned(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_timeout_defaults_and_overrides() {
        assert_eq!(CurlClient::new().connect_timeout, Duration::from_secs(15));
        let c = CurlClient::new().with_connect_timeout(Duration::from_secs(3));
        assert_eq!(c.connect_timeout, Duration::from_secs(3));
        assert!(c.user_agent.starts_with("callguard/"));
    }

    #[test]
    fn cancelled_token_short_circuits_send() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let req = CurlClient::new().request(Method::Get, "http://127.0.0.1:9/");
        let err = CurlClient::new()
            .send(&req, Duration::from_secs(1), &cancel)
            .unwrap_err();
        assert!(matches!(err, TransportError::Interrupted));
    }
}
