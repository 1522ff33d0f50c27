//! Typed failures surfaced by the dispatcher.

use thiserror::Error;

/// Boxed cause attached to a generic API error.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure returned by [`crate::dispatcher::Dispatcher::request`].
///
/// `TokenExpired` is a specialization of `Authorization`: callers that only
/// care about "re-authenticate" should test [`ApiError::is_authorization`],
/// callers that can refresh a token and retry should test
/// [`ApiError::is_token_expired`] first.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be completed (bad request, not found, unknown status,
    /// retry budget exhausted, cancellation, transport failure).
    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
    /// Credential was rejected or the server returned an `error_description`.
    #[error("authorization error: {0}")]
    Authorization(String),
    /// Server reported the access token as expired.
    #[error("token expired: {0}")]
    TokenExpired(String),
}

impl ApiError {
    pub fn api(message: impl Into<String>) -> Self {
        ApiError::Api {
            message: message.into(),
            source: None,
        }
    }

    pub fn api_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ApiError::Api {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// True for both authorization and token-expired failures.
    pub fn is_authorization(&self) -> bool {
        matches!(self, ApiError::Authorization(_) | ApiError::TokenExpired(_))
    }

    pub fn is_token_expired(&self) -> bool {
        matches!(self, ApiError::TokenExpired(_))
    }

    /// Message without the kind prefix used by `Display`.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Api { message, .. } => message,
            ApiError::Authorization(m) | ApiError::TokenExpired(m) => m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn token_expired_is_authorization() {
        let e = ApiError::TokenExpired("The access token expired".into());
        assert!(e.is_authorization());
        assert!(e.is_token_expired());
        assert_eq!(e.message(), "The access token expired");
    }

    #[test]
    fn plain_authorization_is_not_expired() {
        let e = ApiError::Authorization("invalid_grant".into());
        assert!(e.is_authorization());
        assert!(!e.is_token_expired());
        assert_eq!(e.to_string(), "authorization error: invalid_grant");
    }

    #[test]
    fn api_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "reset");
        let e = ApiError::api_with_source("connection reset", io);
        assert_eq!(e.to_string(), "connection reset");
        assert!(e.source().is_some());
        assert!(!e.is_authorization());
    }
}
