//! Extract error information from web API error responses.
//!
//! Two body shapes are recognised:
//! `{"error": {"status": 400, "message": "..."}}` for regular API errors and
//! `{"error": "invalid_grant", "error_description": "..."}` for errors coming
//! from the authorization service.

use crate::error::ApiError;
use crate::http::Response;
use serde_json::Value;

/// Message returned when the body has neither recognised shape or is not JSON.
pub const UNKNOWN_RESPONSE: &str = "Unknown response";

/// What an error body says went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
    /// Ordinary API error message (or [`UNKNOWN_RESPONSE`]).
    Message(String),
    /// `error_description` from the authorization service.
    Authorization(String),
    /// `error.message` mentioning an expired token.
    TokenExpired(String),
}

impl ErrorBody {
    /// Converts to the failure for this response. `on_message` picks the type
    /// used for an ordinary message; authorization outcomes keep their own type.
    pub fn into_error(self, on_message: impl FnOnce(String) -> ApiError) -> ApiError {
        match self {
            ErrorBody::Message(m) => on_message(m),
            ErrorBody::Authorization(m) => ApiError::Authorization(m),
            ErrorBody::TokenExpired(m) => ApiError::TokenExpired(m),
        }
    }
}

/// Parses the body of an error response. Never fails: bodies that are not
/// JSON objects, or that carry neither shape, yield [`UNKNOWN_RESPONSE`].
pub fn parse_error_body(response: &Response) -> ErrorBody {
    let value: Value = match serde_json::from_str(response.body()) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("response was not json: {}", e);
            return ErrorBody::Message(UNKNOWN_RESPONSE.to_string());
        }
    };

    if let Some(object) = value.as_object() {
        let message = object
            .get("error")
            .and_then(Value::as_object)
            .and_then(|error| error.get("message"))
            .and_then(text);
        if let Some(message) = message {
            tracing::debug!("error response: {}", message);
            // Only this branch checks for expiry; error_description never does.
            if message.contains("expired") {
                return ErrorBody::TokenExpired(message);
            }
            return ErrorBody::Message(message);
        }
        if let Some(description) = object.get("error_description").and_then(text) {
            tracing::debug!("authorization error: {}", description);
            return ErrorBody::Authorization(description);
        }
    }

    tracing::debug!("unknown response: {}", response.body());
    ErrorBody::Message(UNKNOWN_RESPONSE.to_string())
}

/// String value of a scalar JSON field.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
