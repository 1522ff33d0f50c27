//! Classify web API status codes into dispatch outcomes.

/// Outcome category of a single attempt, derived from the status code alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// 200, 201, 204, 304.
    Success,
    /// 202 (accepted, still processing) or 503; retried after a fixed delay.
    Busy,
    /// 400.
    BadRequest,
    /// 401.
    Unauthorized,
    /// 429; retried after the server's `Retry-After`.
    RateLimited,
    /// 403; returned to the caller as a degraded success.
    Forbidden,
    /// 404.
    NotFound,
    /// 500, 502 and every status not listed above. Never retried.
    ServerError(u32),
}

/// First match wins; the order mirrors the dispatch policy table.
pub fn classify_status(code: u32) -> Classification {
    match code {
        200 | 201 | 204 | 304 => Classification::Success,
        202 | 503 => Classification::Busy,
        400 => Classification::BadRequest,
        401 => Classification::Unauthorized,
        429 => Classification::RateLimited,
        403 => Classification::Forbidden,
        404 => Classification::NotFound,
        other => Classification::ServerError(other),
    }
}

/// Parses a `Retry-After` header as whole seconds.
///
/// HTTP-date values and negative numbers are rejected; the caller turns that
/// into a failed call rather than guessing a delay.
pub fn parse_retry_after(value: Option<&str>) -> Result<u64, String> {
    let raw = value.ok_or_else(|| "rate limited without a Retry-After header".to_string())?;
    raw.trim()
        .parse::<u64>()
        .map_err(|_| format!("invalid Retry-After header: {:?}", raw))
}
