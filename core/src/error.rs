//! Error types for the DNSimple API client, and the status classifier.
//!
//! # Design
//! The status code decides the variant; the decoded error envelope only adds
//! detail (message, field errors). Business failures such as "domain already
//! exists" or "too early to renew" are not split into their own variants:
//! they arrive as `BadRequest` or `Request` and differ only in `message`.
//! Callers that need to tell them apart match on the message text.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::warn;

use crate::http::HttpResponse;
use crate::response::{Body, ErrorEnvelope, RateLimit};

/// Field name to list of validation failures, as returned by the server.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Errors returned by `DnsimpleClient` and `Dnsimple` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never reached the server (DNS, TCP, TLS, timeout).
    #[error("connection failed: {0}")]
    Connection(String),

    /// A success response carried a body that could not be decoded.
    #[error("failed to decode response body: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(String),

    /// The server returned 404.
    #[error("not found (HTTP 404): {message}")]
    NotFound { message: String },

    /// The server returned 401 or 403.
    #[error("authentication failed (HTTP {status}): {message}")]
    Authentication { status: u16, message: String },

    /// The server returned 400 or 422.
    #[error("bad request (HTTP {status}): {message}{}", describe_field_errors(.errors))]
    BadRequest {
        status: u16,
        message: String,
        errors: FieldErrors,
    },

    /// The server returned 405.
    #[error("method not allowed (HTTP 405): {message}")]
    MethodNotAllowed { message: String },

    /// The server returned 429. `reset` is the epoch second at which the
    /// quota refills, when the server said so.
    #[error("rate limit exceeded (HTTP 429): {message}")]
    RateLimitExceeded { message: String, reset: Option<u64> },

    /// Any other non-success status, or a 2xx the operation does not
    /// document.
    #[error("request failed (HTTP {status}): {message}")]
    Request { status: u16, message: String },

    /// A local precondition failed; no request was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    /// HTTP status code, for errors produced from a server response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::MethodNotAllowed { .. } => Some(405),
            ApiError::RateLimitExceeded { .. } => Some(429),
            ApiError::Authentication { status, .. }
            | ApiError::BadRequest { status, .. }
            | ApiError::Request { status, .. } => Some(*status),
            ApiError::Connection(_)
            | ApiError::Decode(_)
            | ApiError::Serialization(_)
            | ApiError::InvalidInput(_) => None,
        }
    }

    /// Human-readable message, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Connection(message)
            | ApiError::Decode(message)
            | ApiError::Serialization(message)
            | ApiError::InvalidInput(message)
            | ApiError::NotFound { message }
            | ApiError::Authentication { message, .. }
            | ApiError::BadRequest { message, .. }
            | ApiError::MethodNotAllowed { message }
            | ApiError::RateLimitExceeded { message, .. }
            | ApiError::Request { message, .. } => message,
        }
    }

    /// Field-level validation detail. Empty for every variant but
    /// `BadRequest`.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::BadRequest { errors, .. } => Some(errors),
            _ => None,
        }
    }
}

fn describe_field_errors(errors: &FieldErrors) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let fields: Vec<String> = errors
        .iter()
        .map(|(field, reasons)| format!("{field} {}", reasons.join(", ")))
        .collect();
    format!(" ({})", fields.join("; "))
}

/// Map a response to `Ok(())` when its status is one of `expected`, or to
/// the typed error for that status otherwise.
pub fn classify(response: &HttpResponse, body: &Body, expected: &[u16]) -> Result<(), ApiError> {
    let status = response.status;
    if expected.contains(&status) {
        return Ok(());
    }

    let envelope = ErrorEnvelope::from_body(body);
    let message = envelope
        .message
        .or_else(|| match body {
            Body::Text(text) => Some(text.trim().to_string()),
            _ => None,
        })
        .unwrap_or_else(|| default_message(status));

    warn!(status, %message, "request failed");

    let error = match status {
        404 => ApiError::NotFound { message },
        400 | 422 => ApiError::BadRequest {
            status,
            message,
            errors: envelope.errors,
        },
        401 | 403 => ApiError::Authentication { status, message },
        405 => ApiError::MethodNotAllowed { message },
        429 => ApiError::RateLimitExceeded {
            message,
            reset: RateLimit::from_response(response).reset,
        },
        _ => ApiError::Request { status, message },
    };
    Err(error)
}

fn default_message(status: u16) -> String {
    let reason = match status {
        200..=299 => "unexpected success status",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "unexpected status",
    };
    format!("HTTP {status} {reason}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::decode_body;

    fn classify_raw(status: u16, body: &str, expected: &[u16]) -> Result<(), ApiError> {
        let response = HttpResponse::new(status, body);
        let decoded = decode_body(&response).unwrap();
        classify(&response, &decoded, expected)
    }

    #[test]
    fn expected_status_passes() {
        assert!(classify_raw(201, "", &[201]).is_ok());
    }

    #[test]
    fn unexpected_success_status_is_request_error() {
        let err = classify_raw(200, r#"{"data":{}}"#, &[201]).unwrap_err();
        assert!(matches!(err, ApiError::Request { status: 200, .. }));
    }

    #[test]
    fn not_found_with_empty_body() {
        let err = classify_raw(404, "", &[200]).unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
        assert_eq!(err.message(), "HTTP 404 Not Found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn not_found_uses_envelope_message() {
        let err = classify_raw(404, r#"{"message":"Domain `0` not found"}"#, &[200]).unwrap_err();
        assert_eq!(err.message(), "Domain `0` not found");
    }

    #[test]
    fn bad_request_carries_field_errors() {
        let body = r#"{"message":"Validation failed","errors":{"email":["can't be blank","is an invalid email address"],"address1":["can't be blank"]}}"#;
        let err = classify_raw(400, body, &[201]).unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(errors["email"], vec!["can't be blank", "is an invalid email address"]);
        assert_eq!(errors["address1"], vec!["can't be blank"]);
        assert_eq!(
            err.to_string(),
            "bad request (HTTP 400): Validation failed (address1 can't be blank; email can't be blank, is an invalid email address)"
        );
    }

    #[test]
    fn unprocessable_entity_is_bad_request() {
        let err = classify_raw(422, r#"{"message":"nope"}"#, &[200]).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { status: 422, .. }));
        assert!(err.field_errors().unwrap().is_empty());
    }

    #[test]
    fn unauthorized_and_forbidden_are_authentication() {
        let err = classify_raw(401, r#"{"message":"Authentication failed"}"#, &[200]).unwrap_err();
        assert!(matches!(err, ApiError::Authentication { status: 401, .. }));
        let err = classify_raw(403, "", &[200]).unwrap_err();
        assert!(matches!(err, ApiError::Authentication { status: 403, .. }));
    }

    #[test]
    fn method_not_allowed() {
        let err = classify_raw(405, "", &[200]).unwrap_err();
        assert!(matches!(err, ApiError::MethodNotAllowed { .. }));
    }

    #[test]
    fn rate_limit_carries_reset_header() {
        let response = HttpResponse::new(429, r#"{"message":"API rate limit exceeded"}"#)
            .with_header("X-RateLimit-Reset", "1450451976");
        let decoded = decode_body(&response).unwrap();
        let err = classify(&response, &decoded, &[200]).unwrap_err();
        match err {
            ApiError::RateLimitExceeded { message, reset } => {
                assert_eq!(message, "API rate limit exceeded");
                assert_eq!(reset, Some(1450451976));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn server_error_with_text_body() {
        let err = classify_raw(502, "<html>Bad Gateway</html>\n", &[200]).unwrap_err();
        assert!(matches!(err, ApiError::Request { status: 502, .. }));
        assert_eq!(err.message(), "<html>Bad Gateway</html>");
    }

    #[test]
    fn status_wins_over_envelope_content() {
        let body = r#"{"message":"Validation failed","errors":{"name":["taken"]}}"#;
        let err = classify_raw(500, body, &[200]).unwrap_err();
        assert!(matches!(err, ApiError::Request { status: 500, .. }));
        assert!(err.field_errors().is_none());
    }

    #[test]
    fn local_errors_have_no_status() {
        assert_eq!(ApiError::InvalidInput("x".to_string()).status(), None);
        assert_eq!(ApiError::Connection("x".to_string()).status(), None);
    }
}
