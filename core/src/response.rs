//! Response decoding: body envelope, pagination, rate-limit metadata.
//!
//! # Design
//! Every parse goes through the same steps: `decode_body` turns raw bytes into
//! a `Body`, `error::classify` short-circuits on an unexpected status, and
//! the `data` member of the envelope is handed to a resource mapper. The
//! `parse_*` helpers here bundle those steps so the per-operation parse
//! methods on `DnsimpleClient` reduce to a status code and a type.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{classify, ApiError, FieldErrors};
use crate::http::HttpResponse;
use crate::types::map_resource;

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Zero-length or whitespace-only body.
    Empty,
    Json(Value),
    /// Non-JSON body on a non-success status, kept as an error message
    /// fallback.
    Text(String),
}

/// Decode a raw body. Malformed JSON is an error only on 2xx statuses.
pub fn decode_body(response: &HttpResponse) -> Result<Body, ApiError> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Body::Empty);
    }
    match serde_json::from_slice(&response.body) {
        Ok(value) => Ok(Body::Json(value)),
        Err(e) if response.is_success() => Err(ApiError::Decode(e.to_string())),
        Err(_) => Ok(Body::Text(
            String::from_utf8_lossy(&response.body).into_owned(),
        )),
    }
}

/// Structured view of a failure body: `{"message": ..., "errors": {...}}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorEnvelope {
    pub message: Option<String>,
    pub errors: FieldErrors,
}

impl ErrorEnvelope {
    pub fn from_body(body: &Body) -> Self {
        let Body::Json(Value::Object(object)) = body else {
            return Self::default();
        };

        let message = object
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);

        let mut errors = FieldErrors::new();
        if let Some(Value::Object(fields)) = object.get("errors") {
            for (field, reasons) in fields {
                let reasons: Vec<String> = match reasons {
                    Value::Array(items) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect(),
                    Value::String(reason) => vec![reason.clone()],
                    _ => continue,
                };
                errors.insert(field.clone(), reasons);
            }
        }

        Self { message, errors }
    }
}

/// Request quota counters read from the `X-RateLimit-*` headers. A header
/// that is missing or not a number is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
    /// Epoch second at which the quota refills.
    pub reset: Option<u64>,
}

impl RateLimit {
    pub fn from_response(response: &HttpResponse) -> Self {
        let read = |name: &str| response.header(name).and_then(|v| v.trim().parse().ok());
        Self {
            limit: read("X-RateLimit-Limit"),
            remaining: read("X-RateLimit-Remaining"),
            reset: read("X-RateLimit-Reset"),
        }
    }
}

/// Pagination metadata of a list response. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    pub current_page: u64,
    /// Absent when the server leaves the page size implicit.
    #[serde(default)]
    pub per_page: Option<u64>,
    pub total_entries: u64,
    pub total_pages: u64,
}

impl Pagination {
    /// Metadata for a list the server returned without a `pagination`
    /// member: everything on one page.
    pub fn single_page(len: usize) -> Self {
        let len = len as u64;
        Self {
            current_page: 1,
            per_page: Some(len),
            total_entries: len,
            total_pages: 1,
        }
    }
}

/// A successfully mapped payload plus the rate-limit counters of the
/// response that carried it.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    pub data: T,
    pub rate_limit: RateLimit,
}

/// A page of mapped records. An empty `data` is a valid page.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionResponse<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
    pub rate_limit: RateLimit,
}

/// Decode, classify and return the body together with rate-limit counters.
fn checked(response: &HttpResponse, expected: &[u16]) -> Result<(Body, RateLimit), ApiError> {
    let rate_limit = RateLimit::from_response(response);
    debug!(
        status = response.status,
        remaining = ?rate_limit.remaining,
        "decoding response"
    );
    let body = decode_body(response)?;
    classify(response, &body, expected)?;
    Ok((body, rate_limit))
}

fn take_data(body: Body) -> Option<Value> {
    match body {
        Body::Json(Value::Object(mut object)) => match object.remove("data") {
            Some(Value::Null) | None => None,
            Some(data) => Some(data),
        },
        _ => None,
    }
}

/// Parse a response whose `data` member is required.
pub fn parse_data<T>(response: &HttpResponse, expected: &[u16]) -> Result<Response<T>, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    let (body, rate_limit) = checked(response, expected)?;
    let data = take_data(body).ok_or_else(|| ApiError::Decode("response has no data".to_string()))?;
    Ok(Response {
        data: map_resource(&data)?,
        rate_limit,
    })
}

/// Parse a response whose `data` member may be absent, null, or whose body
/// may be empty.
pub fn parse_optional_data<T>(
    response: &HttpResponse,
    expected: &[u16],
) -> Result<Response<Option<T>>, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    let (body, rate_limit) = checked(response, expected)?;
    let data = take_data(body).map(|data| map_resource(&data)).transpose()?;
    Ok(Response { data, rate_limit })
}

/// Parse a response whose body carries nothing of interest (204 and the
/// like). Any body present is still decoded, so malformed JSON on success is
/// reported.
pub fn parse_empty(response: &HttpResponse, expected: &[u16]) -> Result<Response<()>, ApiError> {
    let (_, rate_limit) = checked(response, expected)?;
    Ok(Response {
        data: (),
        rate_limit,
    })
}

/// Parse a paginated list response.
pub fn parse_collection<T>(
    response: &HttpResponse,
    expected: &[u16],
) -> Result<CollectionResponse<T>, ApiError>
where
    T: serde::de::DeserializeOwned,
{
    let (body, rate_limit) = checked(response, expected)?;
    let Body::Json(Value::Object(mut object)) = body else {
        return Err(ApiError::Decode("expected a JSON object envelope".to_string()));
    };

    let data: Vec<T> = match object.remove("data") {
        Some(data) => map_resource(&data)?,
        None => return Err(ApiError::Decode("response has no data".to_string())),
    };
    let pagination = match object.remove("pagination") {
        Some(Value::Null) | None => Pagination::single_page(data.len()),
        Some(pagination) => map_resource(&pagination)?,
    };

    Ok(CollectionResponse {
        data,
        pagination,
        rate_limit,
    })
}
