//! Request builders, response parsers, and the transport-backed client.
//!
//! # Design
//! `DnsimpleClient` holds only an immutable `ClientConfig` and carries no
//! mutable state between calls. Each API operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. Both are pure, so the core stays deterministic and
//! testable without a network.
//!
//! `Dnsimple<T>` pairs a `DnsimpleClient` with a `Transport` and exposes one
//! method per operation: build, send once, parse. Local precondition checks
//! run in `build_*`, so an invalid call never reaches the transport.
//!
//! Operations are grouped by resource in the submodules.

mod certificates;
mod domains;
mod identity;
mod registrar;
mod templates;

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};

/// Synchronous, stateless request builder and response parser.
#[derive(Debug, Clone)]
pub struct DnsimpleClient {
    config: ClientConfig,
}

impl DnsimpleClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for `segments` under the base URL. Each segment is
    /// percent-encoded on its own, so identifiers cannot inject path
    /// separators.
    fn url(&self, segments: &[&str], query: &[(String, String)]) -> Result<String, ApiError> {
        let base = &self.config.base_url;
        let mut url = Url::parse(base)
            .map_err(|e| ApiError::InvalidInput(format!("invalid base URL {base:?}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidInput(format!("base URL {base:?} is not http(s)")));
        }
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidInput(format!("base URL {base:?} cannot carry a path")))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url.into())
    }

    fn request(
        &self,
        method: HttpMethod,
        segments: &[&str],
        query: &[(String, String)],
        body: Option<String>,
    ) -> Result<HttpRequest, ApiError> {
        let mut headers = vec![
            ("accept".to_string(), "application/json".to_string()),
            ("user-agent".to_string(), self.config.user_agent_header()),
        ];
        if let Some(token) = &self.config.access_token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        for (name, value) in &self.config.default_headers {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }

        Ok(HttpRequest {
            method,
            url: self.url(segments, query)?,
            headers,
            body,
        })
    }

    fn get(&self, segments: &[&str], query: &[(String, String)]) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Get, segments, query, None)
    }

    fn delete(&self, segments: &[&str]) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Delete, segments, &[], None)
    }

    fn post<B: Serialize>(&self, segments: &[&str], body: Option<&B>) -> Result<HttpRequest, ApiError> {
        let body = body.map(to_json).transpose()?;
        self.request(HttpMethod::Post, segments, &[], body)
    }

    fn put<B: Serialize>(&self, segments: &[&str], body: &B) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Put, segments, &[], Some(to_json(body)?))
    }

    fn patch<B: Serialize>(&self, segments: &[&str], body: &B) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Patch, segments, &[], Some(to_json(body)?))
    }
}

fn to_json<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Reject a blank path identifier before it reaches a URL.
fn identifier<'a>(value: &'a str, what: &str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput(format!("{what} must not be empty")));
    }
    Ok(trimmed)
}

/// API client bound to a transport.
///
/// Cheap to share across threads when `T` is: the configuration is read-only
/// and no call mutates the client.
#[derive(Clone)]
pub struct Dnsimple<T = UreqTransport> {
    core: DnsimpleClient,
    transport: T,
}

impl Dnsimple<UreqTransport> {
    /// Client over the default blocking transport.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Dnsimple<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            core: DnsimpleClient::new(config),
            transport,
        }
    }

    /// The underlying request builder and response parser.
    pub fn core(&self) -> &DnsimpleClient {
        &self.core
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        self.transport.send(request)
    }
}
