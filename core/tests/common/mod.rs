//! Shared helpers: raw HTTP fixtures and a recording stub transport.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use dnsimple_core::{ApiError, ClientConfig, Dnsimple, HttpRequest, HttpResponse, Transport};

pub const ACCOUNT_ID: u64 = 1010;

/// Parse `tests/fixtures/<name>`: a status line, headers, a blank line, and
/// the body.
pub fn read_http_fixture(name: &str) -> HttpResponse {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    let raw = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{path}: {e}"));
    let raw = raw.replace("\r\n", "\n");
    let (head, body) = raw.split_once("\n\n").unwrap_or((raw.as_str(), ""));

    let mut lines = head.lines();
    let status_line = lines.next().unwrap();
    let status: u16 = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| panic!("{path}: bad status line {status_line:?}"));

    let headers = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect();

    HttpResponse {
        status,
        headers,
        body: body.as_bytes().to_vec(),
    }
}

/// Transport that replays queued responses and records every request.
#[derive(Clone, Default)]
pub struct StubTransport {
    responses: Rc<RefCell<VecDeque<HttpResponse>>>,
    requests: Rc<RefCell<Vec<HttpRequest>>>,
}

impl StubTransport {
    pub fn replying(fixture: &str) -> Self {
        let stub = Self::default();
        stub.push(read_http_fixture(fixture));
        stub
    }

    pub fn push(&self, response: HttpResponse) {
        self.responses.borrow_mut().push_back(response);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Transport for StubTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ApiError::Connection("no stubbed response left".to_string()))
    }
}

pub fn config() -> ClientConfig {
    ClientConfig::new("https://api.dnsimple.test").with_access_token("a1b2c3")
}

/// A client over a stub that answers once with `fixture`. The stub is
/// returned too so tests can inspect what was sent.
pub fn stubbed(fixture: &str) -> (Dnsimple<StubTransport>, StubTransport) {
    let stub = StubTransport::replying(fixture);
    (Dnsimple::with_transport(config(), stub.clone()), stub)
}
