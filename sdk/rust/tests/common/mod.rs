//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use broadcastt::{Broadcastt, QueryParams, Request, Response, Signer, Transport, TransportError};
use url::Url;

pub const APP_ID: &str = "testid";
pub const APP_KEY: &str = "testkey";
pub const APP_SECRET: &str = "testsecret";

/// In-memory transport that records every request and answers with a fixed
/// status. With `http_errors` set, 4xx/5xx statuses are raised the way
/// `ReqwestTransport` raises them.
#[derive(Clone)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<Request>>>,
    status: u16,
    body: String,
    http_errors: bool,
}

impl RecordingTransport {
    pub fn new(status: u16) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            status,
            body: "{}".to_string(),
            http_errors: true,
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn http_errors(mut self, enabled: bool) -> Self {
        self.http_errors = enabled;
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        self.requests.lock().unwrap().push(request);

        if self.http_errors && (400..600).contains(&self.status) {
            return Err(TransportError::Status {
                status: self.status,
                body: self.body.clone(),
            });
        }

        Ok(Response::new(self.status, self.body.clone()))
    }
}

/// Client against the default endpoint backed by `transport`.
pub fn client(app_id: &str, transport: &RecordingTransport) -> Broadcastt {
    Broadcastt::builder(app_id, APP_KEY, APP_SECRET)
        .transport(transport.clone())
        .build()
        .unwrap()
}

pub fn parse_uri(request: &Request) -> Url {
    Url::parse(&request.uri).unwrap()
}

/// Pattern for a signed query string followed by `rest` (already escaped).
pub fn signed_query_pattern(rest: &str) -> regex::Regex {
    regex::Regex::new(&format!(
        r"^auth_key=testkey&auth_signature=\w+&auth_timestamp=\d+&auth_version=1\.0{}$",
        rest
    ))
    .unwrap()
}

/// Re-sign `query` the way the server does and compare.
pub fn signature_is_valid(method: &str, path: &str, query: &str) -> bool {
    let received = QueryParams::parse(query);
    let timestamp: i64 = match received.get("auth_timestamp") {
        Some(value) => value.to_string().parse().unwrap(),
        None => return false,
    };

    let unsigned: QueryParams = received
        .iter()
        .filter(|(key, _)| key.as_str() != "auth_signature")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let expected = Signer::new(APP_KEY, APP_SECRET).build_auth_query_string(
        method,
        path,
        &unsigned,
        Some(timestamp),
    );

    expected == query
}

pub fn invalid_channels() -> Vec<&'static str> {
    vec!["test-channel:", ":test-channel", ":\ntest-channel", "test channel", ""]
}

pub fn invalid_socket_ids() -> Vec<&'static str> {
    vec!["1.", ".1", "", "1.1:", ":1.1", "1.1\n:", "1:1", "a.1"]
}
