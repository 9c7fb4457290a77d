//! HTTP transport.
//!
//! The client never talks to the network directly; it hands a fully signed
//! [`Request`] to a [`Transport`] and gets back a [`Response`]. The default
//! implementation wraps a pooled `reqwest::Client`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use thiserror::Error;

/// Errors raised by a transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connection, TLS, timeout or other client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from a transport configured to raise on HTTP errors.
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Any other transport failure.
    #[error("transport error: {0}")]
    Other(String),
}

/// HTTP method of an outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A signed request that has not been sent yet.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Duration,
}

impl Request {
    /// Value of the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Attach a body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// True for statuses in `[200, 300)`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Sends requests on behalf of the client.
///
/// Implementations decide whether a non-2xx status is an error
/// ([`TransportError::Status`]) or an ordinary [`Response`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, TransportError>;
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: HttpClient,
    http_errors: bool,
}

impl ReqwestTransport {
    /// Transport that raises on 4xx/5xx responses.
    pub fn new() -> Result<Self, TransportError> {
        let client = HttpClient::builder().build()?;
        Ok(Self::with_client(client))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client,
            http_errors: true,
        }
    }

    /// Whether 4xx/5xx responses are returned as [`TransportError::Status`]
    /// (`true`, the default) or as a plain [`Response`].
    pub fn http_errors(mut self, enabled: bool) -> Self {
        self.http_errors = enabled;
        self
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self
            .client
            .request(method, &request.uri)
            .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        if self.http_errors && (400..600).contains(&status) {
            return Err(TransportError::Status { status, body });
        }

        Ok(Response { status, body })
    }
}
