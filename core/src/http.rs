//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `CardBuilderClient` builds an
//! `HttpRequest` and parses an `HttpResponse`; whatever sits in between is a
//! `Transport`. The crate ships `UreqTransport` for real traffic, and tests
//! substitute their own implementation to observe the exact bytes sent.

use std::time::Instant;

use tracing::debug;

use crate::error::ApiError;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method for a request. The card builder endpoint only takes POSTs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one request/response exchange.
///
/// Implementations must hand back non-2xx responses as data rather than
/// errors; status interpretation belongs to the client. Only failures that
/// leave no response at all map to `ApiError::Transport`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq::Agent`.
///
/// The default agent has status-as-error disabled and no timeouts. Callers
/// that need deadlines build their own agent and pass it to `with_agent`.
///
/// Response bodies are read without a size cap: card data embeds artwork
/// as base64 data URLs and easily passes ureq's 10 MiB default. Use
/// `body_limit` to put a cap back.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    body_limit: u64,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self::with_agent(agent)
    }

    /// Wrap a preconfigured agent. It should keep `http_status_as_error`
    /// off, otherwise 4xx/5xx responses surface as `Transport` errors.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self {
            agent,
            body_limit: u64::MAX,
        }
    }

    /// Fail with `ApiError::Transport` when a body exceeds `bytes`.
    pub fn body_limit(mut self, bytes: u64) -> Self {
        self.body_limit = bytes;
        self
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let started = Instant::now();
        let mut builder = match request.method {
            HttpMethod::Post => self.agent.post(request.url.as_str()),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder
            .send(request.body.as_bytes())
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                let v = v.to_str().ok()?;
                Some((k.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.body_limit)
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        debug!(status, elapsed_ms, bytes = body.len(), "exchange complete");
        Ok(HttpResponse { status, headers, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Post,
            url: "http://localhost".to_string(),
            headers: vec![("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body: String::new(),
        };
        assert_eq!(req.header("content-type"), Some(FORM_CONTENT_TYPE));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn success_range_is_2xx_only() {
        let mk = |status| HttpResponse {
            status,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(mk(200).is_success());
        assert!(mk(204).is_success());
        assert!(!mk(301).is_success());
        assert!(!mk(500).is_success());
    }
}
