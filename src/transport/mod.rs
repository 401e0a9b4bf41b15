//! Blocking HTTP transport abstraction.
//!
//! The pipeline talks to the completion API through [`Transport`] so tests and
//! hosts can substitute their own request executor. [`ReqwestTransport`] is
//! the production implementation.

mod http;

pub use http::{DEFAULT_TIMEOUT_SECS, ReqwestTransport};

use crate::Result;

/// HTTP method used by the completion API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A single outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: Some(body),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn bearer_auth(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    /// Value of the first header named `name` (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Executes a request and returns the raw response body.
///
/// Implementations block until a response or failure. Non-2xx responses are
/// errors; a successful response body is returned unparsed.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<String>;
}
