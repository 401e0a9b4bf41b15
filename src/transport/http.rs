//! [`Transport`] over `reqwest::blocking`.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::Deserialize;

use super::{HttpMethod, HttpRequest, Transport};
use crate::version::user_agent;
use crate::{CellGptError, Result};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Blocking HTTP transport.
#[derive(Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Create a transport with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent())
            .build()
            .map_err(|e| CellGptError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    /// Wrap an existing client (shared connection pool, custom TLS, ...).
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: &HttpRequest) -> Result<String> {
        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .map_err(|e| CellGptError::Http(e.to_string()))?;

        let response = handle_response_errors(response)?;
        response
            .text()
            .map_err(|e| CellGptError::Http(e.to_string()))
    }
}

/// OpenAI-style error envelope: `{"error": {"message": "..."}}`.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Check response status and map to appropriate error.
fn handle_response_errors(response: Response) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        401 => Err(CellGptError::AuthenticationFailed),
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(CellGptError::RateLimited { retry_after })
        }
        code => {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("completion API error: {status}"));
            Err(CellGptError::Api {
                status: code,
                message,
            })
        }
    }
}
