//! OpenAI chat completions client over a [`Transport`].
//!
//! See: <https://platform.openai.com/docs/api-reference/chat>

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::openai_models::{ModelsResponse, into_model_ids};
use crate::Result;
use crate::telemetry;
use crate::transport::{HttpRequest, Transport};
use crate::types::{CompletionResult, Message, NormalizedRequest};

/// Default base URL for the OpenAI API.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for the chat completions and model listing endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl OpenAiClient {
    /// Create a client against the public OpenAI API.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_base_url(transport, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (proxies, compatible servers,
    /// wiremock).
    pub fn with_base_url(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The `POST /chat/completions` request for one normalized cell.
    pub fn completion_request(
        &self,
        api_key: &str,
        request: &NormalizedRequest,
    ) -> Result<HttpRequest> {
        let body = ChatCompletionBody {
            model: &request.model,
            max_tokens: request.max_tokens,
            messages: request.messages(),
            temperature: request.temperature,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        };
        let url = format!("{}/chat/completions", self.base_url);
        Ok(HttpRequest::post(url, serde_json::to_value(body)?).bearer_auth(api_key))
    }

    /// Run one chat completion.
    ///
    /// A well-formed response without content yields
    /// [`CompletionResult::Empty`]; transport and decoding failures are errors.
    #[instrument(name = "openai.chat", skip_all, fields(model = %request.model))]
    pub fn chat_completion(
        &self,
        api_key: &str,
        request: &NormalizedRequest,
    ) -> Result<CompletionResult> {
        let http_request = self.completion_request(api_key, request)?;
        let raw = self.execute("chat", &http_request)?;

        let response: ChatCompletionResponse = serde_json::from_str(&raw)?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        Ok(CompletionResult::from_text(content))
    }

    /// Every model id visible to `api_key`, sorted.
    #[instrument(name = "openai.models", skip_all)]
    pub fn list_models(&self, api_key: &str) -> Result<Vec<String>> {
        let http_request =
            HttpRequest::get(format!("{}/models", self.base_url)).bearer_auth(api_key);
        let raw = self.execute("models", &http_request)?;
        let response: ModelsResponse = serde_json::from_str(&raw)?;
        Ok(into_model_ids(response))
    }

    fn execute(&self, operation: &'static str, request: &HttpRequest) -> Result<String> {
        let start = Instant::now();
        let result = self.transport.execute(request);

        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "operation" => operation)
            .record(start.elapsed().as_secs_f64());
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL, "operation" => operation, "status" => status)
            .increment(1);

        result
    }
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
    temperature: f64,
    top_p: f64,
    frequency_penalty: f64,
    presence_penalty: f64,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
