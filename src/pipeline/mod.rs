//! The single-cell completion pipeline and its shape-preserving batch form.
//!
//! Per cell:
//!
//! ```text
//! Start -> Cleaned -> ShortCircuitEmpty
//!                  -> CacheHit -> Done
//!                  -> CacheMiss -> ExternalCall -> Success -> store -> Done
//!                                               -> UpstreamEmpty -> Done (sentinel, uncached)
//!                                               -> TransportFailure -> Fatal
//! ```

pub mod batch;
mod normalize;

pub use batch::map_cells;
pub use normalize::{CompletionRequestBuilder, clean_value};

use tracing::debug;

use crate::Result;
use crate::cache::{CacheKey, RequestCache};
use crate::providers::OpenAiClient;
use crate::telemetry;
use crate::types::{CellValue, CompletionResult, GenerationParams, PromptValue, Shaped};

/// Cleans, caches and dispatches completions.
pub struct CompletionPipeline {
    client: OpenAiClient,
    cache: RequestCache,
    requests: CompletionRequestBuilder,
}

impl CompletionPipeline {
    pub fn new(
        client: OpenAiClient,
        cache: RequestCache,
        requests: CompletionRequestBuilder,
    ) -> Self {
        Self {
            client,
            cache,
            requests,
        }
    }

    pub fn client(&self) -> &OpenAiClient {
        &self.client
    }

    pub fn cache(&self) -> &RequestCache {
        &self.cache
    }

    /// Run one cell through the pipeline.
    pub fn complete_cell(
        &self,
        api_key: &str,
        cell: &CellValue,
        params: &GenerationParams,
    ) -> Result<CompletionResult> {
        let Some(request) = self.requests.build(cell, params) else {
            metrics::counter!(telemetry::EMPTY_RESULTS_TOTAL, "reason" => "input").increment(1);
            debug!(state = "short_circuit_empty", "blank prompt");
            return Ok(CompletionResult::Empty);
        };

        let key = CacheKey::for_request(&request);
        if let Some(text) = self.cache.get(&key) {
            debug!(state = "cache_hit", model = %request.model);
            return Ok(CompletionResult::Text(text));
        }

        debug!(state = "external_call", model = %request.model);
        let result = self.client.chat_completion(api_key, &request)?;

        match &result {
            CompletionResult::Text(text) => {
                self.cache.put(&key, text);
                debug!(state = "stored", model = %request.model);
            }
            CompletionResult::Empty => {
                metrics::counter!(telemetry::EMPTY_RESULTS_TOTAL, "reason" => "upstream")
                    .increment(1);
                debug!(state = "upstream_empty", model = %request.model);
            }
        }
        Ok(result)
    }

    /// Run every cell of `prompt` through the pipeline, preserving shape.
    pub fn complete(
        &self,
        api_key: &str,
        prompt: &PromptValue,
        params: &GenerationParams,
    ) -> Result<Shaped<CompletionResult>> {
        map_cells(prompt, |cell| self.complete_cell(api_key, cell, params))
    }
}
