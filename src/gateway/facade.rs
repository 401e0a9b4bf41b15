//! CellGpt - the spreadsheet-facing entry points

use std::fmt;
use std::sync::Arc;

use tracing::{info, info_span, warn};

use crate::config::Config;
use crate::credentials::{API_KEY_PROPERTY, PropertyStore};
use crate::pipeline::{CompletionPipeline, CompletionRequestBuilder};
use crate::types::{CompletionOptions, CompletionResult, GenerationParams, PromptValue, Shaped};
use crate::{CellGptError, Result};

/// Outcome of [`CellGpt::set_api_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyStatus {
    /// Empty input removed the stored key.
    Cleared,
    /// The key was stored and the listing endpoint accepted it.
    Verified { models: usize },
    /// The listing endpoint refused the key; the previous key was kept.
    Rejected { reason: String },
}

impl ApiKeyStatus {
    pub fn is_success(&self) -> bool {
        !matches!(self, ApiKeyStatus::Rejected { .. })
    }
}

impl fmt::Display for ApiKeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiKeyStatus::Cleared => f.write_str("API key cleared"),
            ApiKeyStatus::Verified { models } => {
                write!(f, "API key saved ({models} models available)")
            }
            ApiKeyStatus::Rejected { reason } => write!(f, "API key rejected: {reason}"),
        }
    }
}

/// Named completion functions over one shared pipeline.
///
/// Each entry point accepts a scalar or a rectangular grid and returns the
/// same shape. A fatal error anywhere aborts the whole call.
pub struct CellGpt {
    config: Config,
    pipeline: CompletionPipeline,
    credentials: Arc<dyn PropertyStore>,
}

impl CellGpt {
    pub(crate) fn new(
        config: Config,
        pipeline: CompletionPipeline,
        credentials: Arc<dyn PropertyStore>,
    ) -> Self {
        Self {
            config,
            pipeline,
            credentials,
        }
    }

    /// Create a new builder for configuring the facade.
    pub fn builder() -> super::CellGptBuilder {
        super::CellGptBuilder::new()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> &CompletionPipeline {
        &self.pipeline
    }

    /// Complete with the default model; model, max tokens and temperature
    /// may be overridden per call.
    pub fn gpt(
        &self,
        prompt: &PromptValue,
        options: &CompletionOptions,
    ) -> Result<Shaped<CompletionResult>> {
        let model = options
            .model
            .clone()
            .unwrap_or_else(|| self.config.models.default.clone());
        self.run("gpt", prompt, self.params(model, options))
    }

    /// Complete with the fixed low-cost model. `options.model` is ignored.
    pub fn gpt_basic(
        &self,
        prompt: &PromptValue,
        options: &CompletionOptions,
    ) -> Result<Shaped<CompletionResult>> {
        let model = self.config.models.basic.clone();
        self.run("gpt_basic", prompt, self.params(model, options))
    }

    /// Complete with the fixed higher-capability model. `options.model` is
    /// ignored.
    pub fn gpt_advanced(
        &self,
        prompt: &PromptValue,
        options: &CompletionOptions,
    ) -> Result<Shaped<CompletionResult>> {
        let model = self.config.models.advanced.clone();
        self.run("gpt_advanced", prompt, self.params(model, options))
    }

    /// Every model id the stored key can use, one per row. Never cached.
    pub fn models(&self) -> Result<Shaped<String>> {
        let api_key = self.api_key()?;
        let ids = self.pipeline.client().list_models(&api_key)?;
        Ok(Shaped::Grid(ids.into_iter().map(|id| vec![id]).collect()))
    }

    /// Store (or, with blank input, clear) the API key.
    ///
    /// A non-empty key is verified by listing models with it. If verification
    /// fails the previously stored key (or its absence) is put back. A key the
    /// endpoint refuses is reported as [`ApiKeyStatus::Rejected`]; any other
    /// failure (network, rate limit, server error) is returned as `Err`.
    pub fn set_api_key(&self, key: &str) -> Result<ApiKeyStatus> {
        let key = key.trim();
        if key.is_empty() {
            self.credentials.delete(API_KEY_PROPERTY)?;
            info!("API key cleared");
            return Ok(ApiKeyStatus::Cleared);
        }

        let previous = self.credentials.get(API_KEY_PROPERTY)?;
        self.credentials.set(API_KEY_PROPERTY, key)?;
        match self.pipeline.client().list_models(key) {
            Ok(models) => {
                info!(models = models.len(), "API key verified");
                Ok(ApiKeyStatus::Verified {
                    models: models.len(),
                })
            }
            Err(e) => {
                warn!(error = %e, restored = previous.is_some(), "API key verification failed");
                self.restore_api_key(previous.as_deref())?;
                if matches!(e, CellGptError::AuthenticationFailed) {
                    Ok(ApiKeyStatus::Rejected {
                        reason: e.to_string(),
                    })
                } else {
                    Err(e)
                }
            }
        }
    }

    fn restore_api_key(&self, previous: Option<&str>) -> Result<()> {
        match previous {
            Some(key) => self.credentials.set(API_KEY_PROPERTY, key),
            None => self.credentials.delete(API_KEY_PROPERTY),
        }
    }

    fn params(&self, model: String, options: &CompletionOptions) -> GenerationParams {
        GenerationParams {
            model,
            max_tokens: options
                .max_tokens
                .unwrap_or(self.config.generation.max_tokens),
            temperature: options
                .temperature
                .unwrap_or(self.config.generation.temperature),
        }
    }

    fn run(
        &self,
        entry_point: &'static str,
        prompt: &PromptValue,
        params: GenerationParams,
    ) -> Result<Shaped<CompletionResult>> {
        let (rows, columns) = prompt.dimensions();
        let _span = info_span!(
            "completion",
            entry_point,
            model = %params.model,
            rows,
            columns
        )
        .entered();

        CompletionRequestBuilder::validate_params(&params)?;
        prompt.validate()?;
        let api_key = self.api_key()?;

        self.pipeline.complete(&api_key, prompt, &params)
    }

    /// The stored key, or [`CellGptError::MissingApiKey`].
    fn api_key(&self) -> Result<String> {
        self.credentials
            .get(API_KEY_PROPERTY)?
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(CellGptError::MissingApiKey)
    }
}
