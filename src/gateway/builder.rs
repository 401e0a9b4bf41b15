//! Builder for configuring [`CellGpt`] instances

use std::sync::Arc;
use std::time::Duration;

use super::CellGpt;
use crate::cache::{CacheScopes, MokaCacheStore, RequestCache};
use crate::config::Config;
use crate::credentials::{MemoryPropertyStore, PropertyStore};
use crate::pipeline::{CompletionPipeline, CompletionRequestBuilder};
use crate::providers::OpenAiClient;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{CellValue, GenerationParams};
use crate::{CellGptError, Result};

/// Builder for configuring [`CellGpt`] instances.
///
/// Every collaborator is optional; unset ones get a working default:
///
/// - transport: [`ReqwestTransport`] with `api.timeout_secs`
/// - credentials: an empty [`MemoryPropertyStore`]
/// - cache: a script-scoped [`MokaCacheStore`] sized by `cache.max_entries`
pub struct CellGptBuilder {
    config: Config,
    transport: Option<Arc<dyn Transport>>,
    credentials: Option<Arc<dyn PropertyStore>>,
    cache_scopes: Option<CacheScopes>,
}

impl CellGptBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            transport: None,
            credentials: None,
            cache_scopes: None,
        }
    }

    /// Use this configuration instead of the built-in defaults.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Send requests through a custom transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Read and write the API key through this store.
    pub fn credentials(mut self, store: Arc<dyn PropertyStore>) -> Self {
        self.credentials = Some(store);
        self
    }

    /// Cache stores offered by the host, one per scope.
    pub fn cache_scopes(mut self, scopes: CacheScopes) -> Self {
        self.cache_scopes = Some(scopes);
        self
    }

    /// Build the facade.
    ///
    /// Fails with [`CellGptError::Configuration`] when the configured
    /// defaults could never produce a valid request.
    pub fn build(self) -> Result<CellGpt> {
        let config = self.config;

        for model in [
            &config.models.default,
            &config.models.basic,
            &config.models.advanced,
        ] {
            let params = GenerationParams {
                model: model.clone(),
                max_tokens: config.generation.max_tokens,
                temperature: config.generation.temperature,
            };
            CompletionRequestBuilder::validate_params(&params)
                .map_err(|e| CellGptError::Configuration(e.to_string()))?;
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(Duration::from_secs(
                config.api.timeout_secs,
            ))?),
        };

        let credentials: Arc<dyn PropertyStore> = match self.credentials {
            Some(store) => store,
            None => Arc::new(MemoryPropertyStore::new()),
        };

        let scopes = match self.cache_scopes {
            Some(scopes) => scopes,
            None => CacheScopes::script_only(Arc::new(MokaCacheStore::with_max_entries(
                config.cache.max_entries,
            ))),
        };

        let client = OpenAiClient::with_base_url(transport, &config.api.base_url);
        let cache = RequestCache::new(&scopes, config.cache.duration);
        let requests = CompletionRequestBuilder::new(&CellValue::Text(
            config.generation.system_prompt.clone(),
        ));

        Ok(CellGpt::new(
            config,
            CompletionPipeline::new(client, cache, requests),
            credentials,
        ))
    }
}

impl Default for CellGptBuilder {
    fn default() -> Self {
        Self::new()
    }
}
