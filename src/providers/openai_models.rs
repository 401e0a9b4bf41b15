//! OpenAI `/v1/models` response types.
//!
//! Kept apart from [`openai`](super::openai) so the chat completion path stays
//! focused on request and response bodies.

use serde::Deserialize;

/// `/v1/models` list response.
#[derive(Debug, Deserialize)]
pub(crate) struct ModelsResponse {
    #[serde(default)]
    pub data: Vec<ModelEntry>,
}

/// A single model entry.
#[derive(Debug, Deserialize)]
pub(crate) struct ModelEntry {
    pub id: String,
}

/// Model ids from a listing, sorted and deduplicated.
pub(crate) fn into_model_ids(response: ModelsResponse) -> Vec<String> {
    let mut ids: Vec<String> = response
        .data
        .into_iter()
        .map(|entry| entry.id)
        .filter(|id| !id.is_empty())
        .collect();
    ids.sort();
    ids.dedup();
    ids
}
