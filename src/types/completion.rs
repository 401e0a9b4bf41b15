//! Request and result types for a single-cell completion.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::message::Message;

/// Text shown in a cell when there is nothing to say.
pub const EMPTY_SENTINEL: &str = "EMPTY";

/// Outcome of one cell's completion.
///
/// `Empty` covers both blank input and a well-formed upstream answer with no
/// content. It is a value, never an error, and it is never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    /// Generated text, trimmed and non-empty.
    Text(String),
    /// The reserved "no content" sentinel.
    Empty,
}

impl CompletionResult {
    /// Wrap upstream text, collapsing blank answers into [`CompletionResult::Empty`].
    pub fn from_text(text: impl AsRef<str>) -> Self {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            CompletionResult::Empty
        } else {
            CompletionResult::Text(trimmed.to_string())
        }
    }

    /// Cell text: the generated answer or [`EMPTY_SENTINEL`].
    pub fn as_str(&self) -> &str {
        match self {
            CompletionResult::Text(text) => text,
            CompletionResult::Empty => EMPTY_SENTINEL,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CompletionResult::Empty)
    }
}

impl fmt::Display for CompletionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call overrides for the facade entry points.
///
/// Unset fields fall back to the configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl CompletionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn temperature(mut self, temp: f64) -> Self {
        self.temperature = Some(temp);
        self
    }
}

/// Fully resolved generation parameters shared by every cell of one call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// One cell's request after cleaning. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    pub prompt: String,
    /// Empty when no system instruction applies.
    pub system_prompt: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl NormalizedRequest {
    /// Optional system message first, then exactly one user message.
    pub fn messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(2);
        if !self.system_prompt.is_empty() {
            messages.push(Message::system(&self.system_prompt));
        }
        messages.push(Message::user(&self.prompt));
        messages
    }
}
