//! Completion API clients.

pub mod openai;
mod openai_models;

pub use openai::OpenAiClient;
