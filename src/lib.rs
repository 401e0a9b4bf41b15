//! cellgpt - LLM completion functions for spreadsheet cells
//!
//! This crate turns cell content into chat completion requests and returns
//! the generated text in the caller's shape: a scalar yields a scalar, a grid
//! yields a grid of identical dimensions. Answers are cached under a
//! deterministic key so recalculating a sheet does not re-query the model.
//!
//! The host environment is injected: a [`Transport`] for HTTP, a
//! [`PropertyStore`] for the API key and [`CacheScopes`] for shared caches.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use cellgpt::{CellGpt, CompletionOptions, MemoryPropertyStore, PromptValue};
//!
//! fn main() -> cellgpt::Result<()> {
//!     let gpt = CellGpt::builder()
//!         .credentials(Arc::new(MemoryPropertyStore::with_api_key("sk-your-key")))
//!         .build()?;
//!
//!     let answers = gpt.gpt(
//!         &PromptValue::grid(vec![
//!             vec!["Capital of France?".into()],
//!             vec!["Capital of Peru?".into()],
//!         ])?,
//!         &CompletionOptions::new().max_tokens(20),
//!     )?;
//!
//!     println!("{answers:?}");
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod gateway;
pub mod pipeline;
pub mod providers;
pub mod telemetry;
pub mod transport;
pub mod types;
mod version;

// Re-export main types at crate root
pub use cache::{CacheDuration, CacheKey, CacheScope, CacheScopes, CacheStore, MokaCacheStore};
pub use config::Config;
pub use credentials::{FilePropertyStore, MemoryPropertyStore, PropertyStore};
pub use error::{CellGptError, ErrorKind, Result};
pub use gateway::{ApiKeyStatus, CellGpt, CellGptBuilder};
pub use transport::{HttpMethod, HttpRequest, ReqwestTransport, Transport};
pub use version::{PKG_VERSION, version_string};

// Re-export all types
pub use types::{
    CellValue, CompletionOptions, CompletionResult, EMPTY_SENTINEL, GenerationParams, Message,
    NormalizedRequest, PromptValue, Role, Shaped,
};
