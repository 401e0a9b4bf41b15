//! Public types for the cellgpt API.

mod completion;
mod message;
mod shape;

pub use completion::{
    CompletionOptions, CompletionResult, EMPTY_SENTINEL, GenerationParams, NormalizedRequest,
};
pub use message::{Message, Role};
pub use shape::{CellValue, PromptValue, Shaped};
