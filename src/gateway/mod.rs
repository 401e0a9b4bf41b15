//! Facade and builder

mod builder;
mod facade;

pub use builder::CellGptBuilder;
pub use facade::{ApiKeyStatus, CellGpt};
