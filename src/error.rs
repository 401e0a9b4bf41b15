//! cellgpt error types

use std::time::Duration;

/// Remediation text attached to [`CellGptError::MissingApiKey`].
pub const MISSING_API_KEY_HELP: &str =
    "no OpenAI API key configured; store one with set_api_key (SET_API_KEY in the sheet)";

/// cellgpt error types.
///
/// Every variant is fatal for the call that produced it. Non-fatal outcomes
/// such as empty input or an empty upstream answer are represented by
/// [`CompletionResult::Empty`](crate::CompletionResult::Empty) instead.
#[derive(Debug, thiserror::Error)]
pub enum CellGptError {
    // Configuration errors
    #[error("{}", MISSING_API_KEY_HELP)]
    MissingApiKey,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("credential store error: {0}")]
    Store(String),
}

/// Coarse classification of a [`CellGptError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised before any external call (missing key, bad config, bad input).
    Configuration,
    /// The external call or its surrounding I/O failed.
    Transport,
}

impl CellGptError {
    /// Which side of the pipeline the error came from.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CellGptError::MissingApiKey
            | CellGptError::Configuration(_)
            | CellGptError::InvalidInput(_) => ErrorKind::Configuration,
            CellGptError::Http(_)
            | CellGptError::Api { .. }
            | CellGptError::RateLimited { .. }
            | CellGptError::AuthenticationFailed
            | CellGptError::Json(_)
            | CellGptError::Store(_) => ErrorKind::Transport,
        }
    }

    /// Render the error the way a spreadsheet cell displays a formula error.
    pub fn to_formula_error(&self) -> String {
        format!("#ERROR! {self}")
    }
}

/// Result type alias for cellgpt operations
pub type Result<T> = std::result::Result<T, CellGptError>;
