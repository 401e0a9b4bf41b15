//! Cell cleaning and request normalization.

use crate::types::{CellValue, GenerationParams, NormalizedRequest};
use crate::{CellGptError, Result};

/// Coerce a cell to prompt text.
///
/// Numbers are stringified (`42.0` becomes `"42"`), empty cells become empty
/// text, everything else is trimmed.
pub fn clean_value(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Number(n) => n.to_string(),
        CellValue::Bool(b) => b.to_string(),
        CellValue::Text(text) => text.trim().to_string(),
    }
}

/// Turns raw cell content into [`NormalizedRequest`]s.
///
/// Holds the cleaned system prompt so every cell of a call shares it.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequestBuilder {
    system_prompt: String,
}

impl CompletionRequestBuilder {
    pub fn new(system_prompt: &CellValue) -> Self {
        Self {
            system_prompt: clean_value(system_prompt),
        }
    }

    /// Cleaned system prompt; empty means no system message is sent.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Reject parameters the endpoint cannot accept.
    pub fn validate_params(params: &GenerationParams) -> Result<()> {
        if params.model.trim().is_empty() {
            return Err(CellGptError::InvalidInput("model must not be empty".into()));
        }
        if params.max_tokens == 0 {
            return Err(CellGptError::InvalidInput(
                "max_tokens must be a positive integer".into(),
            ));
        }
        if !params.temperature.is_finite() {
            return Err(CellGptError::InvalidInput(format!(
                "temperature must be a finite number, got {}",
                params.temperature
            )));
        }
        Ok(())
    }

    /// Normalize one cell.
    ///
    /// Returns `None` when the prompt cleans to empty text; the caller then
    /// short-circuits to the empty sentinel without touching cache or network.
    pub fn build(&self, prompt: &CellValue, params: &GenerationParams) -> Option<NormalizedRequest> {
        let prompt = clean_value(prompt);
        if prompt.is_empty() {
            return None;
        }
        Some(NormalizedRequest {
            prompt,
            system_prompt: self.system_prompt.clone(),
            model: params.model.trim().to_string(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> GenerationParams {
        GenerationParams {
            model: "gpt-4o-mini".into(),
            max_tokens: 100,
            temperature: 0.0,
        }
    }

    #[test]
    fn numbers_are_stringified() {
        assert_eq!(clean_value(&CellValue::Number(42.0)), "42");
        assert_eq!(clean_value(&CellValue::Number(3.25)), "3.25");
        assert_eq!(clean_value(&CellValue::Number(-1.0)), "-1");
    }

    #[test]
    fn text_is_trimmed_and_empty_is_blank() {
        assert_eq!(clean_value(&"  hi there \t".into()), "hi there");
        assert_eq!(clean_value(&CellValue::Empty), "");
        assert_eq!(clean_value(&CellValue::Bool(true)), "true");
    }

    #[test]
    fn blank_prompts_short_circuit() {
        let builder = CompletionRequestBuilder::new(&"sys".into());
        for prompt in [CellValue::Empty, "".into(), "   \n\t".into()] {
            assert!(builder.build(&prompt, &params()).is_none());
        }
    }

    #[test]
    fn build_carries_params_and_system_prompt() {
        let builder = CompletionRequestBuilder::new(&"  Be brief.  ".into());
        let request = builder.build(&" Hello ".into(), &params()).unwrap();
        assert_eq!(request.prompt, "Hello");
        assert_eq!(request.system_prompt, "Be brief.");
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.max_tokens, 100);
    }

    #[test]
    fn numeric_prompt_is_sent_as_text() {
        let builder = CompletionRequestBuilder::default();
        let request = builder.build(&CellValue::Number(7.0), &params()).unwrap();
        assert_eq!(request.prompt, "7");
        assert_eq!(request.system_prompt, "");
    }

    #[test]
    fn invalid_params_are_rejected() {
        let zero = GenerationParams {
            max_tokens: 0,
            ..params()
        };
        assert!(CompletionRequestBuilder::validate_params(&zero).is_err());

        let nan = GenerationParams {
            temperature: f64::NAN,
            ..params()
        };
        assert!(CompletionRequestBuilder::validate_params(&nan).is_err());

        let blank = GenerationParams {
            model: " ".into(),
            ..params()
        };
        assert!(CompletionRequestBuilder::validate_params(&blank).is_err());

        assert!(CompletionRequestBuilder::validate_params(&params()).is_ok());
    }
}
