//! Deterministic cache keys for completion requests.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::types::NormalizedRequest;

/// Separates fields in the hashed input so boundaries cannot shift
/// (`"ab" + "c"` and `"a" + "bc"` hash differently).
const FIELD_SEPARATOR: u8 = 0x1f;

/// Hex-encoded SHA-256 digest identifying one `(prompt, model, max_tokens,
/// temperature)` tuple. Always 64 characters.
///
/// The system prompt is not part of the key: two requests that differ only in
/// their system instruction share a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a normalized request.
    pub fn for_request(request: &NormalizedRequest) -> Self {
        cache_key(
            &request.prompt,
            &request.model,
            request.max_tokens,
            request.temperature,
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the cache key from the stringified fields in fixed order.
///
/// No salt and no clock input: the same tuple maps to the same key across
/// processes, users and sessions.
pub fn cache_key(prompt: &str, model: &str, max_tokens: u32, temperature: f64) -> CacheKey {
    let max_tokens = max_tokens.to_string();
    let temperature = temperature.to_string();

    let mut hasher = Sha256::new();
    for field in [prompt, model, max_tokens.as_str(), temperature.as_str()] {
        hasher.update(field.as_bytes());
        hasher.update([FIELD_SEPARATOR]);
    }
    CacheKey(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_deterministic() {
        let k1 = cache_key("hello", "model-a", 100, 0.5);
        let k2 = cache_key("hello", "model-a", 100, 0.5);
        assert_eq!(k1, k2);
    }

    #[test]
    fn cache_key_is_fixed_length_hex() {
        let key = cache_key("a much longer prompt than the digest itself", "m", 1, 0.0);
        assert_eq!(key.as_str().len(), 64);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn cache_key_differs_on_model() {
        assert_ne!(
            cache_key("hello", "model-a", 100, 0.5),
            cache_key("hello", "model-b", 100, 0.5)
        );
    }

    #[test]
    fn cache_key_differs_on_max_tokens() {
        assert_ne!(
            cache_key("hello", "model-a", 100, 0.5),
            cache_key("hello", "model-a", 101, 0.5)
        );
    }

    #[test]
    fn cache_key_differs_on_temperature() {
        assert_ne!(
            cache_key("hello", "model-a", 100, 0.5),
            cache_key("hello", "model-a", 100, 0.7)
        );
    }

    #[test]
    fn field_boundaries_do_not_shift() {
        assert_ne!(
            cache_key("ab", "c", 1, 0.0),
            cache_key("a", "bc", 1, 0.0)
        );
    }

    #[test]
    fn system_prompt_is_not_part_of_the_key() {
        let base = NormalizedRequest {
            prompt: "Hello".into(),
            system_prompt: "Answer in French.".into(),
            model: "m".into(),
            max_tokens: 10,
            temperature: 0.0,
        };
        let other = NormalizedRequest {
            system_prompt: "Answer in German.".into(),
            ..base.clone()
        };
        assert_eq!(CacheKey::for_request(&base), CacheKey::for_request(&other));
    }
}
