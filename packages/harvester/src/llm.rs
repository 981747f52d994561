//! LLM client seam and response parsing.
//!
//! Concrete providers live outside this crate; analyzers only depend on
//! the `generate(prompt) -> text` contract. Responses are expected to be
//! JSON but models routinely wrap them in markdown fences, so parsing
//! tolerates a leading ```` ```json ```` fence and a trailing ```` ``` ````.
//! Analyzers never fail an item on a parse error: they log the malformed
//! payload and substitute conservative defaults.

use async_trait::async_trait;

use crate::error::Result;

/// Maximum bytes of source text fed into a prompt.
pub const MAX_PROMPT_INPUT: usize = 4_096;

/// Text-generation contract consumed by the analyzers.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a completion for the prompt.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}

#[async_trait]
impl<T: LlmClient + ?Sized> LlmClient for std::sync::Arc<T> {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        (**self).generate(prompt, max_tokens).await
    }
}

/// Strip an optional markdown code fence from a model response.
pub fn strip_fences(response: &str) -> &str {
    let text = response.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

/// Parse a model response as JSON, tolerating markdown fences. Unknown
/// keys are ignored; missing keys fall back to the target's defaults.
pub fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: &str,
) -> serde_json::Result<T> {
    serde_json::from_str(strip_fences(response))
}

/// Cap prompt input to [`MAX_PROMPT_INPUT`] bytes on a char boundary.
pub fn cap_prompt_input(text: &str) -> &str {
    if text.len() <= MAX_PROMPT_INPUT {
        return text;
    }
    let mut end = MAX_PROMPT_INPUT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
