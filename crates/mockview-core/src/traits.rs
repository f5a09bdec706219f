//! Core trait definitions for external models and scoring capabilities.
//!
//! `LlmProvider` is implemented by the `mockview-providers` crate. The
//! `Embedder` and `SentimentAnalyzer` capabilities are injected into the
//! local scorer; see `signals` for the bundled implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LLM Provider trait
// ---------------------------------------------------------------------------

/// Trait for LLM backends used for scoring and question generation.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "openai").
    fn name(&self) -> &str;

    /// Send a prompt and return the raw completion.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;
}

/// Request to an LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gpt-4.1-mini").
    pub model: String,
    /// The main prompt.
    pub prompt: String,
    /// Optional system prompt override.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}

/// Response from an LLM request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The raw response content.
    pub content: String,
    /// Model that actually generated the response.
    pub model: String,
    /// Token usage.
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Default system prompt for interviewer-style requests.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an experienced interviewer and hiring coach. Follow the requested output format exactly. When JSON is requested, respond with raw JSON only.";

// ---------------------------------------------------------------------------
// Scoring capabilities
// ---------------------------------------------------------------------------

/// Maps text to a vector for semantic similarity.
///
/// An empty vector means "no signal" and yields a similarity of zero.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// Polarity in [-1, 1] and subjectivity in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentReading {
    pub polarity: f64,
    pub subjectivity: f64,
}

/// Reads sentiment from text. `None` means the analyzer has no opinion.
pub trait SentimentAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Option<SentimentReading>;
}

/// Cosine similarity of two vectors; zero when either is empty or zero-length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

// ---------------------------------------------------------------------------
// JSON extraction
// ---------------------------------------------------------------------------

/// Extract a JSON payload from an LLM response.
///
/// Handles:
/// - ```json fenced blocks (or generic ``` blocks)
/// - Leading/trailing chatter around a bare object or array
/// - Raw JSON (returned trimmed)
pub fn extract_json_from_markdown(response: &str) -> String {
    let mut json_block = None;
    let mut generic_block = None;
    let mut in_block = false;
    let mut is_json_block = false;
    let mut current_block = String::new();

    for line in response.lines() {
        let trimmed = line.trim();

        if !in_block && trimmed.starts_with("```") {
            in_block = true;
            let lang = trimmed.trim_start_matches('`').trim().to_lowercase();
            is_json_block = lang == "json";
            current_block.clear();
            continue;
        }

        if in_block && trimmed == "```" {
            in_block = false;
            if is_json_block && json_block.is_none() {
                json_block = Some(current_block.clone());
            } else if generic_block.is_none() {
                generic_block = Some(current_block.clone());
            }
            continue;
        }

        if in_block {
            if !current_block.is_empty() {
                current_block.push('\n');
            }
            current_block.push_str(line);
        }
    }

    // Unclosed fence: keep what was accumulated
    if in_block && !current_block.is_empty() && json_block.is_none() && generic_block.is_none() {
        json_block = Some(current_block);
    }

    let body = json_block
        .or(generic_block)
        .unwrap_or_else(|| response.to_string());

    outermost_json(&body).unwrap_or_else(|| body.trim().to_string())
}

/// Slice from the first `{`/`[` to the matching last `}`/`]`.
fn outermost_json(text: &str) -> Option<String> {
    let start = text.find(['{', '['])?;
    let close = if text[start..].starts_with('{') { '}' } else { ']' };
    let end = text.rfind(close)?;
    (end > start).then(|| text[start..=end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_fenced_json() {
        let input = "Here you go:\n\n```json\n{\"score\": 80}\n```\n\nGood luck!";
        assert_eq!(extract_json_from_markdown(input), "{\"score\": 80}");
    }

    #[test]
    fn extract_generic_fence() {
        let input = "```\n[1, 2, 3]\n```";
        assert_eq!(extract_json_from_markdown(input), "[1, 2, 3]");
    }

    #[test]
    fn extract_bare_object_with_chatter() {
        let input = "Sure! {\"a\": {\"b\": 1}} Hope that helps.";
        assert_eq!(extract_json_from_markdown(input), "{\"a\": {\"b\": 1}}");
    }

    #[test]
    fn extract_bare_array() {
        let input = "[{\"question\": \"Why?\"}]";
        assert_eq!(extract_json_from_markdown(input), input);
    }

    #[test]
    fn extract_prefers_json_fence() {
        let input = "```\nnot this\n```\n```json\n{\"x\": 1}\n```";
        assert_eq!(extract_json_from_markdown(input), "{\"x\": 1}");
    }

    #[test]
    fn extract_plain_text_passthrough() {
        assert_eq!(
            extract_json_from_markdown("  Can you elaborate?  "),
            "Can you elaborate?"
        );
    }

    #[test]
    fn cosine_handles_degenerate_vectors() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        let s = cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]);
        assert!((s - 1.0).abs() < 1e-9);
    }
}
