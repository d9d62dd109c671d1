//! The generative text service seam.
//!
//! Implemented by the `examforge-providers` crate; tests use its mock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Trait for text-generation backends that answer a prompt.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Send one prompt and return the raw reply text.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;
}

/// Request for one generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gemini-2.0-flash").
    pub model: String,
    /// The full instruction.
    pub prompt: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

/// Reply from a generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Raw reply text, expected to hold one JSON object.
    pub content: String,
    /// Model that actually answered.
    pub model: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Pull the JSON object out of a model reply.
///
/// Models sometimes wrap the object in prose or markdown fences. The reply
/// is parsed directly first; only when that fails is the first balanced
/// `{...}` span parsed. A reply that parses as JSON but is not an object is
/// an error.
pub fn extract_json(text: &str) -> anyhow::Result<Value> {
    let text = text.trim();
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => return Ok(value),
        Ok(other) => anyhow::bail!("model reply is JSON but not an object: {}", json_kind(&other)),
        Err(_) => {}
    }

    let span = first_object_span(text)
        .ok_or_else(|| anyhow::anyhow!("no JSON object found in model reply"))?;
    let value: Value = serde_json::from_str(span)
        .map_err(|e| anyhow::anyhow!("model reply holds malformed JSON: {e}"))?;
    Ok(value)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Slice of the first brace-balanced `{...}` span, ignoring braces inside
/// string literals.
fn first_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
