// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Groq chat-completions API request/response types.
//!
//! Groq exposes an OpenAI-compatible surface; these types cover the subset
//! the pipeline uses (non-streaming text completions).

use serde::{Deserialize, Serialize};

/// A request to the Groq chat-completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    /// Model identifier (e.g., "llama-3.3-70b-versatile").
    pub model: String,

    /// Conversation messages, system prompt included as the first entry.
    pub messages: Vec<WireMessage>,

    /// Sampling temperature.
    pub temperature: f32,

    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

/// A single message in the wire conversation format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    /// Role: "system", "user", or "assistant".
    pub role: String,
    pub content: String,
}

/// A successful completion response.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<WireUsage>,
}

/// One generated completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: WireMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token accounting in the wire format.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WireUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Error envelope returned by the API on non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail within an [`ApiErrorResponse`].
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type", default)]
    pub type_: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_response_parses_minimal_payload() {
        let body = serde_json::json!({
            "id": "chatcmpl-1",
            "model": "llama-3.3-70b-versatile",
            "choices": [
                {"message": {"role": "assistant", "content": "hello"}, "finish_reason": "stop"}
            ]
        });
        let response: CompletionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.choices[0].message.content, "hello");
        assert!(response.usage.is_none());
    }

    #[test]
    fn api_error_parses_without_type() {
        let body = serde_json::json!({"error": {"message": "bad key"}});
        let parsed: ApiErrorResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.error.message, "bad key");
        assert!(parsed.error.type_.is_empty());
    }
}
