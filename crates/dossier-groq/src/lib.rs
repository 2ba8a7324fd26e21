// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Groq LLM provider for the Dossier pipeline.
//!
//! Implements [`ChatProvider`] against Groq's OpenAI-compatible
//! chat-completions API.

pub mod client;
pub mod types;

use async_trait::async_trait;
use tracing::info;

use dossier_config::GroqConfig;
use dossier_core::{ChatProvider, ChatReply, ChatRequest, DossierError, TokenUsage};

use crate::client::GroqClient;
use crate::types::{CompletionRequest, WireMessage};

/// Groq provider implementing [`ChatProvider`].
///
/// API key resolution order: config -> `GROQ_API_KEY` env var -> error.
pub struct GroqProvider {
    client: GroqClient,
    max_tokens: u32,
}

impl GroqProvider {
    /// Creates a new Groq provider from the `[groq]` configuration section.
    pub fn new(config: &GroqConfig) -> Result<Self, DossierError> {
        let api_key = resolve_api_key(config.api_key.as_deref())?;
        let client = GroqClient::new(api_key, config.model.clone())?;

        info!(model = config.model, "Groq provider initialized");

        Ok(Self {
            client,
            max_tokens: config.max_tokens,
        })
    }

    /// Creates a provider with an existing client (for testing).
    #[cfg(test)]
    fn with_client(client: GroqClient, max_tokens: u32) -> Self {
        Self { client, max_tokens }
    }

    /// Converts a [`ChatRequest`] to the wire format, applying the
    /// configured token cap when the request does not set one.
    fn to_wire_request(&self, request: &ChatRequest) -> CompletionRequest {
        let messages = request
            .messages
            .iter()
            .map(|m| WireMessage {
                role: m.role.to_string(),
                content: m.content.clone(),
            })
            .collect();

        CompletionRequest {
            model: self.client.default_model().to_string(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens.unwrap_or(self.max_tokens),
        }
    }
}

/// Resolve the API key from config, falling back to the environment.
fn resolve_api_key(configured: Option<&str>) -> Result<String, DossierError> {
    if let Some(key) = configured
        && !key.trim().is_empty()
    {
        return Ok(key.to_string());
    }
    std::env::var("GROQ_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            DossierError::Config(
                "no Groq API key configured: set [groq] api_key or GROQ_API_KEY".into(),
            )
        })
}

#[async_trait]
impl ChatProvider for GroqProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, DossierError> {
        let wire = self.to_wire_request(&request);
        let response = self.client.complete(&wire).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DossierError::provider("completion returned no choices"))?;

        Ok(ChatReply {
            content: choice.message.content,
            model: response.model,
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            }),
        })
    }
}
