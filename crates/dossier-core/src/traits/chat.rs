// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM inference service trait.

use async_trait::async_trait;

use crate::error::DossierError;
use crate::types::{ChatReply, ChatRequest};

/// Client for an LLM inference service.
///
/// Pipeline call sites at fail-open boundaries (knowledge gate, router,
/// synthesis fallbacks) treat an `Err` as a soft failure and substitute
/// their documented defaults; an `Err` never aborts a request on its own.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Sends a conversation and returns the model's full reply.
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply, DossierError>;
}
