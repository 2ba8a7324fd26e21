// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM-backed entity extraction from source text.
//!
//! Asks the model for a JSON array of research candidates and recovers it
//! through the array stages of the structured-output cascade. Extraction is
//! best-effort: provider errors and unparseable replies yield an empty list,
//! never an error (a request with no entities still produces a deliverable).

use std::sync::Arc;

use tracing::{debug, warn};

use dossier_core::{ChatMessage, ChatProvider, ChatRequest, Entity};

/// Extraction wants stable, conservative lists.
const EXTRACTION_TEMPERATURE: f32 = 0.3;

/// Extracts research-candidate entities from a source text.
pub struct EntityExtractor {
    chat: Arc<dyn ChatProvider>,
}

impl EntityExtractor {
    pub fn new(chat: Arc<dyn ChatProvider>) -> Self {
        Self { chat }
    }

    /// Extract entities worth researching from `source_text`.
    ///
    /// Entities without a usable name are dropped; unknown kind labels fall
    /// back to [`dossier_core::EntityKind::Other`] during deserialization.
    pub async fn extract(&self, source_text: &str) -> Vec<Entity> {
        let request = ChatRequest::new(
            vec![ChatMessage::user(extraction_prompt(source_text))],
            EXTRACTION_TEMPERATURE,
        );

        let reply = match self.chat.chat(request).await {
            Ok(reply) => reply.content,
            Err(err) => {
                warn!(error = %err, "entity extraction failed");
                return Vec::new();
            }
        };

        let entities: Vec<Entity> = dossier_extract::extract_array(&reply)
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .filter(|entity: &Entity| !entity.name.trim().is_empty())
            .collect();

        debug!(count = entities.len(), "entities extracted");
        entities
    }
}

fn extraction_prompt(source_text: &str) -> String {
    format!(
        "You extract entities from correspondence that would benefit from research.\n\
         \n\
         Analyze this text and extract:\n\
         1. Company names (especially the sender's company or mentioned companies)\n\
         2. People names (if they're notable or their background is relevant)\n\
         3. Products or services mentioned\n\
         \n\
         Focus on entities that would help craft an informed response.\n\
         \n\
         Text:\n\
         {source_text}\n\
         \n\
         Return ONLY a JSON array (no markdown, no explanation):\n\
         [\n\
           {{\"type\": \"company\", \"name\": \"Acme Ventures\", \"context\": \"sender's VC firm, mentioned Series A\"}},\n\
           {{\"type\": \"company\", \"name\": \"DataFlow AI\", \"context\": \"portfolio company mentioned\"}}\n\
         ]\n\
         \n\
         If no entities need research, return: []"
    )
}
