// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The knowledge gate: decide per entity between trusting model knowledge
//! and issuing a web search.
//!
//! The gate is fail-open toward verification. Any provider error or
//! unparseable verdict yields `needs_search = true` with middling
//! confidence; a broken gate must never silently suppress a necessary
//! search.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use dossier_core::{ChatMessage, ChatProvider, ChatRequest, Entity};

/// Gate decisions want determinism over creativity.
const GATE_TEMPERATURE: f32 = 0.3;

/// Source-context excerpt length fed into the decision prompt.
const CONTEXT_EXCERPT_CHARS: usize = 500;

/// The gate's verdict for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeVerdict {
    pub needs_search: bool,
    pub reasoning: String,
    pub confidence: f32,
    pub known_info: String,
    pub search_query: Option<String>,
}

impl Default for KnowledgeVerdict {
    /// Field defaults lean toward search, so verdicts with missing fields
    /// inherit the fail-open posture.
    fn default() -> Self {
        Self {
            needs_search: true,
            reasoning: String::new(),
            confidence: 0.5,
            known_info: String::new(),
            search_query: None,
        }
    }
}

impl KnowledgeVerdict {
    /// The verdict substituted when assessment breaks entirely.
    pub fn fail_open(entity_name: &str) -> Self {
        Self {
            needs_search: true,
            reasoning: "Assessment failed, defaulting to search".to_string(),
            confidence: 0.5,
            known_info: String::new(),
            search_query: Some(entity_name.to_string()),
        }
    }
}

/// Assesses whether an entity needs external research.
pub struct KnowledgeGate {
    chat: Arc<dyn ChatProvider>,
}

impl KnowledgeGate {
    pub fn new(chat: Arc<dyn ChatProvider>) -> Self {
        Self { chat }
    }

    /// Assess one entity against the source context. Infallible: every
    /// failure mode degrades to [`KnowledgeVerdict::fail_open`].
    pub async fn assess(&self, entity: &Entity, source_context: &str) -> KnowledgeVerdict {
        let request = ChatRequest::new(
            vec![ChatMessage::user(gate_prompt(entity, source_context))],
            GATE_TEMPERATURE,
        );

        let reply = match self.chat.chat(request).await {
            Ok(reply) => reply.content,
            Err(err) => {
                warn!(entity = %entity.name, error = %err, "knowledge assessment failed");
                return KnowledgeVerdict::fail_open(&entity.name);
            }
        };

        let map = dossier_extract::extract_object_with_repair(self.chat.as_ref(), &reply).await;
        if map.is_empty() {
            warn!(entity = %entity.name, "knowledge verdict unparseable");
            return KnowledgeVerdict::fail_open(&entity.name);
        }

        match serde_json::from_value(Value::Object(map)) {
            Ok(verdict) => verdict,
            Err(err) => {
                warn!(entity = %entity.name, error = %err, "knowledge verdict malformed");
                KnowledgeVerdict::fail_open(&entity.name)
            }
        }
    }
}

fn gate_prompt(entity: &Entity, source_context: &str) -> String {
    let context = if entity.context.trim().is_empty() {
        "No additional context"
    } else {
        &entity.context
    };

    format!(
        "You assess whether external research is needed for an entity.\n\
         \n\
         ENTITY TO ASSESS:\n\
         Name: {name}\n\
         Type: {kind}\n\
         Context: {context}\n\
         \n\
         SOURCE CONTEXT:\n\
         {excerpt}\n\
         \n\
         ASSESSMENT CRITERIA:\n\
         \n\
         Search the web when:\n\
         - Unknown company or organization\n\
         - Recent or current information is needed\n\
         - Specific details unlikely to be in your training data\n\
         - Unfamiliar startup or emerging company\n\
         - You are less than 80% confident in what you know\n\
         \n\
         Do NOT search when:\n\
         - Well-known entity with stable information (Google, Microsoft, Apple, Amazon)\n\
         - Historical or biographical information you already know\n\
         - Generic terms or concepts (cloud computing, AI)\n\
         - Information unlikely to have changed recently\n\
         \n\
         Respond with ONLY this JSON (no markdown, no explanation):\n\
         {{\n\
           \"needs_search\": true/false,\n\
           \"reasoning\": \"Brief explanation of the decision\",\n\
           \"confidence\": 0.0-1.0,\n\
           \"known_info\": \"What you already know about this entity (if any)\",\n\
           \"search_query\": \"Suggested search query if needs_search is true\"\n\
         }}",
        name = entity.name,
        kind = entity.kind,
        excerpt = clip_chars(source_context, CONTEXT_EXCERPT_CHARS),
    )
}

/// Char-boundary-safe prefix of at most `max_chars` characters.
fn clip_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use dossier_core::EntityKind;
    use dossier_test_utils::MockChat;

    use super::*;

    fn entity() -> Entity {
        Entity::new("Quantum Corp", EntityKind::Company, "sender's startup")
    }

    fn gate(chat: &Arc<MockChat>) -> KnowledgeGate {
        KnowledgeGate::new(chat.clone())
    }

    #[tokio::test]
    async fn parsed_verdict_passes_through() {
        let chat = Arc::new(MockChat::new());
        chat.queue(
            r#"{"needs_search": false, "reasoning": "well known", "confidence": 0.95,
                "known_info": "Large public company", "search_query": null}"#,
        );

        let verdict = gate(&chat).assess(&entity(), "email text").await;
        assert!(!verdict.needs_search);
        assert_eq!(verdict.known_info, "Large public company");
        assert!((verdict.confidence - 0.95).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn well_known_company_skips_search() {
        let chat = Arc::new(MockChat::new());
        chat.queue(
            r#"{"needs_search": false, "reasoning": "major public company", "confidence": 0.98,
                "known_info": "Google: search, ads, cloud; parent Alphabet"}"#,
        );
        let google = Entity::new("Google", EntityKind::Company, "mentioned as a partner");

        let verdict = gate(&chat).assess(&google, "email text").await;
        assert!(!verdict.needs_search);
        assert!(verdict.search_query.is_none());
    }

    #[tokio::test]
    async fn provider_error_fails_open() {
        let chat = Arc::new(MockChat::new());
        chat.queue_error("service down");

        let verdict = gate(&chat).assess(&entity(), "email text").await;
        assert!(verdict.needs_search);
        assert!((verdict.confidence - 0.5).abs() < f32::EPSILON);
        assert_eq!(verdict.search_query.as_deref(), Some("Quantum Corp"));
    }

    #[tokio::test]
    async fn unparseable_reply_fails_open_after_repair_attempt() {
        let chat = Arc::new(MockChat::new());
        chat.queue("I think you should probably search for this one.");
        chat.queue("Still not JSON, sorry.");

        let verdict = gate(&chat).assess(&entity(), "email text").await;
        assert!(verdict.needs_search);
        assert_eq!(verdict.search_query.as_deref(), Some("Quantum Corp"));
        // Gate call plus one corrective round-trip.
        assert_eq!(chat.requests().len(), 2);
    }

    #[tokio::test]
    async fn missing_fields_inherit_fail_open_defaults() {
        let chat = Arc::new(MockChat::new());
        chat.queue(r#"{"known_info": "something"}"#);

        let verdict = gate(&chat).assess(&entity(), "email text").await;
        assert!(verdict.needs_search, "absent needs_search must mean search");
        assert!((verdict.confidence - 0.5).abs() < f32::EPSILON);
        assert_eq!(verdict.known_info, "something");
    }

    #[tokio::test]
    async fn prompt_includes_entity_and_clipped_context() {
        let chat = Arc::new(MockChat::new());
        chat.queue(r#"{"needs_search": false}"#);

        let long_context = "x".repeat(600);
        gate(&chat).assess(&entity(), &long_context).await;

        let prompt = &chat.requests()[0].messages[0].content;
        assert!(prompt.contains("Name: Quantum Corp"));
        assert!(prompt.contains("Type: company"));
        assert!(prompt.contains(&"x".repeat(500)));
        assert!(!prompt.contains(&"x".repeat(501)));
    }
}
