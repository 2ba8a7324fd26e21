// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Dossier pipeline crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Role of a chat message in an LLM conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single message in an LLM conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A request to the LLM inference service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    /// Per-request cap; the client applies its configured default when absent.
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>, temperature: f32) -> Self {
        Self {
            messages,
            temperature,
            max_tokens: None,
        }
    }
}

/// Token accounting reported by the LLM inference service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// A complete (non-streaming) reply from the LLM inference service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub content: String,
    /// Model identifier echoed by the service.
    pub model: String,
    pub usage: Option<TokenUsage>,
}

/// Kind of a research candidate extracted from source text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Company,
    Person,
    Product,
    /// Catch-all for concepts, technologies, and anything the extractor
    /// could not place; unknown kinds from model output land here.
    #[serde(other)]
    Other,
}

/// A named thing extracted from source text as a candidate for research.
///
/// Produced once by extraction, consumed once by triage, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default = "default_entity_kind", alias = "type")]
    pub kind: EntityKind,
    #[serde(default)]
    pub context: String,
}

fn default_entity_kind() -> EntityKind {
    EntityKind::Other
}

impl Entity {
    pub fn new(name: impl Into<String>, kind: EntityKind, context: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            context: context.into(),
        }
    }

    /// Name normalized for boundary comparisons, see [`normalize_compact`].
    pub fn normalized_name(&self) -> String {
        normalize_compact(&self.name)
    }
}

/// Lowercase a name and strip whitespace and hyphens, so names from
/// different producers compare equal ("DataFlow AI" vs "dataflow-ai").
/// Shared by triage self-reference checks and memory domain matching.
pub fn normalize_compact(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Outcome tag for one reasoning-trace step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StepLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// One entry in a pipeline's user-visible reasoning trace.
///
/// Pipelines collect these as data and return them in scenario outcomes, so
/// callers can show how a result was produced without parsing logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningStep {
    /// Wall-clock time of the step, `HH:MM:SS` UTC.
    pub timestamp: String,
    pub step: String,
    pub level: StepLevel,
}

impl ReasoningStep {
    pub fn new(step: impl Into<String>, level: StepLevel) -> Self {
        Self {
            timestamp: Utc::now().format("%H:%M:%S").to_string(),
            step: step.into(),
            level,
        }
    }

    pub fn info(step: impl Into<String>) -> Self {
        Self::new(step, StepLevel::Info)
    }

    pub fn success(step: impl Into<String>) -> Self {
        Self::new(step, StepLevel::Success)
    }

    pub fn warning(step: impl Into<String>) -> Self {
        Self::new(step, StepLevel::Warning)
    }

    pub fn error(step: impl Into<String>) -> Self {
        Self::new(step, StepLevel::Error)
    }
}

/// A normalized unit of web-search evidence.
///
/// Provider-specific result shapes are mapped onto this record at the client
/// boundary; `relevance_rank` is 1-based arrival order and is preserved end
/// to end (the provider's own ranking is trusted, never re-sorted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub relevance_rank: u32,
}

/// One user request and its full pipeline result, as stored in a session.
///
/// `route` and `results` are stored as JSON values so the session log stays
/// readable across envelope shape evolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// 1-based ordinal within the owning session, assigned on append.
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub user_query: String,
    pub route: serde_json::Value,
    pub results: serde_json::Value,
    pub execution_time_ms: u64,
}

/// Payload for appending an interaction; the store assigns ordinal and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInteraction {
    pub user_query: String,
    pub route: serde_json::Value,
    pub results: serde_json::Value,
    pub execution_time_ms: u64,
}

/// An append-only log of one user's requests and their results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub interactions: Vec<Interaction>,
}

/// Listing row for a session, without its interactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,
    pub interaction_count: usize,
}
