// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured-output repair for free-text LLM replies.
//!
//! Models asked for JSON return JSON most of the time, but often wrapped
//! in code fences or prose and carrying syntax slips such as trailing
//! commas and raw newlines inside strings. This crate recovers the
//! payload through a strictly ordered cascade, stopping at the first
//! stage that parses:
//!
//! 1. strip code fences, parse directly
//! 2. parse the outermost `{...}` span (first `{` to last `}`)
//! 3. apply syntactic repairs to that span and reparse
//! 4. one corrective round-trip asking the model to fix its own output,
//!    parsed through stages 1–2
//! 5. a typed empty object; extraction never fails, callers apply
//!    field-level defaults
//!
//! The cascade is implemented once here and shared by every caller that
//! expects structured model output (knowledge gate, synthesis, intent
//! router).

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use dossier_core::{ChatMessage, ChatProvider, ChatRequest};

mod repair;
mod stages;

/// Sampling temperature for the corrective round-trip; repair wants
/// determinism, not creativity.
const REPAIR_TEMPERATURE: f32 = 0.1;

const REPAIR_SYSTEM_PROMPT: &str = "You fix malformed JSON. Reply with the corrected JSON \
     object only. No commentary, no code fences, no surrounding text.";

type ObjectStage = fn(&str) -> Option<Map<String, Value>>;
type ArrayStage = fn(&str) -> Option<Vec<Value>>;

/// The pure stages, in cascade order.
const OBJECT_STAGES: &[(&str, ObjectStage)] = &[
    ("direct", stages::direct_object),
    ("outer_span", stages::outer_object_span),
    ("repaired_span", stages::repaired_object_span),
];

const ARRAY_STAGES: &[(&str, ArrayStage)] = &[
    ("direct", stages::direct_array),
    ("outer_span", stages::outer_array_span),
    ("repaired_span", stages::repaired_array_span),
];

/// Run the pure object stages; `None` when all pass.
pub fn try_extract_object(raw: &str) -> Option<Map<String, Value>> {
    for (name, stage) in OBJECT_STAGES {
        if let Some(map) = stage(raw) {
            debug!(stage = name, "structured output parsed");
            return Some(map);
        }
    }
    None
}

/// Extract a JSON object using the pure stages only; empty object on failure.
pub fn extract_object(raw: &str) -> Map<String, Value> {
    try_extract_object(raw).unwrap_or_default()
}

/// Extract a JSON object through the full cascade, including the corrective
/// round-trip to the LLM service. Never fails: terminal fallback is an
/// empty object.
pub async fn extract_object_with_repair(
    chat: &dyn ChatProvider,
    raw: &str,
) -> Map<String, Value> {
    if let Some(map) = try_extract_object(raw) {
        return map;
    }
    match corrective_round_trip(chat, raw).await {
        Some(map) => {
            debug!(stage = "llm_round_trip", "structured output parsed");
            map
        }
        None => {
            warn!("structured output unrecoverable, returning empty object");
            Map::new()
        }
    }
}

/// Run the pure array stages; `None` when all pass.
pub fn try_extract_array(raw: &str) -> Option<Vec<Value>> {
    for (name, stage) in ARRAY_STAGES {
        if let Some(items) = stage(raw) {
            debug!(stage = name, "structured array output parsed");
            return Some(items);
        }
    }
    None
}

/// Extract a JSON array using the pure stages; empty vec on failure.
pub fn extract_array(raw: &str) -> Vec<Value> {
    try_extract_array(raw).unwrap_or_default()
}

/// Extract and deserialize into `T` using the pure stages; `T::default()`
/// when extraction or deserialization fails.
pub fn extract_as<T>(raw: &str) -> T
where
    T: DeserializeOwned + Default,
{
    from_map(extract_object(raw))
}

/// Extract and deserialize into `T` through the full cascade.
pub async fn extract_as_with_repair<T>(chat: &dyn ChatProvider, raw: &str) -> T
where
    T: DeserializeOwned + Default,
{
    from_map(extract_object_with_repair(chat, raw).await)
}

fn from_map<T>(map: Map<String, Value>) -> T
where
    T: DeserializeOwned + Default,
{
    serde_json::from_value(Value::Object(map)).unwrap_or_default()
}

/// Stage 4: ask the model to fix its own output, then parse the fixed reply
/// through stages 1–2 only (no second repair pass, no second round-trip).
async fn corrective_round_trip(chat: &dyn ChatProvider, raw: &str) -> Option<Map<String, Value>> {
    let request = ChatRequest::new(
        vec![
            ChatMessage::system(REPAIR_SYSTEM_PROMPT),
            ChatMessage::user(format!("Fix this JSON so it parses:\n\n{raw}")),
        ],
        REPAIR_TEMPERATURE,
    );
    let reply = match chat.chat(request).await {
        Ok(reply) => reply,
        Err(err) => {
            debug!(error = %err, "corrective round-trip unavailable");
            return None;
        }
    };
    stages::direct_object(&reply.content).or_else(|| stages::outer_object_span(&reply.content))
}
