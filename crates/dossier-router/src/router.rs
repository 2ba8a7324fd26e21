// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent routing with LLM classification and keyword fallback.
//!
//! The primary path asks the model to classify the request against the
//! fixed scenario vocabulary and validates the result: unknown tags are
//! dropped, an empty result or any failure falls back to deterministic
//! keyword scoring. Classification never errors and never returns zero
//! scenarios.

use std::str::FromStr;
use std::sync::Arc;

use dossier_config::RouterConfig;
use dossier_core::{ChatMessage, ChatProvider, ChatRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::classifier::{KeywordClassifier, Scenario};

const ROUTER_TEMPERATURE: f32 = 0.1;

/// System prompt pinning the classification JSON contract.
const ROUTER_SYSTEM_PROMPT: &str =
    "You classify requests for a research assistant into scenario pipelines.\n\
     \n\
     Available scenarios:\n\
     - \"meeting\": meeting preparation, briefings, talking points, company research before meetings\n\
     - \"email\": email analysis, drafting replies, email research\n\
     - \"document\": document analysis, contract review, clause extraction\n\
     \n\
     Rules:\n\
     1. A request can trigger ONE or MULTIPLE scenarios.\n\
     2. Extract relevant parameters for each triggered scenario.\n\
     3. If the intent is ambiguous, pick the most likely single scenario.\n\
     4. If the request mentions both a meeting AND an email, trigger both.\n\
     \n\
     Return ONLY valid JSON (no markdown, no explanation):\n\
     {\n\
       \"scenarios\": [\"meeting\"],\n\
       \"primary\": \"meeting\",\n\
       \"params\": {\n\
         \"meeting\": {\"company\": \"TechCorp\", \"context\": \"partnership discussion\"},\n\
         \"email\": {\"body\": \"\"},\n\
         \"document\": {\"question\": \"\"}\n\
       },\n\
       \"summary\": \"Prepare a meeting briefing for TechCorp about partnership\"\n\
     }\n\
     \n\
     Only include scenario keys in \"params\" for scenarios listed in \"scenarios\".\n\
     For meeting: extract company (REQUIRED) and context.\n\
     For email: extract the email body text.\n\
     For document: extract the analysis question.";

/// Parameters for the meeting scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingParams {
    #[serde(alias = "company_name")]
    pub company: String,
    #[serde(alias = "meeting_context")]
    pub context: String,
}

/// Parameters for the email scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailParams {
    #[serde(alias = "email_content")]
    pub body: String,
}

/// Parameters for the document scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentParams {
    pub question: String,
}

/// Per-scenario parameters; scenarios absent from the decision keep their
/// defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteParams {
    pub meeting: MeetingParams,
    pub email: EmailParams,
    pub document: DocumentParams,
}

/// Scenario routing decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDecision {
    /// Scenarios to run, in run order; never empty.
    pub scenarios: Vec<Scenario>,
    /// Scenario whose result leads the envelope.
    pub primary: Scenario,
    #[serde(default)]
    pub params: RouteParams,
    /// One-line restatement of the request.
    #[serde(default)]
    pub summary: String,
    /// Set when keyword fallback produced this decision, with the cause.
    #[serde(default)]
    pub fallback_reason: Option<String>,
}

/// Raw model output before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawClassification {
    scenarios: Vec<String>,
    #[serde(alias = "primary_scenario")]
    primary: String,
    params: RouteParams,
    summary: String,
}

/// Routes free-text requests to scenario pipelines.
pub struct IntentRouter {
    chat: Arc<dyn ChatProvider>,
    classifier: KeywordClassifier,
}

impl IntentRouter {
    pub fn new(chat: Arc<dyn ChatProvider>, config: &RouterConfig) -> Self {
        Self {
            chat,
            classifier: KeywordClassifier::new(config),
        }
    }

    /// Classify a request into scenarios. Infallible: provider failures and
    /// unparseable replies fall back to keyword scoring.
    pub async fn classify(&self, user_text: &str) -> RouteDecision {
        let request = ChatRequest::new(
            vec![
                ChatMessage::system(ROUTER_SYSTEM_PROMPT),
                ChatMessage::user(user_text),
            ],
            ROUTER_TEMPERATURE,
        );

        let reply = match self.chat.chat(request).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "intent classification failed, using keyword fallback");
                return self.classifier.classify(user_text, err.to_string());
            }
        };

        let map =
            dossier_extract::extract_object_with_repair(self.chat.as_ref(), &reply.content).await;
        if map.is_empty() {
            debug!("classification reply unparseable, using keyword fallback");
            return self
                .classifier
                .classify(user_text, "unparseable classification");
        }

        let raw: RawClassification =
            serde_json::from_value(Value::Object(map)).unwrap_or_default();
        let scenarios = valid_scenarios(&raw.scenarios);
        if scenarios.is_empty() {
            debug!("no recognized scenario tags, using keyword fallback");
            return self
                .classifier
                .classify(user_text, "no recognized scenarios");
        }

        let primary = Scenario::from_str(raw.primary.trim())
            .ok()
            .filter(|primary| scenarios.contains(primary))
            .unwrap_or(scenarios[0]);
        let summary = if raw.summary.trim().is_empty() {
            user_text.to_string()
        } else {
            raw.summary
        };

        debug!(?scenarios, %primary, "intent classified");
        RouteDecision {
            scenarios,
            primary,
            params: raw.params,
            summary,
            fallback_reason: None,
        }
    }
}

/// Parse scenario tags, dropping unknown ones and duplicates.
fn valid_scenarios(tags: &[String]) -> Vec<Scenario> {
    let mut scenarios = Vec::new();
    for tag in tags {
        if let Ok(scenario) = Scenario::from_str(tag.trim()) {
            if !scenarios.contains(&scenario) {
                scenarios.push(scenario);
            }
        }
    }
    scenarios
}
