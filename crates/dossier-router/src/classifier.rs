// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic keyword fallback classification.
//!
//! When LLM classification fails or cannot be parsed, requests are scored
//! against fixed per-scenario keyword vocabularies. The fallback always
//! produces a usable decision: exactly one scenario with minimal
//! pattern-extracted parameters.

use std::sync::LazyLock;

use dossier_config::RouterConfig;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::router::{MeetingParams, RouteDecision, RouteParams};

/// A scenario pipeline the router can dispatch to.
///
/// Ordering follows declaration order and keys scenario-result maps, so
/// serialized envelopes list scenarios deterministically.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Meeting,
    Email,
    Document,
}

/// Keyword vocabulary for the meeting scenario.
const MEETING_KEYWORDS: &[&str] = &[
    "meeting",
    "briefing",
    "prepare me",
    "talking points",
    "meet with",
    "call with",
    "presentation",
];

/// Keyword vocabulary for the email scenario.
const EMAIL_KEYWORDS: &[&str] = &[
    "email",
    "reply",
    "draft",
    "respond",
    "inbox",
    "mail",
    "message from",
    "write back",
];

/// Keyword vocabulary for the document scenario.
const DOCUMENT_KEYWORDS: &[&str] = &[
    "document",
    "contract",
    "pdf",
    "clause",
    "analyze file",
    "extract",
    "review document",
];

/// Patterns that pull a meeting subject out of free text. The subject is
/// the run of capitalized tokens after the phrase.
static SUBJECT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i:\bmeeting with\s+)([A-Z][A-Za-z0-9&'-]*(?:\s+[A-Z][A-Za-z0-9&'-]*)*)")
            .unwrap(),
        Regex::new(r"(?i:\bcall with\s+)([A-Z][A-Za-z0-9&'-]*(?:\s+[A-Z][A-Za-z0-9&'-]*)*)")
            .unwrap(),
    ]
});

/// Extract a meeting subject from "meeting with X" / "call with X" phrasing.
pub fn extract_subject(text: &str) -> Option<String> {
    for pattern in SUBJECT_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(text) {
            if let Some(subject) = captures.get(1) {
                return Some(subject.as_str().trim().to_string());
            }
        }
    }
    None
}

/// Scores requests against the scenario vocabularies.
pub struct KeywordClassifier {
    default_scenario: Scenario,
}

impl KeywordClassifier {
    pub fn new(config: &RouterConfig) -> Self {
        let default_scenario = config
            .default_scenario
            .parse()
            .unwrap_or(Scenario::Meeting);
        Self { default_scenario }
    }

    /// Deterministic fallback classification; never returns zero scenarios.
    ///
    /// Picks the scenario with the most keyword hits. Zero hits fall back
    /// to the configured default, as do ties that include it; other ties
    /// break in scenario order (meeting, email, document).
    pub fn classify(&self, user_text: &str, reason: impl Into<String>) -> RouteDecision {
        let scenario = self.best_scenario(user_text);
        debug!(%scenario, "keyword fallback classification");
        RouteDecision {
            scenarios: vec![scenario],
            primary: scenario,
            params: fallback_params(scenario, user_text),
            summary: user_text.to_string(),
            fallback_reason: Some(reason.into()),
        }
    }

    fn best_scenario(&self, user_text: &str) -> Scenario {
        let lower = user_text.to_lowercase();
        let scores = [
            (Scenario::Meeting, keyword_hits(&lower, MEETING_KEYWORDS)),
            (Scenario::Email, keyword_hits(&lower, EMAIL_KEYWORDS)),
            (Scenario::Document, keyword_hits(&lower, DOCUMENT_KEYWORDS)),
        ];
        let top = scores.iter().map(|(_, hits)| *hits).max().unwrap_or(0);
        if top == 0 {
            return self.default_scenario;
        }
        let leaders: Vec<Scenario> = scores
            .iter()
            .filter(|(_, hits)| *hits == top)
            .map(|(scenario, _)| *scenario)
            .collect();
        if leaders.contains(&self.default_scenario) {
            self.default_scenario
        } else {
            leaders[0]
        }
    }
}

fn keyword_hits(lower_text: &str, keywords: &[&str]) -> usize {
    keywords
        .iter()
        .filter(|keyword| lower_text.contains(*keyword))
        .count()
}

/// Minimal parameters when classification came from keywords alone.
fn fallback_params(scenario: Scenario, user_text: &str) -> RouteParams {
    let mut params = RouteParams::default();
    match scenario {
        Scenario::Meeting => {
            params.meeting = MeetingParams {
                company: extract_subject(user_text).unwrap_or_default(),
                context: user_text.to_string(),
            };
        }
        Scenario::Email => params.email.body = user_text.to_string(),
        Scenario::Document => params.document.question = user_text.to_string(),
    }
    params
}
