// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The orchestrator's result envelope.
//!
//! Success and failure share one outcome shape per scenario, so callers
//! render both without special-casing: a failed scenario still carries
//! reasoning steps, a result string, and an attribution breakdown.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dossier_core::{ReasoningStep, SourceRecord};
use dossier_research::ResearchStats;
use dossier_router::{RouteDecision, Scenario};
use dossier_synthesis::{AttributionBreakdown, Briefing};

/// Uniform result of one scenario pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// User-visible trace of how the result was produced.
    pub reasoning_steps: Vec<ReasoningStep>,
    /// Web sources backing the result, in gathering order.
    pub sources: Vec<SourceRecord>,
    /// The deliverable text: briefing, reply draft, or answer.
    pub result: String,
    /// Structured briefing, meeting scenario only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub briefing: Option<Briefing>,
    /// Research counters, email scenario only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ResearchStats>,
    pub confidence: f64,
    pub attribution: AttributionBreakdown,
    /// Set when the scenario failed; `result` then carries the same
    /// message prefixed with "Error: ".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub execution_time_ms: u64,
}

impl ScenarioOutcome {
    /// Error-shaped outcome: zero confidence, everything attributed to
    /// the model, no sources.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            reasoning_steps: vec![ReasoningStep::error(message.clone())],
            sources: Vec::new(),
            result: format!("Error: {message}"),
            briefing: None,
            stats: None,
            confidence: 0.0,
            attribution: AttributionBreakdown::all_model(),
            error: Some(message),
            execution_time_ms: 0,
        }
    }
}

/// One routed request's full result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// The routing decision that selected the scenarios.
    pub route: RouteDecision,
    /// Per-scenario outcomes, keyed by scenario.
    pub results: BTreeMap<Scenario, ScenarioOutcome>,
    /// Scenario whose outcome leads when rendering.
    pub primary: Scenario,
    pub execution_time_ms: u64,
}

impl Envelope {
    /// The primary scenario's outcome.
    pub fn primary_outcome(&self) -> Option<&ScenarioOutcome> {
        self.results.get(&self.primary)
    }
}

#[cfg(test)]
mod tests {
    use dossier_core::StepLevel;
    use dossier_router::RouteParams;
    use dossier_synthesis::Verification;

    use super::*;

    #[test]
    fn error_outcome_takes_the_uniform_shape() {
        let outcome = ScenarioOutcome::error("No company name provided.");

        assert_eq!(outcome.result, "Error: No company name provided.");
        assert_eq!(outcome.error.as_deref(), Some("No company name provided."));
        assert_eq!(outcome.confidence, 0.0);
        assert_eq!(outcome.attribution, AttributionBreakdown::all_model());
        assert_eq!(outcome.attribution.verification, Verification::Unverified);
        assert!(outcome.sources.is_empty());
        assert_eq!(outcome.reasoning_steps.len(), 1);
        assert_eq!(outcome.reasoning_steps[0].level, StepLevel::Error);
        assert_eq!(outcome.reasoning_steps[0].step, "No company name provided.");
    }

    #[test]
    fn error_outcome_omits_optional_sections_in_json() {
        let json = serde_json::to_value(ScenarioOutcome::error("boom")).unwrap();

        assert!(json.get("briefing").is_none());
        assert!(json.get("stats").is_none());
        assert_eq!(json["error"], "boom");
        assert_eq!(json["result"], "Error: boom");
    }

    #[test]
    fn envelope_results_are_keyed_by_scenario_name() {
        let decision = RouteDecision {
            scenarios: vec![Scenario::Meeting],
            primary: Scenario::Meeting,
            params: RouteParams::default(),
            summary: "briefing request".to_string(),
            fallback_reason: None,
        };
        let mut results = BTreeMap::new();
        results.insert(Scenario::Meeting, ScenarioOutcome::error("no data"));
        let envelope = Envelope {
            route: decision,
            results,
            primary: Scenario::Meeting,
            execution_time_ms: 12,
        };

        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json["results"]["meeting"].is_object());
        assert_eq!(json["primary"], "meeting");
        assert_eq!(json["route"]["scenarios"][0], "meeting");

        let back: Envelope = serde_json::from_value(json).unwrap();
        assert_eq!(back.primary_outcome().unwrap().result, "Error: no data");
    }
}
