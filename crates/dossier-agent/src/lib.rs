// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scenario orchestration for Dossier.
//!
//! The [`Orchestrator`] is the crate's public entry point: it routes a
//! free-text request, runs every routed scenario pipeline sequentially,
//! and assembles the per-scenario outcomes into an [`Envelope`]. The
//! session-aware variant persists each request/result pair through the
//! configured [`SessionStore`].
//!
//! Scenario failures are contained: a pipeline error becomes that
//! scenario's error outcome and never aborts the envelope.

pub mod document;
pub mod email;
pub mod envelope;
pub mod meeting;

pub use document::DocumentPipeline;
pub use email::EmailPipeline;
pub use envelope::{Envelope, ScenarioOutcome};
pub use meeting::MeetingPipeline;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use dossier_config::DossierConfig;
use dossier_core::{ChatProvider, DossierError, NewInteraction, SearchProvider, SessionStore};
use dossier_memory::InteractionSource;
use dossier_router::{IntentRouter, RouteDecision, Scenario};

/// Routes requests and drives the scenario pipelines.
pub struct Orchestrator {
    router: IntentRouter,
    meeting: MeetingPipeline,
    email: EmailPipeline,
    document: DocumentPipeline,
    store: Arc<dyn SessionStore>,
}

impl Orchestrator {
    pub fn new(
        chat: Arc<dyn ChatProvider>,
        search: Arc<dyn SearchProvider>,
        memory: Arc<dyn InteractionSource>,
        store: Arc<dyn SessionStore>,
        config: &DossierConfig,
    ) -> Self {
        info!(agent = config.agent.name.as_str(), "orchestrator initialized");
        Self {
            router: IntentRouter::new(chat.clone(), &config.router),
            meeting: MeetingPipeline::new(chat.clone(), search.clone(), memory, config),
            email: EmailPipeline::new(chat.clone(), search.clone(), config),
            document: DocumentPipeline::new(chat, search),
            store,
        }
    }

    /// Classify `prompt` and run every routed scenario, in route order.
    ///
    /// Infallible: routing falls back to keyword classification and each
    /// pipeline failure is captured as that scenario's error outcome.
    pub async fn route(&self, prompt: &str, document_text: Option<&str>) -> Envelope {
        let started = Instant::now();
        let decision = self.router.classify(prompt).await;
        info!(
            scenarios = ?decision.scenarios,
            primary = %decision.primary,
            "request classified"
        );

        let mut results = BTreeMap::new();
        for &scenario in &decision.scenarios {
            let outcome = self
                .run_scenario(scenario, &decision, prompt, document_text)
                .await;
            for step in &outcome.reasoning_steps {
                debug!(
                    %scenario,
                    level = %step.level,
                    step = step.step.as_str(),
                    "reasoning step"
                );
            }
            results.insert(scenario, outcome);
        }

        let primary = decision.primary;
        Envelope {
            route: decision,
            results,
            primary,
            execution_time_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// [`Orchestrator::route`] plus session persistence.
    ///
    /// Resolves the session before routing (creating one when no id is
    /// given) and appends the request/envelope pair afterwards. Returns
    /// the envelope together with the session id it was saved under.
    pub async fn route_and_save(
        &self,
        prompt: &str,
        document_text: Option<&str>,
        session_id: Option<&str>,
    ) -> Result<(Envelope, String), DossierError> {
        let session_id = match session_id {
            Some(id) => id.to_string(),
            None => self.store.create_session("").await?,
        };

        let envelope = self.route(prompt, document_text).await;
        let interaction = NewInteraction {
            user_query: prompt.to_string(),
            route: to_stored_json(&envelope.route)?,
            results: to_stored_json(&envelope.results)?,
            execution_time_ms: envelope.execution_time_ms,
        };
        let ordinal = self.store.append(&session_id, interaction).await?;
        debug!(session_id = session_id.as_str(), ordinal, "interaction saved");

        Ok((envelope, session_id))
    }

    /// Run one scenario with its routed parameters, stamping the elapsed
    /// time on both success and error outcomes.
    ///
    /// Email bodies and document questions fall back to the raw prompt
    /// when routing extracted nothing; a meeting without a company name
    /// stays an error, matching the scenario's own contract.
    async fn run_scenario(
        &self,
        scenario: Scenario,
        decision: &RouteDecision,
        prompt: &str,
        document_text: Option<&str>,
    ) -> ScenarioOutcome {
        let started = Instant::now();
        let result = match scenario {
            Scenario::Meeting => {
                let params = &decision.params.meeting;
                self.meeting.run(&params.company, &params.context).await
            }
            Scenario::Email => {
                let body = non_empty_or(&decision.params.email.body, prompt);
                Ok(self.email.run(body).await)
            }
            Scenario::Document => {
                let question = non_empty_or(&decision.params.document.question, prompt);
                self.document.run(question, document_text).await
            }
        };

        let mut outcome = result.unwrap_or_else(|err| {
            warn!(%scenario, error = %err, "scenario pipeline failed");
            ScenarioOutcome::error(err.to_string())
        });
        outcome.execution_time_ms = started.elapsed().as_millis() as u64;
        outcome
    }
}

fn to_stored_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DossierError> {
    serde_json::to_value(value).map_err(|e| DossierError::Storage {
        source: Box::new(e),
    })
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
