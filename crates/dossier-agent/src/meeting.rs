// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The meeting briefing pipeline.
//!
//! Sequential phases: recall past interactions with the company, run the
//! company through the knowledge gate, search two query angles when the
//! gate asks for fresh evidence, synthesize the briefing, and score the
//! outcome. Provider failures degrade the briefing; the only terminal
//! error this scenario reports itself is a missing company name.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use dossier_config::DossierConfig;
use dossier_core::{
    ChatProvider, DossierError, Entity, EntityKind, ReasoningStep, SearchProvider,
};
use dossier_memory::{InteractionSource, MemoryRecall};
use dossier_research::{KnowledgeGate, SearchExecutor};
use dossier_synthesis::{
    attribution, confidence, BriefingInputs, BriefingSynthesizer, Evidence,
};

use crate::envelope::ScenarioOutcome;

/// Results fetched per research angle.
const RESULTS_PER_ANGLE: usize = 4;

/// Prepares meeting briefings for a subject company.
pub struct MeetingPipeline {
    memory: MemoryRecall,
    gate: KnowledgeGate,
    executor: SearchExecutor,
    synthesizer: BriefingSynthesizer,
    search_delay_ms: u64,
}

impl MeetingPipeline {
    pub fn new(
        chat: Arc<dyn ChatProvider>,
        search: Arc<dyn SearchProvider>,
        source: Arc<dyn InteractionSource>,
        config: &DossierConfig,
    ) -> Self {
        Self {
            memory: MemoryRecall::new(source, config.memory.clone()),
            gate: KnowledgeGate::new(chat.clone()),
            executor: SearchExecutor::new(search),
            synthesizer: BriefingSynthesizer::new(chat, config.synthesis.clone()),
            search_delay_ms: config.research.search_delay_ms,
        }
    }

    /// Produce a briefing outcome for a meeting with `company`.
    ///
    /// A blank company name yields the scenario's error outcome directly;
    /// memory source failures propagate to the per-scenario catch.
    pub async fn run(
        &self,
        company: &str,
        meeting_context: &str,
    ) -> Result<ScenarioOutcome, DossierError> {
        let company = company.trim();
        if company.is_empty() {
            return Ok(ScenarioOutcome::error("No company name provided."));
        }

        let mut steps = vec![ReasoningStep::info(format!(
            "Searching local memory for past interactions with {company}"
        ))];
        let context = self.memory.recall(company).await?;
        steps.push(ReasoningStep::success(format!(
            "Found {} past interaction(s). Last contact: {}.",
            context.total_interactions,
            context
                .last_contact
                .map(|date| date.to_string())
                .unwrap_or_else(|| "Never".to_string()),
        )));

        let entity = Entity::new(company, EntityKind::Company, meeting_context);
        steps.push(ReasoningStep::info(format!(
            "Assessing knowledge about '{}' ({})",
            entity.name, entity.kind
        )));
        let verdict = self.gate.assess(&entity, meeting_context).await;

        let (news, industry, known_info) = if verdict.needs_search {
            steps.push(ReasoningStep::info(format!(
                "External research needed: {}",
                non_empty_or(&verdict.reasoning, "Unknown entity")
            )));

            steps.push(ReasoningStep::info(format!(
                "Researching recent news about {company}"
            )));
            let news = self
                .executor
                .run(
                    &format!("{company} recent news announcements 2025 2026"),
                    RESULTS_PER_ANGLE,
                )
                .await;
            match &news.error {
                Some(err) => steps.push(ReasoningStep::warning(format!(
                    "News search failed: {err}"
                ))),
                None => steps.push(ReasoningStep::success(format!(
                    "Found {} news source(s) about {company}.",
                    news.sources.len()
                ))),
            }

            tokio::time::sleep(Duration::from_millis(self.search_delay_ms)).await;

            steps.push(ReasoningStep::info(format!(
                "Researching {company} products, funding, and strategy"
            )));
            let industry = self
                .executor
                .run(
                    &format!("{company} products funding strategy leadership"),
                    RESULTS_PER_ANGLE,
                )
                .await;
            match &industry.error {
                Some(err) => steps.push(ReasoningStep::warning(format!(
                    "Industry search failed: {err}"
                ))),
                None => steps.push(ReasoningStep::success(format!(
                    "Found {} additional source(s).",
                    industry.sources.len()
                ))),
            }

            (news.sources, industry.sources, String::new())
        } else {
            steps.push(ReasoningStep::success(format!(
                "Using existing knowledge: {}",
                non_empty_or(&verdict.reasoning, "Sufficient knowledge available")
            )));
            (Vec::new(), Vec::new(), verdict.known_info)
        };

        steps.push(ReasoningStep::info("Generating briefing"));
        let inputs = BriefingInputs {
            company,
            meeting_context,
            memory_summary: &context.summary,
            news: &news,
            industry: &industry,
            known_info: &known_info,
        };
        let outcome = self.synthesizer.synthesize(&inputs).await;
        if outcome.degraded {
            steps.push(ReasoningStep::warning("Briefing generated with limited data."));
        } else {
            steps.push(ReasoningStep::success("Briefing generated successfully."));
        }

        let mut sources = news;
        sources.extend(industry);
        steps.push(ReasoningStep::success(format!(
            "Compiled data from {} past interaction(s) and {} web source(s).",
            context.total_interactions,
            sources.len()
        )));

        let evidence = Evidence {
            memory_interactions: context.total_interactions,
            web_sources: sources.len(),
            has_last_contact: context.last_contact.is_some(),
            deliverable_complete: outcome.briefing.is_complete(),
        };
        info!(
            company,
            interactions = context.total_interactions,
            sources = sources.len(),
            degraded = outcome.degraded,
            "meeting briefing complete"
        );

        Ok(ScenarioOutcome {
            reasoning_steps: steps,
            sources,
            result: outcome.briefing_text,
            briefing: Some(outcome.briefing),
            stats: None,
            confidence: confidence(&evidence),
            attribution: attribution(&evidence),
            error: None,
            execution_time_ms: 0,
        })
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
