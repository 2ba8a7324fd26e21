// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The email reply pipeline.
//!
//! Extracts entities from the email body, triages them, runs the gated
//! research loop over the candidates, and drafts a reply grounded in
//! whatever the research produced. Every failure mode inside the loop is
//! absorbed by the collaborators, so the pipeline itself never errors.

use std::sync::Arc;

use tracing::debug;

use dossier_config::DossierConfig;
use dossier_core::{ChatProvider, ReasoningStep, SearchProvider};
use dossier_research::{
    EntityExtractor, EntityTriage, KnowledgeGate, ResearchReport, ResearchRunner, SearchExecutor,
};
use dossier_synthesis::{attribution, confidence, Evidence, ReplyDrafter};

use crate::envelope::ScenarioOutcome;

/// Upper bound on sources carried into the outcome.
const MAX_OUTCOME_SOURCES: usize = 10;

/// Researches an inbound email and drafts a reply.
pub struct EmailPipeline {
    extractor: EntityExtractor,
    triage: EntityTriage,
    runner: ResearchRunner,
    drafter: ReplyDrafter,
    top_sources: usize,
}

impl EmailPipeline {
    pub fn new(
        chat: Arc<dyn ChatProvider>,
        search: Arc<dyn SearchProvider>,
        config: &DossierConfig,
    ) -> Self {
        Self {
            extractor: EntityExtractor::new(chat.clone()),
            triage: EntityTriage::new(&config.agent.identity),
            runner: ResearchRunner::new(
                KnowledgeGate::new(chat.clone()),
                SearchExecutor::new(search),
                config.research.clone(),
            ),
            drafter: ReplyDrafter::new(chat, config.synthesis.clone()),
            top_sources: config.research.top_sources_per_entity,
        }
    }

    /// Research the email's entities and draft a reply.
    pub async fn run(&self, email_body: &str) -> ScenarioOutcome {
        let mut steps = vec![ReasoningStep::info("Analyzing email for unknown entities")];

        let entities = self.extractor.extract(email_body).await;
        if entities.is_empty() {
            steps.push(ReasoningStep::info("No entities requiring research"));
        } else {
            let names: Vec<&str> = entities.iter().map(|e| e.name.as_str()).collect();
            steps.push(ReasoningStep::success(format!(
                "Found {} entities: {}",
                entities.len(),
                names.join(", ")
            )));
        }

        let triage = self.triage.triage(entities);
        let ResearchReport {
            entries,
            stats,
            steps: research_steps,
        } = self.runner.run(&triage, email_body).await;
        steps.extend(research_steps);

        steps.push(ReasoningStep::info(
            "Synthesizing research and drafting reply",
        ));
        let draft = self.drafter.draft(email_body, &entries, self.top_sources).await;
        if draft.complete {
            steps.push(ReasoningStep::success("Draft reply completed"));
        } else {
            steps.push(ReasoningStep::error("Reply drafting failed"));
        }

        let sources: Vec<_> = entries
            .iter()
            .flat_map(|entry| entry.sources.iter().cloned())
            .take(MAX_OUTCOME_SOURCES)
            .collect();
        let evidence = Evidence {
            memory_interactions: 0,
            web_sources: stats.web_sources,
            has_last_contact: false,
            deliverable_complete: draft.complete,
        };
        debug!(
            entities = stats.total_entities,
            searched = stats.entities_searched,
            sources = stats.web_sources,
            complete = draft.complete,
            "email reply drafted"
        );

        ScenarioOutcome {
            reasoning_steps: steps,
            sources,
            result: draft.text,
            briefing: None,
            stats: Some(stats),
            confidence: confidence(&evidence),
            attribution: attribution(&evidence),
            error: None,
            execution_time_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use dossier_core::StepLevel;
    use dossier_synthesis::Verification;
    use dossier_test_utils::{sample_sources, MockChat, MockSearch};

    use super::*;

    const SENDER_ENTITY: &str = r#"[
        {"type": "company", "name": "DataFlow AI", "context": "sender's startup"}
    ]"#;

    fn pipeline(chat: &Arc<MockChat>, search: &Arc<MockSearch>) -> EmailPipeline {
        let mut config = DossierConfig::default();
        config.research.search_delay_ms = 0;
        config.synthesis.reply_min_words = 1;
        EmailPipeline::new(chat.clone(), search.clone(), &config)
    }

    #[tokio::test]
    async fn critical_entity_is_searched_and_the_reply_cites_the_research() {
        let chat = Arc::new(MockChat::with_replies(vec![
            SENDER_ENTITY.into(),
            r#"{"needs_search": true, "reasoning": "unknown startup", "search_query": "DataFlow AI funding"}"#.into(),
            "Thanks for reaching out. Happy to discuss the integration next week.".into(),
        ]));
        let search = Arc::new(MockSearch::new());
        search.queue_sources(sample_sources(3));

        let outcome = pipeline(&chat, &search).run("Hi, I run DataFlow AI.").await;

        assert_eq!(
            search.queries(),
            vec![("DataFlow AI funding".to_string(), 5)]
        );
        assert!(outcome.error.is_none());
        assert_eq!(outcome.sources.len(), 3);
        let stats = outcome.stats.expect("stats present");
        assert_eq!(stats.entities_searched, 1);
        assert_eq!(stats.web_sources, 3);
        assert!(outcome.result.contains("Happy to discuss"));
        // 3 web sources plus a complete draft, no memory in this scenario.
        assert_eq!(outcome.confidence, 0.6);
        assert_eq!(
            outcome.attribution.verification,
            Verification::PartiallyVerified
        );
    }

    #[tokio::test]
    async fn known_entity_skips_search_and_scores_model_heavy() {
        let chat = Arc::new(MockChat::with_replies(vec![
            SENDER_ENTITY.into(),
            r#"{"needs_search": false, "known_info": "Well-covered data startup", "reasoning": "known"}"#.into(),
            "Thanks for the note, the roadmap sounds promising.".into(),
        ]));
        let search = Arc::new(MockSearch::new());

        let outcome = pipeline(&chat, &search).run("Hi from DataFlow AI.").await;

        assert!(search.queries().is_empty());
        assert!(outcome.sources.is_empty());
        let stats = outcome.stats.expect("stats present");
        assert_eq!(stats.entities_known, 1);
        assert_eq!(stats.entities_searched, 0);
        // Complete draft only: 0.3 confidence, nothing verified.
        assert_eq!(outcome.confidence, 0.3);
        assert_eq!(outcome.attribution.verification, Verification::Unverified);
    }

    #[tokio::test]
    async fn outcome_sources_are_capped_while_stats_count_everything() {
        let chat = Arc::new(MockChat::with_replies(vec![
            r#"[
                {"type": "company", "name": "Alpha Corp", "context": "sender's employer"},
                {"type": "company", "name": "Beta Labs", "context": "sender mentioned partner"}
            ]"#
            .into(),
            r#"{"needs_search": true, "reasoning": "verify"}"#.into(),
            r#"{"needs_search": true, "reasoning": "verify"}"#.into(),
            "Appreciate the introduction, let's set up a call.".into(),
        ]));
        let search = Arc::new(MockSearch::new());
        search.queue_sources(sample_sources(6));
        search.queue_sources(sample_sources(6));

        let outcome = pipeline(&chat, &search)
            .run("Alpha Corp and Beta Labs want to partner.")
            .await;

        assert_eq!(outcome.sources.len(), 10);
        let stats = outcome.stats.expect("stats present");
        assert_eq!(stats.web_sources, 12);
    }

    #[tokio::test]
    async fn drafting_failure_surfaces_in_the_result_without_completion_credit() {
        let chat = Arc::new(MockChat::new());
        chat.queue(SENDER_ENTITY);
        chat.queue(r#"{"needs_search": false, "known_info": "known", "reasoning": "known"}"#);
        chat.queue_error("model offline");
        let search = Arc::new(MockSearch::new());

        let outcome = pipeline(&chat, &search).run("Hello from DataFlow AI.").await;

        assert_eq!(outcome.result, "Error: Could not generate reply");
        assert!(outcome
            .reasoning_steps
            .iter()
            .any(|step| step.level == StepLevel::Error
                && step.step.contains("Reply drafting failed")));
        // The pipeline itself still reports a uniform outcome, not an error.
        assert!(outcome.error.is_none());
        assert!(outcome.stats.is_some());
        assert_eq!(outcome.confidence, 0.0);
    }

    #[tokio::test]
    async fn email_without_entities_still_gets_a_reply() {
        let chat = Arc::new(MockChat::with_replies(vec![
            "[]".into(),
            "Thanks for the update, talk soon.".into(),
        ]));
        let search = Arc::new(MockSearch::new());

        let outcome = pipeline(&chat, &search).run("Quick status update.").await;

        assert!(outcome
            .reasoning_steps
            .iter()
            .any(|step| step.step.contains("No entities requiring research")));
        assert!(outcome.result.contains("talk soon"));
        assert!(search.queries().is_empty());
    }
}
