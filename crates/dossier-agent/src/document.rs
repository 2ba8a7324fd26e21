// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The document answer pipeline.
//!
//! Thin orchestration over [`DocumentAnswerer`]: the answerer owns the
//! classify/draft/backfill flow, this pipeline scores its output into
//! the uniform scenario outcome. Provider errors and a missing document
//! propagate to the per-scenario catch.

use std::sync::Arc;

use tracing::debug;

use dossier_core::{ChatProvider, DossierError, SearchProvider};
use dossier_synthesis::{attribution, confidence, DocumentAnswerer, Evidence};

use crate::envelope::ScenarioOutcome;

/// Answers a question against an optional document.
pub struct DocumentPipeline {
    answerer: DocumentAnswerer,
}

impl DocumentPipeline {
    pub fn new(chat: Arc<dyn ChatProvider>, search: Arc<dyn SearchProvider>) -> Self {
        Self {
            answerer: DocumentAnswerer::new(chat, search),
        }
    }

    pub async fn run(
        &self,
        question: &str,
        document_text: Option<&str>,
    ) -> Result<ScenarioOutcome, DossierError> {
        let answer = self.answerer.answer(question, document_text).await?;

        let evidence = Evidence {
            memory_interactions: 0,
            web_sources: answer.sources.len(),
            has_last_contact: false,
            deliverable_complete: !answer.result.trim().is_empty(),
        };
        debug!(
            used_web = answer.used_web,
            sources = answer.sources.len(),
            "document question answered"
        );

        Ok(ScenarioOutcome {
            reasoning_steps: answer.steps,
            sources: answer.sources,
            result: answer.result,
            briefing: None,
            stats: None,
            confidence: confidence(&evidence),
            attribution: attribution(&evidence),
            error: None,
            execution_time_ms: 0,
        })
    }
}
