// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-entity research loop.
//!
//! Takes a triage partition and, for every processed entity, runs the
//! knowledge gate and (when the gate asks for it) one bounded web search.
//! Entities are handled sequentially with a fixed delay between successive
//! search calls to respect provider rate limits. Critical entities are all
//! processed; validation entities only up to the configured cap, with the
//! overflow recorded as skipped for efficiency rather than researched.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use dossier_config::ResearchConfig;
use dossier_core::{Entity, ReasoningStep, SourceRecord};

use crate::executor::{SearchExecutor, SearchOutcome};
use crate::gate::{KnowledgeGate, KnowledgeVerdict};
use crate::triage::TriageResult;

/// Research gathered for one entity, the unit handed to synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchEntry {
    pub entity: Entity,
    pub used_existing_knowledge: bool,
    #[serde(default)]
    pub known_info: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub sources: Vec<SourceRecord>,
    #[serde(default)]
    pub query_used: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ResearchEntry {
    fn from_knowledge(entity: Entity, verdict: KnowledgeVerdict) -> Self {
        Self {
            entity,
            used_existing_knowledge: true,
            known_info: verdict.known_info,
            reasoning: verdict.reasoning,
            sources: Vec::new(),
            query_used: None,
            error: None,
        }
    }

    fn from_search(entity: Entity, outcome: SearchOutcome) -> Self {
        Self {
            entity,
            used_existing_knowledge: false,
            known_info: String::new(),
            reasoning: String::new(),
            sources: outcome.sources,
            query_used: Some(outcome.query),
            error: outcome.error,
        }
    }

    /// Render this entry as a findings block for a synthesis prompt.
    pub fn prompt_block(&self, top_sources: usize) -> String {
        let mut block = format!("{}:\n", self.entity.name);
        if self.used_existing_knowledge {
            let info = if self.known_info.trim().is_empty() {
                "Information available"
            } else {
                &self.known_info
            };
            block.push_str(&format!("[From Existing Knowledge] {info}\n"));
            if !self.reasoning.trim().is_empty() {
                block.push_str(&format!("  Reasoning: {}\n", self.reasoning));
            }
        } else if !self.sources.is_empty() {
            for (i, source) in self.sources.iter().take(top_sources).enumerate() {
                block.push_str(&format!("{}. {}\n   {}\n", i + 1, source.title, source.snippet));
            }
        } else if let Some(err) = &self.error {
            block.push_str(&format!("[Search Error] {err}\n"));
        }
        block
    }
}

/// Aggregate counters for one research run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchStats {
    /// All triaged entities, including skips.
    pub total_entities: usize,
    /// Entities for which a web search was issued (successful or not).
    pub entities_searched: usize,
    /// Entities resolved from model knowledge alone.
    pub entities_known: usize,
    /// Triage skips: self-references and generic terms.
    pub skipped_generic: usize,
    /// Validation entities beyond the processing cap.
    pub skipped_for_efficiency: usize,
    /// Total sources returned across all searches.
    pub web_sources: usize,
    /// Fraction of research candidates resolved without a web search.
    pub efficiency: f64,
}

/// Full output of one research run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchReport {
    pub entries: Vec<ResearchEntry>,
    pub stats: ResearchStats,
    pub steps: Vec<ReasoningStep>,
}

/// Executes the gate-then-search loop over a triage partition.
pub struct ResearchRunner {
    gate: KnowledgeGate,
    executor: SearchExecutor,
    config: ResearchConfig,
}

impl ResearchRunner {
    pub fn new(gate: KnowledgeGate, executor: SearchExecutor, config: ResearchConfig) -> Self {
        Self {
            gate,
            executor,
            config,
        }
    }

    /// Research every processed entity in `triage`, sequentially.
    pub async fn run(&self, triage: &TriageResult, source_context: &str) -> ResearchReport {
        let mut steps = Vec::new();
        let mut entries = Vec::new();
        let mut stats = ResearchStats {
            total_entities: triage.research_candidates() + triage.skip.len(),
            skipped_generic: triage.skip.len(),
            ..ResearchStats::default()
        };

        let cap = self.config.max_validation_entities;
        stats.skipped_for_efficiency = triage.validation.len().saturating_sub(cap);
        if stats.skipped_for_efficiency > 0 {
            steps.push(ReasoningStep::info(format!(
                "Skipped {} validation entities for efficiency",
                stats.skipped_for_efficiency
            )));
        }

        let processed = triage.critical.iter().chain(triage.validation.iter().take(cap));
        for entity in processed {
            steps.push(ReasoningStep::info(format!(
                "Assessing knowledge about '{}' ({})",
                entity.name, entity.kind
            )));
            let verdict = self.gate.assess(entity, source_context).await;

            if !verdict.needs_search {
                let reasoning = non_empty_or(&verdict.reasoning, "Sufficient knowledge available");
                steps.push(ReasoningStep::success(format!(
                    "Using existing knowledge: {reasoning}"
                )));
                stats.entities_known += 1;
                entries.push(ResearchEntry::from_knowledge(entity.clone(), verdict));
                continue;
            }

            steps.push(ReasoningStep::info(format!(
                "External research needed: {}",
                non_empty_or(&verdict.reasoning, "Unknown entity")
            )));

            let query = verdict
                .search_query
                .as_deref()
                .filter(|q| !q.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} recent news", entity.name));

            if stats.entities_searched > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.search_delay_ms)).await;
            }
            steps.push(ReasoningStep::info(format!(
                "Searching the web for '{}'",
                entity.name
            )));
            let outcome = self.executor.run(&query, self.config.max_results_per_entity).await;
            stats.entities_searched += 1;
            stats.web_sources += outcome.sources.len();

            match &outcome.error {
                Some(err) => steps.push(ReasoningStep::warning(format!(
                    "Search failed for {}: {err}",
                    entity.name
                ))),
                None => steps.push(ReasoningStep::success(format!(
                    "Found {} sources for {}",
                    outcome.sources.len(),
                    entity.name
                ))),
            }
            entries.push(ResearchEntry::from_search(entity.clone(), outcome));
        }

        stats.efficiency = efficiency(stats.entities_searched, triage.research_candidates());
        info!(
            searched = stats.entities_searched,
            known = stats.entities_known,
            sources = stats.web_sources,
            efficiency = stats.efficiency,
            "research run complete"
        );

        ResearchReport {
            entries,
            stats,
            steps,
        }
    }
}

/// Fraction of research candidates resolved without a search; 1.0 when there
/// were no candidates at all.
pub fn efficiency(searched: usize, candidates: usize) -> f64 {
    if candidates == 0 {
        return 1.0;
    }
    1.0 - searched as f64 / candidates as f64
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
