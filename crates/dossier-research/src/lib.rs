// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entity research for the Dossier pipeline.
//!
//! Turns a source text into researched entities in four stages: LLM entity
//! extraction, keyword triage into Critical/Validation/Skip tiers, a
//! per-entity knowledge gate deciding between model knowledge and a web
//! search, and bounded search execution. The runner composes the stages and
//! reports entries, stats, and a reasoning trace.
//!
//! ## Architecture
//!
//! - **EntityExtractor**: LLM extraction of research candidates
//! - **EntityTriage**: zero-cost keyword tiering with self-reference and
//!   generic-term filters
//! - **KnowledgeGate**: fail-open search-or-know decision per entity
//! - **SearchExecutor**: bounded queries with provider failure as a value
//! - **ResearchRunner**: the sequential gate-then-search loop with stats

pub mod executor;
pub mod extraction;
pub mod gate;
pub mod runner;
pub mod triage;

pub use executor::{SearchExecutor, SearchOutcome};
pub use extraction::EntityExtractor;
pub use gate::{KnowledgeGate, KnowledgeVerdict};
pub use runner::{efficiency, ResearchEntry, ResearchReport, ResearchRunner, ResearchStats};
pub use triage::{EntityTriage, TriageResult, TriageTier};
