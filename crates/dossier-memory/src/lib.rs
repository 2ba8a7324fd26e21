// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interaction memory for the Dossier research pipeline.
//!
//! Reads cached email and meeting records from local JSON files, scores
//! them for relevance against a request subject, and condenses the
//! survivors into a [`MemoryContext`] the scenario pipelines hand to
//! the LLM alongside fresh search results.
//!
//! ## Architecture
//!
//! - **InteractionSource**: Trait over record backends, with the
//!   [`JsonFileSource`] file implementation
//! - **Scoring**: Keyword, domain, recency, and automated-sender
//!   weighting for emails and meetings
//! - **MemoryRecall**: Threshold selection, thread dedup, newest-first
//!   ordering, and summary rendering
//! - **Types**: EmailRecord, MeetingRecord, MemoryContext

pub mod recall;
pub mod scoring;
pub mod source;
pub mod types;

pub use recall::MemoryRecall;
pub use scoring::{normalize_thread_subject, RelevanceWeights};
pub use source::{InteractionSource, JsonFileSource};
pub use types::{parse_record_date, EmailRecord, MeetingRecord, MemoryContext};
