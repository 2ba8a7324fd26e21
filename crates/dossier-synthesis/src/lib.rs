// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deliverable synthesis for the Dossier pipeline.
//!
//! Turns gathered evidence into the three scenario deliverables: meeting
//! briefings, research-informed email replies, and document answers. Every
//! deliverable is post-processed and scored so callers can tell how much
//! of it rests on memory, web evidence, or the model alone.
//!
//! ## Architecture
//!
//! - **BriefingSynthesizer**: structured meeting briefing with a canned
//!   fallback for LLM outages
//! - **ReplyDrafter**: email reply drafting with a word-band corrective
//!   round-trip
//! - **DocumentAnswerer**: classify, answer from document, backfill from
//!   the web when the document lacks the answer
//! - **polish**: cliché stripping and whitespace normalization
//! - **scoring**: additive confidence plus provenance attribution

pub mod briefing;
pub mod document;
pub mod polish;
pub mod reply;
pub mod scoring;

pub use briefing::{
    Briefing, BriefingInputs, BriefingOutcome, BriefingSynthesizer, format_briefing_text,
};
pub use document::{DocumentAnswer, DocumentAnswerer};
pub use polish::{normalize_whitespace, polish, strip_cliches, word_count};
pub use reply::{ReplyDraft, ReplyDrafter};
pub use scoring::{AttributionBreakdown, Evidence, Verification, attribution, confidence};
