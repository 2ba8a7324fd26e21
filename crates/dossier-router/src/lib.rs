// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent routing for the Dossier pipeline.
//!
//! Classifies free-text requests into scenario pipelines (meeting, email,
//! document) with an LLM primary path and a deterministic keyword fallback,
//! so routing always yields at least one scenario.
//!
//! ## Architecture
//!
//! - **IntentRouter**: LLM classification against the scenario vocabulary,
//!   validated (unknown tags dropped, empty result falls back)
//! - **KeywordClassifier**: keyword scoring with pattern-matched parameters,
//!   used whenever the model path fails

pub mod classifier;
pub mod router;

pub use classifier::{KeywordClassifier, Scenario, extract_subject};
pub use router::{
    DocumentParams, EmailParams, IntentRouter, MeetingParams, RouteDecision, RouteParams,
};
