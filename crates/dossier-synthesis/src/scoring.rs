// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Confidence and attribution scoring for synthesized deliverables.
//!
//! Both scores are pure functions of the evidence that went into a
//! deliverable, so every scenario pipeline reports them the same way.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Evidence available to a scenario at the moment its deliverable was
/// produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evidence {
    /// Cached interactions recalled from memory.
    pub memory_interactions: usize,
    /// Web sources gathered across all searches.
    pub web_sources: usize,
    /// Whether memory produced a last-contact date.
    pub has_last_contact: bool,
    /// Whether the deliverable came out structurally complete.
    pub deliverable_complete: bool,
}

/// How much of a deliverable was corroborated by independent evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verification {
    /// Model output only, nothing to check it against.
    #[strum(serialize = "Unverified")]
    Unverified,
    /// Exactly one of memory or web contributed.
    #[strum(serialize = "Partially verified")]
    PartiallyVerified,
    /// Memory and web both contributed.
    #[strum(serialize = "Cross-verified")]
    CrossVerified,
}

/// Percentage split of a deliverable's provenance.
///
/// The three percentage fields always sum to exactly 100; the model
/// bucket absorbs any rounding residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionBreakdown {
    pub memory_pct: u8,
    pub web_pct: u8,
    pub model_pct: u8,
    /// Memory interactions behind the memory share.
    pub interactions: usize,
    /// Web sources behind the web share.
    pub source_count: usize,
    pub verification: Verification,
}

impl AttributionBreakdown {
    /// Breakdown for error outcomes: everything attributed to the model.
    pub fn all_model() -> Self {
        Self {
            memory_pct: 0,
            web_pct: 0,
            model_pct: 100,
            interactions: 0,
            source_count: 0,
            verification: Verification::Unverified,
        }
    }
}

/// Additive confidence score in `[0.0, 1.0]`, rounded to two decimals.
///
/// Credits: 0.3 for recalled memory, 0.3 for three or more web sources
/// (0.15 for at least one), 0.3 for a complete deliverable, 0.1 for a
/// known last-contact date.
pub fn confidence(evidence: &Evidence) -> f64 {
    let mut score: f64 = 0.0;
    if evidence.memory_interactions > 0 {
        score += 0.3;
    }
    if evidence.web_sources >= 3 {
        score += 0.3;
    } else if evidence.web_sources >= 1 {
        score += 0.15;
    }
    if evidence.deliverable_complete {
        score += 0.3;
    }
    if evidence.has_last_contact {
        score += 0.1;
    }
    ((score * 100.0).round() / 100.0).min(1.0)
}

/// Split a deliverable's provenance across memory, web, and model.
///
/// Starts from a base split keyed on which evidence kinds are present,
/// shifts weight from the model bucket toward memory (3 points per
/// interaction, capped at 10) and toward web (2 points per source,
/// capped at 10), floors the model bucket at 5, and normalizes so the
/// percentages sum to exactly 100.
pub fn attribution(evidence: &Evidence) -> AttributionBreakdown {
    let has_memory = evidence.memory_interactions > 0;
    let has_web = evidence.web_sources > 0;

    let (mut memory, mut web, mut model) = match (has_memory, has_web) {
        (true, true) => (30.0, 40.0, 30.0),
        (true, false) => (50.0, 0.0, 50.0),
        (false, true) => (0.0, 55.0, 45.0),
        (false, false) => (0.0, 0.0, 100.0),
    };

    if has_memory {
        let bonus = (evidence.memory_interactions as f64 * 3.0).min(10.0);
        memory += bonus;
        model -= bonus;
    }
    if has_web {
        let bonus = (evidence.web_sources as f64 * 2.0).min(10.0);
        web += bonus;
        model -= bonus;
    }
    model = model.max(5.0);

    let total = memory + web + model;
    let memory_pct = (memory / total * 100.0).round() as u8;
    let web_pct = (web / total * 100.0).round() as u8;
    let model_pct = 100 - memory_pct - web_pct;

    let verification = match (has_memory, has_web) {
        (true, true) => Verification::CrossVerified,
        (false, false) => Verification::Unverified,
        _ => Verification::PartiallyVerified,
    };

    AttributionBreakdown {
        memory_pct,
        web_pct,
        model_pct,
        interactions: evidence.memory_interactions,
        source_count: evidence.web_sources,
        verification,
    }
}
