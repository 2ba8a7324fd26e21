// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic entity triage.
//!
//! Partitions extracted entities into Critical/Validation/Skip tiers using
//! zero-cost keyword rules. No LLM pre-call, no network, no latency: the
//! tiers only decide how eagerly the knowledge gate and search executor are
//! applied downstream.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use dossier_core::{normalize_compact, Entity, EntityKind};

/// Research priority tiers for extracted entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TriageTier {
    /// Primary counterparts: always researched.
    Critical,
    /// Secondary mentions: researched up to a configured cap.
    Validation,
    /// Self-references and generic concepts: never researched.
    Skip,
}

/// Partition of a triaged entity list.
///
/// Every input entity lands in exactly one bucket. The validation bucket is
/// bounded downstream by the research runner; the partition itself is never
/// truncated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    pub critical: Vec<Entity>,
    pub validation: Vec<Entity>,
    pub skip: Vec<Entity>,
}

impl TriageResult {
    /// Entities eligible for research: critical plus validation, before the
    /// downstream validation cap is applied.
    pub fn research_candidates(&self) -> usize {
        self.critical.len() + self.validation.len()
    }
}

/// Domain-generic concepts never worth a web search (exact match on the
/// normalized name; whole-word match for concept-typed entities).
const GENERIC_TERMS: &[&str] = &[
    "ai",
    "artificial intelligence",
    "machine learning",
    "deep learning",
    "cloud computing",
    "big data",
    "data analytics",
    "data science",
    "blockchain",
    "cybersecurity",
    "devops",
    "saas",
    "automation",
    "digital transformation",
];

/// Context markers of a primary counterpart (contains, case-insensitive).
const CRITICAL_CONTEXT: &[&str] = &[
    "sender",
    "investor",
    "vc firm",
    "venture firm",
    "acquirer",
    "client",
];

/// Authority roles that make a person entity critical (contains,
/// case-insensitive, person-typed entities only).
const AUTHORITY_TITLES: &[&str] = &[
    "founder",
    "co-founder",
    "ceo",
    "cto",
    "coo",
    "cfo",
    "director",
    "president",
    "chief",
];

/// Context markers of a secondary, merely referenced party.
const SECONDARY_CONTEXT: &[&str] = &[
    "portfolio company",
    "partner",
    "mention",
    "referenced",
    "competitor",
];

/// Keyword triage of extracted entities against the operator's identity.
pub struct EntityTriage {
    /// Operator's own name/company in compact normalized form; empty when
    /// unconfigured (self-reference filtering is then inert).
    operator_identity: String,
}

impl EntityTriage {
    pub fn new(operator_identity: &str) -> Self {
        Self {
            operator_identity: normalize_compact(operator_identity),
        }
    }

    /// Partition `entities` into tiers, preserving input order per bucket.
    pub fn triage(&self, entities: Vec<Entity>) -> TriageResult {
        let mut result = TriageResult::default();
        for entity in entities {
            let (tier, reason) = self.classify(&entity);
            debug!(entity = %entity.name, %tier, reason, "entity triaged");
            match tier {
                TriageTier::Critical => result.critical.push(entity),
                TriageTier::Validation => result.validation.push(entity),
                TriageTier::Skip => result.skip.push(entity),
            }
        }
        result
    }

    /// Classify one entity; rules are applied in order, first match wins.
    pub fn classify(&self, entity: &Entity) -> (TriageTier, &'static str) {
        if self.is_self_reference(entity) {
            return (TriageTier::Skip, "self-reference");
        }
        if is_generic(entity) {
            return (TriageTier::Skip, "generic term");
        }
        if is_primary_counterpart(entity) {
            return (TriageTier::Critical, "primary counterpart");
        }
        if is_authority_person(entity) {
            return (TriageTier::Critical, "authority role");
        }
        if is_secondary_party(entity) {
            return (TriageTier::Validation, "secondary party");
        }
        // Unclassified entities are validated rather than silently dropped.
        (TriageTier::Validation, "unclassified")
    }

    fn is_self_reference(&self, entity: &Entity) -> bool {
        !self.operator_identity.is_empty() && entity.normalized_name() == self.operator_identity
    }
}

fn is_generic(entity: &Entity) -> bool {
    let name = collapse_lower(&entity.name);
    if GENERIC_TERMS.contains(&name.as_str()) {
        return true;
    }
    // Concept-typed entities match on whole words, catching phrases like
    // "machine learning platform" that an extractor labels as a technology.
    if entity.kind == EntityKind::Other
        && GENERIC_TERMS
            .iter()
            .any(|term| contains_word_phrase(&name, term))
    {
        return true;
    }
    let compact = entity.normalized_name();
    compact.contains("realtime") && (compact.contains("process") || compact.contains("data"))
}

fn is_primary_counterpart(entity: &Entity) -> bool {
    let context = entity.context.to_lowercase();
    CRITICAL_CONTEXT.iter().any(|marker| context.contains(marker))
}

fn is_authority_person(entity: &Entity) -> bool {
    entity.kind == EntityKind::Person && {
        let context = entity.context.to_lowercase();
        AUTHORITY_TITLES.iter().any(|title| context.contains(title))
    }
}

fn is_secondary_party(entity: &Entity) -> bool {
    let context = entity.context.to_lowercase();
    SECONDARY_CONTEXT.iter().any(|marker| context.contains(marker))
}

/// Lowercase with runs of whitespace collapsed to single spaces.
fn collapse_lower(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whole-word phrase containment: "dataflow ai" contains "ai" but
/// "openai" does not.
fn contains_word_phrase(haystack: &str, phrase: &str) -> bool {
    format!(" {haystack} ").contains(&format!(" {phrase} "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(name: &str, context: &str) -> Entity {
        Entity::new(name, EntityKind::Company, context)
    }

    fn person(name: &str, context: &str) -> Entity {
        Entity::new(name, EntityKind::Person, context)
    }

    fn concept(name: &str) -> Entity {
        Entity::new(name, EntityKind::Other, "")
    }

    #[test]
    fn self_reference_is_skipped_across_formatting() {
        let triage = EntityTriage::new("DataFlow AI");
        let (tier, reason) = triage.classify(&company("dataflow-ai", "sender's company"));
        assert_eq!(tier, TriageTier::Skip);
        assert_eq!(reason, "self-reference");
    }

    #[test]
    fn empty_identity_disables_self_reference_filter() {
        let triage = EntityTriage::new("");
        let (tier, _) = triage.classify(&company("DataFlow AI", ""));
        assert_ne!(tier, TriageTier::Skip);
    }

    #[test]
    fn exact_generic_term_is_skipped_regardless_of_kind() {
        let triage = EntityTriage::new("");
        let (tier, reason) = triage.classify(&company("Machine  Learning", ""));
        assert_eq!(tier, TriageTier::Skip);
        assert_eq!(reason, "generic term");
    }

    #[test]
    fn concept_typed_generic_phrase_is_skipped() {
        let triage = EntityTriage::new("");
        let (tier, _) = triage.classify(&concept("machine learning platform"));
        assert_eq!(tier, TriageTier::Skip);
    }

    #[test]
    fn named_company_is_not_caught_by_word_matching() {
        let triage = EntityTriage::new("");
        // "OpenAI" must not match the generic term "ai".
        let (tier, _) = triage.classify(&company("OpenAI", ""));
        assert_ne!(tier, TriageTier::Skip);
    }

    #[test]
    fn compound_realtime_data_phrase_is_skipped() {
        let triage = EntityTriage::new("");
        let (tier, _) = triage.classify(&concept("Real-Time Data Pipeline"));
        assert_eq!(tier, TriageTier::Skip);

        let (tier, _) = triage.classify(&concept("real time processing"));
        assert_eq!(tier, TriageTier::Skip);
    }

    #[test]
    fn sender_and_investor_context_is_critical() {
        let triage = EntityTriage::new("");
        let (tier, reason) = triage.classify(&company("Acme Ventures", "sender's VC firm"));
        assert_eq!(tier, TriageTier::Critical);
        assert_eq!(reason, "primary counterpart");

        let (tier, _) = triage.classify(&company("Nimbus Capital", "lead investor in the round"));
        assert_eq!(tier, TriageTier::Critical);
    }

    #[test]
    fn person_with_authority_title_is_critical() {
        let triage = EntityTriage::new("");
        let (tier, reason) = triage.classify(&person("Jane Fong", "founder of Quantum Corp"));
        assert_eq!(tier, TriageTier::Critical);
        assert_eq!(reason, "authority role");
    }

    #[test]
    fn authority_title_on_non_person_is_not_critical() {
        let triage = EntityTriage::new("");
        let (tier, _) = triage.classify(&company("Quantum Corp", "founder-led startup"));
        assert_eq!(tier, TriageTier::Validation);
    }

    #[test]
    fn portfolio_mention_is_validation() {
        let triage = EntityTriage::new("");
        let (tier, reason) = triage.classify(&company("DataFlow AI", "portfolio company mentioned"));
        assert_eq!(tier, TriageTier::Validation);
        assert_eq!(reason, "secondary party");
    }

    #[test]
    fn unclassified_defaults_to_validation() {
        let triage = EntityTriage::new("");
        let (tier, reason) = triage.classify(&company("Quiet Corp", ""));
        assert_eq!(tier, TriageTier::Validation);
        assert_eq!(reason, "unclassified");
    }

    #[test]
    fn every_entity_lands_in_exactly_one_bucket() {
        let triage = EntityTriage::new("MyCo");
        let entities = vec![
            company("MyCo", "sender"),
            company("Acme Ventures", "sender's VC firm"),
            company("cloud computing", ""),
            company("DataFlow AI", "portfolio company mentioned"),
            company("Quiet Corp", ""),
        ];
        let count = entities.len();
        let result = triage.triage(entities);

        assert_eq!(
            result.critical.len() + result.validation.len() + result.skip.len(),
            count
        );
        assert_eq!(result.critical.len(), 1);
        assert_eq!(result.validation.len(), 2);
        assert_eq!(result.skip.len(), 2);
        assert_eq!(result.research_candidates(), 3);
    }

    #[test]
    fn tier_display_is_lowercase() {
        assert_eq!(TriageTier::Critical.to_string(), "critical");
        assert_eq!(TriageTier::Validation.to_string(), "validation");
        assert_eq!(TriageTier::Skip.to_string(), "skip");
    }
}
