// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure relevance scoring for interaction records.
//!
//! All weights live in one table so scoring is testable in isolation and
//! never spread across call sites as magic literals. Scores are additive:
//! a record that does not mention the subject anywhere scores exactly 0,
//! regardless of how recent it is.

use chrono::NaiveDate;

use dossier_core::normalize_compact;

use crate::types::{parse_record_date, EmailRecord, MeetingRecord};

/// Sender substrings that mark a message as automated.
const AUTOMATED_SENDER_MARKERS: &[&str] = &[
    "noreply",
    "no-reply",
    "donotreply",
    "mailer-daemon",
    "notifications@",
    "newsletter",
    "updates@",
];

/// Weight table for relevance scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceWeights {
    /// Subject match in a primary field (subject line, topic, counterpart).
    pub primary_field: f64,
    /// Compacted subject appears in the sender's mail domain.
    pub domain: f64,
    /// Subject match in the body or notes.
    pub body: f64,
    /// Penalty for automated-sender patterns. Negative.
    pub automated_sender: f64,
    /// Bonus for records dated within 30 days.
    pub recency_full: f64,
    /// Bonus for records dated within 90 days.
    pub recency_partial: f64,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            primary_field: 3.0,
            domain: 2.0,
            body: 1.0,
            automated_sender: -2.0,
            recency_full: 1.5,
            recency_partial: 0.75,
        }
    }
}

/// Score an email record against a subject.
///
/// No subject match in any field means 0; otherwise the base match score
/// plus the automated-sender penalty plus the recency bonus.
pub fn score_email(
    email: &EmailRecord,
    subject: &str,
    today: NaiveDate,
    weights: &RelevanceWeights,
) -> f64 {
    let mut base = 0.0;

    if contains_ci(&email.subject, subject)
        || contains_ci(&email.sender, subject)
        || contains_ci(&email.to, subject)
    {
        base += weights.primary_field;
    }
    if domain_matches(&email.sender, subject) {
        base += weights.domain;
    }
    if contains_ci(&email.body, subject) {
        base += weights.body;
    }

    if base <= 0.0 {
        return 0.0;
    }

    let mut score = base;
    if is_automated_sender(&email.sender) {
        score += weights.automated_sender;
    }
    score + recency_bonus(email.best_date(), today, weights)
}

/// Score a meeting record against a subject.
pub fn score_meeting(
    meeting: &MeetingRecord,
    subject: &str,
    today: NaiveDate,
    weights: &RelevanceWeights,
) -> f64 {
    let mut base = 0.0;

    if contains_ci(&meeting.topic, subject) || contains_ci(&meeting.company, subject) {
        base += weights.primary_field;
    }
    if contains_ci(&meeting.notes, subject) {
        base += weights.body;
    }

    if base <= 0.0 {
        return 0.0;
    }

    base + recency_bonus(meeting.best_date(), today, weights)
}

/// Recency bonus: full weight within 30 days, partial within 90, none
/// beyond. Unparseable dates get no bonus.
pub fn recency_bonus(date_str: &str, today: NaiveDate, weights: &RelevanceWeights) -> f64 {
    let Some(date) = parse_record_date(date_str) else {
        return 0.0;
    };
    let days = (today - date).num_days();
    if days <= 30 {
        weights.recency_full
    } else if days <= 90 {
        weights.recency_partial
    } else {
        0.0
    }
}

/// Normalize an email subject line into a thread key: strip reply and
/// forward prefixes (repeatedly), collapse whitespace, lowercase.
pub fn normalize_thread_subject(subject: &str) -> String {
    let mut current = subject.trim();
    loop {
        let stripped = ["re:", "fwd:", "fw:"]
            .iter()
            .find_map(|prefix| strip_prefix_ci(current, prefix));
        match stripped {
            Some(rest) => current = rest.trim_start(),
            None => break,
        }
    }
    current
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// ASCII case-insensitive prefix strip that never slices mid-character.
fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    match text.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => Some(&text[prefix.len()..]),
        _ => None,
    }
}

/// Case-insensitive substring check; empty needles never match.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Whether the compacted subject appears in the sender's mail domain,
/// so "DataFlow AI" matches mail from `carol@dataflowai.com`.
fn domain_matches(sender: &str, subject: &str) -> bool {
    let Some((_, domain)) = sender.rsplit_once('@') else {
        return false;
    };
    let compact_subject = normalize_compact(subject);
    !compact_subject.is_empty() && normalize_compact(domain).contains(&compact_subject)
}

fn is_automated_sender(sender: &str) -> bool {
    let lowered = sender.to_lowercase();
    AUTOMATED_SENDER_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 20).unwrap()
    }

    fn email(subject: &str, sender: &str, body: &str, date: &str) -> EmailRecord {
        EmailRecord {
            subject: subject.into(),
            sender: sender.into(),
            body: body.into(),
            date: date.into(),
            ..EmailRecord::default()
        }
    }

    #[test]
    fn subject_line_match_scores_primary_weight() {
        let weights = RelevanceWeights::default();
        let record = email("Acme partnership", "bob@other.com", "hello", "");
        assert_eq!(score_email(&record, "Acme", today(), &weights), 3.0);
    }

    #[test]
    fn domain_match_scores_even_without_field_match() {
        let weights = RelevanceWeights::default();
        let record = email("Quick question", "carol@dataflowai.com", "hi", "");
        assert_eq!(score_email(&record, "DataFlow AI", today(), &weights), 2.0);
    }

    #[test]
    fn no_match_scores_zero_even_when_recent() {
        let weights = RelevanceWeights::default();
        let record = email("Unrelated", "bob@other.com", "nothing here", "2026-08-19");
        assert_eq!(score_email(&record, "Acme", today(), &weights), 0.0);
    }

    #[test]
    fn automated_penalty_applies_only_to_matched_records() {
        let weights = RelevanceWeights::default();
        let record = email("Acme weekly digest", "noreply@acme.com", "", "");
        // primary 3.0 + domain 2.0 - automated 2.0
        assert_eq!(score_email(&record, "Acme", today(), &weights), 3.0);
    }

    #[test]
    fn recency_tiers() {
        let weights = RelevanceWeights::default();
        assert_eq!(recency_bonus("2026-08-01", today(), &weights), 1.5);
        assert_eq!(recency_bonus("2026-06-15", today(), &weights), 0.75);
        assert_eq!(recency_bonus("2025-01-01", today(), &weights), 0.0);
        assert_eq!(recency_bonus("not a date", today(), &weights), 0.0);
    }

    #[test]
    fn recent_email_beats_stale_one() {
        let weights = RelevanceWeights::default();
        let fresh = email("Acme terms", "a@x.com", "", "2026-08-10");
        let stale = email("Acme terms", "a@x.com", "", "2024-01-01");
        assert!(
            score_email(&fresh, "Acme", today(), &weights)
                > score_email(&stale, "Acme", today(), &weights)
        );
    }

    #[test]
    fn meeting_scores_topic_company_and_notes() {
        let weights = RelevanceWeights::default();
        let meeting = MeetingRecord {
            topic: "Acme roadmap review".into(),
            company: "Acme".into(),
            notes: "Walked Acme through Q3 plans".into(),
            date: "2026-08-15".into(),
            ..MeetingRecord::default()
        };
        // primary 3.0 + body 1.0 + recency 1.5
        assert_eq!(score_meeting(&meeting, "Acme", today(), &weights), 5.5);
    }

    #[test]
    fn thread_subject_normalization() {
        assert_eq!(normalize_thread_subject("Re: Re: Acme  intro"), "acme intro");
        assert_eq!(normalize_thread_subject("FWD: Acme intro"), "acme intro");
        assert_eq!(normalize_thread_subject("Fw:  re: Acme intro"), "acme intro");
        assert_eq!(normalize_thread_subject("Acme intro"), "acme intro");
        assert_eq!(normalize_thread_subject("  "), "");
    }

    #[test]
    fn empty_subject_never_matches() {
        let weights = RelevanceWeights::default();
        let record = email("Anything", "a@x.com", "body", "2026-08-19");
        assert_eq!(score_email(&record, "", today(), &weights), 0.0);
        assert_eq!(score_email(&record, "   ", today(), &weights), 0.0);
    }
}
