// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Relevance-scored recall of past interactions for a subject.
//!
//! Recall runs a fixed pipeline over both record kinds: score every
//! candidate, keep records clearing the configured threshold (falling
//! back to the top-N scored matches so recall degrades instead of going
//! empty), sort newest first, deduplicate email threads, and render a
//! bounded prose summary for prompt inclusion. Records that do not
//! mention the subject at all (score 0 or below) never surface.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::debug;

use dossier_config::MemoryConfig;
use dossier_core::DossierError;

use crate::scoring::{normalize_thread_subject, score_email, score_meeting, RelevanceWeights};
use crate::source::InteractionSource;
use crate::types::{parse_record_date, EmailRecord, MeetingRecord, MemoryContext};

/// Excerpt cap for body and notes previews in the summary.
const EXCERPT_MAX_CHARS: usize = 150;

/// Builds a [`MemoryContext`] for a subject from a backing source.
pub struct MemoryRecall {
    source: Arc<dyn InteractionSource>,
    config: MemoryConfig,
    weights: RelevanceWeights,
}

impl MemoryRecall {
    pub fn new(source: Arc<dyn InteractionSource>, config: MemoryConfig) -> Self {
        Self {
            source,
            config,
            weights: RelevanceWeights::default(),
        }
    }

    /// Recall everything relevant to `subject`, scored as of today.
    pub async fn recall(&self, subject: &str) -> Result<MemoryContext, DossierError> {
        self.recall_at(subject, Utc::now().date_naive()).await
    }

    /// Variant with an explicit reference date for deterministic scoring.
    pub async fn recall_at(
        &self,
        subject: &str,
        today: NaiveDate,
    ) -> Result<MemoryContext, DossierError> {
        let emails = self.source.emails().await?;
        let meetings = self.source.meetings().await?;
        let (candidate_emails, candidate_meetings) = (emails.len(), meetings.len());

        let mut emails = select_scored(
            emails,
            |e| score_email(e, subject, today, &self.weights),
            self.config.min_score,
            self.config.fallback_top_n,
        );
        let mut meetings = select_scored(
            meetings,
            |m| score_meeting(m, subject, today, &self.weights),
            self.config.min_score,
            self.config.fallback_top_n,
        );

        sort_newest_first(&mut emails, |e| parse_record_date(e.best_date()));
        sort_newest_first(&mut meetings, |m| parse_record_date(m.best_date()));
        let emails = dedup_threads(emails);

        let last_contact = emails
            .iter()
            .map(|e| parse_record_date(e.best_date()))
            .chain(meetings.iter().map(|m| parse_record_date(m.best_date())))
            .flatten()
            .max();

        let summary = build_summary(&emails, &meetings, self.config.summary_records);

        debug!(
            subject,
            candidate_emails,
            candidate_meetings,
            kept_emails = emails.len(),
            kept_meetings = meetings.len(),
            "memory recall complete"
        );

        Ok(MemoryContext {
            subject: subject.to_string(),
            total_interactions: emails.len() + meetings.len(),
            emails,
            meetings,
            last_contact,
            summary,
        })
    }
}

/// Threshold selection with a top-N floor.
///
/// Records scoring 0 or below are discarded outright. Of the rest, keep
/// those at or above `min_score`; when none qualify, keep the `top_n`
/// best-scored instead.
fn select_scored<T>(
    records: Vec<T>,
    mut score_of: impl FnMut(&T) -> f64,
    min_score: f64,
    top_n: usize,
) -> Vec<T> {
    let mut scored: Vec<(T, f64)> = records
        .into_iter()
        .filter_map(|record| {
            let score = score_of(&record);
            (score > 0.0).then_some((record, score))
        })
        .collect();

    if scored.iter().any(|(_, score)| *score >= min_score) {
        scored.retain(|(_, score)| *score >= min_score);
    } else {
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(top_n);
    }

    scored.into_iter().map(|(record, _)| record).collect()
}

/// Sort newest first by parsed date; unparseable dates sort last.
fn sort_newest_first<T>(records: &mut [T], date_of: impl Fn(&T) -> Option<NaiveDate>) {
    records.sort_by(|a, b| match (date_of(a), date_of(b)) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Keep the most recent email per normalized thread subject.
///
/// Input must already be sorted newest first. Empty thread keys are kept
/// as-is rather than collapsing every subjectless email into one.
fn dedup_threads(emails: Vec<EmailRecord>) -> Vec<EmailRecord> {
    let mut seen = HashSet::new();
    emails
        .into_iter()
        .filter(|email| {
            let key = normalize_thread_subject(&email.subject);
            if key.is_empty() {
                return true;
            }
            seen.insert(key)
        })
        .collect()
}

/// Render the bounded prose summary handed to the LLM.
fn build_summary(emails: &[EmailRecord], meetings: &[MeetingRecord], per_kind: usize) -> String {
    let mut parts = Vec::new();

    if emails.is_empty() {
        parts.push("No past emails found for this subject.".to_string());
    } else {
        parts.push(format!("Found {} past email(s):", emails.len()));
        for email in emails.iter().take(per_kind) {
            parts.push(format!(
                "  - [{}] From: {} | Subject: {}\n    Preview: {}",
                display_or(email.best_date(), "unknown date"),
                display_or(&email.sender, "unknown sender"),
                display_or(&email.subject, "No subject"),
                excerpt(&email.body, EXCERPT_MAX_CHARS),
            ));
        }
    }

    if meetings.is_empty() {
        parts.push("No past meetings found for this subject.".to_string());
    } else {
        parts.push(format!("Found {} past meeting(s):", meetings.len()));
        for meeting in meetings.iter().take(per_kind) {
            parts.push(format!(
                "  - [{}] Topic: {}\n    Notes: {}",
                display_or(meeting.best_date(), "unknown date"),
                display_or(&meeting.topic, "No topic"),
                excerpt(&meeting.notes, EXCERPT_MAX_CHARS),
            ));
        }
    }

    parts.join("\n")
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Character-boundary-safe truncation for preview excerpts.
fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
