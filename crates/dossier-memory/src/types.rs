// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interaction record types for the memory system.
//!
//! Records come from JSON caches written by different producers with
//! slightly different schemas. Every field defaults and common alternate
//! names are accepted via aliases, so a record never fails to load just
//! because one producer spelled a field differently.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A cached email interaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailRecord {
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Sender address or display name.
    #[serde(default, alias = "from")]
    pub sender: String,
    /// Recipient address.
    #[serde(default, alias = "recipient")]
    pub to: String,
    /// Message body.
    #[serde(default, alias = "content")]
    pub body: String,
    /// Date string, producer-formatted.
    #[serde(default)]
    pub date: String,
    /// Full timestamp, producer-formatted. Some producers write both.
    #[serde(default)]
    pub timestamp: String,
}

/// A cached meeting or conversation note.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeetingRecord {
    /// Meeting topic.
    #[serde(default, alias = "subject")]
    pub topic: String,
    /// Counterpart company or organization.
    #[serde(default)]
    pub company: String,
    /// Free-text notes.
    #[serde(default, alias = "summary")]
    pub notes: String,
    /// Date string, producer-formatted.
    #[serde(default)]
    pub date: String,
    /// Full timestamp, producer-formatted.
    #[serde(default)]
    pub timestamp: String,
}

impl EmailRecord {
    /// The record's best date field: `date` when present, else `timestamp`.
    pub fn best_date(&self) -> &str {
        if self.date.trim().is_empty() {
            &self.timestamp
        } else {
            &self.date
        }
    }
}

impl MeetingRecord {
    /// The record's best date field: `date` when present, else `timestamp`.
    pub fn best_date(&self) -> &str {
        if self.date.trim().is_empty() {
            &self.timestamp
        } else {
            &self.date
        }
    }
}

/// Everything memory knows about a subject, built fresh per request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryContext {
    /// The subject that was recalled.
    pub subject: String,
    /// Relevant emails, newest first.
    pub emails: Vec<EmailRecord>,
    /// Relevant meetings, newest first.
    pub meetings: Vec<MeetingRecord>,
    /// Count of records in `emails` plus `meetings`.
    pub total_interactions: usize,
    /// Most recent parsed contact date across both kinds.
    pub last_contact: Option<NaiveDate>,
    /// Bounded prose summary for direct inclusion in an LLM prompt.
    pub summary: String,
}

impl MemoryContext {
    /// A context holding nothing, for subjects with no history.
    pub fn empty(subject: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            summary: summary.into(),
            ..Self::default()
        }
    }
}

/// Best-effort parse of a producer-formatted date string.
///
/// Accepts RFC 3339, bare ISO datetimes (with or without fractional
/// seconds), and plain `YYYY-MM-DD` dates. Anything else is `None`;
/// callers sort unparseable dates last rather than failing.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(d);
    }
    None
}
