// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only session persistence trait.

use async_trait::async_trait;

use crate::error::DossierError;
use crate::types::{NewInteraction, Session, SessionSummary};

/// Repository for append-only session logs.
///
/// Interactions are never edited or removed, only appended. Safe under a
/// single writer per session; concurrent writers to the same session must
/// be serialized by the caller.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates a new session and returns its id.
    async fn create_session(&self, title: &str) -> Result<String, DossierError>;

    /// Appends one interaction and returns its 1-based ordinal within the
    /// session.
    async fn append(
        &self,
        session_id: &str,
        interaction: NewInteraction,
    ) -> Result<i64, DossierError>;

    /// Loads a session with all its interactions in append order.
    async fn get_session(&self, session_id: &str) -> Result<Option<Session>, DossierError>;

    /// Lists sessions newest-activity-first, bounded to `limit` rows.
    async fn list_sessions(&self, limit: usize) -> Result<Vec<SessionSummary>, DossierError>;
}
