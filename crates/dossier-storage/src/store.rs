// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed implementation of the session store trait.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use dossier_config::StorageConfig;
use dossier_core::types::{NewInteraction, Session, SessionSummary};
use dossier_core::{DossierError, SessionStore};

use crate::database::Database;
use crate::queries::sessions::{self, DEFAULT_TITLE_PREFIX};

/// SQLite-backed session store.
///
/// Wraps a [`Database`] handle and delegates query work to the typed query
/// module. Session ids are 12-hex-char uuid-v4 prefixes; timestamps are UTC
/// RFC 3339 strings with millisecond precision.
pub struct SqliteSessionStore {
    db: Database,
}

impl SqliteSessionStore {
    /// Open the store at the configured database path, creating the file and
    /// schema on first use.
    pub async fn open(config: &StorageConfig) -> Result<Self, DossierError> {
        let db = Database::open(&config.database_path).await?;
        Ok(Self { db })
    }

    /// Checkpoint and close the underlying database.
    pub async fn close(self) -> Result<(), DossierError> {
        self.db.close().await
    }

    fn new_session_id() -> String {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(12);
        id
    }

    fn now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn create_session(&self, title: &str) -> Result<String, DossierError> {
        let session_id = Self::new_session_id();
        let title = if title.is_empty() {
            format!("{DEFAULT_TITLE_PREFIX}{}", &session_id[..6])
        } else {
            title.to_string()
        };
        sessions::create_session(&self.db, &session_id, &title, &Self::now()).await?;
        Ok(session_id)
    }

    async fn append(
        &self,
        session_id: &str,
        interaction: NewInteraction,
    ) -> Result<i64, DossierError> {
        let ordinal =
            sessions::append_interaction(&self.db, session_id, &interaction, &Self::now()).await?;
        ordinal.ok_or_else(|| DossierError::Storage {
            source: format!("session not found: {session_id}").into(),
        })
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<Session>, DossierError> {
        sessions::get_session(&self.db, session_id).await
    }

    async fn list_sessions(&self, limit: usize) -> Result<Vec<SessionSummary>, DossierError> {
        sessions::list_sessions(&self.db, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    async fn setup_store() -> (SqliteSessionStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("sessions.db").display().to_string(),
        };
        let store = SqliteSessionStore::open(&config).await.unwrap();
        (store, dir)
    }

    fn sample_interaction(query: &str) -> NewInteraction {
        NewInteraction {
            user_query: query.to_string(),
            route: json!({"primary": "meeting"}),
            results: json!({"meeting": {"result": "ok"}}),
            execution_time_ms: 900,
        }
    }

    #[tokio::test]
    async fn create_session_generates_twelve_hex_char_ids() {
        let (store, _dir) = setup_store().await;
        let id = store.create_session("").await.unwrap();
        assert_eq!(id.len(), 12);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn empty_title_defaults_to_session_prefix() {
        let (store, _dir) = setup_store().await;
        let id = store.create_session("").await.unwrap();
        let session = store.get_session(&id).await.unwrap().unwrap();
        assert_eq!(session.title, format!("Session {}", &id[..6]));
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn append_returns_one_based_ordinals_and_auto_titles() {
        let (store, _dir) = setup_store().await;
        let id = store.create_session("").await.unwrap();

        let first = store
            .append(&id, sample_interaction("Prep me for the Acme meeting"))
            .await
            .unwrap();
        assert_eq!(first, 1);

        let second = store
            .append(&id, sample_interaction("Now draft a follow-up email"))
            .await
            .unwrap();
        assert_eq!(second, 2);

        let session = store.get_session(&id).await.unwrap().unwrap();
        assert_eq!(session.title, "Prep me for the Acme meeting");
        assert_eq!(session.interactions.len(), 2);
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn explicit_title_survives_first_append() {
        let (store, _dir) = setup_store().await;
        let id = store.create_session("Board meeting prep").await.unwrap();
        store
            .append(&id, sample_interaction("anything at all"))
            .await
            .unwrap();

        let session = store.get_session(&id).await.unwrap().unwrap();
        assert_eq!(session.title, "Board meeting prep");
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn append_to_unknown_session_is_storage_error() {
        let (store, _dir) = setup_store().await;
        let err = store
            .append("nope00000000", sample_interaction("hello"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("session not found"));
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_sessions_reports_interaction_counts() {
        let (store, _dir) = setup_store().await;
        let busy = store.create_session("busy").await.unwrap();
        let idle = store.create_session("idle").await.unwrap();

        store.append(&busy, sample_interaction("one")).await.unwrap();
        store.append(&busy, sample_interaction("two")).await.unwrap();

        let summaries = store.list_sessions(10).await.unwrap();
        assert_eq!(summaries.len(), 2);
        let busy_row = summaries.iter().find(|s| s.session_id == busy).unwrap();
        let idle_row = summaries.iter().find(|s| s.session_id == idle).unwrap();
        assert_eq!(busy_row.interaction_count, 2);
        assert_eq!(idle_row.interaction_count, 0);
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn data_survives_close_and_reopen() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("sessions.db").display().to_string(),
        };

        let store = SqliteSessionStore::open(&config).await.unwrap();
        let id = store.create_session("persistent").await.unwrap();
        store
            .append(&id, sample_interaction("remember this"))
            .await
            .unwrap();
        store.close().await.unwrap();

        let store = SqliteSessionStore::open(&config).await.unwrap();
        let session = store.get_session(&id).await.unwrap().unwrap();
        assert_eq!(session.title, "persistent");
        assert_eq!(session.interactions.len(), 1);
        assert_eq!(session.interactions[0].user_query, "remember this");
        store.close().await.unwrap();
    }
}
