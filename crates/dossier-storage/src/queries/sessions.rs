// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session and interaction queries over the append-only session log.

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde_json::Value;

use dossier_core::types::{Interaction, NewInteraction, Session, SessionSummary};
use dossier_core::DossierError;

use crate::database::Database;

/// Store-generated titles are `"Session {id-prefix}"`. The first append
/// replaces a title still carrying this prefix with the query text.
pub const DEFAULT_TITLE_PREFIX: &str = "Session ";

/// Insert a new session row.
pub async fn create_session(
    db: &Database,
    session_id: &str,
    title: &str,
    now: &str,
) -> Result<(), DossierError> {
    let session_id = session_id.to_string();
    let title = title.to_string();
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions (session_id, created_at, updated_at, title)
                 VALUES (?1, ?2, ?3, ?4)",
                params![session_id, now, now, title],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Append one interaction to a session, returning its 1-based ordinal.
///
/// Returns `None` when the session does not exist. On the first append the
/// session is auto-titled from the query (first 80 chars) if the title still
/// carries [`DEFAULT_TITLE_PREFIX`]; every append bumps `updated_at`.
pub async fn append_interaction(
    db: &Database,
    session_id: &str,
    interaction: &NewInteraction,
    now: &str,
) -> Result<Option<i64>, DossierError> {
    let session_id = session_id.to_string();
    let now = now.to_string();
    let user_query = interaction.user_query.clone();
    let route = serialize_json(&interaction.route)?;
    let results = serialize_json(&interaction.results)?;
    let execution_time_ms = interaction.execution_time_ms;

    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let title_row = tx.query_row(
                "SELECT title FROM sessions WHERE session_id = ?1",
                params![session_id],
                |row| row.get::<_, String>(0),
            );
            let title = match title_row {
                Ok(title) => title,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e.into()),
            };

            let ordinal: i64 = tx.query_row(
                "SELECT COALESCE(MAX(ordinal), 0) + 1 FROM interactions WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )?;

            tx.execute(
                "INSERT INTO interactions
                 (session_id, ordinal, timestamp, user_query, route, results, execution_time_ms)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    session_id,
                    ordinal,
                    now,
                    user_query,
                    route,
                    results,
                    execution_time_ms
                ],
            )?;

            if ordinal == 1 && title.starts_with(DEFAULT_TITLE_PREFIX) {
                let auto_title: String = user_query.chars().take(80).collect();
                tx.execute(
                    "UPDATE sessions SET title = ?1, updated_at = ?2 WHERE session_id = ?3",
                    params![auto_title, now, session_id],
                )?;
            } else {
                tx.execute(
                    "UPDATE sessions SET updated_at = ?1 WHERE session_id = ?2",
                    params![now, session_id],
                )?;
            }

            tx.commit()?;
            Ok(Some(ordinal))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Load a session header plus all its interactions in append order.
pub async fn get_session(
    db: &Database,
    session_id: &str,
) -> Result<Option<Session>, DossierError> {
    let session_id = session_id.to_string();
    db.connection()
        .call(move |conn| {
            let header = conn.query_row(
                "SELECT session_id, created_at, updated_at, title
                 FROM sessions WHERE session_id = ?1",
                params![session_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        parse_timestamp(1, row.get(1)?)?,
                        parse_timestamp(2, row.get(2)?)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            );
            let (session_id, created_at, updated_at, title) = match header {
                Ok(header) => header,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(e.into()),
            };

            let mut stmt = conn.prepare(
                "SELECT ordinal, timestamp, user_query, route, results, execution_time_ms
                 FROM interactions WHERE session_id = ?1 ORDER BY ordinal ASC",
            )?;
            let rows = stmt.query_map(params![session_id], |row| {
                Ok(Interaction {
                    id: row.get(0)?,
                    timestamp: parse_timestamp(1, row.get(1)?)?,
                    user_query: row.get(2)?,
                    route: parse_json(3, row.get(3)?)?,
                    results: parse_json(4, row.get(4)?)?,
                    execution_time_ms: row.get(5)?,
                })
            })?;
            let mut interactions = Vec::new();
            for row in rows {
                interactions.push(row?);
            }

            Ok(Some(Session {
                session_id,
                created_at,
                updated_at,
                title,
                interactions,
            }))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List sessions newest-activity-first with their interaction counts.
pub async fn list_sessions(
    db: &Database,
    limit: usize,
) -> Result<Vec<SessionSummary>, DossierError> {
    let limit = limit as i64;
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT s.session_id, s.created_at, s.updated_at, s.title,
                        COUNT(i.ordinal)
                 FROM sessions s
                 LEFT JOIN interactions i ON i.session_id = s.session_id
                 GROUP BY s.session_id
                 ORDER BY s.updated_at DESC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                Ok(SessionSummary {
                    session_id: row.get(0)?,
                    created_at: parse_timestamp(1, row.get(1)?)?,
                    updated_at: parse_timestamp(2, row.get(2)?)?,
                    title: row.get(3)?,
                    interaction_count: row.get::<_, i64>(4)? as usize,
                })
            })?;
            let mut summaries = Vec::new();
            for row in rows {
                summaries.push(row?);
            }
            Ok(summaries)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

fn serialize_json(value: &Value) -> Result<String, DossierError> {
    serde_json::to_string(value).map_err(|e| DossierError::Storage {
        source: Box::new(e),
    })
}

fn parse_timestamp(idx: usize, raw: String) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_json(idx: usize, raw: String) -> Result<Value, rusqlite::Error> {
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::SecondsFormat;
    use serde_json::json;
    use tempfile::tempdir;

    const T1: &str = "2026-01-01T00:00:00.000Z";
    const T2: &str = "2026-01-01T00:00:01.000Z";
    const T3: &str = "2026-01-01T00:00:02.000Z";

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn sample_interaction(query: &str) -> NewInteraction {
        NewInteraction {
            user_query: query.to_string(),
            route: json!({"primary": "meeting"}),
            results: json!({"meeting": {"result": "briefing text"}}),
            execution_time_ms: 1200,
        }
    }

    #[tokio::test]
    async fn create_and_get_session_round_trip() {
        let (db, _dir) = setup_db().await;
        create_session(&db, "abc123def456", "Session abc123", T1)
            .await
            .unwrap();

        let session = get_session(&db, "abc123def456").await.unwrap().unwrap();
        assert_eq!(session.session_id, "abc123def456");
        assert_eq!(session.title, "Session abc123");
        assert!(session.interactions.is_empty());
        assert_eq!(
            session.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            T1
        );

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_session_missing_returns_none() {
        let (db, _dir) = setup_db().await;
        let session = get_session(&db, "nope00000000").await.unwrap();
        assert!(session.is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn append_assigns_sequential_ordinals() {
        let (db, _dir) = setup_db().await;
        create_session(&db, "aaaa00000000", "Session aaaa00", T1)
            .await
            .unwrap();

        for expected in 1..=3i64 {
            let ordinal =
                append_interaction(&db, "aaaa00000000", &sample_interaction("query"), T2)
                    .await
                    .unwrap();
            assert_eq!(ordinal, Some(expected));
        }

        let session = get_session(&db, "aaaa00000000").await.unwrap().unwrap();
        let ids: Vec<i64> = session.interactions.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn append_to_missing_session_returns_none() {
        let (db, _dir) = setup_db().await;
        let ordinal = append_interaction(&db, "nope00000000", &sample_interaction("query"), T1)
            .await
            .unwrap();
        assert!(ordinal.is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn first_append_retitles_default_titled_session() {
        let (db, _dir) = setup_db().await;
        create_session(&db, "bbbb00000000", "Session bbbb00", T1)
            .await
            .unwrap();

        let query = "Prepare me for the TechCorp meeting";
        append_interaction(&db, "bbbb00000000", &sample_interaction(query), T2)
            .await
            .unwrap();

        let session = get_session(&db, "bbbb00000000").await.unwrap().unwrap();
        assert_eq!(session.title, query);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn first_append_keeps_explicit_title() {
        let (db, _dir) = setup_db().await;
        create_session(&db, "cccc00000000", "Quarterly prep", T1)
            .await
            .unwrap();

        append_interaction(&db, "cccc00000000", &sample_interaction("anything"), T2)
            .await
            .unwrap();

        let session = get_session(&db, "cccc00000000").await.unwrap().unwrap();
        assert_eq!(session.title, "Quarterly prep");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn auto_title_truncates_to_eighty_chars() {
        let (db, _dir) = setup_db().await;
        create_session(&db, "dddd00000000", "Session dddd00", T1)
            .await
            .unwrap();

        let query = "a".repeat(120);
        append_interaction(&db, "dddd00000000", &sample_interaction(&query), T2)
            .await
            .unwrap();

        let session = get_session(&db, "dddd00000000").await.unwrap().unwrap();
        assert_eq!(session.title.chars().count(), 80);
        assert_eq!(session.title, "a".repeat(80));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn second_append_does_not_retitle() {
        let (db, _dir) = setup_db().await;
        create_session(&db, "eeee00000000", "Session eeee00", T1)
            .await
            .unwrap();

        append_interaction(&db, "eeee00000000", &sample_interaction("first query"), T2)
            .await
            .unwrap();
        append_interaction(&db, "eeee00000000", &sample_interaction("second query"), T3)
            .await
            .unwrap();

        let session = get_session(&db, "eeee00000000").await.unwrap().unwrap();
        assert_eq!(session.title, "first query");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn append_bumps_updated_at_and_keeps_created_at() {
        let (db, _dir) = setup_db().await;
        create_session(&db, "ffff00000000", "Session ffff00", T1)
            .await
            .unwrap();

        append_interaction(&db, "ffff00000000", &sample_interaction("query"), T2)
            .await
            .unwrap();

        let session = get_session(&db, "ffff00000000").await.unwrap().unwrap();
        assert_eq!(
            session.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            T1
        );
        assert_eq!(
            session.updated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            T2
        );

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn round_trips_route_and_results_json() {
        let (db, _dir) = setup_db().await;
        create_session(&db, "1111aaaa0000", "Session 1111aa", T1)
            .await
            .unwrap();

        let interaction = NewInteraction {
            user_query: "draft a reply".to_string(),
            route: json!({"scenarios": ["email"], "primary": "email"}),
            results: json!({"email": {"result": "Dear Sarah,", "confidence": 0.75}}),
            execution_time_ms: 3400,
        };
        append_interaction(&db, "1111aaaa0000", &interaction, T2)
            .await
            .unwrap();

        let session = get_session(&db, "1111aaaa0000").await.unwrap().unwrap();
        let stored = &session.interactions[0];
        assert_eq!(stored.user_query, "draft a reply");
        assert_eq!(stored.route, interaction.route);
        assert_eq!(stored.results, interaction.results);
        assert_eq!(stored.execution_time_ms, 3400);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_sessions_newest_activity_first() {
        let (db, _dir) = setup_db().await;
        create_session(&db, "2222aaaa0000", "older", T1).await.unwrap();
        create_session(&db, "3333aaaa0000", "newer", T2).await.unwrap();

        // Appending to the older session makes it the most recent activity.
        append_interaction(&db, "2222aaaa0000", &sample_interaction("query"), T3)
            .await
            .unwrap();

        let summaries = list_sessions(&db, 10).await.unwrap();
        let ids: Vec<&str> = summaries.iter().map(|s| s.session_id.as_str()).collect();
        assert_eq!(ids, vec!["2222aaaa0000", "3333aaaa0000"]);
        assert_eq!(summaries[0].interaction_count, 1);
        assert_eq!(summaries[1].interaction_count, 0);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_sessions_respects_limit() {
        let (db, _dir) = setup_db().await;
        create_session(&db, "4444aaaa0000", "first", T1).await.unwrap();
        create_session(&db, "5555aaaa0000", "second", T2).await.unwrap();
        create_session(&db, "6666aaaa0000", "third", T3).await.unwrap();

        let summaries = list_sessions(&db, 2).await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].session_id, "6666aaaa0000");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopen_preserves_sessions() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen.db");
        let path = db_path.to_str().unwrap();

        let db = Database::open(path).await.unwrap();
        create_session(&db, "7777aaaa0000", "Session 7777aa", T1)
            .await
            .unwrap();
        db.close().await.unwrap();

        let db = Database::open(path).await.unwrap();
        let session = get_session(&db, "7777aaaa0000").await.unwrap();
        assert!(session.is_some());
        db.close().await.unwrap();
    }
}
