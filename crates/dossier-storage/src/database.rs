// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Query modules accept `&Database` and go through
//! [`Database::connection`]; do NOT open additional connections for writes.

use std::path::Path;

use tokio_rusqlite::Connection;
use tracing::debug;

use dossier_core::DossierError;

/// Schema applied on every open. `IF NOT EXISTS` keeps reopening idempotent.
const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS sessions (
    session_id TEXT PRIMARY KEY,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    title      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS interactions (
    session_id        TEXT NOT NULL REFERENCES sessions(session_id) ON DELETE CASCADE,
    ordinal           INTEGER NOT NULL,
    timestamp         TEXT NOT NULL,
    user_query        TEXT NOT NULL,
    route             TEXT NOT NULL,
    results           TEXT NOT NULL,
    execution_time_ms INTEGER NOT NULL,
    PRIMARY KEY (session_id, ordinal)
);

CREATE INDEX IF NOT EXISTS idx_sessions_updated_at ON sessions(updated_at);
";

/// Handle to the SQLite database behind a single writer thread.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path`, switch it to WAL
    /// mode, enable foreign keys, and apply the schema.
    pub async fn open(path: &str) -> Result<Self, DossierError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| DossierError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = Connection::open(path.to_owned())
            .await
            .map_err(|e| map_tr_err(e.into()))?;
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;\n\
                 PRAGMA synchronous = NORMAL;\n\
                 PRAGMA foreign_keys = ON;\n\
                 PRAGMA busy_timeout = 5000;",
            )?;
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path = %path, "database opened");
        Ok(Self { conn })
    }

    /// The underlying tokio-rusqlite connection handle.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), DossierError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(map_tr_err)?;
        debug!("database closed");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into the storage error variant.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> DossierError {
    DossierError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_database_file() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("create.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        assert!(db_path.exists(), "database file should be created");
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("deeper").join("data.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        assert!(db_path.exists());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_enables_wal_and_foreign_keys() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("pragma.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let (journal_mode, foreign_keys): (String, i64) = db
            .connection()
            .call(|conn| {
                let journal: String =
                    conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?;
                let fk: i64 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;
                Ok::<_, rusqlite::Error>((journal, fk))
            })
            .await
            .unwrap();
        assert_eq!(journal_mode, "wal");
        assert_eq!(foreign_keys, 1);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen.db");

        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();

        // Second open re-applies the schema without error.
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();
    }
}
