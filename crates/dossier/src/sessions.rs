// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dossier sessions` command implementation.
//!
//! Read-only views over the session store: a compact listing for
//! `sessions list` and the full interaction log as pretty JSON for
//! `sessions show`.

use dossier_config::model::DossierConfig;
use dossier_core::{DossierError, SessionStore, SessionSummary};
use dossier_storage::SqliteSessionStore;

/// Run the `dossier sessions list` command.
pub async fn run_list(config: &DossierConfig, limit: usize) -> Result<(), DossierError> {
    let store = SqliteSessionStore::open(&config.storage).await?;
    let sessions = store.list_sessions(limit).await?;
    store.close().await?;

    if sessions.is_empty() {
        println!("No sessions recorded yet.");
        return Ok(());
    }

    println!();
    println!("  {} session(s)", sessions.len());
    println!("  {}", "-".repeat(72));
    for summary in &sessions {
        println!("  {}", summary_line(summary));
    }
    println!();

    Ok(())
}

/// Run the `dossier sessions show` command.
pub async fn run_show(config: &DossierConfig, id: &str) -> Result<(), DossierError> {
    let store = SqliteSessionStore::open(&config.storage).await?;
    let session = store.get_session(id).await?;
    store.close().await?;

    match session {
        Some(session) => {
            let rendered = serde_json::to_string_pretty(&session)
                .map_err(|e| DossierError::Internal(format!("failed to render session: {e}")))?;
            println!("{rendered}");
            Ok(())
        }
        None => Err(DossierError::Internal(format!("session not found: {id}"))),
    }
}

/// One listing row: id, activity count, last activity, title.
fn summary_line(summary: &SessionSummary) -> String {
    format!(
        "{}  {:>3} interaction(s)  {}  {}",
        summary.session_id,
        summary.interaction_count,
        summary.updated_at.format("%Y-%m-%d %H:%M"),
        summary.title
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_from_json(value: serde_json::Value) -> SessionSummary {
        serde_json::from_value(value).expect("valid session summary")
    }

    #[test]
    fn summary_line_formats_the_listing_row() {
        let summary = summary_from_json(serde_json::json!({
            "session_id": "abc123def456",
            "created_at": "2026-08-01T10:00:00Z",
            "updated_at": "2026-08-02T12:30:00Z",
            "title": "Acme prep",
            "interaction_count": 3
        }));

        assert_eq!(
            summary_line(&summary),
            "abc123def456    3 interaction(s)  2026-08-02 12:30  Acme prep"
        );
    }

    #[test]
    fn summary_line_keeps_wide_counts_aligned() {
        let summary = summary_from_json(serde_json::json!({
            "session_id": "abc123def456",
            "created_at": "2026-08-01T10:00:00Z",
            "updated_at": "2026-08-02T12:30:00Z",
            "title": "Busy session",
            "interaction_count": 120
        }));

        assert!(summary_line(&summary).contains("120 interaction(s)"));
    }
}
