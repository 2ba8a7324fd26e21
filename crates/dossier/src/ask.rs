// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dossier ask` command implementation.
//!
//! Wires the configured providers into the orchestrator, routes the
//! prompt (persisting the interaction), and prints the envelope as
//! pretty JSON on stdout. Progress and the session id go to tracing so
//! stdout stays scriptable.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use dossier_agent::Orchestrator;
use dossier_config::model::DossierConfig;
use dossier_core::DossierError;
use dossier_groq::GroqProvider;
use dossier_linkup::LinkupProvider;
use dossier_memory::JsonFileSource;
use dossier_storage::SqliteSessionStore;

/// Run the `dossier ask` command.
pub async fn run_ask(
    config: &DossierConfig,
    prompt: &str,
    session: Option<&str>,
    document: Option<&Path>,
) -> Result<(), DossierError> {
    let document_text = match document {
        Some(path) => Some(load_document(path)?),
        None => None,
    };

    let chat = Arc::new(GroqProvider::new(&config.groq)?);
    let search = Arc::new(LinkupProvider::new(&config.linkup)?);
    let memory = Arc::new(JsonFileSource::new(&config.memory.data_dir));
    let store = Arc::new(SqliteSessionStore::open(&config.storage).await?);

    let orchestrator = Orchestrator::new(chat, search, memory, store, config);
    let (envelope, session_id) = orchestrator
        .route_and_save(prompt, document_text.as_deref(), session)
        .await?;

    info!(
        session_id = session_id.as_str(),
        primary = %envelope.primary,
        execution_time_ms = envelope.execution_time_ms,
        "request complete"
    );
    let rendered = serde_json::to_string_pretty(&envelope)
        .map_err(|e| DossierError::Internal(format!("failed to render envelope: {e}")))?;
    println!("{rendered}");

    Ok(())
}

/// Read the document file for the document scenario.
fn load_document(path: &Path) -> Result<String, DossierError> {
    std::fs::read_to_string(path).map_err(|e| {
        DossierError::Internal(format!("failed to read document {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_document_reads_the_file() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let path = dir.path().join("contract.txt");
        std::fs::write(&path, "30 days notice").expect("write document");

        assert_eq!(load_document(&path).unwrap(), "30 days notice");
    }

    #[test]
    fn load_document_reports_the_missing_path() {
        let err = load_document(Path::new("/nonexistent/contract.txt")).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("failed to read document"));
        assert!(message.contains("/nonexistent/contract.txt"));
    }
}
