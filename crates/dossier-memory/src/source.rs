// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backing stores interaction records are retrieved from.
//!
//! The cache files are shared with other producers, so loading is
//! deliberately forgiving: a missing file, a non-list payload, or a
//! malformed individual record degrades to fewer records, never an error.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::warn;

use dossier_core::DossierError;

use crate::types::{EmailRecord, MeetingRecord};

/// Where candidate interaction records come from.
///
/// The local JSON cache is the shipping implementation; the trait exists
/// so a remote-API-backed source can slot in without touching recall.
#[async_trait]
pub trait InteractionSource: Send + Sync {
    async fn emails(&self) -> Result<Vec<EmailRecord>, DossierError>;
    async fn meetings(&self) -> Result<Vec<MeetingRecord>, DossierError>;
}

/// Local JSON cache under a data directory:
/// `<data_dir>/emails/cache.json` and `<data_dir>/meetings/history.json`.
pub struct JsonFileSource {
    emails_path: PathBuf,
    meetings_path: PathBuf,
}

impl JsonFileSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let dir = data_dir.into();
        Self {
            emails_path: dir.join("emails").join("cache.json"),
            meetings_path: dir.join("meetings").join("history.json"),
        }
    }
}

#[async_trait]
impl InteractionSource for JsonFileSource {
    async fn emails(&self) -> Result<Vec<EmailRecord>, DossierError> {
        Ok(load_records(&self.emails_path).await)
    }

    async fn meetings(&self) -> Result<Vec<MeetingRecord>, DossierError> {
        Ok(load_records(&self.meetings_path).await)
    }
}

/// Load a JSON list of records, tolerating malformed elements.
///
/// Element-level failures are dropped with a warning instead of discarding
/// the whole file, since one producer's odd record should not hide
/// everyone else's history.
async fn load_records<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read interaction cache");
            return Vec::new();
        }
    };

    let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(values) => values,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "interaction cache is not a JSON list");
            return Vec::new();
        }
    };

    let total = values.len();
    let records: Vec<T> = values
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();
    if records.len() < total {
        warn!(
            path = %path.display(),
            dropped = total - records.len(),
            "dropped malformed interaction records"
        );
    }
    records
}
