// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded search execution with provider failure as a value.
//!
//! The research loop and the scenario pipelines never see a search `Err`:
//! the executor converts one into an empty source list plus a reportable
//! `error` string. Empty-with-error is distinct from empty-with-no-results
//! (the latter is a valid "nothing found").

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use dossier_core::{SearchProvider, SourceRecord};

/// Result of one bounded search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub query: String,
    pub sources: Vec<SourceRecord>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SearchOutcome {
    /// True when the provider failed, as opposed to finding nothing.
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Issues bounded queries against the configured search provider.
pub struct SearchExecutor {
    search: Arc<dyn SearchProvider>,
}

impl SearchExecutor {
    pub fn new(search: Arc<dyn SearchProvider>) -> Self {
        Self { search }
    }

    /// Run one query, capped at `max_results` sources.
    pub async fn run(&self, query: &str, max_results: usize) -> SearchOutcome {
        match self.search.search(query, max_results).await {
            Ok(sources) => {
                debug!(query, count = sources.len(), "search complete");
                SearchOutcome {
                    query: query.to_string(),
                    sources,
                    error: None,
                }
            }
            Err(err) => {
                warn!(query, error = %err, "search failed");
                SearchOutcome {
                    query: query.to_string(),
                    sources: Vec::new(),
                    error: Some(err.to_string()),
                }
            }
        }
    }
}
