// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock web-search provider for deterministic testing.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use dossier_core::{DossierError, SearchProvider, SourceRecord};

/// A mock search provider that returns pre-scripted result sets.
///
/// Result sets are popped from a FIFO queue; each entry is either a source
/// list or an error message. When the queue is empty, an empty result set
/// is returned (a valid "nothing found"). Every query is recorded along
/// with its `max_results` bound.
pub struct MockSearch {
    results: Mutex<VecDeque<Result<Vec<SourceRecord>, String>>>,
    queries: Mutex<Vec<(String, usize)>>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Add a successful result set to the end of the queue.
    pub fn queue_sources(&self, sources: Vec<SourceRecord>) {
        self.results
            .lock()
            .expect("mock result queue poisoned")
            .push_back(Ok(sources));
    }

    /// Add a provider error to the end of the queue.
    pub fn queue_error(&self, message: impl Into<String>) {
        self.results
            .lock()
            .expect("mock result queue poisoned")
            .push_back(Err(message.into()));
    }

    /// All queries received so far, with their result bounds, in call order.
    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries
            .lock()
            .expect("mock query log poisoned")
            .clone()
    }
}

impl Default for MockSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SourceRecord>, DossierError> {
        self.queries
            .lock()
            .expect("mock query log poisoned")
            .push((query.to_string(), max_results));

        let next = self
            .results
            .lock()
            .expect("mock result queue poisoned")
            .pop_front();

        match next {
            Some(Ok(sources)) => Ok(sources),
            Some(Err(message)) => Err(DossierError::search(message)),
            None => Ok(Vec::new()),
        }
    }
}

/// Build `count` distinct sample sources with 1-based ranks, for tests that
/// only care about source counts and ordering.
pub fn sample_sources(count: usize) -> Vec<SourceRecord> {
    (1..=count)
        .map(|i| SourceRecord {
            title: format!("Result {i}"),
            url: format!("https://example.com/{i}"),
            snippet: format!("Snippet for result {i}"),
            relevance_rank: i as u32,
        })
        .collect()
}
