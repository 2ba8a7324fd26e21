// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Linkup web-search provider for the Dossier pipeline.
//!
//! Implements [`SearchProvider`] and normalizes the provider's
//! heterogeneous result shapes into [`SourceRecord`] at this boundary, so
//! nothing downstream ever branches on provider-specific field names.

pub mod client;
pub mod types;

use async_trait::async_trait;
use tracing::{debug, info};

use dossier_config::LinkupConfig;
use dossier_core::{DossierError, SearchProvider, SourceRecord};

use crate::client::LinkupClient;
use crate::types::{RawResult, SearchRequest};

/// Fallback title for results that carry neither `name` nor `title`.
const UNTITLED: &str = "Untitled";

/// Linkup provider implementing [`SearchProvider`].
///
/// API key resolution order: config -> `LINKUP_API_KEY` env var -> error.
pub struct LinkupProvider {
    client: LinkupClient,
    depth: String,
    max_results: usize,
    snippet_max_chars: usize,
}

impl LinkupProvider {
    /// Creates a new Linkup provider from the `[linkup]` configuration section.
    pub fn new(config: &LinkupConfig) -> Result<Self, DossierError> {
        let api_key = resolve_api_key(config.api_key.as_deref())?;
        let client = LinkupClient::new(api_key)?;

        info!(depth = config.depth, "Linkup provider initialized");

        Ok(Self {
            client,
            depth: config.depth.clone(),
            max_results: config.max_results,
            snippet_max_chars: config.snippet_max_chars,
        })
    }

    /// Creates a provider with an existing client (for testing).
    #[cfg(test)]
    fn with_client(client: LinkupClient, depth: String, snippet_max_chars: usize) -> Self {
        Self {
            client,
            depth,
            max_results: 10,
            snippet_max_chars,
        }
    }
}

/// Resolve the API key from config, falling back to the environment.
fn resolve_api_key(configured: Option<&str>) -> Result<String, DossierError> {
    if let Some(key) = configured
        && !key.trim().is_empty()
    {
        return Ok(key.to_string());
    }
    std::env::var("LINKUP_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            DossierError::Config(
                "no Linkup API key configured: set [linkup] api_key or LINKUP_API_KEY".into(),
            )
        })
}

/// Map raw provider results onto [`SourceRecord`]s.
///
/// Field fallback order is fixed: `name` before `title`, `content` before
/// `snippet`. Ranks are 1-based arrival order after the `max_results` cut;
/// the provider's own ordering is trusted, never re-sorted.
fn normalize_results(
    results: Vec<RawResult>,
    max_results: usize,
    snippet_max_chars: usize,
) -> Vec<SourceRecord> {
    results
        .into_iter()
        .take(max_results)
        .enumerate()
        .map(|(i, raw)| {
            let title = raw
                .name
                .or(raw.title)
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| UNTITLED.to_string());
            let snippet = raw.content.or(raw.snippet).unwrap_or_default();

            SourceRecord {
                title,
                url: raw.url,
                snippet: truncate_chars(&snippet, snippet_max_chars),
                relevance_rank: (i + 1) as u32,
            }
        })
        .collect()
}

/// Truncate on a character boundary; provider content is arbitrary UTF-8.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

#[async_trait]
impl SearchProvider for LinkupProvider {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SourceRecord>, DossierError> {
        let request = SearchRequest {
            q: query.to_string(),
            depth: self.depth.clone(),
            output_type: "searchResults".to_string(),
        };

        let response = self.client.search(&request).await?;
        // Per-call counts are clamped to the configured ceiling.
        let cap = max_results.min(self.max_results);
        let sources = normalize_results(response.results, cap, self.snippet_max_chars);

        debug!(query, count = sources.len(), "search results normalized");
        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn raw(name: Option<&str>, title: Option<&str>, content: Option<&str>) -> RawResult {
        RawResult {
            name: name.map(String::from),
            title: title.map(String::from),
            url: "https://example.com".into(),
            content: content.map(String::from),
            snippet: None,
        }
    }

    #[test]
    fn name_takes_priority_over_title() {
        let sources = normalize_results(
            vec![raw(Some("From name"), Some("From title"), Some("text"))],
            5,
            200,
        );
        assert_eq!(sources[0].title, "From name");
    }

    #[test]
    fn title_used_when_name_absent_and_untitled_when_both_absent() {
        let sources = normalize_results(
            vec![
                raw(None, Some("From title"), None),
                raw(None, None, None),
            ],
            5,
            200,
        );
        assert_eq!(sources[0].title, "From title");
        assert_eq!(sources[1].title, "Untitled");
    }

    #[test]
    fn snippet_prefers_content_and_truncates() {
        let long = "x".repeat(300);
        let sources = normalize_results(vec![raw(Some("t"), None, Some(&long))], 5, 200);
        assert_eq!(sources[0].snippet.chars().count(), 200);
    }

    #[test]
    fn snippet_truncation_respects_multibyte_chars() {
        let text = "é".repeat(250);
        let sources = normalize_results(vec![raw(Some("t"), None, Some(&text))], 5, 200);
        assert_eq!(sources[0].snippet.chars().count(), 200);
    }

    #[test]
    fn ranks_are_arrival_order_after_cap() {
        let results = (0..5)
            .map(|i| raw(Some(&format!("r{i}")), None, None))
            .collect();
        let sources = normalize_results(results, 3, 200);
        assert_eq!(sources.len(), 3);
        assert_eq!(
            sources.iter().map(|s| s.relevance_rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[tokio::test]
    async fn provider_normalizes_end_to_end() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {"name": "Acme raises $20M", "url": "https://example.com/a", "content": "Acme Robotics announced a Series A..."},
                    {"title": "Acme homepage", "url": "https://acme.example", "snippet": "Industrial automation"}
                ]
            })))
            .mount(&server)
            .await;

        let client = LinkupClient::new("k".into())
            .unwrap()
            .with_base_url(server.uri());
        let provider = LinkupProvider::with_client(client, "standard".into(), 200);

        let sources = provider.search("acme robotics", 5).await.unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].title, "Acme raises $20M");
        assert_eq!(sources[1].title, "Acme homepage");
        assert_eq!(sources[1].snippet, "Industrial automation");
        assert_eq!(sources[1].relevance_rank, 2);
    }

    #[tokio::test]
    async fn configured_ceiling_clamps_requested_count() {
        let server = MockServer::start().await;

        let results: Vec<serde_json::Value> = (0..20)
            .map(|i| {
                serde_json::json!({
                    "name": format!("r{i}"),
                    "url": format!("https://example.com/{i}"),
                    "content": "text"
                })
            })
            .collect();

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "results": results })),
            )
            .mount(&server)
            .await;

        let client = LinkupClient::new("k".into())
            .unwrap()
            .with_base_url(server.uri());
        let provider = LinkupProvider::with_client(client, "standard".into(), 200);

        // with_client fixes the ceiling at 10; asking for 15 yields 10.
        let sources = provider.search("anything", 15).await.unwrap();
        assert_eq!(sources.len(), 10);
    }
}
