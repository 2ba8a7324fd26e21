// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Linkup search API.

use std::time::Duration;

use dossier_core::DossierError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, SearchRequest, SearchResponse};

/// Base URL for the Linkup search endpoint.
const API_BASE_URL: &str = "https://api.linkup.so/v1/search";

/// HTTP client for Linkup API communication.
///
/// Manages bearer authentication and retry logic for transient errors
/// (429, 500, 502, 503).
#[derive(Debug, Clone)]
pub struct LinkupClient {
    client: reqwest::Client,
    max_retries: u32,
    base_url: String,
}

impl LinkupClient {
    /// Creates a new Linkup API client.
    pub fn new(api_key: String) -> Result<Self, DossierError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                DossierError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert(
            "content-type",
            HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| DossierError::Search {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            max_retries: 1,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Issues one search request and returns the raw provider results.
    ///
    /// On transient errors (429, 500, 502, 503), retries once after a
    /// 1-second delay.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, DossierError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying search request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&self.base_url)
                .json(request)
                .send()
                .await
                .map_err(|e| DossierError::Search {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "search response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| DossierError::Search {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                let results: SearchResponse =
                    serde_json::from_str(&body).map_err(|e| DossierError::Search {
                        message: format!("failed to parse API response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return Ok(results);
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(DossierError::Search {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let error_msg = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!("Linkup API error: {}", api_err.error.message)
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(DossierError::Search {
                message: error_msg,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| DossierError::Search {
            message: "search request failed after retries".into(),
            source: None,
        }))
    }
}

/// Returns true for HTTP status codes that indicate transient errors worth retrying.
fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_client(base_url: &str) -> LinkupClient {
        LinkupClient::new("test-api-key".into())
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    fn test_request() -> SearchRequest {
        SearchRequest {
            q: "Acme Robotics funding".into(),
            depth: "standard".into(),
            output_type: "searchResults".into(),
        }
    }

    #[tokio::test]
    async fn search_success_with_auth_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(body_partial_json(serde_json::json!({
                "q": "Acme Robotics funding",
                "depth": "standard",
                "outputType": "searchResults"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {"name": "Acme raises $20M", "url": "https://example.com/a", "content": "Acme Robotics announced..."}
                ]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let response = client.search(&test_request()).await.unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].name.as_deref(), Some("Acme raises $20M"));
    }

    #[tokio::test]
    async fn search_retries_on_500_then_succeeds() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let response = client.search(&test_request()).await.unwrap();
        assert!(response.results.is_empty());
    }

    #[tokio::test]
    async fn search_fails_on_401_with_api_error_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "invalid API key", "code": "unauthorized"}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.search(&test_request()).await.unwrap_err();
        assert!(err.to_string().contains("invalid API key"));
    }
}
