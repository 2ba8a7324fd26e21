// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Groq chat-completions API.
//!
//! Provides [`GroqClient`] which handles request construction, bearer
//! authentication, and transient error retry.

use std::time::Duration;

use dossier_core::DossierError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, CompletionRequest, CompletionResponse};

/// Base URL for the Groq chat-completions endpoint.
const API_BASE_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// HTTP client for Groq API communication.
///
/// Manages authentication headers, connection pooling, and retry logic
/// for transient errors (429, 500, 502, 503).
#[derive(Debug, Clone)]
pub struct GroqClient {
    client: reqwest::Client,
    default_model: String,
    max_retries: u32,
    base_url: String,
}

impl GroqClient {
    /// Creates a new Groq API client.
    ///
    /// # Arguments
    /// * `api_key` - Groq API key for bearer authentication
    /// * `model` - Default model identifier
    pub fn new(api_key: String, model: String) -> Result<Self, DossierError> {
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
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| DossierError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            default_model: model,
            max_retries: 1,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Returns the default model identifier.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Sends a completion request and returns the full response.
    ///
    /// On transient errors (429, 500, 502, 503), retries once after a
    /// 1-second delay.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, DossierError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&self.base_url)
                .json(request)
                .send()
                .await
                .map_err(|e| DossierError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(|e| DossierError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                let completion: CompletionResponse =
                    serde_json::from_str(&body).map_err(|e| DossierError::Provider {
                        message: format!("failed to parse API response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return Ok(completion);
            }

            if is_transient_error(status) && attempt < self.max_retries {
                let body = response.text().await.unwrap_or_default();
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(DossierError::Provider {
                    message: format!("API returned {status}: {body}"),
                    source: None,
                });
                continue;
            }

            // Non-transient error or exhausted retries.
            let body = response.text().await.unwrap_or_default();
            let error_msg = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!(
                    "Groq API error ({}): {}",
                    api_err.error.type_, api_err.error.message
                )
            } else {
                format!("API returned {status}: {body}")
            };
            return Err(DossierError::Provider {
                message: error_msg,
                source: None,
            });
        }

        Err(last_error.unwrap_or_else(|| DossierError::Provider {
            message: "completion request failed after retries".into(),
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
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::types::WireMessage;

    use super::*;

    fn test_client(base_url: &str) -> GroqClient {
        GroqClient::new("test-api-key".into(), "llama-3.3-70b-versatile".into())
            .unwrap()
            .with_base_url(base_url.to_string())
    }

    fn test_request() -> CompletionRequest {
        CompletionRequest {
            model: "llama-3.3-70b-versatile".into(),
            messages: vec![WireMessage {
                role: "user".into(),
                content: "Hello".into(),
            }],
            temperature: 0.3,
            max_tokens: 1024,
        }
    }

    fn success_body(id: &str, content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "model": "llama-3.3-70b-versatile",
            "choices": [
                {"message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        })
    }

    #[tokio::test]
    async fn complete_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(success_body("chatcmpl-1", "Hi there!")),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete(&test_request()).await.unwrap();

        assert_eq!(result.id, "chatcmpl-1");
        assert_eq!(result.choices[0].message.content, "Hi there!");
        assert_eq!(result.usage.unwrap().prompt_tokens, 10);
    }

    #[tokio::test]
    async fn complete_retries_on_429() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {"type": "rate_limit_exceeded", "message": "Rate limited"}
        });

        // First request returns 429, second returns 200.
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(429).set_body_json(&error_body))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(success_body("chatcmpl-2", "After retry")),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete(&test_request()).await.unwrap();
        assert_eq!(result.id, "chatcmpl-2");
    }

    #[tokio::test]
    async fn complete_fails_on_400() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {"type": "invalid_request_error", "message": "Bad model"}
        });

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(&error_body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete(&test_request()).await;
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("invalid_request_error"), "got: {err}");
    }

    #[tokio::test]
    async fn complete_exhausts_retries_on_503() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {"type": "service_unavailable", "message": "Service overloaded"}
        });

        // Both attempts return 503.
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503).set_body_json(&error_body))
            .expect(2)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete(&test_request()).await;
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("service_unavailable"), "got: {err}");
    }

    #[tokio::test]
    async fn client_sends_bearer_auth_headers() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("authorization", "Bearer test-api-key"))
            .and(header("content-type", "application/json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(success_body("chatcmpl-3", "ok")),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete(&test_request()).await;
        assert!(result.is_ok(), "headers should match: {result:?}");
    }
}
