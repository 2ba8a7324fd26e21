// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Linkup search API request/response types.
//!
//! Result objects vary by depth and content type; every field the provider
//! may or may not send is optional here, and the boundary normalization in
//! `lib.rs` maps them onto [`dossier_core::SourceRecord`].

use serde::{Deserialize, Serialize};

/// A request to the Linkup search endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    /// The query string.
    pub q: String,

    /// Search depth: "standard" or "deep".
    pub depth: String,

    /// Result shape; the pipeline always asks for raw search results.
    #[serde(rename = "outputType")]
    pub output_type: String,
}

/// A successful search response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<RawResult>,
}

/// One provider result in whatever shape the provider chose.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawResult {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

/// Error envelope returned by the API on non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail within an [`ApiErrorResponse`].
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}
