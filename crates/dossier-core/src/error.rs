// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Dossier research pipeline.

use thiserror::Error;

/// The primary error type used across all Dossier traits and core operations.
#[derive(Debug, Error)]
pub enum DossierError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// LLM inference service errors (API failure, token limits, model not found).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Web-search provider errors (API failure, quota exhaustion, malformed results).
    #[error("search error: {message}")]
    Search {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Structured-output parse errors that survived the repair cascade.
    ///
    /// Rarely propagated: pipeline call sites absorb parse failures into
    /// typed empty defaults. The variant exists for callers outside the
    /// fail-open boundaries (e.g. config tooling reading stored payloads).
    #[error("parse error: {0}")]
    Parse(String),

    /// Session storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DossierError {
    /// Build a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Build a search error without an underlying source.
    pub fn search(message: impl Into<String>) -> Self {
        Self::Search {
            message: message.into(),
            source: None,
        }
    }
}
