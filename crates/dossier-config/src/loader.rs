// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./dossier.toml` > `~/.config/dossier/dossier.toml` > `/etc/dossier/dossier.toml`
//! with environment variable overrides via `DOSSIER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::DossierConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/dossier/dossier.toml` (system-wide)
/// 3. `~/.config/dossier/dossier.toml` (user XDG config)
/// 4. `./dossier.toml` (local directory)
/// 5. `DOSSIER_*` environment variables
pub fn load_config() -> Result<DossierConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DossierConfig::default()))
        .merge(Toml::file("/etc/dossier/dossier.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("dossier/dossier.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("dossier.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used by tests and callers that carry their own config text.
pub fn load_config_from_str(toml_content: &str) -> Result<DossierConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DossierConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DossierConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DossierConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `DOSSIER_GROQ_API_KEY` must
/// map to `groq.api_key`, not `groq.api.key`.
fn env_provider() -> Env {
    Env::prefixed("DOSSIER_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: DOSSIER_GROQ_API_KEY -> "groq_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("groq_", "groq.", 1)
            .replacen("linkup_", "linkup.", 1)
            .replacen("memory_", "memory.", 1)
            .replacen("research_", "research.", 1)
            .replacen("synthesis_", "synthesis.", 1)
            .replacen("router_", "router.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
