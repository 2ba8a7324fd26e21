// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model for the Dossier research pipeline.
//!
//! All sections use `deny_unknown_fields` so typos surface as errors instead
//! of being silently ignored, and every field has a compiled-in default so a
//! missing `dossier.toml` still yields a runnable configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Dossier research pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DossierConfig {
    /// Core agent settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Groq LLM provider settings.
    #[serde(default)]
    pub groq: GroqConfig,

    /// Linkup web-search provider settings.
    #[serde(default)]
    pub linkup: LinkupConfig,

    /// Interaction-memory recall settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Entity research settings.
    #[serde(default)]
    pub research: ResearchConfig,

    /// Synthesis and post-processing settings.
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Intent router settings.
    #[serde(default)]
    pub router: RouterConfig,

    /// Session storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Core agent identity settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Agent name, used in log output and the default session title prefix.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// The operator's own name or company. Entities matching this string
    /// (after boundary normalization) are triaged as self-references and
    /// never researched. Empty disables the check.
    #[serde(default)]
    pub identity: String,

    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            identity: String::new(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "dossier".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Groq LLM provider settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GroqConfig {
    /// API key. Falls back to the `GROQ_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier sent with every completion request.
    #[serde(default = "default_groq_model")]
    pub model: String,

    /// Completion token cap applied when a request does not set its own.
    #[serde(default = "default_groq_max_tokens")]
    pub max_tokens: u32,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_groq_model(),
            max_tokens: default_groq_max_tokens(),
        }
    }
}

fn default_groq_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_groq_max_tokens() -> u32 {
    4096
}

/// Linkup web-search provider settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LinkupConfig {
    /// API key. Falls back to the `LINKUP_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Search depth passed to the provider (`standard` or `deep`).
    #[serde(default = "default_linkup_depth")]
    pub depth: String,

    /// Ceiling on results per search; per-call requests are clamped to this.
    #[serde(default = "default_linkup_max_results")]
    pub max_results: usize,

    /// Snippets are truncated to this many characters.
    #[serde(default = "default_snippet_max_chars")]
    pub snippet_max_chars: usize,
}

impl Default for LinkupConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            depth: default_linkup_depth(),
            max_results: default_linkup_max_results(),
            snippet_max_chars: default_snippet_max_chars(),
        }
    }
}

fn default_linkup_depth() -> String {
    "standard".to_string()
}

fn default_linkup_max_results() -> usize {
    5
}

fn default_snippet_max_chars() -> usize {
    200
}

/// Interaction-memory recall settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Directory holding cached interaction records (JSON files).
    #[serde(default = "default_memory_data_dir")]
    pub data_dir: String,

    /// Minimum relevance score a record needs to be recalled.
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// When nothing clears `min_score`, keep this many top-scored records
    /// anyway so recall degrades instead of going empty.
    #[serde(default = "default_fallback_top_n")]
    pub fallback_top_n: usize,

    /// Records per kind included in the context summary.
    #[serde(default = "default_summary_records")]
    pub summary_records: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            data_dir: default_memory_data_dir(),
            min_score: default_min_score(),
            fallback_top_n: default_fallback_top_n(),
            summary_records: default_summary_records(),
        }
    }
}

fn default_memory_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("dossier").join("memory"))
        .unwrap_or_else(|| std::path::PathBuf::from("memory"))
        .display()
        .to_string()
}

fn default_min_score() -> f64 {
    2.0
}

fn default_fallback_top_n() -> usize {
    3
}

fn default_summary_records() -> usize {
    5
}

/// Entity research settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ResearchConfig {
    /// How many VALIDATION-tier entities are processed per request; the
    /// rest are skipped for efficiency.
    #[serde(default = "default_max_validation_entities")]
    pub max_validation_entities: usize,

    /// Delay between successive web searches, in milliseconds.
    #[serde(default = "default_search_delay_ms")]
    pub search_delay_ms: u64,

    /// Results requested per entity search.
    #[serde(default = "default_max_results_per_entity")]
    pub max_results_per_entity: usize,

    /// Top-ranked sources per entity handed to synthesis.
    #[serde(default = "default_top_sources_per_entity")]
    pub top_sources_per_entity: usize,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_validation_entities: default_max_validation_entities(),
            search_delay_ms: default_search_delay_ms(),
            max_results_per_entity: default_max_results_per_entity(),
            top_sources_per_entity: default_top_sources_per_entity(),
        }
    }
}

fn default_max_validation_entities() -> usize {
    2
}

fn default_search_delay_ms() -> u64 {
    500
}

fn default_max_results_per_entity() -> usize {
    5
}

fn default_top_sources_per_entity() -> usize {
    3
}

/// Synthesis and post-processing settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SynthesisConfig {
    /// Lower bound of the reply length band, in words.
    #[serde(default = "default_reply_min_words")]
    pub reply_min_words: usize,

    /// Upper bound of the reply length band, in words.
    #[serde(default = "default_reply_max_words")]
    pub reply_max_words: usize,

    /// Sampling temperature for briefing synthesis.
    #[serde(default = "default_briefing_temperature")]
    pub briefing_temperature: f32,

    /// Sampling temperature for reply drafting.
    #[serde(default = "default_reply_temperature")]
    pub reply_temperature: f32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            reply_min_words: default_reply_min_words(),
            reply_max_words: default_reply_max_words(),
            briefing_temperature: default_briefing_temperature(),
            reply_temperature: default_reply_temperature(),
        }
    }
}

fn default_reply_min_words() -> usize {
    60
}

fn default_reply_max_words() -> usize {
    220
}

fn default_briefing_temperature() -> f32 {
    0.4
}

fn default_reply_temperature() -> f32 {
    0.7
}

/// Intent router settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Scenario chosen when keyword fallback scoring ties or finds nothing
    /// (`meeting`, `email`, or `document`).
    #[serde(default = "default_scenario")]
    pub default_scenario: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_scenario: default_scenario(),
        }
    }
}

fn default_scenario() -> String {
    "meeting".to_string()
}

/// Session storage settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// SQLite database file path.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("dossier").join("dossier.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("dossier.db"))
        .display()
        .to_string()
}
