// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as known scenario names, sane word-count bands, and non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::DossierConfig;

/// Scenario names the router can dispatch to.
const KNOWN_SCENARIOS: &[&str] = &["meeting", "email", "document"];

/// Log level names accepted by the tracing filter.
const KNOWN_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Search depths the Linkup API accepts.
const KNOWN_DEPTHS: &[&str] = &["standard", "deep"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &DossierConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let log_level = config.agent.log_level.trim();
    if !KNOWN_LOG_LEVELS.contains(&log_level) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level `{log_level}` is not one of {}",
                KNOWN_LOG_LEVELS.join(", ")
            ),
        });
    }

    let depth = config.linkup.depth.trim();
    if !KNOWN_DEPTHS.contains(&depth) {
        errors.push(ConfigError::Validation {
            message: format!(
                "linkup.depth `{depth}` is not one of {}",
                KNOWN_DEPTHS.join(", ")
            ),
        });
    }

    if config.linkup.max_results == 0 {
        errors.push(ConfigError::Validation {
            message: "linkup.max_results must be at least 1".to_string(),
        });
    }

    if config.memory.data_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "memory.data_dir must not be empty".to_string(),
        });
    }

    if !config.memory.min_score.is_finite() {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.min_score must be a finite number, got {}",
                config.memory.min_score
            ),
        });
    }

    if config.memory.fallback_top_n == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.fallback_top_n must be at least 1".to_string(),
        });
    }

    if config.research.max_results_per_entity == 0 {
        errors.push(ConfigError::Validation {
            message: "research.max_results_per_entity must be at least 1".to_string(),
        });
    }

    if config.research.top_sources_per_entity == 0 {
        errors.push(ConfigError::Validation {
            message: "research.top_sources_per_entity must be at least 1".to_string(),
        });
    }

    if config.synthesis.reply_min_words == 0 {
        errors.push(ConfigError::Validation {
            message: "synthesis.reply_min_words must be at least 1".to_string(),
        });
    }

    if config.synthesis.reply_min_words >= config.synthesis.reply_max_words {
        errors.push(ConfigError::Validation {
            message: format!(
                "synthesis.reply_min_words ({}) must be below reply_max_words ({})",
                config.synthesis.reply_min_words, config.synthesis.reply_max_words
            ),
        });
    }

    for (key, temp) in [
        ("briefing_temperature", config.synthesis.briefing_temperature),
        ("reply_temperature", config.synthesis.reply_temperature),
    ] {
        if !(0.0..=2.0).contains(&temp) {
            errors.push(ConfigError::Validation {
                message: format!("synthesis.{key} must be within 0.0..=2.0, got {temp}"),
            });
        }
    }

    let scenario = config.router.default_scenario.trim();
    if !KNOWN_SCENARIOS.contains(&scenario) {
        errors.push(ConfigError::Validation {
            message: format!(
                "router.default_scenario `{scenario}` is not one of {}",
                KNOWN_SCENARIOS.join(", ")
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
