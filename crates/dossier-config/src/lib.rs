// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Dossier research pipeline.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and Elm-style diagnostic
//! error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use dossier_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Groq model: {}", config.groq.model);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    AgentConfig, DossierConfig, GroqConfig, LinkupConfig, MemoryConfig, ResearchConfig,
    RouterConfig, StorageConfig, SynthesisConfig,
};

/// Load configuration from the XDG hierarchy and validate it.
///
/// This is the high-level entry point that:
/// 1. Loads config from TOML files + env vars via Figment
/// 2. On success: runs post-deserialization validation
/// 3. On Figment error: converts to rich miette diagnostics with typo suggestions
///
/// Returns either a valid `DossierConfig` or a list of diagnostic errors.
pub fn load_and_validate() -> Result<DossierConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            // Read TOML source files for error source span information
            let toml_sources = collect_toml_sources();
            Err(diagnostic::figment_to_config_errors(err, &toml_sources))
        }
    }
}

/// Load configuration from a specific TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<DossierConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    // Local config
    if let Ok(content) = std::fs::read_to_string("dossier.toml") {
        let path = std::env::current_dir()
            .map(|d| d.join("dossier.toml").display().to_string())
            .unwrap_or_else(|_| "dossier.toml".to_string());
        sources.push((path, content));
    }

    // XDG user config
    if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("dossier/dossier.toml");
        if let Ok(content) = std::fs::read_to_string(&path) {
            sources.push((path.display().to_string(), content));
        }
    }

    // System config
    let system_path = std::path::Path::new("/etc/dossier/dossier.toml");
    if let Ok(content) = std::fs::read_to_string(system_path) {
        sources.push((system_path.display().to_string(), content));
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_config_loads_and_validates() {
        let config = load_and_validate_str(
            r#"
[agent]
identity = "Meridian Labs"

[synthesis]
reply_min_words = 80
reply_max_words = 200
"#,
        )
        .unwrap();
        assert_eq!(config.agent.identity, "Meridian Labs");
        assert_eq!(config.synthesis.reply_min_words, 80);
        assert_eq!(config.router.default_scenario, "meeting");
    }

    #[test]
    fn unknown_key_yields_suggestion_diagnostic() {
        let errors = load_and_validate_str(
            r#"
[groq]
modle = "llama-3.3-70b-versatile"
"#,
        )
        .unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::UnknownKey { key, suggestion, .. }
                if key == "modle" && suggestion.as_deref() == Some("model")
        )));
    }

    #[test]
    fn semantic_error_in_valid_toml_is_reported() {
        let errors = load_and_validate_str(
            r#"
[router]
default_scenario = "podcast"
"#,
        )
        .unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("podcast"))));
    }
}
