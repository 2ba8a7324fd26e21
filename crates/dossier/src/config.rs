// SPDX-FileCopyrightText: 2026 Dossier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dossier config` command implementation.
//!
//! Prints the effective configuration after all layers are applied, as
//! pretty JSON with API keys redacted.

use dossier_config::model::DossierConfig;
use dossier_core::DossierError;

const REDACTED: &str = "<redacted>";

/// Run the `dossier config show` command.
pub fn run_show(config: &DossierConfig) -> Result<(), DossierError> {
    let shown = redacted_for_display(config);
    let rendered = serde_json::to_string_pretty(&shown)
        .map_err(|e| DossierError::Internal(format!("failed to render config: {e}")))?;
    println!("{rendered}");
    Ok(())
}

/// Clone the config with secret values masked; unset secrets stay unset
/// so the output shows what is actually configured.
fn redacted_for_display(config: &DossierConfig) -> DossierConfig {
    let mut shown = config.clone();
    shown.groq.api_key = shown.groq.api_key.map(|_| REDACTED.to_string());
    shown.linkup.api_key = shown.linkup.api_key.map(|_| REDACTED.to_string());
    shown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_api_keys_are_masked() {
        let mut config = DossierConfig::default();
        config.groq.api_key = Some("gsk_live_secret".to_string());
        config.linkup.api_key = Some("lkp_live_secret".to_string());

        let shown = redacted_for_display(&config);

        assert_eq!(shown.groq.api_key.as_deref(), Some(REDACTED));
        assert_eq!(shown.linkup.api_key.as_deref(), Some(REDACTED));
        let rendered = serde_json::to_string(&shown).unwrap();
        assert!(!rendered.contains("gsk_live_secret"));
        assert!(!rendered.contains("lkp_live_secret"));
    }

    #[test]
    fn unset_api_keys_stay_unset() {
        let shown = redacted_for_display(&DossierConfig::default());

        assert!(shown.groq.api_key.is_none());
        assert!(shown.linkup.api_key.is_none());
    }

    #[test]
    fn non_secret_fields_pass_through() {
        let mut config = DossierConfig::default();
        config.agent.name = "dossier-test".to_string();

        let shown = redacted_for_display(&config);

        assert_eq!(shown.agent.name, "dossier-test");
        assert_eq!(shown.research, config.research);
    }
}
