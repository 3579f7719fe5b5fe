//! CLI Doctor Command
//!
//! Checks the environment the relay would start with: which variables are
//! set, what validation finds, and whether a service account resolves.

use anyhow::Result;
use linedrive_config::{resolve_credentials, validate, CredentialSettings, RelayConfig};

use crate::terminal_output::{note_error, note_info, note_success, note_warn};

/// Runs every check. Returns `false` when the relay could not upload.
pub async fn run(config: &RelayConfig, presence: &[(&'static str, bool)]) -> Result<bool> {
    println!("\n🔍 Running linedrive doctor...\n");

    println!("Environment:");
    for (var, set) in presence {
        if *set {
            note_success(&format!("{var} is set"));
        } else {
            note_info(&format!("{var} is not set"));
        }
    }

    println!("\nConfiguration:");
    let report = validate(config);
    if report.errors.is_empty() && report.warnings.is_empty() {
        note_success("No findings");
    }
    for warning in &report.warnings {
        note_warn(&format!("{}: {}", warning.path, warning.message));
    }
    for error in &report.errors {
        note_error(&format!("{}: {}", error.path, error.message));
    }

    println!("\nCredentials:");
    let credentials_ok = check_credentials(&config.credentials).await;

    let healthy = report.is_valid() && credentials_ok;
    println!();
    if healthy {
        note_success("All checks passed");
    } else {
        note_error("Some checks failed; fix the errors above");
    }
    Ok(healthy)
}

async fn check_credentials(settings: &CredentialSettings) -> bool {
    match resolve_credentials(settings).await {
        Ok(resolved) => {
            let summary = resolved.summary();
            note_success(&format!(
                "Service account {} (from {}, {})",
                summary.client_email, summary.source, summary.path
            ));
            true
        }
        Err(e) => {
            note_error(&e.to_string());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(secret_file: std::path::PathBuf) -> CredentialSettings {
        CredentialSettings {
            path_override: None,
            secret_file,
            service_account_json: None,
            materialize_dir: std::env::temp_dir(),
        }
    }

    #[tokio::test]
    async fn unresolvable_credentials_fail_the_doctor() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RelayConfig::from_map(&HashMap::new());
        config.credentials = settings(dir.path().join("missing.json"));

        assert!(!run(&config, &[]).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_key_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sa.json");
        std::fs::write(&path, "{\"type\":\"service_account\"}").unwrap();

        assert!(!check_credentials(&settings(path)).await);
    }
}
