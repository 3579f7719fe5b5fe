//! Startup validation: reports what is missing before the first webhook arrives.

use crate::schema::RelayConfig;
use thiserror::Error;

/// A config validation finding with the variable it concerns.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation findings from one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
///
/// Missing settings are warnings: the server still starts and the affected
/// requests fail individually.
pub fn validate(config: &RelayConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_line(config, &mut report);
    validate_drive(config, &mut report);
    report
}

fn validate_server(config: &RelayConfig, report: &mut ValidationReport) {
    if config.port == 0 {
        report.error("PORT", "Port must be non-zero");
    }
    if config.bind_address.parse::<std::net::IpAddr>().is_err() {
        report.error("LINEDRIVE_BIND", format!("'{}' is not an IP address", config.bind_address));
    }
}

fn validate_line(config: &RelayConfig, report: &mut ValidationReport) {
    if config.line.channel_secret.is_none() {
        report.warn("LINE_CHANNEL_SECRET", "Not set; webhook requests will fail with 500");
    }
    if config.line.channel_access_token.is_none() {
        report.warn(
            "LINE_CHANNEL_ACCESS_TOKEN",
            "Not set; content download and replies will fail",
        );
    }
}

fn validate_drive(config: &RelayConfig, report: &mut ValidationReport) {
    if config.drive.folder_id.is_none() {
        report.warn(
            "GDRIVE_FOLDER_ID",
            "Not set; files go to the service account's own Drive root",
        );
    }
    if !config.credentials.any_source_configured() {
        report.warn(
            "GOOGLE_APPLICATION_CREDENTIALS",
            format!(
                "No credential source: set it, mount {}, or set GOOGLE_SERVICE_ACCOUNT_JSON",
                config.credentials.secret_file.display()
            ),
        );
    } else if let Some(path) = &config.credentials.path_override {
        if !path.exists() {
            report.warn(
                "GOOGLE_APPLICATION_CREDENTIALS",
                format!("Service account JSON not found at {}", path.display()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> RelayConfig {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        let mut config = RelayConfig::from_map(&env);
        config.credentials.secret_file = "/nonexistent/linedrive/sa.json".into();
        config
    }

    #[test]
    fn empty_config_warns_but_is_valid() {
        let report = validate(&config(&[]));
        assert!(report.is_valid());
        let paths: Vec<_> = report.warnings.iter().map(|w| w.path.as_str()).collect();
        assert!(paths.contains(&"LINE_CHANNEL_SECRET"));
        assert!(paths.contains(&"LINE_CHANNEL_ACCESS_TOKEN"));
        assert!(paths.contains(&"GDRIVE_FOLDER_ID"));
        assert!(paths.contains(&"GOOGLE_APPLICATION_CREDENTIALS"));
    }

    #[test]
    fn complete_config_has_no_findings() {
        let report = validate(&config(&[
            ("LINE_CHANNEL_SECRET", "s"),
            ("LINE_CHANNEL_ACCESS_TOKEN", "t"),
            ("GDRIVE_FOLDER_ID", "f"),
            ("GOOGLE_SERVICE_ACCOUNT_JSON", "{}"),
        ]));
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn missing_override_file_is_flagged() {
        let report = validate(&config(&[(
            "GOOGLE_APPLICATION_CREDENTIALS",
            "/nonexistent/override.json",
        )]));
        assert!(report
            .warnings
            .iter()
            .any(|w| w.message.contains("/nonexistent/override.json")));
    }

    #[test]
    fn bad_bind_address_is_an_error() {
        let report = validate(&config(&[("LINEDRIVE_BIND", "localhost:80")]));
        assert!(!report.is_valid());
    }
}
