//! `linedrive-config` — environment configuration for the relay.
//!
//! Provides:
//! - Typed settings assembled from environment variables
//! - Service-account credential resolution across several sources
//! - Startup validation with warnings for missing settings
//! - Config redaction for safe logging/display

pub mod credentials;
pub mod defaults;
pub mod env;
pub mod redact;
pub mod schema;
pub mod validation;

pub use credentials::{
    resolve_credentials, CredentialError, CredentialSource, CredentialSummary,
    ResolvedCredentials, ServiceAccountKey,
};
pub use env::{parse_bool, presence};
pub use redact::redact;
pub use schema::{CredentialSettings, DriveSettings, LineSettings, LogSettings, RelayConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;

/// Redacted JSON snapshot of the config, safe to log or serve.
pub fn redacted_snapshot(config: &RelayConfig) -> Result<Value> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    Ok(redact(&value))
}

/// Log every finding in a validation report.
pub fn log_report(report: &ValidationReport) {
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
}
