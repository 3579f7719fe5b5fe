//! Typed relay configuration.

use serde::Serialize;
use std::path::PathBuf;

/// Complete runtime configuration, assembled from the environment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayConfig {
    pub bind_address: String,
    pub port: u16,
    pub line: LineSettings,
    pub drive: DriveSettings,
    pub credentials: CredentialSettings,
    pub logging: LogSettings,
    /// Mount the `/debug/*` diagnostic routes.
    pub debug_endpoints: bool,
}

/// LINE Messaging API channel settings.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSettings {
    pub channel_secret: Option<String>,
    pub channel_access_token: Option<String>,
}

impl LineSettings {
    /// Both secret and token are present.
    pub fn is_configured(&self) -> bool {
        self.channel_secret.is_some() && self.channel_access_token.is_some()
    }
}

/// Google Drive upload settings.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveSettings {
    /// Parent folder for uploads. `None` uploads to the service account's root.
    pub folder_id: Option<String>,
    /// Grant anyone-with-link read access after each upload.
    pub public_share: bool,
}

/// Sources for the service-account key, tried in field order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSettings {
    /// `GOOGLE_APPLICATION_CREDENTIALS`.
    pub path_override: Option<PathBuf>,
    /// Mounted secret file.
    pub secret_file: PathBuf,
    /// Inline key, raw JSON or base64 of it.
    pub service_account_json: Option<String>,
    /// Directory an inline key is written to.
    pub materialize_dir: PathBuf,
}

impl CredentialSettings {
    /// Whether any source could plausibly yield a key.
    pub fn any_source_configured(&self) -> bool {
        self.path_override.is_some()
            || self.service_account_json.is_some()
            || self.secret_file.exists()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSettings {
    pub level: String,
    /// When set, JSON logs are also written here with daily rotation.
    pub dir: Option<PathBuf>,
    /// JSON console output instead of the human-readable format.
    pub json: bool,
}
