//! Environment-driven configuration loading.
//!
//! Every setting comes from a single environment variable. Blank values are
//! treated as unset so that `FOO=` in a `.env` file does not count as
//! configuration.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::warn;

use crate::defaults::{DEFAULT_BIND_ADDRESS, DEFAULT_LOG_LEVEL, DEFAULT_PORT, DEFAULT_SECRET_FILE};
use crate::schema::{CredentialSettings, DriveSettings, LineSettings, LogSettings, RelayConfig};

pub const LINE_CHANNEL_SECRET: &str = "LINE_CHANNEL_SECRET";
pub const LINE_CHANNEL_ACCESS_TOKEN: &str = "LINE_CHANNEL_ACCESS_TOKEN";
pub const GDRIVE_FOLDER_ID: &str = "GDRIVE_FOLDER_ID";
pub const GDRIVE_PUBLIC: &str = "GDRIVE_PUBLIC";
pub const GOOGLE_APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const GOOGLE_SERVICE_ACCOUNT_JSON: &str = "GOOGLE_SERVICE_ACCOUNT_JSON";
pub const LINEDRIVE_SECRET_FILE: &str = "LINEDRIVE_SECRET_FILE";
pub const LINEDRIVE_DEBUG_ENDPOINTS: &str = "LINEDRIVE_DEBUG_ENDPOINTS";
pub const LINEDRIVE_BIND: &str = "LINEDRIVE_BIND";
pub const PORT: &str = "PORT";
pub const RUST_LOG: &str = "RUST_LOG";
pub const LINEDRIVE_LOG_DIR: &str = "LINEDRIVE_LOG_DIR";
pub const LINEDRIVE_LOG_JSON: &str = "LINEDRIVE_LOG_JSON";

/// Every variable the relay reads, for diagnostics.
pub const ALL_VARS: &[&str] = &[
    LINE_CHANNEL_SECRET,
    LINE_CHANNEL_ACCESS_TOKEN,
    GDRIVE_FOLDER_ID,
    GDRIVE_PUBLIC,
    GOOGLE_APPLICATION_CREDENTIALS,
    GOOGLE_SERVICE_ACCOUNT_JSON,
    LINEDRIVE_SECRET_FILE,
    LINEDRIVE_DEBUG_ENDPOINTS,
    LINEDRIVE_BIND,
    PORT,
    RUST_LOG,
    LINEDRIVE_LOG_DIR,
    LINEDRIVE_LOG_JSON,
];

impl RelayConfig {
    /// Load configuration from a variable map, normally the process
    /// environment collected once at startup.
    pub fn from_map(env: &HashMap<String, String>) -> Self {
        let get = |key: &str| non_empty(env, key);

        let port = match get(PORT) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Invalid PORT; using default {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            bind_address: get(LINEDRIVE_BIND).unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port,
            line: LineSettings {
                channel_secret: get(LINE_CHANNEL_SECRET),
                channel_access_token: get(LINE_CHANNEL_ACCESS_TOKEN),
            },
            drive: DriveSettings {
                folder_id: get(GDRIVE_FOLDER_ID),
                public_share: flag(env, GDRIVE_PUBLIC),
            },
            credentials: CredentialSettings {
                path_override: get(GOOGLE_APPLICATION_CREDENTIALS).map(PathBuf::from),
                secret_file: get(LINEDRIVE_SECRET_FILE)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SECRET_FILE)),
                service_account_json: get(GOOGLE_SERVICE_ACCOUNT_JSON),
                materialize_dir: std::env::temp_dir(),
            },
            logging: LogSettings {
                level: get(RUST_LOG).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
                dir: get(LINEDRIVE_LOG_DIR).map(PathBuf::from),
                json: flag(env, LINEDRIVE_LOG_JSON),
            },
            debug_endpoints: flag(env, LINEDRIVE_DEBUG_ENDPOINTS),
        }
    }
}

/// Trimmed value of `key`, or `None` if unset or blank.
fn non_empty(env: &HashMap<String, String>, key: &str) -> Option<String> {
    env.get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn flag(env: &HashMap<String, String>, key: &str) -> bool {
    non_empty(env, key).is_some_and(|v| parse_bool(&v))
}

/// Accepts `1`, `true`, `yes`, `on` in any case.
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Which of the relay's variables are set, without their values.
pub fn presence(env: &HashMap<String, String>) -> Vec<(&'static str, bool)> {
    ALL_VARS
        .iter()
        .map(|key| (*key, non_empty(env, key).is_some()))
        .collect()
}
