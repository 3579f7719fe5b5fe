//! Default values for settings not supplied by the environment.

use std::path::PathBuf;

use crate::schema::{CredentialSettings, DriveSettings, LineSettings, LogSettings, RelayConfig};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Where hosting platforms mount secret files.
pub const DEFAULT_SECRET_FILE: &str = "/etc/secrets/service_account.json";

/// File name used when an inline credential is written to disk.
pub const MATERIALIZED_CREDENTIALS_FILE: &str = "linedrive-service-account.json";

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            path_override: None,
            secret_file: PathBuf::from(DEFAULT_SECRET_FILE),
            service_account_json: None,
            materialize_dir: std::env::temp_dir(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            dir: None,
            json: false,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            line: LineSettings::default(),
            drive: DriveSettings::default(),
            credentials: CredentialSettings::default(),
            logging: LogSettings::default(),
            debug_endpoints: false,
        }
    }
}
