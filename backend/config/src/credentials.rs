//! Service-account credential resolution.
//!
//! Sources are tried in order: the `GOOGLE_APPLICATION_CREDENTIALS` path
//! override, the mounted secret file, then the inline
//! `GOOGLE_SERVICE_ACCOUNT_JSON` value (raw JSON or base64). An inline key is
//! written to the temp directory so every resolved credential has a path on
//! disk. A source that is present but unusable is logged and skipped.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE},
    Engine,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::{fs, task};
use tracing::{debug, info, warn};

use crate::defaults::MATERIALIZED_CREDENTIALS_FILE;
use crate::env::{GOOGLE_APPLICATION_CREDENTIALS, GOOGLE_SERVICE_ACCOUNT_JSON};
use crate::schema::CredentialSettings;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// The subset of a Google service-account key file the relay needs.
#[derive(Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("private_key", &"***")
            .finish()
    }
}

impl ServiceAccountKey {
    /// Parse and sanity-check a key file's JSON text.
    pub fn from_json(raw: &str) -> Result<Self, CredentialError> {
        let key: Self = serde_json::from_str(raw)
            .map_err(|e| CredentialError::Invalid(format!("not a service account key: {e}")))?;
        key.check()?;
        Ok(key)
    }

    fn check(&self) -> Result<(), CredentialError> {
        if let Some(kind) = &self.key_type {
            if kind != "service_account" {
                return Err(CredentialError::Invalid(format!(
                    "expected type \"service_account\", found \"{kind}\""
                )));
            }
        }
        if self.client_email.trim().is_empty() {
            return Err(CredentialError::Invalid("client_email is empty".into()));
        }
        if !self.private_key.contains("PRIVATE KEY") {
            return Err(CredentialError::Invalid(
                "private_key is not a PEM private key".into(),
            ));
        }
        Ok(())
    }
}

/// Where a resolved credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    PathOverride,
    MountedFile,
    InlineEnv,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PathOverride => GOOGLE_APPLICATION_CREDENTIALS,
            Self::MountedFile => "mounted secret file",
            Self::InlineEnv => GOOGLE_SERVICE_ACCOUNT_JSON,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    pub source: CredentialSource,
    pub path: PathBuf,
    pub key: ServiceAccountKey,
}

/// Secret-free description of a resolved credential, for diagnostics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSummary {
    pub source: CredentialSource,
    pub path: String,
    pub client_email: String,
    pub project_id: Option<String>,
}

impl ResolvedCredentials {
    pub fn summary(&self) -> CredentialSummary {
        CredentialSummary {
            source: self.source,
            path: self.path.display().to_string(),
            client_email: self.key.client_email.clone(),
            project_id: self.key.project_id.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("no usable service account credentials ({})", .attempts.join("; "))]
    NotFound { attempts: Vec<String> },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid credentials: {0}")]
    Invalid(String),

    #[error("failed to write credentials to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Resolve a service-account key from the configured sources.
pub async fn resolve_credentials(
    settings: &CredentialSettings,
) -> Result<ResolvedCredentials, CredentialError> {
    let mut attempts = Vec::new();

    match &settings.path_override {
        Some(path) if path.exists() => match load_key_file(path).await {
            Ok(key) => return Ok(resolved(CredentialSource::PathOverride, path, key)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Credential path override unusable");
                attempts.push(format!("{GOOGLE_APPLICATION_CREDENTIALS}: {e}"));
            }
        },
        Some(path) => {
            warn!(path = %path.display(), "Credential path override does not exist");
            attempts.push(format!(
                "{GOOGLE_APPLICATION_CREDENTIALS}: file not found: {}",
                path.display()
            ));
        }
        None => attempts.push(format!("{GOOGLE_APPLICATION_CREDENTIALS}: not set")),
    }

    if settings.secret_file.exists() {
        match load_key_file(&settings.secret_file).await {
            Ok(key) => {
                return Ok(resolved(CredentialSource::MountedFile, &settings.secret_file, key))
            }
            Err(e) => {
                warn!(path = %settings.secret_file.display(), error = %e, "Mounted secret file unusable");
                attempts.push(format!("secret file: {e}"));
            }
        }
    } else {
        debug!(path = %settings.secret_file.display(), "No mounted secret file");
        attempts.push(format!(
            "secret file: not mounted at {}",
            settings.secret_file.display()
        ));
    }

    match &settings.service_account_json {
        Some(raw) => match decode_inline(raw) {
            Ok((json, key)) => {
                let path = settings.materialize_dir.join(MATERIALIZED_CREDENTIALS_FILE);
                write_private(&path, &json).await?;
                return Ok(resolved(CredentialSource::InlineEnv, &path, key));
            }
            Err(e) => {
                warn!(error = %e, "Inline service account value unusable");
                attempts.push(format!("{GOOGLE_SERVICE_ACCOUNT_JSON}: {e}"));
            }
        },
        None => attempts.push(format!("{GOOGLE_SERVICE_ACCOUNT_JSON}: not set")),
    }

    Err(CredentialError::NotFound { attempts })
}

fn resolved(source: CredentialSource, path: &Path, key: ServiceAccountKey) -> ResolvedCredentials {
    info!(%source, path = %path.display(), client_email = %key.client_email, "Resolved service account credentials");
    ResolvedCredentials {
        source,
        path: path.to_path_buf(),
        key,
    }
}

async fn load_key_file(path: &Path) -> Result<ServiceAccountKey, CredentialError> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|source| CredentialError::Read {
            path: path.display().to_string(),
            source,
        })?;
    ServiceAccountKey::from_json(&raw)
}

/// Decode an inline value that is either the key JSON itself or base64 of it.
///
/// Returns the JSON text along with the parsed key.
pub fn decode_inline(raw: &str) -> Result<(String, ServiceAccountKey), CredentialError> {
    let trimmed = raw.trim();
    let json = if trimmed.starts_with('{') {
        trimmed.to_string()
    } else {
        let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(&compact)
            .or_else(|_| URL_SAFE.decode(&compact))
            .map_err(|e| CredentialError::Invalid(format!("neither JSON nor base64: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|_| CredentialError::Invalid("base64 payload is not UTF-8".into()))?
    };
    let key = ServiceAccountKey::from_json(&json)?;
    Ok((json, key))
}

async fn write_private(path: &Path, contents: &str) -> Result<(), CredentialError> {
    let to_err = |source| CredentialError::Write {
        path: path.display().to_string(),
        source,
    };
    let target = path.to_path_buf();
    let contents = contents.to_owned();
    task::spawn_blocking(move || persist_private(&target, contents.as_bytes()))
        .await
        .map_err(|e| to_err(io::Error::other(e)))?
        .map_err(to_err)
}

/// Write `contents` to a fresh owner-only temp file next to `path`, then
/// rename it over `path`. The rename replaces a symlink at `path` instead of
/// following it.
fn persist_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = tempfile::Builder::new()
        .prefix(".linedrive-sa-")
        .tempfile_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
