//! Service-account OAuth2: signs a JWT assertion with the key's RSA private
//! key and exchanges it for an access token (JWT-bearer grant).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use linedrive_config::ServiceAccountKey;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::DriveError;

/// Per-file access: only files this app created or was handed.
pub const DRIVE_FILE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Assertions may be valid for at most one hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the token actually expires.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Issues and caches access tokens for one service account.
pub struct TokenProvider {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scope: String,
    http: Client,
    cache: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(key: ServiceAccountKey, http: Client) -> Result<Self, DriveError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| DriveError::InvalidKey(e.to_string()))?;
        Ok(Self {
            key,
            encoding_key,
            scope: DRIVE_FILE_SCOPE.to_string(),
            http,
            cache: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// A valid access token, from cache when it has at least a minute left.
    pub async fn access_token(&self) -> Result<String, DriveError> {
        let mut cache = self.cache.lock().await;
        let now = Utc::now();
        if let Some(token) = cache.as_ref() {
            if token.expires_at > now + Duration::seconds(EXPIRY_MARGIN_SECS) {
                return Ok(token.access_token.clone());
            }
        }

        let fresh = self.exchange(now).await?;
        let access_token = fresh.access_token.clone();
        *cache = Some(fresh);
        Ok(access_token)
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String, DriveError> {
        let iat = now.timestamp();
        let claims = Claims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();
        encode(&header, &claims, &self.encoding_key).map_err(|e| DriveError::InvalidKey(e.to_string()))
    }

    async fn exchange(&self, now: DateTime<Utc>) -> Result<CachedToken, DriveError> {
        let assertion = self.assertion(now)?;
        let res = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(DriveError::Token(format!("{status}: {body}")));
        }

        let token: TokenResponse = res
            .json()
            .await
            .map_err(|e| DriveError::Token(format!("unreadable token response: {e}")))?;
        let lifetime = token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        debug!(client_email = %self.key.client_email, lifetime, "Obtained Drive access token");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: now + Duration::seconds(lifetime),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub const TEST_PRIVATE_KEY: &str = include_str!("../testdata/test_rsa_key.pem");

    pub fn test_key(token_uri: &str) -> ServiceAccountKey {
        ServiceAccountKey {
            key_type: Some("service_account".into()),
            project_id: Some("demo".into()),
            private_key_id: Some("kid-1".into()),
            private_key: TEST_PRIVATE_KEY.into(),
            client_email: "relay@demo.iam.gserviceaccount.com".into(),
            token_uri: token_uri.into(),
        }
    }
}
