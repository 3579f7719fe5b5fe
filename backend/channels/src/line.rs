//! LINE client — downloads message content and sends replies through the
//! LINE Messaging API.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

/// Timeout for content downloads, which can be large videos.
const CONTENT_TIMEOUT: Duration = Duration::from_secs(60);
/// Timeout for JSON API calls.
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URLs of the two LINE API hosts.
#[derive(Debug, Clone)]
pub struct LineEndpoints {
    /// Messaging API host (reply, push, profile).
    pub api_base: String,
    /// Data host serving message content.
    pub data_base: String,
}

impl Default for LineEndpoints {
    fn default() -> Self {
        Self {
            api_base: "https://api.line.me".to_string(),
            data_base: "https://api-data.line.me".to_string(),
        }
    }
}

pub struct LineConfig {
    pub channel_access_token: String,
    pub endpoints: LineEndpoints,
}

/// Authenticated client for one LINE channel.
pub struct LineClient {
    pub(crate) config: LineConfig,
    pub(crate) api_http: Client,
    pub(crate) content_http: Client,
}

impl LineClient {
    pub fn new(config: LineConfig) -> Result<Self> {
        let api_http = Client::builder()
            .timeout(API_TIMEOUT)
            .build()
            .context("Failed to build LINE API client")?;
        let content_http = Client::builder()
            .timeout(CONTENT_TIMEOUT)
            .build()
            .context("Failed to build LINE content client")?;
        Ok(Self {
            config,
            api_http,
            content_http,
        })
    }

    pub(crate) fn reply_url(&self) -> String {
        format!(
            "{}/v2/bot/message/reply",
            self.config.endpoints.api_base.trim_end_matches('/')
        )
    }

    pub(crate) fn content_url(&self, message_id: &str) -> String {
        format!(
            "{}/v2/bot/message/{}/content",
            self.config.endpoints.data_base.trim_end_matches('/'),
            message_id
        )
    }

    pub(crate) fn access_token(&self) -> &str {
        &self.config.channel_access_token
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn client_for(server_uri: &str) -> LineClient {
        LineClient::new(LineConfig {
            channel_access_token: "test-access-token".into(),
            endpoints: LineEndpoints {
                api_base: server_uri.to_string(),
                data_base: server_uri.to_string(),
            },
        })
        .unwrap()
    }
}
