//! LINE Content Fetcher
//!
//! Downloads the binary payload behind image, video, audio, and file messages.

use async_trait::async_trait;
use linedrive_core::{ContentSource, InboundEvent, RawContent, RelayError, RelayResult};
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};

use crate::line::LineClient;

#[async_trait]
impl ContentSource for LineClient {
    async fn fetch(&self, event: &InboundEvent) -> RelayResult<RawContent> {
        // Externally hosted content is fetched directly, without LINE credentials.
        let request = match &event.external_url {
            Some(url) => {
                debug!(message_id = %event.message_id, url = %url, "Fetching external content");
                self.content_http.get(url)
            }
            None => self
                .content_http
                .get(self.content_url(&event.message_id))
                .bearer_auth(self.access_token()),
        };

        let response = request
            .send()
            .await
            .map_err(|e| RelayError::ContentFetch(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::ContentFetch(format!(
                "LINE content API returned {status}"
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let data = response
            .bytes()
            .await
            .map_err(|e| RelayError::ContentFetch(e.without_url().to_string()))?;

        info!(
            message_id = %event.message_id,
            bytes = data.len(),
            content_type = ?content_type,
            "Downloaded LINE message content"
        );

        Ok(RawContent { data, content_type })
    }
}
