//! LINE Senders
//!
//! Sends text replies through the LINE Reply API.

use async_trait::async_trait;
use linedrive_core::{RelayError, RelayResult, Replier};
use serde::Serialize;
use tracing::{error, info};

use crate::line::LineClient;

/// LINE rejects text messages longer than this many characters.
pub const MAX_TEXT_CHARS: usize = 5000;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: Vec<TextMessage>,
}

#[derive(Debug, Serialize)]
struct TextMessage {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
}

impl TextMessage {
    fn new(text: &str) -> Self {
        Self {
            kind: "text",
            text: truncate_chars(text, MAX_TEXT_CHARS),
        }
    }
}

/// Cut `text` to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[async_trait]
impl Replier for LineClient {
    async fn reply_text(&self, reply_token: &str, text: &str) -> RelayResult<()> {
        let body = ReplyRequest {
            reply_token,
            messages: vec![TextMessage::new(text)],
        };

        let res = self
            .api_http
            .post(self.reply_url())
            .bearer_auth(self.access_token())
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::Reply(e.without_url().to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let err = res.text().await.unwrap_or_default();
            error!(%status, body = %err, "[LINE] reply failed");
            return Err(RelayError::Reply(format!("LINE reply API returned {status}: {err}")));
        }
        info!("[LINE] Replied to event");
        Ok(())
    }
}
