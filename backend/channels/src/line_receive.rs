//! LINE Webhook Receiver
//!
//! Handles inbound payloads from LINE Messaging API webhooks,
//! including signature validation and event deserialization.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use hmac::{Hmac, Mac};
use linedrive_core::{InboundEvent, MessageKind};
use serde::Deserialize;
use sha2::Sha256;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Compute the signature LINE sends for `body`: base64 of HMAC-SHA256 keyed
/// with the channel secret.
pub fn sign(channel_secret: &str, body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes()).ok()?;
    mac.update(body);
    Some(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
}

/// Validates the `x-line-signature` against the local channel secret.
///
/// The comparison is constant-time.
pub fn verify_signature(channel_secret: &str, signature: &str, body: &[u8]) -> bool {
    let Ok(expected) = BASE64_STANDARD.decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Top-level webhook body. Fields the relay does not act on are ignored.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    /// Empty for the console's "Verify" request.
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    /// `active` or `standby`; standby channels must not reply.
    pub mode: Option<String>,
    pub reply_token: Option<String>,
    pub message: Option<WebhookMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: Option<String>,
    pub file_name: Option<String>,
    pub content_provider: Option<ContentProvider>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentProvider {
    /// `line` or `external`.
    #[serde(rename = "type")]
    pub kind: String,
    pub original_content_url: Option<String>,
}

impl WebhookPayload {
    pub fn parse(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Keep the events the relay acts on: replyable `message` events whose
    /// message type is text, image, video, audio, or file.
    pub fn into_inbound_events(self) -> Vec<InboundEvent> {
        self.events
            .into_iter()
            .filter_map(WebhookEvent::into_inbound)
            .collect()
    }
}

impl WebhookEvent {
    fn into_inbound(self) -> Option<InboundEvent> {
        if self.event_type != "message" {
            debug!(event_type = %self.event_type, "Ignoring non-message LINE event");
            return None;
        }
        if self.mode.as_deref() == Some("standby") {
            debug!("Ignoring LINE event delivered in standby mode");
            return None;
        }
        let message = self.message?;
        let Some(kind) = MessageKind::parse(&message.kind) else {
            debug!(kind = %message.kind, "Ignoring unsupported LINE message type");
            return None;
        };
        let Some(reply_token) = self.reply_token else {
            debug!(message_id = %message.id, "LINE message event without reply token");
            return None;
        };

        let external_url = message
            .content_provider
            .filter(|p| p.kind == "external")
            .and_then(|p| p.original_content_url);

        Some(InboundEvent {
            message_id: message.id,
            reply_token,
            kind,
            file_name: message.file_name,
            text: message.text,
            external_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "destination": "Uxxxxxxxx",
        "events": [
            {
                "type": "message",
                "mode": "active",
                "timestamp": 1700000000000,
                "source": { "type": "user", "userId": "U4af4980629" },
                "webhookEventId": "01FZ74A0TDDPYRVKNK77XKC3ZR",
                "deliveryContext": { "isRedelivery": false },
                "replyToken": "nHuyWiB7yP5Zw52FIkcQobQuGDXCTA",
                "message": {
                    "id": "325708",
                    "type": "file",
                    "fileName": "report.pdf",
                    "fileSize": 2138
                }
            },
            {
                "type": "message",
                "replyToken": "abc",
                "message": { "id": "1", "type": "text", "text": "hello" }
            },
            {
                "type": "message",
                "replyToken": "def",
                "message": { "id": "2", "type": "sticker", "packageId": "1", "stickerId": "1" }
            },
            { "type": "follow", "replyToken": "ghi" },
            {
                "type": "message",
                "replyToken": "jkl",
                "message": {
                    "id": "3",
                    "type": "image",
                    "contentProvider": { "type": "external", "originalContentUrl": "https://example.com/a.jpg" }
                }
            }
        ]
    }"#;

    #[test]
    fn signature_round_trips() {
        let body = br#"{"events":[]}"#;
        let sig = sign("channel-secret", body).unwrap();
        assert!(verify_signature("channel-secret", &sig, body));
    }

    #[test]
    fn signature_rejects_wrong_secret_or_body() {
        let body = br#"{"events":[]}"#;
        let sig = sign("channel-secret", body).unwrap();
        assert!(!verify_signature("other-secret", &sig, body));
        assert!(!verify_signature("channel-secret", &sig, br#"{"events":[1]}"#));
    }

    #[test]
    fn signature_rejects_garbage() {
        assert!(!verify_signature("s", "not base64!!", b"{}"));
        assert!(!verify_signature("s", "", b"{}"));
    }

    #[test]
    fn keeps_supported_message_events() {
        let events = WebhookPayload::parse(SAMPLE.as_bytes())
            .unwrap()
            .into_inbound_events();
        assert_eq!(events.len(), 3);

        assert_eq!(events[0].kind, MessageKind::File);
        assert_eq!(events[0].file_name.as_deref(), Some("report.pdf"));
        assert_eq!(events[0].reply_token, "nHuyWiB7yP5Zw52FIkcQobQuGDXCTA");

        assert_eq!(events[1].kind, MessageKind::Text);
        assert_eq!(events[1].text.as_deref(), Some("hello"));

        assert_eq!(events[2].kind, MessageKind::Image);
        assert_eq!(
            events[2].external_url.as_deref(),
            Some("https://example.com/a.jpg")
        );
    }

    #[test]
    fn standby_events_are_skipped() {
        let body = br#"{"events":[{"type":"message","mode":"standby","replyToken":"x",
            "message":{"id":"9","type":"image"}}]}"#;
        let events = WebhookPayload::parse(body).unwrap().into_inbound_events();
        assert!(events.is_empty());
    }

    #[test]
    fn verify_request_has_no_events() {
        let payload = WebhookPayload::parse(br#"{"destination":"U1","events":[]}"#).unwrap();
        assert!(payload.into_inbound_events().is_empty());
    }
}
