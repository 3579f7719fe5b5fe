//! Event dispatcher: routes each inbound message to the canned text reply or
//! to the fetch → name → upload → share → reply pipeline.

use std::sync::Arc;

use linedrive_core::{
    ContentSource, FileStore, InboundEvent, RelayError, RelayResult, Replier, UploadedFile,
};
use logging::{EventLogger, RelayEvent, redact_sensitive_data};
use media::name_content;
use tracing::{error, info, instrument, warn};

/// Reply to any text message.
pub const TEXT_INSTRUCTIONS: &str =
    "ส่งรูป/วิดีโอ/เสียง/ไฟล์มาได้เลย ผมจะอัปโหลดขึ้น Google Drive ให้อัตโนมัติครับ";

/// Shown instead of a link when Drive returns none.
pub const PRIVATE_LINK_PLACEHOLDER: &str = "(private)";

/// Success reply listing the stored file.
pub fn success_text(file: &UploadedFile) -> String {
    let link = file
        .view_link
        .as_deref()
        .unwrap_or(PRIVATE_LINK_PLACEHOLDER);
    format!(
        "อัปโหลดสำเร็จ ✅\nชื่อไฟล์: {}\nไฟล์ ID: {}\nเปิดดู: {}",
        file.name, file.id, link
    )
}

/// Failure reply carrying the (scrubbed) error text.
pub fn failure_text(err: &RelayError) -> String {
    format!(
        "อัปโหลดไม่สำเร็จ ❌\n{}",
        redact_sensitive_data(&err.to_string())
    )
}

pub struct EventDispatcher {
    content: Arc<dyn ContentSource>,
    store: Arc<dyn FileStore>,
    replier: Arc<dyn Replier>,
    public_share: bool,
}

impl EventDispatcher {
    pub fn new(
        content: Arc<dyn ContentSource>,
        store: Arc<dyn FileStore>,
        replier: Arc<dyn Replier>,
        public_share: bool,
    ) -> Self {
        Self {
            content,
            store,
            replier,
            public_share,
        }
    }

    /// Handle one event to completion. Never fails: every error ends as a
    /// reply to the sender or, if even that fails, a log line.
    #[instrument(skip(self, event), fields(message_id = %event.message_id, kind = %event.kind))]
    pub async fn dispatch(&self, event: &InboundEvent) {
        EventLogger::log_event(
            &event.message_id,
            RelayEvent::Received {
                kind: event.kind.to_string(),
            },
        );

        if !event.kind.is_media() {
            self.send_reply(event, TEXT_INSTRUCTIONS).await;
            return;
        }

        match self.relay_media(event).await {
            Ok(file) => {
                self.send_reply(event, &success_text(&file)).await;
            }
            Err(err) => {
                error!(error = %err, "Upload failed");
                EventLogger::log_event(
                    &event.message_id,
                    RelayEvent::Failed {
                        stage: stage_of(&err).to_string(),
                        error_msg: err.to_string(),
                    },
                );
                self.send_reply(event, &failure_text(&err)).await;
            }
        }
    }

    async fn relay_media(&self, event: &InboundEvent) -> RelayResult<UploadedFile> {
        let raw = self.content.fetch(event).await?;
        let content = name_content(event, raw);
        info!(file_name = %content.file_name, bytes = content.len(), store = self.store.name(), "Uploading");

        let file = self.store.upload(&content).await?;
        EventLogger::log_event(
            &event.message_id,
            RelayEvent::Uploaded {
                file_id: file.id.clone(),
                file_name: file.name.clone(),
                bytes: content.len(),
            },
        );

        if self.public_share {
            if let Err(err) = self.store.grant_public_read(&file.id).await {
                warn!(file_id = %file.id, error = %err, "Could not grant public read access");
            }
        }
        Ok(file)
    }

    async fn send_reply(&self, event: &InboundEvent, text: &str) {
        if let Err(err) = self.replier.reply_text(&event.reply_token, text).await {
            error!(error = %err, "Failed to reply to user");
        }
    }
}

fn stage_of(err: &RelayError) -> &'static str {
    match err {
        RelayError::ContentFetch(_) => "fetch",
        RelayError::Credentials(_) => "credentials",
        RelayError::Upload(_) => "upload",
        RelayError::Reply(_) => "reply",
    }
}
