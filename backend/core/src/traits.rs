use async_trait::async_trait;

use crate::error::RelayResult;
use crate::event::InboundEvent;
use crate::types::{FetchedContent, UploadedFile};

/// Downloads the binary payload behind a media message.
///
/// Implementations return the raw bytes and the declared content type; the
/// caller is responsible for filename resolution.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, event: &InboundEvent) -> RelayResult<RawContent>;
}

/// Bytes plus the provider's declared content type.
#[derive(Debug, Clone)]
pub struct RawContent {
    pub data: bytes::Bytes,
    pub content_type: Option<String>,
}

/// Cloud storage that accepts relayed files.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Human-readable backend name for logging.
    fn name(&self) -> &str;

    /// Create a file resource holding `content`.
    async fn upload(&self, content: &FetchedContent) -> RelayResult<UploadedFile>;

    /// Make an uploaded file readable by anyone with the link.
    async fn grant_public_read(&self, file_id: &str) -> RelayResult<()>;
}

/// Sends text back to the sender of an event.
#[async_trait]
pub trait Replier: Send + Sync {
    async fn reply_text(&self, reply_token: &str, text: &str) -> RelayResult<()>;
}
