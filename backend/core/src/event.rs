use serde::{Deserialize, Serialize};

/// A message event received from the messaging provider, reduced to the
/// fields the relay acts on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboundEvent {
    /// Provider-assigned message id, also used to fetch binary content.
    pub message_id: String,
    /// Single-use token for replying to this event.
    pub reply_token: String,
    pub kind: MessageKind,
    /// Original filename, only present on file messages.
    pub file_name: Option<String>,
    /// Message body, only present on text messages.
    pub text: Option<String>,
    /// Set when the content is hosted outside the provider (external content provider).
    pub external_url: Option<String>,
}

/// Message types the relay handles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Image,
    Video,
    Audio,
    File,
}

impl MessageKind {
    /// Parse a provider message type string. Unsupported types yield `None`.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "file" => Some(Self::File),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::File => "file",
        }
    }

    /// Whether the message carries binary content to relay.
    pub fn is_media(&self) -> bool {
        !matches!(self, Self::Text)
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl InboundEvent {
    /// Name used when the provider does not supply one: `{type}-{message_id}`.
    pub fn default_file_name(&self) -> String {
        format!("{}-{}", self.kind, self.message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_kinds() {
        assert_eq!(MessageKind::parse("image"), Some(MessageKind::Image));
        assert_eq!(MessageKind::parse("file"), Some(MessageKind::File));
        assert_eq!(MessageKind::parse("sticker"), None);
        assert_eq!(MessageKind::parse("location"), None);
    }

    #[test]
    fn text_is_not_media() {
        assert!(!MessageKind::Text.is_media());
        assert!(MessageKind::Audio.is_media());
    }

    #[test]
    fn default_file_name_uses_kind_and_id() {
        let event = InboundEvent {
            message_id: "4711".into(),
            reply_token: "tok".into(),
            kind: MessageKind::Video,
            file_name: None,
            text: None,
            external_url: None,
        };
        assert_eq!(event.default_file_name(), "video-4711");
    }
}
