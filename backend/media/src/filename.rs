//! Filename resolution for relayed content.

use std::path::Path;

use linedrive_core::{FetchedContent, InboundEvent, RawContent, DEFAULT_CONTENT_TYPE};
use tracing::debug;

use crate::mime_detect::{detect_mime_type, extension_for_mime};

/// Pick the stored filename for an event's content.
///
/// Uses the provider-supplied name when present, otherwise `{type}-{id}`.
/// An extension inferred from `content_type` is appended only when the name
/// has no `.` in it.
pub fn resolve_file_name(event: &InboundEvent, content_type: Option<&str>) -> String {
    let base = event
        .file_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| event.default_file_name());

    if base.contains('.') {
        return base;
    }

    let essence = content_type.and_then(|ct| ct.split(';').next()).map(str::trim);
    match essence.and_then(extension_for_mime) {
        Some(ext) => format!("{base}.{ext}"),
        None => {
            debug!(file_name = %base, content_type = ?content_type, "No extension inferred");
            base
        }
    }
}

/// Turn downloaded bytes into named content ready for upload.
pub fn name_content(event: &InboundEvent, raw: RawContent) -> FetchedContent {
    let file_name = resolve_file_name(event, raw.content_type.as_deref());
    FetchedContent {
        data: raw.data,
        content_type: raw.content_type,
        file_name,
    }
}

/// Content type to declare on upload: the provider's, then the one implied
/// by the filename, then `application/octet-stream`.
pub fn upload_content_type(content: &FetchedContent) -> String {
    if let Some(essence) = content.essence() {
        return essence.to_string();
    }
    detect_mime_type(Path::new(&content.file_name))
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use linedrive_core::MessageKind;

    fn event(kind: MessageKind, file_name: Option<&str>) -> InboundEvent {
        InboundEvent {
            message_id: "100".into(),
            reply_token: "r".into(),
            kind,
            file_name: file_name.map(str::to_string),
            text: None,
            external_url: None,
        }
    }

    #[test]
    fn image_without_name_gets_jpg() {
        let name = resolve_file_name(&event(MessageKind::Image, None), Some("image/jpeg"));
        assert_eq!(name, "image-100.jpg");
    }

    #[test]
    fn content_type_parameters_are_ignored() {
        let name = resolve_file_name(
            &event(MessageKind::Video, None),
            Some("video/mp4; codecs=avc1"),
        );
        assert_eq!(name, "video-100.mp4");
    }

    #[test]
    fn provided_name_with_extension_is_kept() {
        let name = resolve_file_name(
            &event(MessageKind::File, Some("contract.pdf")),
            Some("application/octet-stream"),
        );
        assert_eq!(name, "contract.pdf");
    }

    #[test]
    fn provided_name_without_dot_gets_extension() {
        let name = resolve_file_name(
            &event(MessageKind::File, Some("notes")),
            Some("text/plain"),
        );
        assert_eq!(name, "notes.txt");
    }

    #[test]
    fn undotted_file_name_with_octet_stream_gets_bin() {
        let name = resolve_file_name(
            &event(MessageKind::File, Some("backup")),
            Some("application/octet-stream"),
        );
        assert_eq!(name, "backup.bin");
    }

    #[test]
    fn missing_content_type_leaves_name_bare() {
        let name = resolve_file_name(&event(MessageKind::Audio, None), None);
        assert_eq!(name, "audio-100");
    }

    #[test]
    fn blank_provided_name_falls_back_to_default() {
        let name = resolve_file_name(&event(MessageKind::File, Some("  ")), Some("image/png"));
        assert_eq!(name, "file-100.png");
    }

    #[test]
    fn upload_type_prefers_provider_header() {
        let content = name_content(
            &event(MessageKind::Image, None),
            RawContent {
                data: Bytes::from_static(b"\xff\xd8"),
                content_type: Some("image/png".into()),
            },
        );
        assert_eq!(upload_content_type(&content), "image/png");
    }

    #[test]
    fn upload_type_falls_back_to_extension_then_octet_stream() {
        let from_name = FetchedContent {
            data: Bytes::new(),
            content_type: None,
            file_name: "clip.mov".into(),
        };
        assert_eq!(upload_content_type(&from_name), "video/quicktime");

        let unknown = FetchedContent {
            data: Bytes::new(),
            content_type: None,
            file_name: "blob".into(),
        };
        assert_eq!(upload_content_type(&unknown), DEFAULT_CONTENT_TYPE);
    }
}
