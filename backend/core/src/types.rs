use bytes::Bytes;
use serde::Serialize;

/// Content type used when neither the provider nor the filename tells us better.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Binary content downloaded from the messaging provider.
#[derive(Debug, Clone)]
pub struct FetchedContent {
    pub data: Bytes,
    /// `Content-Type` header as returned by the provider, if any.
    pub content_type: Option<String>,
    /// Filename after resolution; always non-empty.
    pub file_name: String,
}

impl FetchedContent {
    /// Content type with parameters (e.g. `; charset=...`) stripped.
    pub fn essence(&self) -> Option<&str> {
        self.content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or("").trim())
            .filter(|ct| !ct.is_empty())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A file resource created in cloud storage.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
    pub view_link: Option<String>,
    pub content_link: Option<String>,
    pub parent_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn essence_strips_parameters() {
        let content = FetchedContent {
            data: Bytes::from_static(b"abc"),
            content_type: Some("text/plain; charset=utf-8".into()),
            file_name: "note".into(),
        };
        assert_eq!(content.essence(), Some("text/plain"));
        assert_eq!(content.len(), 3);
    }

    #[test]
    fn essence_of_blank_header_is_none() {
        let content = FetchedContent {
            data: Bytes::new(),
            content_type: Some("  ".into()),
            file_name: "x".into(),
        };
        assert_eq!(content.essence(), None);
        assert!(content.is_empty());
    }
}
