//! MIME type ↔ file extension mapping.
//!
//! Used to name relayed files that arrive without a filename and to label
//! uploads whose provider response carried no content type.

use std::path::Path;

/// Preferred extension per MIME type, for the types the messaging provider
/// actually sends and for types whose first `mime_guess` extension is not the
/// usual one. Anything else falls through to `mime_guess`.
const PREFERRED_EXTENSIONS: &[(&str, &str)] = &[
    // Images
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
    ("image/heic", "heic"),
    ("image/svg+xml", "svg"),
    ("image/bmp", "bmp"),
    ("image/tiff", "tiff"),
    // Audio
    ("audio/mpeg", "mp3"),
    ("audio/mp4", "m4a"),
    ("audio/x-m4a", "m4a"),
    ("audio/m4a", "m4a"),
    ("audio/aac", "aac"),
    ("audio/ogg", "ogg"),
    ("audio/wav", "wav"),
    ("audio/x-wav", "wav"),
    ("audio/flac", "flac"),
    // Video
    ("video/mp4", "mp4"),
    ("video/mpeg", "mpeg"),
    ("video/quicktime", "mov"),
    ("video/webm", "webm"),
    ("video/x-matroska", "mkv"),
    ("video/3gpp", "3gp"),
    // Documents
    ("application/pdf", "pdf"),
    ("application/zip", "zip"),
    ("application/json", "json"),
    ("text/plain", "txt"),
    ("text/csv", "csv"),
    ("text/html", "html"),
    ("application/octet-stream", "bin"),
];

/// Detect MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> Option<String> {
    let ext = path.extension().and_then(|e| e.to_str())?.to_lowercase();

    let known = PREFERRED_EXTENSIONS
        .iter()
        .find(|(_, e)| *e == ext)
        .map(|(mime, _)| (*mime).to_string());

    known.or_else(|| mime_guess::from_ext(&ext).first_raw().map(str::to_string))
}

/// Extension (without the dot) for a MIME type essence, if one is known.
///
/// JPEG always maps to `jpg`, never `jpe` or `jfif`.
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    let mime = mime.trim().to_ascii_lowercase();
    if mime.is_empty() {
        return None;
    }
    PREFERRED_EXTENSIONS
        .iter()
        .find(|(m, _)| *m == mime)
        .map(|(_, ext)| *ext)
        .or_else(|| {
            mime_guess::get_mime_extensions_str(&mime)
                .and_then(|exts| exts.first().copied())
        })
}
