//! Naming and labelling of relayed media.

pub mod filename;
pub mod mime_detect;

pub use filename::{name_content, resolve_file_name, upload_content_type};
pub use mime_detect::{detect_mime_type, extension_for_mime};
