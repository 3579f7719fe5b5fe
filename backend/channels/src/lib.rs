//! LINE Messaging API adapter: webhook parsing and signature checks,
//! content download, and replies.

pub mod line;
pub mod line_content;
pub mod line_receive;
pub mod line_send;

pub use line::{LineClient, LineConfig, LineEndpoints};
pub use line_receive::{SIGNATURE_HEADER, WebhookPayload, sign, verify_signature};
pub use line_send::{MAX_TEXT_CHARS, truncate_chars};
