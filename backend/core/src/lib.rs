//! `linedrive-core` — shared types for the LINE → Google Drive relay.
//!
//! Holds the per-request data model, the relay error type, and the traits
//! the gateway uses to talk to the messaging and storage adapters.

pub mod error;
pub mod event;
pub mod traits;
pub mod types;

pub use error::{RelayError, RelayResult};
pub use event::{InboundEvent, MessageKind};
pub use traits::{ContentSource, FileStore, RawContent, Replier};
pub use types::{FetchedContent, UploadedFile, DEFAULT_CONTENT_TYPE};
