//! Structured logging for linedrive.
//!
//! Handles subscriber setup, file rotation, secret redaction, and the
//! per-message relay event log.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, RelayEvent};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
