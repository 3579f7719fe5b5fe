//! Relay Event Logger
//!
//! One structured record per pipeline milestone, emitted on the
//! `relay_events` tracing target so it can be filtered or shipped separately.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayEvent {
    Received {
        kind: String,
    },
    Uploaded {
        file_id: String,
        file_name: String,
        bytes: usize,
    },
    Failed {
        stage: String,
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub message_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: RelayEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Logs a relay milestone, scrubbing error text first.
    pub fn log_event(message_id: &str, mut event: RelayEvent) {
        if let RelayEvent::Failed { error_msg, .. } = &mut event {
            *error_msg = redact_sensitive_data(error_msg);
        }

        let entry = EventLogEntry {
            message_id: message_id.into(),
            timestamp: Utc::now(),
            event,
        };

        info!(target: "relay_events", event = ?entry, "Relay event");
    }
}
