//! `GET /` — liveness check.

use axum::Json;
use serde_json::{Value, json};

/// Service name reported by the health check.
pub const SERVICE_NAME: &str = "line-drive-bot";

pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "service": SERVICE_NAME }))
}
