//! Diagnostic endpoints, mounted only when debug endpoints are enabled.
//!
//! `GET /debug/config` — which variables are set, the redacted config, and
//! how credential resolution turns out.
//! `GET /debug/drive`  — the upload folder as the service account sees it.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use linedrive_config::{RelayConfig, redacted_snapshot, resolve_credentials};
use linedrive_drive::DriveStore;
use serde_json::{Value, json};
use tracing::warn;

use crate::server::GatewayState;

/// What the diagnostic routes report on.
pub struct Diagnostics {
    pub config: RelayConfig,
    /// Output of `linedrive_config::presence` for the process environment.
    pub presence: Vec<(&'static str, bool)>,
    pub drive: Option<Arc<DriveStore>>,
}

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn diagnostics(state: &GatewayState) -> Result<&Diagnostics, (StatusCode, Json<Value>)> {
    state
        .diagnostics
        .as_deref()
        .ok_or_else(|| (StatusCode::NOT_FOUND, Json(json!({ "error": "debug endpoints disabled" }))))
}

pub async fn config_report(State(state): State<GatewayState>) -> ApiResult {
    let diag = diagnostics(&state)?;

    let present: BTreeMap<_, _> = diag.presence.iter().copied().collect();
    let config = redacted_snapshot(&diag.config).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
    })?;
    let credentials = match resolve_credentials(&diag.config.credentials).await {
        Ok(resolved) => json!({ "ok": true, "resolved": resolved.summary() }),
        Err(e) => json!({ "ok": false, "error": e.to_string() }),
    };

    Ok(Json(json!({
        "present": present,
        "config": config,
        "credentials": credentials,
    })))
}

pub async fn drive_report(State(state): State<GatewayState>) -> ApiResult {
    let diag = diagnostics(&state)?;
    let Some(drive) = diag.drive.as_ref() else {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "Drive uploader not initialised" })),
        ));
    };

    match drive.folder_report().await {
        Ok(Some(report)) => Ok(Json(json!({ "folderId": drive.folder_id(), "report": report }))),
        Ok(None) => Ok(Json(json!({
            "folderId": null,
            "message": "GDRIVE_FOLDER_ID not set; uploads go to the service account's root"
        }))),
        Err(e) => {
            warn!(error = %e, "Drive folder inspection failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({ "folderId": drive.folder_id(), "error": e.to_string() })),
            ))
        }
    }
}
