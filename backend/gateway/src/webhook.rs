//! `POST /webhook` — LINE webhook endpoint.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use linedrive_channels::{SIGNATURE_HEADER, WebhookPayload, verify_signature};
use tracing::{error, info, warn};

use crate::server::GatewayState;

pub async fn handle_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let (Some(secret), Some(dispatcher)) = (state.channel_secret.as_deref(), state.dispatcher.as_ref())
    else {
        error!("[LINE] Webhook called but the channel is not configured");
        return (StatusCode::INTERNAL_SERVER_ERROR, "LINE handler not configured").into_response();
    };

    // 1. Verify signature over the raw body
    let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
        warn!("[LINE] Missing signature header; rejecting webhook");
        return (StatusCode::BAD_REQUEST, "missing signature").into_response();
    };
    if !verify_signature(secret, signature, &body) {
        warn!("[LINE] Invalid signature; rejecting webhook");
        return (StatusCode::BAD_REQUEST, "invalid signature").into_response();
    }

    // 2. Parse JSON
    let payload = match WebhookPayload::parse(&body) {
        Ok(p) => p,
        Err(err) => {
            error!("[LINE] Failed to parse webhook body: {}", err);
            return (StatusCode::BAD_REQUEST, "bad json").into_response();
        }
    };

    // 3. Handle each event before acknowledging
    let events = payload.into_inbound_events();
    info!(count = events.len(), "[LINE] Webhook accepted");
    for event in &events {
        dispatcher.dispatch(event).await;
    }

    (StatusCode::OK, "OK").into_response()
}
