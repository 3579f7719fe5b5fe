//! Main HTTP server: state assembly, routing, and the serve loop.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{get, post},
};
use linedrive_channels::{LineClient, LineConfig, LineEndpoints};
use linedrive_config::RelayConfig;
use linedrive_drive::DriveStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use crate::debug_api::{self, Diagnostics};
use crate::dispatch::EventDispatcher;
use crate::health_api;
use crate::webhook;

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    /// `None` makes the webhook answer 500.
    pub channel_secret: Option<Arc<str>>,
    /// `None` when the LINE access token is missing.
    pub dispatcher: Option<Arc<EventDispatcher>>,
    /// `Some` mounts the `/debug/*` routes.
    pub diagnostics: Option<Arc<Diagnostics>>,
}

impl GatewayState {
    /// Wire the LINE client and Drive store described by `config`.
    pub fn from_config(config: &RelayConfig, presence: Vec<(&'static str, bool)>) -> Result<Self> {
        let drive = Arc::new(
            DriveStore::new(config.credentials.clone(), config.drive.folder_id.clone())
                .context("Failed to build Drive uploader")?,
        );

        let dispatcher = match &config.line.channel_access_token {
            Some(token) => {
                let line = Arc::new(LineClient::new(LineConfig {
                    channel_access_token: token.clone(),
                    endpoints: LineEndpoints::default(),
                })?);
                Some(Arc::new(EventDispatcher::new(
                    line.clone(),
                    drive.clone(),
                    line,
                    config.drive.public_share,
                )))
            }
            None => {
                warn!("LINE access token missing; webhook will answer 500");
                None
            }
        };

        let diagnostics = config.debug_endpoints.then(|| {
            Arc::new(Diagnostics {
                config: config.clone(),
                presence,
                drive: Some(drive.clone()),
            })
        });

        Ok(Self {
            channel_secret: config.line.channel_secret.as_deref().map(Arc::from),
            dispatcher,
            diagnostics,
        })
    }
}

/// Build the router for `state`.
pub fn build_router(state: GatewayState) -> Router {
    let mut app = Router::new()
        .route("/", get(health_api::health))
        .route("/webhook", post(webhook::handle_webhook));

    if state.diagnostics.is_some() {
        app = app
            .route("/debug/config", get(debug_api::config_report))
            .route("/debug/drive", get(debug_api::drive_report));
    }

    app.with_state(state).layer(TraceLayer::new_for_http())
}

/// Starts the Axum HTTP server and runs until Ctrl-C or SIGTERM.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Relay HTTP server listening on {}", addr);

    #[cfg(unix)]
    let shutdown = shutdown_signal(terminate_signal());
    #[cfg(not(unix))]
    let shutdown = shutdown_signal();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Relay HTTP server stopped");
    Ok(())
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

/// Registered before serving so a SIGTERM sent during startup is not lost.
#[cfg(unix)]
fn terminate_signal() -> Option<tokio::signal::unix::Signal> {
    use tokio::signal::unix::{SignalKind, signal};

    signal(SignalKind::terminate())
        .inspect_err(|e| warn!(error = %e, "Failed to listen for SIGTERM"))
        .ok()
}

#[cfg(unix)]
async fn shutdown_signal(terminate: Option<tokio::signal::unix::Signal>) {
    let terminate = async {
        match terminate {
            Some(mut sig) => {
                sig.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = ctrl_c() => info!("Ctrl-C received; shutting down"),
        _ = terminate => info!("SIGTERM received; shutting down"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    ctrl_c().await;
    info!("Ctrl-C received; shutting down");
}
