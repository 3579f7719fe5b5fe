//! Line-Drive Gateway HTTP Server
//!
//! Receives LINE webhooks, relays media into Google Drive, and serves the
//! health and optional diagnostic routes.

pub mod debug_api;
pub mod dispatch;
pub mod health_api;
pub mod server;
pub mod webhook;

pub use dispatch::EventDispatcher;
pub use server::{GatewayState, build_router, start_server};
