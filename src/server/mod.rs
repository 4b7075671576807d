//! HTTP server components for the gallery gateway.
//!
//! This module contains the Axum handlers, router configuration, and the
//! client address extractor used for rate-limit bookkeeping.

pub mod client;
pub mod handlers;
pub mod routes;

pub use client::ClientAddr;
pub use handlers::{
    create_session_handler, health_handler, test_session_handler, AppState, HealthResponse,
    MessageResponse,
};
pub use routes::{create_router, RouterConfig};
