//! Router configuration for the gallery gateway.
//!
//! This module defines the HTTP routes and applies middleware for CORS and
//! request tracing.
//!
//! # Route Structure
//!
//! ```text
//! /health            - Health check (public)
//! /session/create    - Mint a session token (admin credential)
//! /session/test      - Probe a session token (session token)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use gallery_gate::server::routes::{create_router, RouterConfig};
//! use gallery_gate::session::{SessionGateway, SqliteSessionStore};
//!
//! let store = SqliteSessionStore::connect("sqlite:sessions.db?mode=rwc").await?;
//! let gateway = SessionGateway::new(store, "my-admin-secret");
//!
//! let config = RouterConfig::new()
//!     .with_cors_origins(vec!["https://gallery.example.com".to_string()]);
//!
//! let router = create_router(gateway, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use http::header::{HeaderName, CONTENT_TYPE};
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::session::{SessionGateway, SessionStore, ADMIN_SECRET_HEADER, SESSION_TOKEN_KEY};

use super::handlers::{create_session_handler, health_handler, test_session_handler, AppState};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a router configuration with defaults: CORS allows any origin
    /// and tracing is enabled.
    pub fn new() -> Self {
        Self {
            cors_origins: None,
            enable_tracing: true,
        }
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Public routes (health check)
/// - Session routes (guarded inside their handlers by the gateway)
/// - CORS configuration
/// - Request tracing (optional)
pub fn create_router<S>(gateway: SessionGateway<S>, config: RouterConfig) -> Router
where
    S: SessionStore,
{
    let app_state = AppState::new(gateway);

    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/session/create", post(create_session_handler::<S>))
        .route("/session/test", get(test_session_handler::<S>))
        .with_state(app_state)
        .route("/health", get(health_handler))
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
///
/// The credential and token headers must be allowed explicitly, otherwise
/// browser preflights reject them.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(ADMIN_SECRET_HEADER),
            HeaderName::from_static(SESSION_TOKEN_KEY),
        ])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
