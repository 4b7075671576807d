//! HTTP request handlers for the session API.
//!
//! # Endpoints
//!
//! - `POST /session/create` - Mint a session token (admin credential required)
//! - `GET /session/test` - Probe whether a session token is valid
//! - `GET /health` - Health check endpoint
//!
//! Each protected handler calls the gateway guard first and propagates its
//! [`AuthError`] with `?`; the error's `IntoResponse` writes the complete
//! failure response, so a handler body only ever produces the success path.

use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::session::{extract_session_id, AuthError, Session, SessionGateway, SessionStore};

use super::client::ClientAddr;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the session gateway.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<S: SessionStore> {
    /// The gateway guarding all protected routes
    pub gateway: Arc<SessionGateway<S>>,
}

impl<S: SessionStore> AppState<S> {
    /// Create a new application state with the given gateway.
    pub fn new(gateway: SessionGateway<S>) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}

impl<S: SessionStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Single-message JSON body, used for both success and failure responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome message
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle session creation requests.
///
/// # Endpoint
///
/// `POST /session/create`
///
/// # Headers
///
/// - `admin-session`: the shared admin secret
///
/// # Response
///
/// - `200 OK`: JSON body with the full stored session record
///   (`id`, `created_at`, `lifetime`)
/// - `401 Unauthorized`: missing/wrong credential or rate-limited address
/// - `500 Internal Server Error`: session store failure
pub async fn create_session_handler<S: SessionStore>(
    State(state): State<AppState<S>>,
    client: ClientAddr,
    headers: HeaderMap,
) -> Result<Json<Session>, AuthError> {
    state.gateway.authenticate_admin(client.key(), &headers)?;

    let session = state.gateway.create_session().await?;
    Ok(Json(session))
}

/// Handle session probe requests.
///
/// # Endpoint
///
/// `GET /session/test`
///
/// # Token
///
/// The session id is accepted under the `smid` key as a query parameter,
/// a JSON body field, or a header (precedence in that order).
///
/// # Response
///
/// - `200 OK`: `{"message": "Success!"}`
/// - `401 Unauthorized`: missing, unknown, or expired token, or
///   rate-limited address
/// - `500 Internal Server Error`: session store failure
pub async fn test_session_handler<S: SessionStore>(
    State(state): State<AppState<S>>,
    client: ClientAddr,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Option<Json<serde_json::Value>>,
) -> Result<Json<MessageResponse>, AuthError> {
    let candidate = extract_session_id(query.as_deref(), body.as_ref().map(|Json(b)| b), &headers);

    state
        .gateway
        .authenticate_session(client.key(), candidate.as_deref())
        .await?;

    Ok(Json(MessageResponse::new("Success!")))
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
