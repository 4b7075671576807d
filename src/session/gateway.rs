//! Session gateway: the guard boundary every protected route passes through.
//!
//! The gateway orchestrates three collaborators — a [`SessionStore`], a
//! [`RateLimiter`], and a [`CredentialAuthenticator`] — behind two guard
//! operations:
//!
//! - [`SessionGateway::authenticate_admin`] checks the shared admin secret.
//! - [`SessionGateway::authenticate_session`] validates a session token.
//!
//! Each guard either returns `Ok(())` and the caller proceeds, or returns an
//! [`AuthError`] whose `IntoResponse` writes the complete failure response;
//! the caller propagates it with `?` and never writes anything further.
//!
//! # Token transmission
//!
//! A session id may travel as a query parameter, a JSON body field, or a
//! header, all under the `smid` key. Precedence is query > body > header;
//! the first non-empty candidate wins.

use std::sync::Arc;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};
use url::form_urlencoded;
use uuid::Uuid;

use crate::error::StoreError;

use super::limiter::RateLimiter;
use super::store::{Session, SessionStore};
use super::{ADMIN_SECRET_HEADER, DEFAULT_SESSION_LIFETIME_MS, SESSION_TOKEN_KEY};

// =============================================================================
// Errors
// =============================================================================

/// Guard rejection reasons.
///
/// Every variant except `Store` surfaces as HTTP 401 with a short
/// human-readable message; rejections are never retried and never fatal to
/// the process.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Failure threshold exceeded for the client address; checked before
    /// any credential or token validation
    #[error("Too many login attempts")]
    RateLimited,

    /// Admin credential missing or incorrect
    #[error("Not authenticated as admin")]
    AdminUnauthorized,

    /// No session id found in query, body, or header
    #[error("Missing smid")]
    MissingToken,

    /// Session id not found in the store (or the record is malformed)
    #[error("Invalid session")]
    InvalidToken,

    /// Session found but past its lifetime; the record has been deleted
    #[error("Session expired")]
    ExpiredToken,

    /// Persistence failure while consulting the store
    #[error("Session store error")]
    Store(#[from] StoreError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let status = match self {
            AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        };

        // Lockouts and bad credentials/tokens can indicate an attack, so log
        // at warn. A missing or expired token is common and expected: debug.
        match &self {
            AuthError::RateLimited | AuthError::AdminUnauthorized | AuthError::InvalidToken => {
                warn!(status = status.as_u16(), "Authentication failed: {}", message);
            }
            AuthError::MissingToken | AuthError::ExpiredToken => {
                debug!(status = status.as_u16(), "Authentication failed: {}", message);
            }
            AuthError::Store(err) => {
                tracing::error!(status = status.as_u16(), "Session store failure: {}", err);
            }
        }

        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

// =============================================================================
// Pluggable seams
// =============================================================================

/// Predicate deciding whether a request carries the valid admin secret.
///
/// Injected rather than hard-coded so alternative credential sources
/// (environment variable, secret manager, mutual TLS) can be substituted
/// without touching the gateway.
pub trait CredentialAuthenticator: Send + Sync {
    /// Whether the request headers carry a valid admin credential.
    fn authenticate(&self, headers: &HeaderMap) -> bool;
}

/// Default authenticator: compares the `admin-session` header against a
/// configured secret with plain string equality.
#[derive(Clone)]
pub struct HeaderSecretAuthenticator {
    secret: String,
}

impl HeaderSecretAuthenticator {
    /// Create an authenticator for the given shared secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl CredentialAuthenticator for HeaderSecretAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> bool {
        headers
            .get(ADMIN_SECRET_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|presented| presented == self.secret)
    }
}

/// Generator for opaque session ids.
pub trait IdGenerator: Send + Sync {
    /// Produce a new unique session id.
    fn generate(&self) -> String;
}

/// Default id generator: cryptographically random UUID v4.
#[derive(Debug, Clone, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

// =============================================================================
// Token extraction
// =============================================================================

/// Extract a candidate session id from the three accepted locations.
///
/// Precedence: query parameter, then JSON body field, then header, all under
/// the `smid` key. The first non-empty candidate wins; empty strings are
/// treated as absent.
pub fn extract_session_id(
    query: Option<&str>,
    body: Option<&serde_json::Value>,
    headers: &HeaderMap,
) -> Option<String> {
    let from_query = query.and_then(|q| {
        form_urlencoded::parse(q.as_bytes())
            .find(|(key, value)| key == SESSION_TOKEN_KEY && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    });

    let from_body = || {
        body.and_then(|b| b.get(SESSION_TOKEN_KEY))
            .and_then(|value| value.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };

    let from_header = || {
        headers
            .get(SESSION_TOKEN_KEY)
            .and_then(|value| value.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };

    from_query.or_else(from_body).or_else(from_header)
}

// =============================================================================
// Gateway
// =============================================================================

/// Orchestrates store, limiter, and authenticator behind the two guards and
/// session issuance.
///
/// Constructed once at startup and shared (via `Arc` in the application
/// state) across all request handlers.
pub struct SessionGateway<S: SessionStore> {
    store: S,
    limiter: RateLimiter,
    credentials: Arc<dyn CredentialAuthenticator>,
    id_generator: Arc<dyn IdGenerator>,
    session_lifetime_ms: i64,
}

impl<S: SessionStore> SessionGateway<S> {
    /// Create a gateway with the default collaborators: header-secret
    /// authentication, UUID v4 ids, default lifetime and failure threshold.
    pub fn new(store: S, admin_secret: impl Into<String>) -> Self {
        Self {
            store,
            limiter: RateLimiter::default(),
            credentials: Arc::new(HeaderSecretAuthenticator::new(admin_secret)),
            id_generator: Arc::new(UuidIdGenerator),
            session_lifetime_ms: DEFAULT_SESSION_LIFETIME_MS,
        }
    }

    /// Set the lifetime applied to newly minted sessions.
    pub fn with_session_lifetime_ms(mut self, lifetime_ms: i64) -> Self {
        self.session_lifetime_ms = lifetime_ms;
        self
    }

    /// Set the rate limiter's failure threshold.
    pub fn with_failure_threshold(mut self, threshold: u32) -> Self {
        self.limiter = RateLimiter::new(threshold);
        self
    }

    /// Substitute the credential authenticator.
    pub fn with_credential_authenticator(
        mut self,
        credentials: Arc<dyn CredentialAuthenticator>,
    ) -> Self {
        self.credentials = credentials;
        self
    }

    /// Substitute the session id generator.
    pub fn with_id_generator(mut self, id_generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = id_generator;
        self
    }

    /// The underlying session store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The lifetime applied to newly minted sessions, in milliseconds.
    pub fn session_lifetime_ms(&self) -> i64 {
        self.session_lifetime_ms
    }

    /// Guard for admin-gated routes.
    ///
    /// The rate limit is checked first, even for otherwise-correct
    /// credentials. A failed credential check records a failure against the
    /// client address; success has no side effects.
    pub fn authenticate_admin(&self, client_key: &str, headers: &HeaderMap) -> Result<(), AuthError> {
        if self.limiter.is_rate_limited(client_key) {
            return Err(AuthError::RateLimited);
        }

        if !self.credentials.authenticate(headers) {
            self.limiter.record_failure(client_key);
            return Err(AuthError::AdminUnauthorized);
        }

        Ok(())
    }

    /// Guard for session-gated routes.
    ///
    /// `candidate` is the session id extracted via [`extract_session_id`].
    /// An unknown or malformed token records a rate-limit failure; an
    /// expired-but-otherwise-valid token does not (it is not an attack
    /// signal), but its record is deleted so later lookups report it as
    /// invalid.
    pub async fn authenticate_session(
        &self,
        client_key: &str,
        candidate: Option<&str>,
    ) -> Result<(), AuthError> {
        if self.limiter.is_rate_limited(client_key) {
            return Err(AuthError::RateLimited);
        }

        let id = candidate.ok_or(AuthError::MissingToken)?;

        let Some(session) = self.store.get(id).await? else {
            self.limiter.record_failure(client_key);
            return Err(AuthError::InvalidToken);
        };

        match session.is_expired_at(Utc::now()) {
            Ok(false) => Ok(()),
            Ok(true) => {
                // Lazy expiry: the failed lookup removes the record
                self.store.del(&session.id).await?;
                Err(AuthError::ExpiredToken)
            }
            Err(_) => {
                // Malformed record: same treatment as an unknown id
                self.limiter.record_failure(client_key);
                Err(AuthError::InvalidToken)
            }
        }
    }

    /// Mint and persist a new session with the configured default lifetime.
    ///
    /// The only path by which sessions come into existence. Callers must
    /// pass [`authenticate_admin`](Self::authenticate_admin) first.
    pub async fn create_session(&self) -> Result<Session, AuthError> {
        let session = Session::issued_now(self.id_generator.generate(), self.session_lifetime_ms);
        let stored = self.store.set(session).await?;
        Ok(stored)
    }
}

// =============================================================================
// Tests
// =============================================================================
