//! # Gallery Gate
//!
//! Session-based access control for a photo gallery server.
//!
//! A single shared admin credential mints opaque session tokens, which then
//! gate ordinary reads. Both tiers sit behind a sticky per-address
//! brute-force limiter.
//!
//! ## Features
//!
//! - **Two-tier authentication**: an admin credential (the `admin-session`
//!   header) mints sessions; session tokens (the `smid` key) gate reads
//! - **Flexible token transmission**: a token is accepted as a query
//!   parameter, a JSON body field, or a header
//! - **Lazy expiry**: no background sweep; an expired record is deleted on
//!   the first lookup past its lifetime
//! - **Sticky rate limiting**: a client address that accumulates too many
//!   authentication failures is locked out for the process lifetime
//! - **Pluggable persistence**: SQLite for production, in-memory for tests
//!   and embedding
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`session`] - Session model, stores, rate limiter, and the gateway
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Store error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use gallery_gate::{create_router, RouterConfig, SessionGateway, SqliteSessionStore, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqliteSessionStore::connect("sqlite:sessions.db?mode=rwc").await?;
//!     store.init().await?;
//!
//!     let gateway = SessionGateway::new(store, "my-admin-secret");
//!     let router = create_router(gateway, RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use error::StoreError;
pub use server::{
    create_router, create_session_handler, health_handler, test_session_handler, AppState,
    ClientAddr, HealthResponse, MessageResponse, RouterConfig,
};
pub use session::{
    extract_session_id, AuthError, CredentialAuthenticator, HeaderSecretAuthenticator, IdGenerator,
    MemorySessionStore, RateLimiter, Session, SessionGateway, SessionStore, SqliteSessionStore,
    UuidIdGenerator, ADMIN_SECRET_HEADER, DEFAULT_FAILURE_THRESHOLD, DEFAULT_SESSION_LIFETIME_MS,
    SESSION_TOKEN_KEY,
};
