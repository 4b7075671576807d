//! Session-based access control for the gallery server.
//!
//! Two tiers of authentication guard every protected route:
//!
//! 1. A single shared **admin credential**, presented in the
//!    [`ADMIN_SECRET_HEADER`] header, which can mint session tokens.
//! 2. Short-lived **session tokens**, presented under the
//!    [`SESSION_TOKEN_KEY`] key (query parameter, JSON body field, or
//!    header), which gate ordinary reads.
//!
//! Both tiers sit behind a sticky per-address [`RateLimiter`]: once a client
//! address accumulates too many authentication failures it stays locked out
//! for the remainder of the process lifetime.
//!
//! Session validity is evaluated lazily. There is no background sweep; an
//! expired record is deleted as a side effect of the first lookup that finds
//! it past its lifetime.

pub mod gateway;
pub mod limiter;
pub mod sqlite;
pub mod store;

pub use gateway::{
    extract_session_id, AuthError, CredentialAuthenticator, HeaderSecretAuthenticator,
    IdGenerator, SessionGateway, UuidIdGenerator,
};
pub use limiter::{RateLimiter, DEFAULT_FAILURE_THRESHOLD};
pub use sqlite::SqliteSessionStore;
pub use store::{MemorySessionStore, Session, SessionStore};

/// Header carrying the shared admin secret.
pub const ADMIN_SECRET_HEADER: &str = "admin-session";

/// Conventional key under which a session id travels, whether as a query
/// parameter, a JSON body field, or a header.
pub const SESSION_TOKEN_KEY: &str = "smid";

/// Default session lifetime in milliseconds (24 hours).
pub const DEFAULT_SESSION_LIFETIME_MS: i64 = 86_400_000;
