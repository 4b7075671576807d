//! Session model and the persistence contract.
//!
//! A [`Session`] is one issued, time-bounded access token record. The store
//! owns its durable representation; the gateway owns the validity
//! interpretation (`now - created_at < lifetime`, evaluated at lookup time).
//!
//! [`SessionStore`] is a narrow interface so backends can be swapped without
//! touching gateway logic: [`SqliteSessionStore`](super::SqliteSessionStore)
//! for production, [`MemorySessionStore`] for tests and embedding.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// One issued access token record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Opaque unique id, generated by the gateway's id generator
    pub id: String,

    /// RFC 3339 timestamp of issuance
    pub created_at: String,

    /// Validity duration in milliseconds after `created_at`
    pub lifetime: i64,
}

impl Session {
    /// Create a session issued at `now` with the given lifetime.
    pub fn issued_now(id: impl Into<String>, lifetime_ms: i64) -> Self {
        Self::issued_at(id, Utc::now(), lifetime_ms)
    }

    /// Create a session with an explicit issuance time.
    pub fn issued_at(id: impl Into<String>, created_at: DateTime<Utc>, lifetime_ms: i64) -> Self {
        Self {
            id: id.into(),
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            lifetime: lifetime_ms,
        }
    }

    /// Parse the issuance timestamp.
    ///
    /// Fails when the stored record is malformed; the gateway treats that
    /// the same as an unknown session id.
    pub fn issued_at_time(&self) -> Result<DateTime<Utc>, chrono::ParseError> {
        Ok(DateTime::parse_from_rfc3339(&self.created_at)?.with_timezone(&Utc))
    }

    /// Whether the session is past its lifetime at `now`.
    ///
    /// The boundary is inclusive: a session is expired once
    /// `now - created_at >= lifetime`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> Result<bool, chrono::ParseError> {
        let issued = self.issued_at_time()?;
        let age_ms = now.signed_duration_since(issued).num_milliseconds();
        Ok(age_ms >= self.lifetime)
    }
}

/// Durable keyed storage for session records.
///
/// Implementations must give read-after-write consistency for a single id
/// (`set` then `get` on the same id is visible to any subsequent request)
/// and must report a concurrent delete as "not found" rather than a partial
/// record. No operation interprets expiry.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Idempotently ensure the sessions schema exists. Safe on every start.
    async fn init(&self) -> Result<(), StoreError>;

    /// Fetch a session by id. Absence is `None`, never an error.
    async fn get(&self, id: &str) -> Result<Option<Session>, StoreError>;

    /// Persist a new session and return the stored representation.
    ///
    /// The caller guarantees id uniqueness; a collision is
    /// [`StoreError::DuplicateId`].
    async fn set(&self, session: Session) -> Result<Session, StoreError>;

    /// Remove a session record. No-op when absent.
    async fn del(&self, id: &str) -> Result<(), StoreError>;
}

/// In-memory [`SessionStore`] backed by a shared hash map.
///
/// Clones share state, so a test can keep a handle to inspect or back-date
/// records while the gateway owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Replace a record in place, bypassing the uniqueness check.
    ///
    /// Test hook for back-dating `created_at` on an already-issued session.
    pub fn overwrite(&self, session: Session) {
        self.lock().insert(session.id.clone(), session);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Session>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn init(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.lock().get(id).cloned())
    }

    async fn set(&self, session: Session) -> Result<Session, StoreError> {
        let mut sessions = self.lock();
        if sessions.contains_key(&session.id) {
            return Err(StoreError::DuplicateId(session.id));
        }
        sessions.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn del(&self, id: &str) -> Result<(), StoreError> {
        self.lock().remove(id);
        Ok(())
    }
}
