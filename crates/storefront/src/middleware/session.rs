//! Session middleware configuration.
//!
//! Sessions are held in process memory in a `moka` cache. They carry the
//! visitor's cart and nothing else, and are lost when the server restarts.
//! The cache is bounded and drops sessions idle for longer than the session
//! expiry, so abandoned carts do not accumulate.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "pumpkin_session";

/// Session expiry time in seconds (1 day of inactivity).
const SESSION_EXPIRY_SECONDS: u64 = 24 * 60 * 60;

/// Most sessions kept at once; the least recently used go first.
const MAX_SESSIONS: u64 = 100_000;

/// In-memory session store that evicts idle sessions.
#[derive(Clone)]
pub struct CartSessionStore {
    sessions: Cache<Id, Record>,
}

impl CartSessionStore {
    /// Create a store holding at most `capacity` sessions, each dropped after
    /// `idle` without a read or write.
    #[must_use]
    pub fn new(capacity: u64, idle: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(capacity)
            .time_to_idle(idle)
            .build();

        Self { sessions }
    }

    /// Number of sessions currently held.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.sessions.entry_count()
    }

    /// Whether no session is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply pending evictions now instead of on the next cache access.
    pub async fn run_pending_tasks(&self) {
        self.sessions.run_pending_tasks().await;
    }
}

impl Default for CartSessionStore {
    fn default() -> Self {
        Self::new(MAX_SESSIONS, Duration::from_secs(SESSION_EXPIRY_SECONDS))
    }
}

impl fmt::Debug for CartSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartSessionStore")
            .field("sessions", &self.sessions.entry_count())
            .finish()
    }
}

#[async_trait]
impl SessionStore for CartSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.sessions.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.sessions.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.sessions.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let now = OffsetDateTime::now_utc();
        Ok(self
            .sessions
            .get(session_id)
            .await
            .filter(|record| record.expiry_date > now))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.sessions.invalidate(session_id).await;
        Ok(())
    }
}

/// Create the session layer backed by `store`.
#[must_use]
pub fn create_session_layer(
    config: &StorefrontConfig,
    store: CartSessionStore,
) -> SessionManagerLayer<CartSessionStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(
                i64::try_from(SESSION_EXPIRY_SECONDS).unwrap_or(i64::MAX),
            ),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_sessions::cookie::time::Duration as CookieDuration;

    use super::*;

    fn record(expires_in: CookieDuration) -> Record {
        Record {
            id: Id::default(),
            data: std::collections::HashMap::default(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = CartSessionStore::default();
        let record = record(CookieDuration::minutes(30));

        store.save(&record).await.unwrap();
        let loaded = store.load(&record.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, record.id);
    }

    #[tokio::test]
    async fn test_expired_record_is_not_loaded() {
        let store = CartSessionStore::default();
        let record = record(CookieDuration::minutes(-1));

        store.save(&record).await.unwrap();
        assert!(store.load(&record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_frees_the_session() {
        let store = CartSessionStore::default();
        let mut record = record(CookieDuration::minutes(30));

        store.create(&mut record).await.unwrap();
        store.delete(&record.id).await.unwrap();
        store.run_pending_tasks().await;

        assert!(store.load(&record.id).await.unwrap().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted() {
        let store = CartSessionStore::new(MAX_SESSIONS, Duration::from_millis(50));
        for _ in 0..10 {
            store.save(&record(CookieDuration::minutes(30))).await.unwrap();
        }
        store.run_pending_tasks().await;
        assert_eq!(store.len(), 10);

        tokio::time::sleep(Duration::from_millis(150)).await;
        store.run_pending_tasks().await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_capacity_bounds_the_store() {
        let store = CartSessionStore::new(5, Duration::from_secs(SESSION_EXPIRY_SECONDS));
        for _ in 0..50 {
            store.save(&record(CookieDuration::minutes(30))).await.unwrap();
        }
        store.run_pending_tasks().await;
        assert!(store.len() <= 5);
    }
}
