//! In-memory conversation sessions. Nothing outlives the process.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use lexi_core::SessionConfig;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::Turn;

/// Sessions idle longer than this are dropped on the next sweep.
pub const DEFAULT_IDLE_MINUTES: i64 = 30;

/// Server half of a widget conversation: the preamble and model it was
/// created with plus every completed turn. `updated_at` is the last time a
/// turn touched it.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    pub id: String,
    pub config: SessionConfig,
    pub turns: Vec<Turn>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationSession {
    pub fn new(id: String, config: SessionConfig) -> Self {
        let now = Utc::now();
        Self { id, config, turns: Vec::new(), created_at: now, updated_at: now }
    }
}

/// Sessions keyed by id. A session lives for one page visit, so idle ones
/// are evicted whenever a turn resolves its session.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, ConversationSession>>>,
    idle_ttl: TimeDelta,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(TimeDelta::minutes(DEFAULT_IDLE_MINUTES))
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: TimeDelta) -> Self {
        Self { sessions: Arc::default(), idle_ttl }
    }

    pub async fn find_by_id(&self, id: &str) -> Option<ConversationSession> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Inserts a new session under `id`, or returns the existing one and
    /// marks it active. Idle sessions are swept first, so an expired id is
    /// recreated empty.
    pub async fn get_or_create(&self, id: &str, config: &SessionConfig) -> ConversationSession {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();

        let before = sessions.len();
        sessions.retain(|_, s| now - s.updated_at < self.idle_ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle session(s)");
        }

        let session = sessions.entry(id.to_string()).or_insert_with(|| {
            debug!("Creating session {id} on model {}", config.model);
            ConversationSession::new(id.to_string(), config.clone())
        });
        session.updated_at = now;
        session.clone()
    }

    /// Records a completed user/assistant exchange.
    pub async fn append_exchange(&self, id: &str, user: Turn, assistant: Turn) -> Result<(), AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| AppError::SessionNotFound { id: id.to_string() })?;
        session.turns.push(user);
        session.turns.push(assistant);
        session.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let store = SessionStore::new();
        let config = SessionConfig::lexi();

        let first = store.get_or_create("s1", &config).await;
        store
            .append_exchange("s1", Turn::user("hi"), Turn::assistant("hello"))
            .await
            .unwrap();
        let again = store.get_or_create("s1", &config).await;

        assert_eq!(first.id, again.id);
        assert_eq!(again.turns.len(), 2);
        assert_eq!(again.created_at, first.created_at);
    }

    #[tokio::test]
    async fn append_to_unknown_session_fails() {
        let store = SessionStore::new();
        let err = store
            .append_exchange("missing", Turn::user("a"), Turn::assistant("b"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn exchange_preserves_order_and_bumps_timestamp() {
        let store = SessionStore::new();
        let created = store.get_or_create("s1", &SessionConfig::lexi()).await;
        store
            .append_exchange("s1", Turn::user("What is ML?"), Turn::assistant("A subset of AI."))
            .await
            .unwrap();

        let session = store.find_by_id("s1").await.unwrap();
        assert_eq!(session.turns[0].text, "What is ML?");
        assert_eq!(session.turns[1].text, "A subset of AI.");
        assert!(session.updated_at >= created.updated_at);
    }

    async fn backdate(store: &SessionStore, id: &str, by: TimeDelta) {
        let mut sessions = store.sessions.write().await;
        let session = sessions.get_mut(id).unwrap();
        session.updated_at = session.updated_at - by;
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted_on_next_resolve() {
        let store = SessionStore::new();
        let config = SessionConfig::lexi();
        store.get_or_create("stale", &config).await;
        store
            .append_exchange("stale", Turn::user("hi"), Turn::assistant("hello"))
            .await
            .unwrap();
        store.get_or_create("fresh", &config).await;
        backdate(&store, "stale", TimeDelta::hours(2)).await;

        store.get_or_create("other", &config).await;

        assert!(store.find_by_id("stale").await.is_none());
        assert!(store.find_by_id("fresh").await.is_some());
        assert!(store.find_by_id("other").await.is_some());
    }

    #[tokio::test]
    async fn expired_id_comes_back_empty() {
        let store = SessionStore::with_idle_ttl(TimeDelta::minutes(5));
        let config = SessionConfig::lexi();
        store.get_or_create("s1", &config).await;
        store
            .append_exchange("s1", Turn::user("What is ML?"), Turn::assistant("A subset of AI."))
            .await
            .unwrap();
        backdate(&store, "s1", TimeDelta::minutes(6)).await;

        let session = store.get_or_create("s1", &config).await;

        assert!(session.turns.is_empty());
    }

    #[tokio::test]
    async fn resolving_keeps_an_active_session_alive() {
        let store = SessionStore::with_idle_ttl(TimeDelta::minutes(5));
        let config = SessionConfig::lexi();
        store.get_or_create("s1", &config).await;
        backdate(&store, "s1", TimeDelta::minutes(4)).await;

        store.get_or_create("s1", &config).await;
        backdate(&store, "s1", TimeDelta::minutes(4)).await;
        store.get_or_create("s2", &config).await;

        assert!(store.find_by_id("s1").await.is_some());
    }
}
