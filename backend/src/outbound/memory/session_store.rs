//! In-memory `SessionStore` with clock-driven expiry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};
use tokio::sync::RwLock;

use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{SessionAttributes, SessionToken};

#[derive(Debug, Clone)]
struct Entry {
    attributes: SessionAttributes,
    expires_at: DateTime<Utc>,
}

/// Session store kept in process memory.
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<SessionToken, Entry>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemorySessionStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Seed a session directly, bypassing login.
    pub async fn insert(&self, token: SessionToken, attributes: SessionAttributes, ttl: Duration) {
        if let Ok(expires_at) = self.expiry_for(ttl) {
            self.entries.write().await.insert(
                token,
                Entry {
                    attributes,
                    expires_at,
                },
            );
        }
    }

    /// Number of stored sessions, expired ones included until pruned.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn expiry_for(&self, ttl: Duration) -> Result<DateTime<Utc>, SessionStoreError> {
        let delta = TimeDelta::from_std(ttl)
            .map_err(|err| SessionStoreError::operation(format!("invalid session ttl: {err}")))?;
        self.clock
            .utc()
            .checked_add_signed(delta)
            .ok_or_else(|| SessionStoreError::operation("session ttl overflows the clock"))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(
        &self,
        token: &SessionToken,
    ) -> Result<Option<SessionAttributes>, SessionStoreError> {
        let now = self.clock.utc();
        let entries = self.entries.read().await;
        Ok(entries
            .get(token)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.attributes.clone()))
    }

    async fn save(
        &self,
        token: &SessionToken,
        attributes: &SessionAttributes,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let expires_at = self.expiry_for(ttl)?;
        let now = self.clock.utc();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            token.clone(),
            Entry {
                attributes: attributes.clone(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, token: &SessionToken) -> Result<(), SessionStoreError> {
        self.entries.write().await.remove(token);
        Ok(())
    }
}
